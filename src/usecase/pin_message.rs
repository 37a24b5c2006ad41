//! UseCase: メッセージピン留め処理
//!
//! ピン留めはトグル動作です。対象メッセージが既にピン留め済みなら解除し、
//! そうでなければ同一チャンネル内の他のピンを外した上でピン留めします
//! （チャンネルごとに常に高々 1 件）。clear-then-set は Repository の
//! 単一操作 `pin_exclusive` が担うため、競合しても不変条件は崩れません。

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageId, MessageRepository, UserId};

use super::error::PinMessageError;

/// メッセージピン留めのユースケース
pub struct PinMessageUseCase {
    /// MessageRepository（メッセージ永続化の抽象化）
    repository: Arc<dyn MessageRepository>,
}

impl PinMessageUseCase {
    /// 新しい PinMessageUseCase を作成
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self { repository }
    }

    /// ピン留めトグルを実行
    ///
    /// # Arguments
    ///
    /// * `requester_id` - 操作するユーザーの ID（Domain Model）
    /// * `raw_message_id` - 対象メッセージの ID 文字列
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 更新後のメッセージ（pinned フラグ反転済み）
    /// * `Err(PinMessageError)` - 対象なし、または認可失敗
    pub async fn execute(
        &self,
        requester_id: &UserId,
        raw_message_id: &str,
    ) -> Result<ChatMessage, PinMessageError> {
        let message_id = MessageId::new(raw_message_id.to_string())
            .map_err(|_| PinMessageError::NotFound(raw_message_id.to_string()))?;

        // 1. 対象メッセージを取得
        let message = self
            .repository
            .find_by_id(&message_id)
            .await?
            .ok_or_else(|| PinMessageError::NotFound(raw_message_id.to_string()))?;

        // 2. 認可：対象チャンネルの参加者だけがピン留めできる
        if !message.channel_id.is_participant(requester_id) {
            return Err(PinMessageError::Unauthorized(
                requester_id.as_str().to_string(),
            ));
        }

        // 3. トグル
        let updated = if message.pinned {
            self.repository.unpin(&message_id).await?
        } else {
            self.repository.pin_exclusive(&message_id).await?
        };

        Ok(updated)
    }
}
