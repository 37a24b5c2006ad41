//! UseCase: タイピング通知処理
//!
//! 永続化もデバウンスも行わない純粋なリレーです。配信対象は
//! チャンネルの購読者から送信者本人を除いた集合で、送信者に
//! エコーバックされることはありません。

use std::sync::Arc;

use tracing::warn;

use crate::domain::{ChannelId, ChannelRouter, ConnectionRegistry, UserId};

use super::error::TypingError;

/// タイピング通知のユースケース
pub struct NotifyTypingUseCase {
    /// ChannelRouter（チャンネル購読の抽象化）
    router: Arc<dyn ChannelRouter>,
    /// ConnectionRegistry（配信の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl NotifyTypingUseCase {
    /// 新しい NotifyTypingUseCase を作成
    pub fn new(router: Arc<dyn ChannelRouter>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { router, registry }
    }

    /// タイピング通知を実行
    ///
    /// # Arguments
    ///
    /// * `sender_id` - タイピング中のユーザーの ID（Domain Model）
    /// * `raw_channel_id` - 対象チャンネルの ID 文字列
    /// * `json_event` - 配信するシリアライズ済みイベント
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<UserId>)` - 実際の配信対象（送信者を除いた購読者）
    /// * `Err(TypingError)` - 検証または認可の失敗
    pub async fn execute(
        &self,
        sender_id: &UserId,
        raw_channel_id: &str,
        json_event: &str,
    ) -> Result<Vec<UserId>, TypingError> {
        let channel_id = ChannelId::parse(raw_channel_id)?;

        if !channel_id.is_participant(sender_id) {
            return Err(TypingError::Unauthorized(sender_id.as_str().to_string()));
        }

        // 送信者本人を除いた購読者に配信
        let targets: Vec<UserId> = self
            .router
            .subscribers(&channel_id)
            .await
            .into_iter()
            .filter(|id| id != sender_id)
            .collect();

        if let Err(e) = self.registry.broadcast(targets.clone(), json_event).await {
            warn!(channel_id = channel_id.as_str(), error = %e, "typing relay failed");
        }

        Ok(targets)
    }
}
