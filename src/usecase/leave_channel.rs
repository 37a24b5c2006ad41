//! UseCase: チャンネル退出処理
//!
//! 検証と認可は参加時と同じ。購読していないチャンネルからの退出は no-op です。

use std::sync::Arc;

use crate::domain::{ChannelId, ChannelRouter, UserId};

use super::error::JoinChannelError;

/// チャンネル退出のユースケース
pub struct LeaveChannelUseCase {
    /// ChannelRouter（チャンネル購読の抽象化）
    router: Arc<dyn ChannelRouter>,
}

impl LeaveChannelUseCase {
    /// 新しい LeaveChannelUseCase を作成
    pub fn new(router: Arc<dyn ChannelRouter>) -> Self {
        Self { router }
    }

    /// チャンネル退出を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ChannelId)` - 退出成功（購読していなかった場合も成功）
    /// * `Err(JoinChannelError)` - 検証または認可の失敗
    pub async fn execute(
        &self,
        user_id: &UserId,
        raw_channel_id: &str,
    ) -> Result<ChannelId, JoinChannelError> {
        let channel_id = ChannelId::parse(raw_channel_id)?;

        if !channel_id.is_participant(user_id) {
            return Err(JoinChannelError::Unauthorized(
                user_id.as_str().to_string(),
            ));
        }

        self.router.leave(user_id, &channel_id).await;

        Ok(channel_id)
    }
}
