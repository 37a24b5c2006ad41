//! UseCase: メッセージ履歴取得処理
//!
//! チャンネル履歴（参加者認可つきページング）と、管理者向けの
//! 横断的な最新メッセージ一覧の 2 つの読み取りを提供します。

use std::sync::Arc;

use crate::domain::{
    ChannelId, ChatMessage, MessageRepository, SortOrder, UserDirectory, UserId,
};

use super::error::HistoryError;

/// メッセージ履歴取得のユースケース
pub struct FetchHistoryUseCase {
    /// MessageRepository（メッセージ永続化の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// UserDirectory（権限チェックの抽象化）
    directory: Arc<dyn UserDirectory>,
}

impl FetchHistoryUseCase {
    /// 新しい FetchHistoryUseCase を作成
    pub fn new(repository: Arc<dyn MessageRepository>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            repository,
            directory,
        }
    }

    /// チャンネル履歴を取得
    ///
    /// # Arguments
    ///
    /// * `raw_channel_id` - 対象チャンネルの ID 文字列
    /// * `requester_id` - 履歴を要求するユーザーの ID（Domain Model）
    /// * `order` - 作成時刻の並び順
    /// * `page` - 0 始まりのページ番号
    /// * `page_size` - 1 ページあたりの件数
    ///
    /// # Returns
    ///
    /// * `Ok((ChannelId, Vec<ChatMessage>))` - 検証済みチャンネル ID とページ
    /// * `Err(HistoryError)` - 検証または認可の失敗
    pub async fn execute(
        &self,
        raw_channel_id: &str,
        requester_id: &UserId,
        order: SortOrder,
        page: usize,
        page_size: usize,
    ) -> Result<(ChannelId, Vec<ChatMessage>), HistoryError> {
        let channel_id = ChannelId::parse(raw_channel_id)?;

        // 自分が参加者であるチャンネルの履歴だけ読める
        if !channel_id.is_participant(requester_id) {
            return Err(HistoryError::Unauthorized(
                requester_id.as_str().to_string(),
                channel_id.as_str().to_string(),
            ));
        }

        let messages = self
            .repository
            .list_by_channel(&channel_id, order, page, page_size)
            .await?;

        Ok((channel_id, messages))
    }

    /// 全チャンネル横断の最新メッセージ一覧（管理者限定）
    ///
    /// per-channel の参加者認可の代わりに管理者権限を要求します。
    pub async fn latest(
        &self,
        requester_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, HistoryError> {
        let is_admin = self.directory.is_admin(requester_id).await?;
        if !is_admin {
            return Err(HistoryError::Unauthorized(
                requester_id.as_str().to_string(),
                "*".to_string(),
            ));
        }

        Ok(self.repository.list_latest(limit).await?)
    }
}
