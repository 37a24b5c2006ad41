//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! Vec をインメモリ DB として使用します（挿入順が第二のソートキー）。
//!
//! ## 技術的負債
//!
//! 現在、ドメインモデル（`ChatMessage`）を直接ストレージとして使用しています。
//! これは InMemory 実装では許容される妥協ですが、将来 PostgreSQL などの
//! DBMS を実装する際は、以下の変換層が必要になります：
//!
//! ```text
//! DB Row/JSON → MessageData (DTO) → ChatMessage (ドメインモデル)
//! ```

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChannelId, ChatMessage, MessageId, MessageRepository, RepositoryError, SortOrder,
};

/// インメモリ Message Repository 実装
///
/// pin の clear-then-set は一つの Mutex の下で行われるため、同一チャンネルへの
/// 競合する pin 要求が交錯して「2件 pinned」になることはありません。
pub struct InMemoryMessageRepository {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageRepository {
    /// Create an empty message store.
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn add(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().await;
        messages.push(message);
        Ok(())
    }

    async fn find_by_id(
        &self,
        message_id: &MessageId,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(messages.iter().find(|m| m.id == *message_id).cloned())
    }

    async fn list_by_channel(
        &self,
        channel_id: &ChannelId,
        order: SortOrder,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages = self.messages.lock().await;
        let mut channel_messages: Vec<ChatMessage> = messages
            .iter()
            .filter(|m| m.channel_id == *channel_id)
            .cloned()
            .collect();
        // 安定ソートなので created_at が同値のときは挿入順が保たれる
        channel_messages.sort_by_key(|m| m.created_at);
        if order == SortOrder::Descending {
            channel_messages.reverse();
        }
        Ok(channel_messages
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect())
    }

    async fn list_latest(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages = self.messages.lock().await;
        let mut all: Vec<ChatMessage> = messages.clone();
        all.sort_by_key(|m| m.created_at);
        all.reverse();
        Ok(all.into_iter().take(limit).collect())
    }

    async fn pin_exclusive(&self, message_id: &MessageId) -> Result<ChatMessage, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let channel_id = messages
            .iter()
            .find(|m| m.id == *message_id)
            .map(|m| m.channel_id.clone())
            .ok_or_else(|| RepositoryError::MessageNotFound(message_id.as_str().to_string()))?;
        for message in messages.iter_mut() {
            if message.channel_id == channel_id {
                message.pinned = message.id == *message_id;
            }
        }
        messages
            .iter()
            .find(|m| m.id == *message_id)
            .cloned()
            .ok_or_else(|| RepositoryError::MessageNotFound(message_id.as_str().to_string()))
    }

    async fn unpin(&self, message_id: &MessageId) -> Result<ChatMessage, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let message = messages
            .iter_mut()
            .find(|m| m.id == *message_id)
            .ok_or_else(|| RepositoryError::MessageNotFound(message_id.as_str().to_string()))?;
        message.pinned = false;
        Ok(message.clone())
    }

    async fn find_pinned(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(messages
            .iter()
            .find(|m| m.channel_id == *channel_id && m.pinned)
            .cloned())
    }
}
