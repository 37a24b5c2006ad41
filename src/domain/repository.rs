//! Message Repository trait 定義
//!
//! ドメイン層が必要とするメッセージ永続化のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::ChatMessage,
    error::RepositoryError,
    value_object::{ChannelId, MessageId},
};

/// Ordering of a channel history page.
///
/// Full history views read ascending; "latest N" admin views read
/// descending. Both orderings are explicit parameters rather than a
/// hard-coded default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Persistence interface for chat messages.
///
/// Records are append-only except for the pinned flag. `pin_exclusive`
/// is a single operation so the clear-then-set read-modify-write cannot
/// interleave with a competing pin on the same channel.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message record.
    async fn add(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// Look up a message by id.
    async fn find_by_id(&self, message_id: &MessageId)
    -> Result<Option<ChatMessage>, RepositoryError>;

    /// Page through one channel's messages in the given creation-time order.
    async fn list_by_channel(
        &self,
        channel_id: &ChannelId,
        order: SortOrder,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Latest messages across all channels, newest first (admin view).
    async fn list_latest(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Pin a message, clearing any other pinned message in its channel.
    ///
    /// Returns the updated message.
    async fn pin_exclusive(&self, message_id: &MessageId) -> Result<ChatMessage, RepositoryError>;

    /// Clear the pinned flag on a message. Returns the updated message.
    async fn unpin(&self, message_id: &MessageId) -> Result<ChatMessage, RepositoryError>;

    /// The pinned message of a channel, if any.
    async fn find_pinned(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<ChatMessage>, RepositoryError>;
}
