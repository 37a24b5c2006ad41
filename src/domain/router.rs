//! Channel Router trait 定義
//!
//! 接続とチャンネルの購読関係を管理するインターフェース。
//! channel id の導出自体は `ChannelId` 値オブジェクトが担います。

use async_trait::async_trait;

use super::value_object::{ChannelId, UserId};

/// Subscription management between live connections and channels.
///
/// Authorization (a user may only join a channel whose id encodes their
/// own user id) is enforced by the caller, not here.
#[async_trait]
pub trait ChannelRouter: Send + Sync {
    /// Add a user's connection to the channel's subscriber set. Idempotent.
    async fn join(&self, user_id: UserId, channel_id: ChannelId);

    /// Remove a user's connection from the channel. Idempotent.
    async fn leave(&self, user_id: &UserId, channel_id: &ChannelId);

    /// Remove a user's connection from every channel (disconnect cleanup).
    async fn leave_all(&self, user_id: &UserId);

    /// Current subscribers of a channel, sorted for deterministic output.
    async fn subscribers(&self, channel_id: &ChannelId) -> Vec<UserId>;

    /// Check whether a user is subscribed to a channel.
    async fn is_subscribed(&self, user_id: &UserId, channel_id: &ChannelId) -> bool;
}
