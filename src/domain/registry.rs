//! Connection Registry trait 定義
//!
//! ドメイン層が必要とする「誰が今オンラインか」の唯一の情報源を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::PushError,
    value_object::{ConnectionId, Timestamp, UserId},
};

/// Channel used to push serialized events to a live connection.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Authoritative mapping of user identity to its single live connection.
///
/// The registry owns the connection handles, so it is also the delivery
/// surface for presence broadcasts and message fan-out. All in-memory
/// state is mutated behind one lock; a handler completes its mutation
/// before the next one starts.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Insert or replace the entry for a user.
    ///
    /// Last-registered wins: an existing entry for the same user is
    /// superseded and its handle dropped. Returns `true` only when the
    /// user actually came online (no live entry existed before), which is
    /// the signal to emit a presence-online event exactly once.
    async fn register(
        &self,
        user_id: UserId,
        connection_id: ConnectionId,
        sender: PusherChannel,
        now: Timestamp,
    ) -> bool;

    /// Remove the entry for a user regardless of which connection owns it.
    ///
    /// Returns `true` if an entry was actually removed (the signal to emit
    /// a presence-offline event). No-op on absent users.
    async fn unregister(&self, user_id: &UserId) -> bool;

    /// Remove the entry only if it still belongs to the given connection.
    ///
    /// A superseded socket calls this on close; because its connection id
    /// no longer matches, it cannot tear down its successor's entry.
    async fn unregister_connection(
        &self,
        user_id: &UserId,
        connection_id: &ConnectionId,
    ) -> bool;

    /// Pure lookup: is a live connection registered for this user?
    async fn is_online(&self, user_id: &UserId) -> bool;

    /// Refresh the last-activity timestamp. No-op if not registered.
    async fn touch(&self, user_id: &UserId, now: Timestamp);

    /// All currently registered user ids, sorted for deterministic output.
    async fn snapshot(&self) -> Vec<UserId>;

    /// Users whose last activity is older than the idle threshold.
    async fn idle_user_ids(&self, now: Timestamp, idle_threshold_millis: i64) -> Vec<UserId>;

    /// Push a serialized event to one user's connection.
    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), PushError>;

    /// Push a serialized event to each target, best-effort.
    ///
    /// A target that disconnected mid-broadcast is skipped with a warning;
    /// no retry, no queue.
    async fn broadcast(&self, targets: Vec<UserId>, content: &str) -> Result<(), PushError>;

    /// Push a serialized event to every live connection, best-effort.
    async fn broadcast_all(&self, content: &str);
}
