//! User Directory trait 定義
//!
//! 外部のユーザーレコード（last seen、表示名、権限）へのインターフェース。
//! プレゼンスコアはこの trait を通してのみユーザーレコードに触れます。

use async_trait::async_trait;

use super::{
    entity::UserProfile,
    error::RepositoryError,
    value_object::{Timestamp, UserId},
};

/// Read/write contract against the persisted user records.
///
/// The presence core only needs four things from user storage: the
/// last-seen bookkeeping around connect/disconnect, display data to
/// enrich outgoing messages, and the elevated-privilege check for admin
/// history queries.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Display data for message enrichment. `None` when the user record
    /// carries no profile.
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;

    /// Mark the user online in their persisted record.
    async fn record_online(&self, user_id: &UserId, at: Timestamp) -> Result<(), RepositoryError>;

    /// Mark the user offline and store when they were last seen.
    async fn record_last_seen(
        &self,
        user_id: &UserId,
        at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// Last-seen timestamp from the persisted record, if known.
    async fn last_seen(&self, user_id: &UserId) -> Result<Option<Timestamp>, RepositoryError>;

    /// Elevated-privilege check for admin-scoped queries.
    async fn is_admin(&self, user_id: &UserId) -> Result<bool, RepositoryError>;
}
