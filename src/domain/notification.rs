//! Notification Gateway trait 定義
//!
//! メッセージ送信の副作用として通知レコードを作成する外部コラボレータの
//! インターフェース。通知の保存・配信そのものはコアの責務外です。

use async_trait::async_trait;

use super::{entity::ChatMessage, error::RepositoryError, value_object::UserId};

/// Creates a `message`-kind notification record for the recipient of a
/// chat message.
///
/// Invoked synchronously around message persistence; ordering between the
/// message write and the notification write is not guaranteed and must
/// not be relied upon. Failures are logged by the caller and never fail
/// the send.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Record a notification that `recipient` received `message`.
    async fn notify_message(
        &self,
        recipient: &UserId,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError>;
}
