//! InMemory Notification Gateway 実装
//!
//! 通知レコードを Vec に積むだけの実装。本番では通知ストア/配信基盤が
//! この trait を実装します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChannelId, ChatMessage, MessageId, NotificationGateway, RepositoryError, Timestamp, UserId,
};

/// A recorded `message`-kind notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNotification {
    /// Who should be notified
    pub recipient: UserId,
    /// The message that triggered the notification
    pub message_id: MessageId,
    /// Channel the message belongs to
    pub channel_id: ChannelId,
    /// When the message was created
    pub created_at: Timestamp,
}

/// インメモリ Notification Gateway 実装
pub struct InMemoryNotificationGateway {
    notifications: Mutex<Vec<MessageNotification>>,
}

impl InMemoryNotificationGateway {
    /// Create an empty gateway.
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
        }
    }

    /// All recorded notifications (test/debug helper).
    pub async fn all(&self) -> Vec<MessageNotification> {
        self.notifications.lock().await.clone()
    }
}

impl Default for InMemoryNotificationGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationGateway for InMemoryNotificationGateway {
    async fn notify_message(
        &self,
        recipient: &UserId,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        let mut notifications = self.notifications.lock().await;
        notifications.push(MessageNotification {
            recipient: recipient.clone(),
            message_id: message.id.clone(),
            channel_id: message.channel_id.clone(),
            created_at: message.created_at,
        });
        tracing::debug!(
            "Recorded message notification for '{}' (message '{}')",
            recipient.as_str(),
            message.id.as_str()
        );
        Ok(())
    }
}
