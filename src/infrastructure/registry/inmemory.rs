//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! HashMap を唯一のオンライン状態のソースとして使用します。
//!
//! ## 制約
//!
//! この実装は単一プロセス前提です。マルチプロセス/マルチノード構成では
//! 共有 KV ストアと pub/sub ファンアウト層への置き換えが必要になります。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, ConnectionRegistry, PushError, PusherChannel, Timestamp, UserId,
};

/// One live connection per user.
struct ConnectionEntry {
    /// Identifies which socket currently owns this entry
    connection_id: ConnectionId,
    /// Handle used to push serialized events to the socket
    sender: PusherChannel,
    /// Refreshed on every inbound event from this connection
    last_activity_at: Timestamp,
}

/// インメモリ Connection Registry 実装
///
/// Key: user_id (String) / Value: ConnectionEntry。
/// 一つの Mutex の下で全ての変更を行うため、register の置き換えや
/// idle 判定が他のハンドラと交錯することはありません。
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<String, ConnectionEntry>>,
}

impl InMemoryConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        user_id: UserId,
        connection_id: ConnectionId,
        sender: PusherChannel,
        now: Timestamp,
    ) -> bool {
        let mut connections = self.connections.lock().await;
        let previous = connections.insert(
            user_id.as_str().to_string(),
            ConnectionEntry {
                connection_id,
                sender,
                last_activity_at: now,
            },
        );
        match previous {
            // 置き換え: 古いハンドルはここで drop され、旧ソケットの
            // pusher タスクはチャンネルクローズで終了する
            Some(_) => {
                tracing::debug!(
                    "User '{}' re-registered, previous connection superseded",
                    user_id.as_str()
                );
                false
            }
            None => {
                tracing::debug!("User '{}' registered", user_id.as_str());
                true
            }
        }
    }

    async fn unregister(&self, user_id: &UserId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(user_id.as_str()).is_some();
        if removed {
            tracing::debug!("User '{}' unregistered", user_id.as_str());
        }
        removed
    }

    async fn unregister_connection(
        &self,
        user_id: &UserId,
        connection_id: &ConnectionId,
    ) -> bool {
        let mut connections = self.connections.lock().await;
        match connections.get(user_id.as_str()) {
            Some(entry) if entry.connection_id == *connection_id => {
                connections.remove(user_id.as_str());
                tracing::debug!("User '{}' unregistered (connection match)", user_id.as_str());
                true
            }
            Some(_) => {
                tracing::debug!(
                    "Stale disconnect for user '{}' ignored, entry owned by a newer connection",
                    user_id.as_str()
                );
                false
            }
            None => false,
        }
    }

    async fn is_online(&self, user_id: &UserId) -> bool {
        let connections = self.connections.lock().await;
        connections.contains_key(user_id.as_str())
    }

    async fn touch(&self, user_id: &UserId, now: Timestamp) {
        let mut connections = self.connections.lock().await;
        if let Some(entry) = connections.get_mut(user_id.as_str()) {
            entry.last_activity_at = now;
        }
    }

    async fn snapshot(&self) -> Vec<UserId> {
        let connections = self.connections.lock().await;
        let mut user_ids: Vec<UserId> = connections
            .keys()
            .filter_map(|id| UserId::new(id.clone()).ok())
            .collect();
        user_ids.sort();
        user_ids
    }

    async fn idle_user_ids(&self, now: Timestamp, idle_threshold_millis: i64) -> Vec<UserId> {
        let connections = self.connections.lock().await;
        connections
            .iter()
            .filter(|(_, entry)| now.millis_since(entry.last_activity_at) > idle_threshold_millis)
            .filter_map(|(id, _)| UserId::new(id.clone()).ok())
            .collect()
    }

    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), PushError> {
        let connections = self.connections.lock().await;
        if let Some(entry) = connections.get(user_id.as_str()) {
            entry
                .sender
                .send(content.to_string())
                .map_err(|e| PushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to user '{}'", user_id.as_str());
            Ok(())
        } else {
            Err(PushError::ConnectionNotFound(user_id.as_str().to_string()))
        }
    }

    async fn broadcast(&self, targets: Vec<UserId>, content: &str) -> Result<(), PushError> {
        let connections = self.connections.lock().await;
        for target in targets {
            if let Some(entry) = connections.get(target.as_str()) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = entry.sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push event to user '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted event to user '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "User '{}' not connected during broadcast, skipping",
                    target.as_str()
                );
            }
        }
        Ok(())
    }

    async fn broadcast_all(&self, content: &str) {
        let connections = self.connections.lock().await;
        for (user_id, entry) in connections.iter() {
            if let Err(e) = entry.sender.send(content.to_string()) {
                tracing::warn!("Failed to push event to user '{}': {}", user_id, e);
            }
        }
    }
}
