//! InMemory Channel Router 実装
//!
//! チャンネルごとの購読者集合を HashMap + HashSet で保持します。
//! チャンネルは最初の join で暗黙に作られ、明示的には破棄されません。
//! 購読者がいなくなった集合はメモリ節約のため取り除きます。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChannelId, ChannelRouter, UserId};

/// インメモリ Channel Router 実装
///
/// Key: channel_id (String) / Value: 購読中の user_id 集合。
pub struct InMemoryChannelRouter {
    subscriptions: Mutex<HashMap<String, HashSet<String>>>,
}

impl InMemoryChannelRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryChannelRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelRouter for InMemoryChannelRouter {
    async fn join(&self, user_id: UserId, channel_id: ChannelId) {
        let mut subscriptions = self.subscriptions.lock().await;
        let inserted = subscriptions
            .entry(channel_id.as_str().to_string())
            .or_default()
            .insert(user_id.as_str().to_string());
        if inserted {
            tracing::debug!(
                "User '{}' joined channel '{}'",
                user_id.as_str(),
                channel_id.as_str()
            );
        }
    }

    async fn leave(&self, user_id: &UserId, channel_id: &ChannelId) {
        let mut subscriptions = self.subscriptions.lock().await;
        if let Some(subscribers) = subscriptions.get_mut(channel_id.as_str()) {
            if subscribers.remove(user_id.as_str()) {
                tracing::debug!(
                    "User '{}' left channel '{}'",
                    user_id.as_str(),
                    channel_id.as_str()
                );
            }
            if subscribers.is_empty() {
                subscriptions.remove(channel_id.as_str());
            }
        }
    }

    async fn leave_all(&self, user_id: &UserId) {
        let mut subscriptions = self.subscriptions.lock().await;
        for subscribers in subscriptions.values_mut() {
            subscribers.remove(user_id.as_str());
        }
        subscriptions.retain(|_, subscribers| !subscribers.is_empty());
    }

    async fn subscribers(&self, channel_id: &ChannelId) -> Vec<UserId> {
        let subscriptions = self.subscriptions.lock().await;
        let mut user_ids: Vec<UserId> = subscriptions
            .get(channel_id.as_str())
            .map(|subscribers| {
                subscribers
                    .iter()
                    .filter_map(|id| UserId::new(id.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        user_ids.sort();
        user_ids
    }

    async fn is_subscribed(&self, user_id: &UserId, channel_id: &ChannelId) -> bool {
        let subscriptions = self.subscriptions.lock().await;
        subscriptions
            .get(channel_id.as_str())
            .is_some_and(|subscribers| subscribers.contains(user_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn channel(a: &str, b: &str) -> ChannelId {
        ChannelId::between(&user(a), &user(b)).unwrap()
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        // テスト項目: 同じ join を2回呼んでも購読者集合は変わらない
        // given (前提条件):
        let router = InMemoryChannelRouter::new();
        let ch = channel("alice", "bob");

        // when (操作):
        router.join(user("alice"), ch.clone()).await;
        router.join(user("alice"), ch.clone()).await;

        // then (期待する結果):
        let subscribers = router.subscribers(&ch).await;
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0].as_str(), "alice");
    }

    #[tokio::test]
    async fn test_leave_is_idempotent() {
        // テスト項目: 購読していないユーザーの leave は何も起こさない
        // given (前提条件):
        let router = InMemoryChannelRouter::new();
        let ch = channel("alice", "bob");
        router.join(user("alice"), ch.clone()).await;

        // when (操作):
        router.leave(&user("bob"), &ch).await;
        router.leave(&user("alice"), &ch).await;
        router.leave(&user("alice"), &ch).await;

        // then (期待する結果):
        assert!(router.subscribers(&ch).await.is_empty());
    }

    #[tokio::test]
    async fn test_connection_can_subscribe_many_channels() {
        // テスト項目: 一つの接続が複数チャンネルを購読できる
        // given (前提条件):
        let router = InMemoryChannelRouter::new();
        let ch1 = channel("alice", "bob");
        let ch2 = channel("alice", "carol");

        // when (操作):
        router.join(user("alice"), ch1.clone()).await;
        router.join(user("alice"), ch2.clone()).await;

        // then (期待する結果):
        assert!(router.is_subscribed(&user("alice"), &ch1).await);
        assert!(router.is_subscribed(&user("alice"), &ch2).await);
    }

    #[tokio::test]
    async fn test_leave_all_removes_every_subscription() {
        // テスト項目: leave_all で全チャンネルから購読が外れる
        // given (前提条件):
        let router = InMemoryChannelRouter::new();
        let ch1 = channel("alice", "bob");
        let ch2 = channel("alice", "carol");
        router.join(user("alice"), ch1.clone()).await;
        router.join(user("bob"), ch1.clone()).await;
        router.join(user("alice"), ch2.clone()).await;

        // when (操作):
        router.leave_all(&user("alice")).await;

        // then (期待する結果):
        assert!(!router.is_subscribed(&user("alice"), &ch1).await);
        assert!(!router.is_subscribed(&user("alice"), &ch2).await);
        // bob の購読は残る
        assert!(router.is_subscribed(&user("bob"), &ch1).await);
    }

    #[tokio::test]
    async fn test_subscribers_sorted() {
        // テスト項目: subscribers はソート順で返る
        // given (前提条件):
        let router = InMemoryChannelRouter::new();
        let ch = channel("alice", "bob");
        router.join(user("bob"), ch.clone()).await;
        router.join(user("alice"), ch.clone()).await;

        // when (操作):
        let subscribers = router.subscribers(&ch).await;

        // then (期待する結果):
        let ids: Vec<&str> = subscribers.iter().map(|u| u.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob"]);
    }
}
