//! UseCase: ユーザー切断処理
//!
//! 接続 ID で保護された登録解除を行います。置き換えられた古いソケットの
//! close が後続の接続を巻き込んで切断しないよう、`(user_id, connection_id)`
//! の組が一致するエントリだけを削除します。

use std::sync::Arc;

use tracing::warn;

use crate::domain::{ChannelRouter, ConnectionId, ConnectionRegistry, Timestamp, UserDirectory, UserId};

/// ユーザー切断のユースケース
pub struct DisconnectUserUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// ChannelRouter（チャンネル購読の抽象化）
    router: Arc<dyn ChannelRouter>,
    /// UserDirectory（ユーザーレコードの抽象化）
    directory: Arc<dyn UserDirectory>,
}

impl DisconnectUserUseCase {
    /// 新しい DisconnectUserUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        router: Arc<dyn ChannelRouter>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            registry,
            router,
            directory,
        }
    }

    /// ユーザー切断を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 切断するユーザーの ID（Domain Model）
    /// * `connection_id` - 切断されたソケットの接続 ID
    /// * `now` - 切断時刻
    ///
    /// # Returns
    ///
    /// * `Some(Timestamp)` - エントリが実際に削除された（offline イベントを発行する）
    /// * `None` - エントリは既に後続の接続に置き換わっていた（イベントなし）
    pub async fn execute(
        &self,
        user_id: &UserId,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<Timestamp> {
        // 1. 接続 ID が一致するエントリだけを削除
        let removed = self.registry.unregister_connection(user_id, connection_id).await;
        if !removed {
            return None;
        }

        // 2. last seen を記録（失敗しても切断処理は続行）
        if let Err(e) = self.directory.record_last_seen(user_id, now).await {
            warn!(user_id = user_id.as_str(), error = %e, "failed to record last seen");
        }

        // 3. 全チャンネルから購読を解除
        self.router.leave_all(user_id).await;

        Some(now)
    }

    /// 全接続へプレゼンスイベントをブロードキャスト
    pub async fn announce(&self, json_event: &str) {
        self.registry.broadcast_all(json_event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChannelId, ConnectionIdFactory, ConnectionRegistry},
        infrastructure::{
            directory::InMemoryUserDirectory, registry::InMemoryConnectionRegistry,
            router::InMemoryChannelRouter,
        },
    };
    use tokio::sync::mpsc;

    fn setup() -> (
        Arc<InMemoryConnectionRegistry>,
        Arc<InMemoryChannelRouter>,
        Arc<InMemoryUserDirectory>,
        DisconnectUserUseCase,
    ) {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let router = Arc::new(InMemoryChannelRouter::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let usecase =
            DisconnectUserUseCase::new(registry.clone(), router.clone(), directory.clone());
        (registry, router, directory, usecase)
    }

    #[tokio::test]
    async fn test_disconnect_removes_entry_and_subscriptions() {
        // テスト項目: 切断でエントリと購読が削除され、last seen が記録される
        // given (前提条件): alice がオンラインで bob とのチャンネルを購読中
        let (registry, router, directory, usecase) = setup();
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();
        let connection_id = ConnectionIdFactory::generate().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry
            .register(alice.clone(), connection_id.clone(), tx, Timestamp::new(1_000))
            .await;
        let channel = ChannelId::between(&alice, &bob).unwrap();
        router.join(alice.clone(), channel.clone()).await;

        // when (操作): alice が切断
        let result = usecase
            .execute(&alice, &connection_id, Timestamp::new(5_000))
            .await;

        // then (期待する結果): offline 発行用の時刻が返り、状態が掃除されている
        assert_eq!(result, Some(Timestamp::new(5_000)));
        assert!(!registry.is_online(&alice).await);
        assert!(!router.is_subscribed(&alice, &channel).await);
        assert_eq!(
            directory.last_seen(&alice).await.unwrap(),
            Some(Timestamp::new(5_000))
        );
    }

    #[tokio::test]
    async fn test_superseded_socket_cannot_disconnect_successor() {
        // テスト項目: 置き換えられた古いソケットの切断が後続の接続を壊さない
        // given (前提条件): alice が接続 1 のあと接続 2 で再識別
        let (registry, _router, _directory, usecase) = setup();
        let alice = UserId::new("alice".to_string()).unwrap();
        let old_connection = ConnectionIdFactory::generate().unwrap();
        let new_connection = ConnectionIdFactory::generate().unwrap();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        registry
            .register(alice.clone(), old_connection.clone(), tx1, Timestamp::new(1_000))
            .await;
        registry
            .register(alice.clone(), new_connection, tx2, Timestamp::new(2_000))
            .await;

        // when (操作): 古いソケットの切断パスが実行される
        let result = usecase
            .execute(&alice, &old_connection, Timestamp::new(3_000))
            .await;

        // then (期待する結果): イベントなし、alice はオンラインのまま
        assert_eq!(result, None);
        assert!(registry.is_online(&alice).await);
    }
}
