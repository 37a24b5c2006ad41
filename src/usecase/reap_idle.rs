//! UseCase: アイドル接続回収処理
//!
//! 定期タスクから呼び出され、最終アクティビティが閾値より古い接続を
//! まとめて登録解除します。回収されたユーザーごとに offline イベントを
//! 発行するのは呼び出し側（`announce` 経由）の責務です。

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{ChannelRouter, ConnectionRegistry, Timestamp, UserDirectory, UserId};

/// A connection removed by the reaper.
pub struct ReapedConnection {
    pub user_id: UserId,
    pub reaped_at: Timestamp,
}

/// アイドル接続回収のユースケース
pub struct ReapIdleUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// ChannelRouter（チャンネル購読の抽象化）
    router: Arc<dyn ChannelRouter>,
    /// UserDirectory（ユーザーレコードの抽象化）
    directory: Arc<dyn UserDirectory>,
    /// アイドル判定の閾値（ミリ秒）
    idle_threshold_millis: i64,
}

impl ReapIdleUseCase {
    /// 新しい ReapIdleUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        router: Arc<dyn ChannelRouter>,
        directory: Arc<dyn UserDirectory>,
        idle_threshold_millis: i64,
    ) -> Self {
        Self {
            registry,
            router,
            directory,
            idle_threshold_millis,
        }
    }

    /// アイドル接続の回収を実行
    ///
    /// # Arguments
    ///
    /// * `now` - 回収実行時刻
    ///
    /// # Returns
    ///
    /// 回収された接続のリスト。呼び出し側はユーザーごとに 1 回だけ
    /// offline イベントをブロードキャストします。
    pub async fn execute(&self, now: Timestamp) -> Vec<ReapedConnection> {
        let idle_users = self
            .registry
            .idle_user_ids(now, self.idle_threshold_millis)
            .await;

        let mut reaped = Vec::with_capacity(idle_users.len());
        for user_id in idle_users {
            // 回収の合間に activity があったエントリは unregister が false を返す
            if !self.registry.unregister(&user_id).await {
                continue;
            }

            if let Err(e) = self.directory.record_last_seen(&user_id, now).await {
                warn!(user_id = user_id.as_str(), error = %e, "failed to record last seen");
            }
            self.router.leave_all(&user_id).await;

            info!(user_id = user_id.as_str(), "reaped idle connection");
            reaped.push(ReapedConnection {
                user_id,
                reaped_at: now,
            });
        }

        reaped
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
        domain::{ChannelId, ConnectionIdFactory},
        infrastructure::{
            directory::InMemoryUserDirectory, registry::InMemoryConnectionRegistry,
            router::InMemoryChannelRouter,
        },
    };
    use tokio::sync::mpsc;

    const FIVE_MINUTES_MILLIS: i64 = 5 * 60 * 1_000;

    fn setup() -> (
        Arc<InMemoryConnectionRegistry>,
        Arc<InMemoryChannelRouter>,
        Arc<InMemoryUserDirectory>,
        ReapIdleUseCase,
    ) {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let router = Arc::new(InMemoryChannelRouter::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let usecase = ReapIdleUseCase::new(
            registry.clone(),
            router.clone(),
            directory.clone(),
            FIVE_MINUTES_MILLIS,
        );
        (registry, router, directory, usecase)
    }

    async fn connect(
        registry: &InMemoryConnectionRegistry,
        name: &str,
        at: i64,
    ) -> UserId {
        let user_id = UserId::new(name.to_string()).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry
            .register(
                user_id.clone(),
                ConnectionIdFactory::generate().unwrap(),
                tx,
                Timestamp::new(at),
            )
            .await;
        user_id
    }

    #[tokio::test]
    async fn test_reap_removes_only_idle_connections() {
        // テスト項目: 閾値を超えた接続だけが回収される
        // given (前提条件): alice は 6 分前から無活動、bob は 1 分前に活動
        let (registry, _router, directory, usecase) = setup();
        let now = 10 * 60 * 1_000;
        let alice = connect(&registry, "alice", now - 6 * 60 * 1_000).await;
        let bob = connect(&registry, "bob", now - 60 * 1_000).await;

        // when (操作): 回収を実行
        let reaped = usecase.execute(Timestamp::new(now)).await;

        // then (期待する結果): alice だけが回収され、last seen が記録される
        assert_eq!(reaped.len(), 1);
        assert_eq!(reaped[0].user_id, alice);
        assert!(!registry.is_online(&alice).await);
        assert!(registry.is_online(&bob).await);
        assert_eq!(
            directory.last_seen(&alice).await.unwrap(),
            Some(Timestamp::new(now))
        );
    }

    #[tokio::test]
    async fn test_touch_resets_idle_clock() {
        // テスト項目: touch でアクティビティを更新した接続は回収されない
        // given (前提条件): alice が 6 分前に接続し、直前に touch
        let (registry, _router, _directory, usecase) = setup();
        let now = 10 * 60 * 1_000;
        let alice = connect(&registry, "alice", now - 6 * 60 * 1_000).await;
        registry.touch(&alice, Timestamp::new(now - 1_000)).await;

        // when (操作): 回収を実行
        let reaped = usecase.execute(Timestamp::new(now)).await;

        // then (期待する結果): 回収なし
        assert!(reaped.is_empty());
        assert!(registry.is_online(&alice).await);
    }

    #[tokio::test]
    async fn test_reap_cleans_up_subscriptions() {
        // テスト項目: 回収された接続のチャンネル購読も解除される
        // given (前提条件): alice がチャンネル購読中のままアイドル
        let (registry, router, _directory, usecase) = setup();
        let now = 10 * 60 * 1_000;
        let alice = connect(&registry, "alice", now - 6 * 60 * 1_000).await;
        let bob = UserId::new("bob".to_string()).unwrap();
        let channel = ChannelId::between(&alice, &bob).unwrap();
        router.join(alice.clone(), channel.clone()).await;

        // when (操作): 回収を実行
        usecase.execute(Timestamp::new(now)).await;

        // then (期待する結果): 購読なし
        assert!(!router.is_subscribed(&alice, &channel).await);
    }

    #[tokio::test]
    async fn test_reap_exactly_at_threshold_is_not_idle() {
        // テスト項目: ちょうど閾値のアクティビティはまだアイドルではない
        // given (前提条件): alice の最終アクティビティがちょうど 5 分前
        let (registry, _router, _directory, usecase) = setup();
        let now = 10 * 60 * 1_000;
        let alice = connect(&registry, "alice", now - FIVE_MINUTES_MILLIS).await;

        // when (操作): 回収を実行
        let reaped = usecase.execute(Timestamp::new(now)).await;

        // then (期待する結果): 回収なし（閾値「より古い」だけが対象）
        assert!(reaped.is_empty());
        assert!(registry.is_online(&alice).await);
    }
}
