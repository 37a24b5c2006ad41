//! UseCase: ユーザー識別処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - IdentifyUserUseCase::execute() メソッド
//! - ユーザーの識別処理（接続の登録、last-registered-wins、online 遷移の検出）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：同一ユーザーの再識別で古い接続が置き換わる
//! - online 遷移イベントが「genuine な遷移」のときだけ 1 回発火することを保証
//! - スナップショットがソート済みで返ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの識別
//! - エッジケース：既にオンラインのユーザーによる再識別（置き換え、イベントなし）

use std::sync::Arc;

use tracing::warn;

use crate::domain::{ConnectionId, ConnectionRegistry, PusherChannel, Timestamp, UserDirectory, UserId};

/// Result of identifying a connection.
pub struct IdentifiedUser {
    /// `true` only when the user genuinely transitioned to online.
    pub came_online: bool,
    /// Sorted list of all currently online user ids.
    pub snapshot: Vec<UserId>,
}

/// ユーザー識別のユースケース
pub struct IdentifyUserUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// UserDirectory（ユーザーレコードの抽象化）
    directory: Arc<dyn UserDirectory>,
}

impl IdentifyUserUseCase {
    /// 新しい IdentifyUserUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// ユーザー識別を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 識別するユーザーの ID（Domain Model）
    /// * `connection_id` - この接続に割り当てられた ID
    /// * `sender` - クライアントへのイベント送信用チャンネル
    /// * `now` - 現在時刻
    ///
    /// # Returns
    ///
    /// * `IdentifiedUser` - online 遷移の有無とオンラインスナップショット
    pub async fn execute(
        &self,
        user_id: UserId,
        connection_id: ConnectionId,
        sender: PusherChannel,
        now: Timestamp,
    ) -> IdentifiedUser {
        // 1. Registry に接続を登録（既存エントリは置き換え）
        let came_online = self
            .registry
            .register(user_id.clone(), connection_id, sender, now)
            .await;

        // 2. genuine な online 遷移のときだけユーザーレコードを更新
        if came_online {
            if let Err(e) = self.directory.record_online(&user_id, now).await {
                warn!(user_id = user_id.as_str(), error = %e, "failed to record online state");
            }
        }

        // 3. スナップショットを構築（Registry がソート済みで返す）
        let snapshot = self.registry.snapshot().await;

        IdentifiedUser {
            came_online,
            snapshot,
        }
    }

    /// 識別済みユーザー本人にイベントを送信（online_snapshot 返信用）
    pub async fn send_to(&self, user_id: &UserId, json_event: &str) {
        if let Err(e) = self.registry.push_to(user_id, json_event).await {
            warn!(user_id = user_id.as_str(), error = %e, "failed to push snapshot");
        }
    }

    /// 全接続へプレゼンスイベントをブロードキャスト（本人も含む）
    pub async fn announce(&self, json_event: &str) {
        self.registry.broadcast_all(json_event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ConnectionIdFactory,
        infrastructure::{
            directory::InMemoryUserDirectory, registry::InMemoryConnectionRegistry,
        },
    };
    use tokio::sync::mpsc;

    fn setup() -> (
        Arc<InMemoryConnectionRegistry>,
        Arc<InMemoryUserDirectory>,
        IdentifyUserUseCase,
    ) {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let usecase = IdentifyUserUseCase::new(registry.clone(), directory.clone());
        (registry, directory, usecase)
    }

    #[tokio::test]
    async fn test_identify_new_user_comes_online() {
        // テスト項目: 新規ユーザーの識別で online 遷移が検出される
        // given (前提条件):
        let (_registry, _directory, usecase) = setup();
        let alice = UserId::new("alice".to_string()).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作): alice が識別を実行
        let result = usecase
            .execute(
                alice.clone(),
                ConnectionIdFactory::generate().unwrap(),
                tx,
                Timestamp::new(1_000),
            )
            .await;

        // then (期待する結果): online 遷移あり、スナップショットに alice が含まれる
        assert!(result.came_online);
        assert_eq!(result.snapshot, vec![alice]);
    }

    #[tokio::test]
    async fn test_reidentify_does_not_come_online_again() {
        // テスト項目: 再識別では online 遷移イベントが発火しない
        // given (前提条件): alice が既にオンライン
        let (_registry, _directory, usecase) = setup();
        let alice = UserId::new("alice".to_string()).unwrap();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        usecase
            .execute(
                alice.clone(),
                ConnectionIdFactory::generate().unwrap(),
                tx1,
                Timestamp::new(1_000),
            )
            .await;

        // when (操作): alice が別の接続で再識別
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let result = usecase
            .execute(
                alice.clone(),
                ConnectionIdFactory::generate().unwrap(),
                tx2,
                Timestamp::new(2_000),
            )
            .await;

        // then (期待する結果): online 遷移なし、古い接続のチャンネルは閉じている
        assert!(!result.came_online);
        assert_eq!(result.snapshot, vec![alice]);
        assert_eq!(rx1.recv().await, None);
    }

    #[tokio::test]
    async fn test_snapshot_is_sorted() {
        // テスト項目: スナップショットがユーザー ID 順でソートされている
        // given (前提条件): charlie, alice, bob の順で識別
        let (_registry, _directory, usecase) = setup();
        for name in ["charlie", "alice", "bob"] {
            let (tx, _rx) = mpsc::unbounded_channel();
            usecase
                .execute(
                    UserId::new(name.to_string()).unwrap(),
                    ConnectionIdFactory::generate().unwrap(),
                    tx,
                    Timestamp::new(1_000),
                )
                .await;
        }

        // when (操作): 最後の識別結果のスナップショットを確認
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = usecase
            .execute(
                UserId::new("dave".to_string()).unwrap(),
                ConnectionIdFactory::generate().unwrap(),
                tx,
                Timestamp::new(2_000),
            )
            .await;

        // then (期待する結果): ソート済み
        let names: Vec<&str> = result.snapshot.iter().map(|u| u.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie", "dave"]);
    }
}
