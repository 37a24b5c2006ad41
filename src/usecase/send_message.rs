//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（検証 → 永続化 → エンリッチ → 配信対象選定）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：検証・認可に失敗したメッセージは永続化されない
//! - 永続化に失敗したメッセージは配信されないことを保証（保存なしの配信は起きない）
//! - プロフィール取得の失敗が送信自体を失敗させない（エンリッチなしで配信継続）
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信と購読者への配信
//! - 異常系：空コンテンツ、参加者でない送信者
//! - エッジケース：相手が未購読（配信対象が送信者のみ）、プロフィール未登録

use std::sync::Arc;

use tracing::warn;

use crate::domain::{
    ChannelId, ChannelRouter, ChatMessage, ConnectionRegistry, MessageContent, MessageIdFactory,
    MessageRepository, NotificationGateway, Timestamp, UserDirectory, UserId, UserProfile,
};

use super::error::SendMessageError;

/// Result of a successful send: the persisted message, the sender's
/// display data (when the directory has it), and the delivery targets.
pub struct SentMessage {
    pub message: ChatMessage,
    pub sender_profile: Option<UserProfile>,
    /// Current subscribers of the channel, sender included.
    pub targets: Vec<UserId>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// MessageRepository（メッセージ永続化の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// ChannelRouter（チャンネル購読の抽象化）
    router: Arc<dyn ChannelRouter>,
    /// ConnectionRegistry（接続管理・配信の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// UserDirectory（ユーザーレコードの抽象化）
    directory: Arc<dyn UserDirectory>,
    /// NotificationGateway(通知レコード作成の抽象化)
    notifier: Arc<dyn NotificationGateway>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        router: Arc<dyn ChannelRouter>,
        registry: Arc<dyn ConnectionRegistry>,
        directory: Arc<dyn UserDirectory>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            repository,
            router,
            registry,
            directory,
            notifier,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender_id` - メッセージ送信者のユーザー ID（Domain Model）
    /// * `raw_channel_id` - ワイヤから受け取ったチャンネル ID 文字列
    /// * `raw_content` - ワイヤから受け取ったメッセージ本文
    /// * `now` - 現在時刻
    ///
    /// # Returns
    ///
    /// * `Ok(SentMessage)` - 永続化済みメッセージと配信対象
    /// * `Err(SendMessageError)` - 検証・認可・永続化の失敗（配信は行われない）
    pub async fn execute(
        &self,
        sender_id: &UserId,
        raw_channel_id: &str,
        raw_content: String,
        now: Timestamp,
    ) -> Result<SentMessage, SendMessageError> {
        // 1. 検証：channel id と本文
        let channel_id =
            ChannelId::parse(raw_channel_id).map_err(SendMessageError::InvalidMessage)?;
        let content = MessageContent::new(raw_content)?;

        // 2. 認可：送信者はチャンネルの参加者でなければならない
        if !channel_id.is_participant(sender_id) {
            return Err(SendMessageError::Unauthorized(
                channel_id.as_str().to_string(),
            ));
        }

        // 3. メッセージを構築して永続化（失敗したら何も配信しない）
        let message_id = MessageIdFactory::generate().map_err(SendMessageError::InvalidMessage)?;
        let message = ChatMessage::new(
            message_id,
            channel_id.clone(),
            sender_id.clone(),
            content,
            now,
        );
        self.repository.add(message.clone()).await?;

        // 4. 相手への通知レコードを作成（best-effort）
        if let Some(counterpart) = channel_id.counterpart_of(sender_id) {
            if let Err(e) = self.notifier.notify_message(&counterpart, &message).await {
                warn!(
                    recipient = counterpart.as_str(),
                    message_id = message.id.as_str(),
                    error = %e,
                    "failed to record message notification"
                );
            }
        }

        // 5. 送信者の表示データでエンリッチ（失敗してもエンリッチなしで続行）
        let sender_profile = match self.directory.profile(sender_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(sender_id = sender_id.as_str(), error = %e, "failed to load sender profile");
                None
            }
        };

        // 6. 配信対象 = チャンネルの現在の購読者（送信者も含む）
        let targets = self.router.subscribers(&channel_id).await;

        Ok(SentMessage {
            message,
            sender_profile,
            targets,
        })
    }

    /// 配信対象へシリアライズ済みイベントをファンアウト
    pub async fn deliver(&self, targets: Vec<UserId>, json_event: &str) {
        if let Err(e) = self.registry.broadcast(targets, json_event).await {
            warn!(error = %e, "message fan-out failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{
        directory::InMemoryUserDirectory, notification::InMemoryNotificationGateway,
        registry::InMemoryConnectionRegistry, repository::InMemoryMessageRepository,
        router::InMemoryChannelRouter,
    };
    use crate::domain::SortOrder;

    struct Fixture {
        repository: Arc<InMemoryMessageRepository>,
        router: Arc<InMemoryChannelRouter>,
        directory: Arc<InMemoryUserDirectory>,
        notifier: Arc<InMemoryNotificationGateway>,
        usecase: SendMessageUseCase,
    }

    fn setup() -> Fixture {
        let repository = Arc::new(InMemoryMessageRepository::new());
        let router = Arc::new(InMemoryChannelRouter::new());
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let notifier = Arc::new(InMemoryNotificationGateway::new());
        let usecase = SendMessageUseCase::new(
            repository.clone(),
            router.clone(),
            registry,
            directory.clone(),
            notifier.clone(),
        );
        Fixture {
            repository,
            router,
            directory,
            notifier,
            usecase,
        }
    }

    #[tokio::test]
    async fn test_send_message_persists_and_targets_subscribers() {
        // テスト項目: 送信が永続化され、購読者が配信対象になる
        // given (前提条件): alice と bob が alice:bob を購読中
        let f = setup();
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();
        let channel = ChannelId::between(&alice, &bob).unwrap();
        f.router.join(alice.clone(), channel.clone()).await;
        f.router.join(bob.clone(), channel.clone()).await;

        // when (操作): alice がメッセージを送信
        let result = f
            .usecase
            .execute(&alice, channel.as_str(), "hi bob".to_string(), Timestamp::new(1_000))
            .await;

        // then (期待する結果): 両者が配信対象、リポジトリに 1 件保存されている
        let sent = result.unwrap();
        assert_eq!(sent.targets, vec![alice.clone(), bob]);
        assert_eq!(sent.message.content.as_str(), "hi bob");
        assert!(!sent.message.pinned);

        let stored = f
            .repository
            .list_by_channel(&channel, SortOrder::Ascending, 0, 50)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, sent.message.id);
    }

    #[tokio::test]
    async fn test_send_message_empty_content_not_persisted() {
        // テスト項目: 空白のみの本文は EmptyContent で拒否され、保存されない
        // given (前提条件):
        let f = setup();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作): 空白のみの本文を送信
        let result = f
            .usecase
            .execute(&alice, "alice:bob", "   ".to_string(), Timestamp::new(1_000))
            .await;

        // then (期待する結果): EmptyContent、リポジトリは空のまま
        assert!(matches!(result, Err(SendMessageError::EmptyContent)));
        let channel = ChannelId::parse("alice:bob").unwrap();
        let stored = f
            .repository
            .list_by_channel(&channel, SortOrder::Ascending, 0, 50)
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_unauthorized_sender() {
        // テスト項目: チャンネル参加者でない送信者は拒否される
        // given (前提条件):
        let f = setup();
        let mallory = UserId::new("mallory".to_string()).unwrap();

        // when (操作): mallory が alice:bob へ送信を試みる
        let result = f
            .usecase
            .execute(&mallory, "alice:bob", "hello".to_string(), Timestamp::new(1_000))
            .await;

        // then (期待する結果): Unauthorized
        assert!(matches!(result, Err(SendMessageError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_send_message_enriched_with_sender_profile() {
        // テスト項目: 送信者のプロフィールが登録済みならエンリッチされる
        // given (前提条件): alice のプロフィールが登録済み
        let f = setup();
        let alice = UserId::new("alice".to_string()).unwrap();
        f.directory
            .upsert_profile(&alice, "Alice".to_string(), Some("https://example.com/a.png".to_string()))
            .await;

        // when (操作): alice がメッセージを送信
        let sent = f
            .usecase
            .execute(&alice, "alice:bob", "hi".to_string(), Timestamp::new(1_000))
            .await
            .unwrap();

        // then (期待する結果): 表示名とアバター URL が付いている
        let profile = sent.sender_profile.unwrap();
        assert_eq!(profile.display_name, "Alice");
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://example.com/a.png")
        );
    }

    #[tokio::test]
    async fn test_send_message_records_counterpart_notification() {
        // テスト項目: 送信の副作用として相手への通知レコードが作成される
        // given (前提条件):
        let f = setup();
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();

        // when (操作): alice が alice:bob へ送信
        let sent = f
            .usecase
            .execute(&alice, "alice:bob", "ping".to_string(), Timestamp::new(1_000))
            .await
            .unwrap();

        // then (期待する結果): bob 宛の通知が 1 件記録されている
        let notifications = f.notifier.all().await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].recipient, bob);
        assert_eq!(notifications[0].message_id, sent.message.id);
    }
}
