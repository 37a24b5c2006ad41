//! UseCase: チャンネル参加処理
//!
//! channel id の検証と参加者認可を行ってから Router に購読を登録します。
//! 参加は冪等で、同じチャンネルへの重複 join は no-op です。

use std::sync::Arc;

use crate::domain::{ChannelId, ChannelRouter, UserId};

use super::error::JoinChannelError;

/// チャンネル参加のユースケース
pub struct JoinChannelUseCase {
    /// ChannelRouter（チャンネル購読の抽象化）
    router: Arc<dyn ChannelRouter>,
}

impl JoinChannelUseCase {
    /// 新しい JoinChannelUseCase を作成
    pub fn new(router: Arc<dyn ChannelRouter>) -> Self {
        Self { router }
    }

    /// チャンネル参加を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 参加するユーザーの ID（Domain Model）
    /// * `raw_channel_id` - ワイヤから受け取ったチャンネル ID 文字列
    ///
    /// # Returns
    ///
    /// * `Ok(ChannelId)` - 参加成功（検証済みのチャンネル ID を返す）
    /// * `Err(JoinChannelError)` - 検証または認可の失敗
    pub async fn execute(
        &self,
        user_id: &UserId,
        raw_channel_id: &str,
    ) -> Result<ChannelId, JoinChannelError> {
        // 1. channel id の形式を検証
        let channel_id = ChannelId::parse(raw_channel_id)?;

        // 2. 自分の user id が片側に含まれるチャンネルだけ参加できる
        if !channel_id.is_participant(user_id) {
            return Err(JoinChannelError::Unauthorized(
                user_id.as_str().to_string(),
            ));
        }

        // 3. Router に購読を登録（冪等）
        self.router.join(user_id.clone(), channel_id.clone()).await;

        Ok(channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::router::InMemoryChannelRouter;

    fn setup() -> (Arc<InMemoryChannelRouter>, JoinChannelUseCase) {
        let router = Arc::new(InMemoryChannelRouter::new());
        (router.clone(), JoinChannelUseCase::new(router))
    }

    #[tokio::test]
    async fn test_join_own_channel() {
        // テスト項目: 自分が参加者であるチャンネルに参加できる
        // given (前提条件):
        let (router, usecase) = setup();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作): alice が alice:bob に参加
        let result = usecase.execute(&alice, "alice:bob").await;

        // then (期待する結果): 参加成功、購読が登録されている
        let channel = result.unwrap();
        assert!(router.is_subscribed(&alice, &channel).await);
    }

    #[tokio::test]
    async fn test_join_foreign_channel_is_unauthorized() {
        // テスト項目: 自分が参加者でないチャンネルには参加できない
        // given (前提条件):
        let (router, usecase) = setup();
        let mallory = UserId::new("mallory".to_string()).unwrap();

        // when (操作): mallory が alice:bob に参加を試みる
        let result = usecase.execute(&mallory, "alice:bob").await;

        // then (期待する結果): Unauthorized、購読は登録されない
        assert!(matches!(result, Err(JoinChannelError::Unauthorized(_))));
        let channel = ChannelId::parse("alice:bob").unwrap();
        assert!(!router.is_subscribed(&mallory, &channel).await);
    }

    #[tokio::test]
    async fn test_join_malformed_channel_id() {
        // テスト項目: 不正な形式のチャンネル ID は拒否される
        // given (前提条件):
        let (_router, usecase) = setup();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作): 区切り文字のない文字列で参加を試みる
        let result = usecase.execute(&alice, "alicebob").await;

        // then (期待する結果): InvalidChannel
        assert!(matches!(result, Err(JoinChannelError::InvalidChannel(_))));
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        // テスト項目: 同じチャンネルへの重複 join は no-op
        // given (前提条件): alice が既に参加済み
        let (router, usecase) = setup();
        let alice = UserId::new("alice".to_string()).unwrap();
        usecase.execute(&alice, "alice:bob").await.unwrap();

        // when (操作): もう一度参加
        let channel = usecase.execute(&alice, "alice:bob").await.unwrap();

        // then (期待する結果): 購読者リストに alice は 1 人分だけ
        let subscribers = router.subscribers(&channel).await;
        assert_eq!(subscribers, vec![alice]);
    }
}
