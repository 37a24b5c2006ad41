//! InMemory User Directory 実装
//!
//! ユーザーレコード（プロフィール、last seen、管理者フラグ）の
//! インメモリ実装。本番ではユーザーストアを持つ外部サービス/DB が
//! この trait を実装します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Timestamp, UserDirectory, UserId, UserProfile};

#[derive(Debug, Clone, Default)]
struct UserRecord {
    display_name: Option<String>,
    avatar_url: Option<String>,
    last_seen_at: Option<Timestamp>,
    online: bool,
    admin: bool,
}

/// インメモリ User Directory 実装
pub struct InMemoryUserDirectory {
    records: Mutex<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Seed or update a user's display data.
    pub async fn upsert_profile(
        &self,
        user_id: &UserId,
        display_name: String,
        avatar_url: Option<String>,
    ) {
        let mut records = self.records.lock().await;
        let record = records.entry(user_id.as_str().to_string()).or_default();
        record.display_name = Some(display_name);
        record.avatar_url = avatar_url;
    }

    /// Grant the elevated-privilege flag to a user.
    pub async fn grant_admin(&self, user_id: &UserId) {
        let mut records = self.records.lock().await;
        records.entry(user_id.as_str().to_string()).or_default().admin = true;
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let records = self.records.lock().await;
        let profile = records.get(user_id.as_str()).and_then(|record| {
            record.display_name.as_ref().map(|name| UserProfile {
                user_id: user_id.clone(),
                display_name: name.clone(),
                avatar_url: record.avatar_url.clone(),
            })
        });
        Ok(profile)
    }

    async fn record_online(&self, user_id: &UserId, _at: Timestamp) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        records.entry(user_id.as_str().to_string()).or_default().online = true;
        Ok(())
    }

    async fn record_last_seen(
        &self,
        user_id: &UserId,
        at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        let record = records.entry(user_id.as_str().to_string()).or_default();
        record.online = false;
        record.last_seen_at = Some(at);
        Ok(())
    }

    async fn last_seen(&self, user_id: &UserId) -> Result<Option<Timestamp>, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records
            .get(user_id.as_str())
            .and_then(|record| record.last_seen_at))
    }

    async fn is_admin(&self, user_id: &UserId) -> Result<bool, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records
            .get(user_id.as_str())
            .is_some_and(|record| record.admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_profile_absent_without_display_name() {
        // テスト項目: 表示名のないユーザーのプロフィールは None
        // given (前提条件):
        let directory = InMemoryUserDirectory::new();
        directory
            .record_online(&user("alice"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let profile = directory.profile(&user("alice")).await.unwrap();

        // then (期待する結果):
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_upsert_profile_and_fetch() {
        // テスト項目: 登録したプロフィールを取得できる
        // given (前提条件):
        let directory = InMemoryUserDirectory::new();
        directory
            .upsert_profile(
                &user("alice"),
                "Alice".to_string(),
                Some("https://example.com/alice.png".to_string()),
            )
            .await;

        // when (操作):
        let profile = directory.profile(&user("alice")).await.unwrap();

        // then (期待する結果):
        let profile = profile.unwrap();
        assert_eq!(profile.display_name, "Alice");
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://example.com/alice.png")
        );
    }

    #[tokio::test]
    async fn test_record_last_seen_overwrites_online_flag() {
        // テスト項目: last seen の記録でオンラインフラグが下がり時刻が残る
        // given (前提条件):
        let directory = InMemoryUserDirectory::new();
        directory
            .record_online(&user("alice"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        directory
            .record_last_seen(&user("alice"), Timestamp::new(5000))
            .await
            .unwrap();

        // then (期待する結果):
        let last_seen = directory.last_seen(&user("alice")).await.unwrap();
        assert_eq!(last_seen, Some(Timestamp::new(5000)));
    }

    #[tokio::test]
    async fn test_last_seen_unknown_user_is_none() {
        // テスト項目: 未知のユーザーの last seen は None
        // given (前提条件):
        let directory = InMemoryUserDirectory::new();

        // when (操作):
        let last_seen = directory.last_seen(&user("ghost")).await.unwrap();

        // then (期待する結果):
        assert!(last_seen.is_none());
    }

    #[tokio::test]
    async fn test_is_admin_defaults_to_false() {
        // テスト項目: 管理者フラグはデフォルトで false、付与後は true
        // given (前提条件):
        let directory = InMemoryUserDirectory::new();

        // when (操作):
        let before = directory.is_admin(&user("alice")).await.unwrap();
        directory.grant_admin(&user("alice")).await;
        let after = directory.is_admin(&user("alice")).await.unwrap();

        // then (期待する結果):
        assert!(!before);
        assert!(after);
    }
}
