//! UseCase: プレゼンス照会処理
//!
//! Registry を唯一の真実としてオンライン判定を行い、オフラインの場合だけ
//! ユーザーレコードの last seen で補完します。

use std::sync::Arc;

use tracing::warn;

use crate::domain::{ConnectionRegistry, Timestamp, UserDirectory, UserId};

use super::error::QueryStatusError;

/// Presence report for a single user.
pub struct StatusReport {
    pub user_id: UserId,
    pub online: bool,
    /// Online: the query time. Offline: the recorded last seen, if known.
    pub last_seen_at: Option<Timestamp>,
}

/// プレゼンス照会のユースケース
pub struct QueryStatusUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// UserDirectory（ユーザーレコードの抽象化）
    directory: Arc<dyn UserDirectory>,
}

impl QueryStatusUseCase {
    /// 新しい QueryStatusUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// プレゼンス照会を実行
    ///
    /// # Arguments
    ///
    /// * `raw_user_id` - 照会対象のユーザー ID 文字列
    /// * `now` - 照会時刻
    pub async fn execute(
        &self,
        raw_user_id: &str,
        now: Timestamp,
    ) -> Result<StatusReport, QueryStatusError> {
        let user_id = UserId::new(raw_user_id.to_string())?;

        if self.registry.is_online(&user_id).await {
            return Ok(StatusReport {
                user_id,
                online: true,
                last_seen_at: Some(now),
            });
        }

        let last_seen_at = match self.directory.last_seen(&user_id).await {
            Ok(last_seen) => last_seen,
            Err(e) => {
                warn!(user_id = user_id.as_str(), error = %e, "failed to load last seen");
                None
            }
        };

        Ok(StatusReport {
            user_id,
            online: false,
            last_seen_at,
        })
    }
}
