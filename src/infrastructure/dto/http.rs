//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// A message in an HTTP history response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageHttpDto {
    pub message_id: String,
    pub channel_id: String,
    pub sender_id: String,
    pub content: String,
    pub pinned: bool,
    /// RFC 3339 timestamp (UTC)
    pub created_at: String,
}

/// One page of a channel's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelHistoryDto {
    pub channel_id: String,
    pub page: usize,
    pub page_size: usize,
    pub messages: Vec<MessageHttpDto>,
}

/// Latest messages across all channels (admin view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestMessagesDto {
    pub messages: Vec<MessageHttpDto>,
}

/// Presence status of one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusDto {
    pub user_id: String,
    pub online: bool,
    /// RFC 3339 timestamp (UTC), absent when never seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<String>,
}
