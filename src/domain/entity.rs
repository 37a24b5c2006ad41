//! Core domain models for the presence and messaging core.

use serde::{Deserialize, Serialize};

use super::value_object::{
    ChannelId, MessageContent, MessageId, PresenceStatus, Timestamp, UserId,
};

/// A persisted chat message.
///
/// Immutable once created, except for the `pinned` flag. At most one
/// message per channel carries the flag at any time; the repository's
/// `pin_exclusive` operation maintains that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier
    pub id: MessageId,
    /// Conversation channel the message belongs to
    pub channel_id: ChannelId,
    /// Sender's user id
    pub sender_id: UserId,
    /// Message content (non-empty after trimming)
    pub content: MessageContent,
    /// Whether this message is pinned in its channel
    pub pinned: bool,
    /// Timestamp when the message was created
    pub created_at: Timestamp,
}

impl ChatMessage {
    /// Create a new, unpinned chat message.
    pub fn new(
        id: MessageId,
        channel_id: ChannelId,
        sender_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            channel_id,
            sender_id,
            content,
            pinned: false,
            created_at,
        }
    }
}

/// A transient presence transition; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEvent {
    /// User whose presence changed
    pub user_id: UserId,
    /// New status
    pub status: PresenceStatus,
    /// When the transition happened
    pub occurred_at: Timestamp,
}

impl PresenceEvent {
    /// Create an online transition event.
    pub fn online(user_id: UserId, occurred_at: Timestamp) -> Self {
        Self {
            user_id,
            status: PresenceStatus::Online,
            occurred_at,
        }
    }

    /// Create an offline transition event.
    pub fn offline(user_id: UserId, occurred_at: Timestamp) -> Self {
        Self {
            user_id,
            status: PresenceStatus::Offline,
            occurred_at,
        }
    }
}

/// Display data for a user, read from the user directory to enrich
/// outgoing messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier
    pub user_id: UserId,
    /// Display name shown next to messages
    pub display_name: String,
    /// Avatar image URL, if the user has one
    pub avatar_url: Option<String>,
}
