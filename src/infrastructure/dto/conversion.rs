//! Conversion logic between DTOs and domain entities.

use crate::common::time::timestamp_to_rfc3339;
use crate::domain::{ChatMessage, PresenceEvent, PresenceStatus, UserProfile};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// Domain Entity → DTO
// ========================================

impl ws::MessageDto {
    /// Build the wire payload for a message, attaching enrichment fields
    /// when a sender profile is available.
    pub fn from_message(message: &ChatMessage, sender: Option<&UserProfile>) -> Self {
        Self {
            message_id: message.id.as_str().to_string(),
            channel_id: message.channel_id.as_str().to_string(),
            sender_id: message.sender_id.as_str().to_string(),
            sender_name: sender.map(|p| p.display_name.clone()),
            sender_avatar_url: sender.and_then(|p| p.avatar_url.clone()),
            content: message.content.as_str().to_string(),
            pinned: message.pinned,
            created_at: message.created_at.value(),
        }
    }
}

impl From<&PresenceEvent> for ws::ServerEvent {
    /// Build the broadcast payload for a presence transition.
    ///
    /// Offline events carry the transition time as the user's last seen;
    /// online events omit the field (the user is here right now).
    fn from(event: &PresenceEvent) -> Self {
        Self::PresenceChanged {
            user_id: event.user_id.as_str().to_string(),
            status: event.status.as_str().to_string(),
            last_seen_at: match event.status {
                PresenceStatus::Online => None,
                PresenceStatus::Offline => Some(event.occurred_at.value()),
            },
        }
    }
}

impl From<&ChatMessage> for http::MessageHttpDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            message_id: message.id.as_str().to_string(),
            channel_id: message.channel_id.as_str().to_string(),
            sender_id: message.sender_id.as_str().to_string(),
            content: message.content.as_str().to_string(),
            pinned: message.pinned,
            created_at: timestamp_to_rfc3339(message.created_at.value()),
        }
    }
}
