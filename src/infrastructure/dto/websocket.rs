//! WebSocket event DTOs.
//!
//! Both directions of the wire vocabulary are tagged enums, one variant
//! per event name, so payload shapes are validated at the boundary before
//! they reach core logic.

use serde::{Deserialize, Serialize};

/// Events received from a client connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Announce the connection's user identity
    Identify { user_id: String },
    /// Subscribe to a conversation channel
    JoinChannel { channel_id: String },
    /// Unsubscribe from a conversation channel
    LeaveChannel { channel_id: String },
    /// Send a chat message into a channel
    SendMessage { channel_id: String, content: String },
    /// Ephemeral typing indicator on
    TypingStart { channel_id: String },
    /// Ephemeral typing indicator off
    TypingEnd { channel_id: String },
    /// Ask for one user's presence status
    QueryStatus { user_id: String },
}

/// Fully-populated message payload, including enriched sender fields.
///
/// The enrichment fields stay `None` when the user directory has no
/// profile for the sender (or the lookup failed); delivery degrades to
/// the unenriched message rather than failing the send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub message_id: String,
    pub channel_id: String,
    pub sender_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_avatar_url: Option<String>,
    pub content: String,
    pub pinned: bool,
    /// Unix timestamp (milliseconds since epoch, UTC)
    pub created_at: i64,
}

/// Events pushed to client connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A user's presence transitioned; broadcast to all connections
    PresenceChanged {
        user_id: String,
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_seen_at: Option<i64>,
    },
    /// Full online list, sent to a newly-identified connection only
    OnlineSnapshot { user_ids: Vec<String> },
    /// A chat message, fanned out to the channel's subscribers
    MessageReceived { message: MessageDto },
    /// Typing indicator, fanned out to the channel's other subscribers
    TypingNotify {
        channel_id: String,
        user_id: String,
        is_typing: bool,
    },
    /// Presence point-query answer, sent to the requester only
    StatusReport {
        user_id: String,
        online: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_seen_at: Option<i64>,
    },
    /// A request failed; sent to the requesting connection only
    OperationFailed { reason: String },
}
