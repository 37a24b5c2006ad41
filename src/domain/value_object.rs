//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Separator used to join the two participant ids into a channel id.
pub const CHANNEL_SEPARATOR: char = ':';

/// User identifier value object.
///
/// Represents the stable identity a client announces on `identify`.
/// The separator character is forbidden so that channel ids can be split
/// back into their two halves unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, longer than 100 characters, or
    /// contains the channel separator.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        // 上限は文字数（バイト数ではない）。マルチバイトの表示名由来の id を
        // 不当に弾かないため chars で数える
        let len = id.chars().count();
        if len > 100 {
            return Err(ValueObjectError::UserIdTooLong {
                max: 100,
                actual: len,
            });
        }
        if id.contains(CHANNEL_SEPARATOR) {
            return Err(ValueObjectError::UserIdInvalidCharacter(CHANNEL_SEPARATOR));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Two-party conversation channel identifier.
///
/// The channel id is a deterministic function of exactly two user ids:
/// both participants are sorted lexicographically and joined with the
/// separator, so `ChannelId::between(a, b) == ChannelId::between(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    /// Compute the channel id for a pair of users, order-independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the two user ids are identical.
    pub fn between(a: &UserId, b: &UserId) -> Result<Self, ValueObjectError> {
        if a == b {
            return Err(ValueObjectError::ChannelIdSameParticipant(
                a.as_str().to_string(),
            ));
        }
        let (first, second) = if a.as_str() <= b.as_str() {
            (a, b)
        } else {
            (b, a)
        };
        Ok(Self(format!(
            "{}{}{}",
            first.as_str(),
            CHANNEL_SEPARATOR,
            second.as_str()
        )))
    }

    /// Parse a channel id received over the wire.
    ///
    /// # Errors
    ///
    /// Returns an error unless the string is exactly two valid, distinct
    /// user ids in sorted order joined with the separator.
    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        let Some((left, right)) = value.split_once(CHANNEL_SEPARATOR) else {
            return Err(ValueObjectError::ChannelIdInvalidFormat(value.to_string()));
        };
        let left = UserId::new(left.to_string())
            .map_err(|_| ValueObjectError::ChannelIdInvalidFormat(value.to_string()))?;
        let right = UserId::new(right.to_string())
            .map_err(|_| ValueObjectError::ChannelIdInvalidFormat(value.to_string()))?;
        if left == right {
            return Err(ValueObjectError::ChannelIdSameParticipant(
                left.into_string(),
            ));
        }
        if left.as_str() > right.as_str() {
            return Err(ValueObjectError::ChannelIdInvalidFormat(value.to_string()));
        }
        Self::between(&left, &right)
    }

    /// Check whether the given user is one of the two channel participants.
    pub fn is_participant(&self, user_id: &UserId) -> bool {
        let (left, right) = self.halves();
        left == user_id.as_str() || right == user_id.as_str()
    }

    /// Get the other participant of the channel, if the given user is one.
    pub fn counterpart_of(&self, user_id: &UserId) -> Option<UserId> {
        let (left, right) = self.halves();
        let other = if left == user_id.as_str() {
            right
        } else if right == user_id.as_str() {
            left
        } else {
            return None;
        };
        UserId::new(other.to_string()).ok()
    }

    /// Get the two participant ids encoded in this channel id.
    pub fn participant_ids(&self) -> (&str, &str) {
        self.halves()
    }

    fn halves(&self) -> (&str, &str) {
        self.0
            .split_once(CHANNEL_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier value object (UUID v4 string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Create a new MessageId.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::MessageIdEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live connection identifier value object (UUID v4 string).
///
/// A fresh ConnectionId is minted for every accepted socket so that a
/// superseded connection can be told apart from its successor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new ConnectionId.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Content is stored untrimmed but must be non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is empty after trimming whitespace,
    /// or longer than 10 000 characters.
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.trim().is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        // 上限は文字数で判定する（UserId と同じ規約）
        let len = content.chars().count();
        if len > 10000 {
            return Err(ValueObjectError::MessageContentTooLong {
                max: 10000,
                actual: len,
            });
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed since an earlier timestamp (negative if later).
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Online/offline status of a user identity.
///
/// Derived from whether a live connection is registered for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
}

impl PresenceStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
