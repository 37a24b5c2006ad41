//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// UserId contains the channel separator character
    #[error("UserId cannot contain the character '{0}'")]
    UserIdInvalidCharacter(char),

    /// ChannelId format error (not two sorted, distinct user identifiers)
    #[error("ChannelId must be two sorted user ids joined with ':' (got: {0})")]
    ChannelIdInvalidFormat(String),

    /// ChannelId participants must be distinct
    #[error("ChannelId participants must be two distinct users (got: {0})")]
    ChannelIdSameParticipant(String),

    /// MessageContent validation error
    #[error("MessageContent cannot be empty or whitespace only")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    /// MessageId validation error
    #[error("MessageId cannot be empty")]
    MessageIdEmpty,

    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,
}

/// Errors raised by persistence collaborators (message store, user records)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Referenced message does not exist
    #[error("message '{0}' not found")]
    MessageNotFound(String),

    /// Referenced user record does not exist
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// Storage read/write failed
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Errors raised when pushing events to a live connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PushError {
    /// No live connection registered for the user
    #[error("no live connection for user '{0}'")]
    ConnectionNotFound(String),

    /// The connection handle rejected the event
    #[error("failed to push event: {0}")]
    PushFailed(String),
}
