//! UseCase 層のエラー型
//!
//! 各 UseCase が返すエラーを定義します。
//! WebSocket 経由で依頼者へ返す `operation_failed` イベントの
//! `reason` フィールドは `reason()` で取得します。

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("message content is empty")]
    EmptyContent,
    #[error("invalid message: {0}")]
    InvalidMessage(ValueObjectError),
    #[error("sender is not a participant of channel {0}")]
    Unauthorized(String),
    #[error("failed to persist message: {0}")]
    PersistenceFailure(#[from] RepositoryError),
}

impl SendMessageError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyContent => "empty_content",
            Self::InvalidMessage(_) => "invalid_payload",
            Self::Unauthorized(_) => "unauthorized",
            Self::PersistenceFailure(_) => "persistence_failure",
        }
    }
}

impl From<ValueObjectError> for SendMessageError {
    fn from(err: ValueObjectError) -> Self {
        match err {
            ValueObjectError::MessageContentEmpty => Self::EmptyContent,
            other => Self::InvalidMessage(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum JoinChannelError {
    #[error("invalid channel: {0}")]
    InvalidChannel(#[from] ValueObjectError),
    #[error("user {0} is not a participant of the channel")]
    Unauthorized(String),
}

impl JoinChannelError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidChannel(_) => "invalid_payload",
            Self::Unauthorized(_) => "unauthorized",
        }
    }
}

#[derive(Debug, Error)]
pub enum TypingError {
    #[error("invalid channel: {0}")]
    InvalidChannel(#[from] ValueObjectError),
    #[error("user {0} is not a participant of the channel")]
    Unauthorized(String),
}

impl TypingError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidChannel(_) => "invalid_payload",
            Self::Unauthorized(_) => "unauthorized",
        }
    }
}

#[derive(Debug, Error)]
pub enum PinMessageError {
    #[error("message {0} not found")]
    NotFound(String),
    #[error("user {0} is not allowed to pin messages")]
    Unauthorized(String),
    #[error("repository error: {0}")]
    PersistenceFailure(RepositoryError),
}

impl PinMessageError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::PersistenceFailure(_) => "persistence_failure",
        }
    }
}

impl From<RepositoryError> for PinMessageError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::MessageNotFound(id) => Self::NotFound(id),
            other => Self::PersistenceFailure(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid channel: {0}")]
    InvalidChannel(#[from] ValueObjectError),
    #[error("user {0} is not a participant of channel {1}")]
    Unauthorized(String, String),
    #[error("repository error: {0}")]
    PersistenceFailure(#[from] RepositoryError),
}

#[derive(Debug, Error)]
pub enum QueryStatusError {
    #[error("invalid user id: {0}")]
    InvalidUserId(#[from] ValueObjectError),
}

impl QueryStatusError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidUserId(_) => "invalid_payload",
        }
    }
}
