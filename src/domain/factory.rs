//! Domain factories for generating identifier value objects.

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, MessageId},
};

/// Factory for generating MessageId instances.
///
/// Encapsulates the id generation concern, separating it from the
/// validation logic in MessageId.
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new MessageId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<MessageId, ValueObjectError> {
        MessageId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Factory for generating ConnectionId instances.
///
/// A fresh id is minted per accepted socket; see `ConnectionRegistry` for
/// how it disambiguates a superseded connection from its successor.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        ConnectionId::new(uuid::Uuid::new_v4().to_string())
    }
}
