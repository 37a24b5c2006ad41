//! Domain layer for the presence and messaging core.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns, plus the
//! traits (ports) the use case layer depends on. Concrete implementations
//! live in the Infrastructure layer (dependency inversion).

pub mod directory;
pub mod entity;
pub mod error;
pub mod factory;
pub mod notification;
pub mod registry;
pub mod repository;
pub mod router;
pub mod value_object;

pub use directory::UserDirectory;
pub use entity::{ChatMessage, PresenceEvent, UserProfile};
pub use error::{PushError, RepositoryError, ValueObjectError};
pub use factory::{ConnectionIdFactory, MessageIdFactory};
pub use notification::NotificationGateway;
pub use registry::{ConnectionRegistry, PusherChannel};
pub use repository::{MessageRepository, SortOrder};
pub use router::ChannelRouter;
pub use value_object::{
    ChannelId, ConnectionId, MessageContent, MessageId, PresenceStatus, Timestamp, UserId,
};
