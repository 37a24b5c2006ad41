//! Notification Gateway 実装
//!
//! `NotificationGateway` trait の具体的な実装を提供します。

pub mod inmemory;

pub use inmemory::{InMemoryNotificationGateway, MessageNotification};
