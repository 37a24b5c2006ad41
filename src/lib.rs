//! Realtime presence and direct-message server library.
//!
//! This library provides the core of a chat backend built around persistent
//! WebSocket connections: a connection registry tracking who is online, a
//! presence broadcaster, a deterministic two-party channel router, a message
//! relay (validate, persist, fan out), an idle reaper, and an ephemeral
//! typing-indicator relay.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
