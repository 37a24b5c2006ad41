//! Data Transfer Objects (DTOs) for the presence server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: tagged WebSocket event enums (the wire vocabulary)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
