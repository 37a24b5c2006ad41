//! Infrastructure layer: concrete implementations of the domain traits
//! plus the DTO boundary (WebSocket events, HTTP responses, conversions).

pub mod directory;
pub mod dto;
pub mod notification;
pub mod registry;
pub mod repository;
pub mod router;
