//! Request handlers (WebSocket + HTTP API).

mod http;
mod websocket;

pub use http::{get_admin_messages, get_channel_messages, get_user_status, health_check, toggle_pin};
pub use websocket::websocket_handler;
