//! Presence and messaging server implementation.

mod handler;
mod server;
mod signal;
pub mod state; // UseCase 層からアクセスするため public に変更

pub use server::Server;
