//! Channel Router 実装
//!
//! `ChannelRouter` trait の具体的な実装を提供します。

pub mod inmemory;

pub use inmemory::InMemoryChannelRouter;
