//! Message Repository 実装
//!
//! `MessageRepository` trait の具体的な実装を提供します。

pub mod inmemory;

pub use inmemory::InMemoryMessageRepository;
