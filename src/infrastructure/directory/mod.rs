//! User Directory 実装
//!
//! `UserDirectory` trait の具体的な実装を提供します。

pub mod inmemory;

pub use inmemory::InMemoryUserDirectory;
