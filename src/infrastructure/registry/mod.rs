//! Connection Registry 実装
//!
//! ## 概要
//!
//! このモジュールは `ConnectionRegistry` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `inmemory`: プロセス内 HashMap を使った実装
//! - 将来的に: マルチプロセス構成では外部 KV ストア + pub/sub が必要

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
