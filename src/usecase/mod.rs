//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（WebSocket/HTTP ハンドラ）と Reaper タスクから呼び出され、
//! Domain 層の trait を通して状態を操作します。

pub mod disconnect_user;
pub mod error;
pub mod fetch_history;
pub mod identify_user;
pub mod join_channel;
pub mod leave_channel;
pub mod notify_typing;
pub mod pin_message;
pub mod query_status;
pub mod reap_idle;
pub mod send_message;

pub use disconnect_user::DisconnectUserUseCase;
pub use error::{
    HistoryError, JoinChannelError, PinMessageError, QueryStatusError, SendMessageError,
    TypingError,
};
pub use fetch_history::FetchHistoryUseCase;
pub use identify_user::{IdentifiedUser, IdentifyUserUseCase};
pub use join_channel::JoinChannelUseCase;
pub use leave_channel::LeaveChannelUseCase;
pub use notify_typing::NotifyTypingUseCase;
pub use pin_message::PinMessageUseCase;
pub use query_status::{QueryStatusUseCase, StatusReport};
pub use reap_idle::{ReapIdleUseCase, ReapedConnection};
pub use send_message::{SendMessageUseCase, SentMessage};
