//! Server state and connection management.

use std::sync::Arc;

use crate::{
    common::time::Clock,
    domain::ConnectionRegistry,
    usecase::{
        DisconnectUserUseCase, FetchHistoryUseCase, IdentifyUserUseCase, JoinChannelUseCase,
        LeaveChannelUseCase, NotifyTypingUseCase, PinMessageUseCase, QueryStatusUseCase,
        SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectionRegistry（touch 用に直接アクセス）
    pub registry: Arc<dyn ConnectionRegistry>,
    /// Clock（現在時刻の抽象化）
    pub clock: Arc<dyn Clock>,
    /// IdentifyUserUseCase（ユーザー識別のユースケース）
    pub identify_user_usecase: Arc<IdentifyUserUseCase>,
    /// DisconnectUserUseCase（ユーザー切断のユースケース）
    pub disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    /// JoinChannelUseCase（チャンネル参加のユースケース）
    pub join_channel_usecase: Arc<JoinChannelUseCase>,
    /// LeaveChannelUseCase（チャンネル退出のユースケース）
    pub leave_channel_usecase: Arc<LeaveChannelUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// PinMessageUseCase（ピン留めトグルのユースケース）
    pub pin_message_usecase: Arc<PinMessageUseCase>,
    /// FetchHistoryUseCase（履歴取得のユースケース）
    pub fetch_history_usecase: Arc<FetchHistoryUseCase>,
    /// QueryStatusUseCase（プレゼンス照会のユースケース）
    pub query_status_usecase: Arc<QueryStatusUseCase>,
    /// NotifyTypingUseCase（タイピング通知のユースケース）
    pub notify_typing_usecase: Arc<NotifyTypingUseCase>,
}
