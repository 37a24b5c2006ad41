//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, PresenceEvent, Timestamp, UserId},
    infrastructure::dto::websocket::{ClientEvent, MessageDto, ServerEvent},
    ui::state::AppState,
};

/// Identity claimed by this connection via the `identify` event.
///
/// `None` until the first successful identify; every other inbound event
/// is rejected with `unauthorized` while unset.
type ConnectionIdentity = Arc<Mutex<Option<(UserId, ConnectionId)>>>;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // 識別は接続後の identify イベントで行うため、ここでは無条件に upgrade
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives events from the rx channel and pushes them
/// to the WebSocket sender.
///
/// Outbound flow: the registry (and pre-identify replies) write serialized
/// events into the channel; this task drains it into the socket. The task
/// ends when the channel closes, which also happens when this connection's
/// registry entry is superseded by a re-identify on another socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // この接続専用の outbound チャンネル。identify 前の返信も、
    // identify 後の Registry 経由の配信も、すべてここを通る。
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let identity: ConnectionIdentity = Arc::new(Mutex::new(None));

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let identity_clone = identity.clone();
    let tx_clone = tx.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_event(&state_clone, &identity_clone, &tx_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client requested close");
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 暗黙の切断：識別済みの接続なら切断ユースケースを実行
    let claimed = identity.lock().await.take();
    if let Some((user_id, connection_id)) = claimed {
        let now = Timestamp::new(state.clock.now_millis());
        if let Some(disconnected_at) = state
            .disconnect_user_usecase
            .execute(&user_id, &connection_id, now)
            .await
        {
            tracing::info!("User '{}' disconnected", user_id.as_str());
            let offline = serialize_event(&ServerEvent::from(&PresenceEvent::offline(
                user_id,
                disconnected_at,
            )));
            state.disconnect_user_usecase.announce(&offline).await;
        }
    }
}

/// Dispatch one parsed inbound frame.
async fn handle_client_event(
    state: &Arc<AppState>,
    identity: &ConnectionIdentity,
    tx: &mpsc::UnboundedSender<String>,
    text: &str,
) {
    let now = Timestamp::new(state.clock.now_millis());

    // 受信フレームはすべてアクティビティとして扱う（idle 判定のリセット）。
    // パースできないフレームでも、識別済みの接続が生きている証拠にはなる
    let claimed = identity.lock().await.clone();
    if let Some((user_id, _)) = &claimed {
        state.registry.touch(user_id, now).await;
    }

    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event as JSON: {}", e);
            reply_failure(tx, "invalid_payload");
            return;
        }
    };

    let event = match event {
        ClientEvent::Identify { user_id } => {
            handle_identify(state, identity, tx, user_id, now).await;
            return;
        }
        other => other,
    };

    // identify 済みの接続だけが他のイベントを送れる
    let Some((user_id, _connection_id)) = claimed else {
        reply_failure(tx, "unauthorized");
        return;
    };

    match event {
        ClientEvent::Identify { .. } => unreachable!("handled above"),
        ClientEvent::JoinChannel { channel_id } => {
            if let Err(e) = state.join_channel_usecase.execute(&user_id, &channel_id).await {
                tracing::warn!("join_channel failed for '{}': {}", user_id.as_str(), e);
                reply_failure(tx, e.reason());
            }
        }
        ClientEvent::LeaveChannel { channel_id } => {
            if let Err(e) = state.leave_channel_usecase.execute(&user_id, &channel_id).await {
                tracing::warn!("leave_channel failed for '{}': {}", user_id.as_str(), e);
                reply_failure(tx, e.reason());
            }
        }
        ClientEvent::SendMessage {
            channel_id,
            content,
        } => {
            match state
                .send_message_usecase
                .execute(&user_id, &channel_id, content, now)
                .await
            {
                Ok(sent) => {
                    let event = serialize_event(&ServerEvent::MessageReceived {
                        message: MessageDto::from_message(
                            &sent.message,
                            sent.sender_profile.as_ref(),
                        ),
                    });
                    state.send_message_usecase.deliver(sent.targets, &event).await;
                }
                Err(e) => {
                    tracing::warn!("send_message failed for '{}': {}", user_id.as_str(), e);
                    reply_failure(tx, e.reason());
                }
            }
        }
        ClientEvent::TypingStart { channel_id } => {
            relay_typing(state, tx, &user_id, &channel_id, true).await;
        }
        ClientEvent::TypingEnd { channel_id } => {
            relay_typing(state, tx, &user_id, &channel_id, false).await;
        }
        ClientEvent::QueryStatus { user_id: target } => {
            match state.query_status_usecase.execute(&target, now).await {
                Ok(report) => {
                    let event = serialize_event(&ServerEvent::StatusReport {
                        user_id: report.user_id.into_string(),
                        online: report.online,
                        last_seen_at: report.last_seen_at.map(|t| t.value()),
                    });
                    let _ = tx.send(event);
                }
                Err(e) => {
                    tracing::warn!("query_status failed: {}", e);
                    reply_failure(tx, e.reason());
                }
            }
        }
    }
}

async fn handle_identify(
    state: &Arc<AppState>,
    identity: &ConnectionIdentity,
    tx: &mpsc::UnboundedSender<String>,
    raw_user_id: String,
    now: Timestamp,
) {
    let user_id = match UserId::new(raw_user_id.clone()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid user_id format '{}': {}", raw_user_id, e);
            reply_failure(tx, "invalid_payload");
            return;
        }
    };
    let connection_id = match ConnectionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to generate connection id: {}", e);
            reply_failure(tx, "persistence_failure");
            return;
        }
    };

    // 同じソケットが別ユーザーとして identify し直す場合は、先に前の
    // 登録を切断処理する。これを怠ると前のユーザーがゴーストとして
    // オンラインのまま残り、このソケット宛の配信を受け続ける
    let previous = identity.lock().await.clone();
    if let Some((old_user_id, old_connection_id)) = previous {
        if old_user_id != user_id {
            tracing::info!(
                "Connection re-identified from '{}' to '{}'",
                old_user_id.as_str(),
                user_id.as_str()
            );
            if let Some(disconnected_at) = state
                .disconnect_user_usecase
                .execute(&old_user_id, &old_connection_id, now)
                .await
            {
                let offline = serialize_event(&ServerEvent::from(&PresenceEvent::offline(
                    old_user_id,
                    disconnected_at,
                )));
                state.disconnect_user_usecase.announce(&offline).await;
            }
        }
    }

    let identified = state
        .identify_user_usecase
        .execute(user_id.clone(), connection_id.clone(), tx.clone(), now)
        .await;

    *identity.lock().await = Some((user_id.clone(), connection_id));
    tracing::info!("User '{}' identified", user_id.as_str());

    // genuine な online 遷移のときだけプレゼンスを全員に流す
    if identified.came_online {
        let online = serialize_event(&ServerEvent::from(&PresenceEvent::online(
            user_id.clone(),
            now,
        )));
        state.identify_user_usecase.announce(&online).await;
    }

    // スナップショットは本人だけに返す
    let snapshot = serialize_event(&ServerEvent::OnlineSnapshot {
        user_ids: identified
            .snapshot
            .into_iter()
            .map(|u| u.into_string())
            .collect(),
    });
    state.identify_user_usecase.send_to(&user_id, &snapshot).await;
}

async fn relay_typing(
    state: &Arc<AppState>,
    tx: &mpsc::UnboundedSender<String>,
    user_id: &UserId,
    channel_id: &str,
    is_typing: bool,
) {
    let event = serialize_event(&ServerEvent::TypingNotify {
        channel_id: channel_id.to_string(),
        user_id: user_id.as_str().to_string(),
        is_typing,
    });
    if let Err(e) = state
        .notify_typing_usecase
        .execute(user_id, channel_id, &event)
        .await
    {
        tracing::warn!("typing relay failed for '{}': {}", user_id.as_str(), e);
        reply_failure(tx, e.reason());
    }
}

/// Send an `operation_failed` event back to the requesting connection only.
fn reply_failure(tx: &mpsc::UnboundedSender<String>, reason: &str) {
    let event = serialize_event(&ServerEvent::OperationFailed {
        reason: reason.to_string(),
    });
    let _ = tx.send(event);
}

fn serialize_event(event: &ServerEvent) -> String {
    // ServerEvent のシリアライズは失敗しない（全フィールドが serde 対応）
    serde_json::to_string(event).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize server event: {}", e);
        r#"{"type":"operation_failed","reason":"persistence_failure"}"#.to_string()
    })
}
