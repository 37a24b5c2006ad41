//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    common::time::timestamp_to_rfc3339,
    domain::{SortOrder, Timestamp, UserId},
    infrastructure::dto::http::{ChannelHistoryDto, LatestMessagesDto, MessageHttpDto, UserStatusDto},
    ui::state::AppState,
    usecase::error::HistoryError,
};

const DEFAULT_PAGE_SIZE: usize = 50;
const DEFAULT_ADMIN_LIMIT: usize = 50;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Query parameters for the channel history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub requester_id: String,
    /// `asc` (default) or `desc`
    pub order: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Get one page of a channel's message history.
pub async fn get_channel_messages(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ChannelHistoryDto>, StatusCode> {
    let requester_id = parse_user_id(&query.requester_id)?;
    let order = match query.order.as_deref() {
        None | Some("asc") => SortOrder::Ascending,
        Some("desc") => SortOrder::Descending,
        Some(other) => {
            tracing::warn!("Invalid order parameter: '{}'", other);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let page = query.page.unwrap_or(0);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    match state
        .fetch_history_usecase
        .execute(&channel_id, &requester_id, order, page, page_size)
        .await
    {
        Ok((channel_id, messages)) => Ok(Json(ChannelHistoryDto {
            channel_id: channel_id.into_string(),
            page,
            page_size,
            messages: messages.iter().map(MessageHttpDto::from).collect(),
        })),
        Err(HistoryError::InvalidChannel(e)) => {
            tracing::warn!("Invalid channel id '{}': {}", channel_id, e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(HistoryError::Unauthorized(user, channel)) => {
            tracing::warn!("User '{}' may not read channel '{}'", user, channel);
            Err(StatusCode::FORBIDDEN)
        }
        Err(HistoryError::PersistenceFailure(e)) => {
            tracing::error!("History read failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Query parameters for the admin latest-messages endpoint
#[derive(Debug, Deserialize)]
pub struct AdminMessagesQuery {
    pub requester_id: String,
    pub limit: Option<usize>,
}

/// Latest messages across all channels (admin only).
pub async fn get_admin_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminMessagesQuery>,
) -> Result<Json<LatestMessagesDto>, StatusCode> {
    let requester_id = parse_user_id(&query.requester_id)?;
    let limit = query.limit.unwrap_or(DEFAULT_ADMIN_LIMIT);

    match state.fetch_history_usecase.latest(&requester_id, limit).await {
        Ok(messages) => Ok(Json(LatestMessagesDto {
            messages: messages.iter().map(MessageHttpDto::from).collect(),
        })),
        Err(HistoryError::Unauthorized(user, _)) => {
            tracing::warn!("Non-admin '{}' requested the admin view", user);
            Err(StatusCode::FORBIDDEN)
        }
        Err(HistoryError::InvalidChannel(_)) => Err(StatusCode::BAD_REQUEST),
        Err(HistoryError::PersistenceFailure(e)) => {
            tracing::error!("Admin history read failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get one user's presence status.
pub async fn get_user_status(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserStatusDto>, StatusCode> {
    let now = Timestamp::new(state.clock.now_millis());
    match state.query_status_usecase.execute(&user_id, now).await {
        Ok(report) => Ok(Json(UserStatusDto {
            user_id: report.user_id.into_string(),
            online: report.online,
            last_seen_at: report.last_seen_at.map(|t| timestamp_to_rfc3339(t.value())),
        })),
        Err(e) => {
            tracing::warn!("Invalid user id '{}': {}", user_id, e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Query parameters for the pin toggle endpoint
#[derive(Debug, Deserialize)]
pub struct PinQuery {
    pub requester_id: String,
}

/// Toggle the pinned flag on a message.
pub async fn toggle_pin(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
    Query(query): Query<PinQuery>,
) -> Result<Json<MessageHttpDto>, StatusCode> {
    use crate::usecase::error::PinMessageError;

    let requester_id = parse_user_id(&query.requester_id)?;

    match state
        .pin_message_usecase
        .execute(&requester_id, &message_id)
        .await
    {
        Ok(message) => Ok(Json(MessageHttpDto::from(&message))),
        Err(PinMessageError::NotFound(id)) => {
            tracing::warn!("Pin target '{}' not found", id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(PinMessageError::Unauthorized(user)) => {
            tracing::warn!("User '{}' may not pin this message", user);
            Err(StatusCode::FORBIDDEN)
        }
        Err(PinMessageError::PersistenceFailure(e)) => {
            tracing::error!("Pin toggle failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, StatusCode> {
    UserId::new(raw.to_string()).map_err(|e| {
        tracing::warn!("Invalid requester_id '{}': {}", raw, e);
        StatusCode::BAD_REQUEST
    })
}
