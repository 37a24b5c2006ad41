//! Server execution logic.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{PresenceEvent, Timestamp},
    infrastructure::dto::websocket::ServerEvent,
    usecase::ReapIdleUseCase,
};

use super::{
    handler::{
        get_admin_messages, get_channel_messages, get_user_status, health_check, toggle_pin,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Presence and messaging server
///
/// Owns the shared application state and the idle reaper configuration.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, reap_idle_usecase, 60);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// 共有アプリケーション状態（各ユースケースを保持）
    app_state: Arc<AppState>,
    /// ReapIdleUseCase（アイドル接続回収のユースケース）
    reap_idle_usecase: Arc<ReapIdleUseCase>,
    /// 回収タスクの実行間隔（秒）
    reap_interval_secs: u64,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        app_state: Arc<AppState>,
        reap_idle_usecase: Arc<ReapIdleUseCase>,
        reap_interval_secs: u64,
    ) -> Self {
        Self {
            app_state,
            reap_idle_usecase,
            reap_interval_secs,
        }
    }

    /// Run the presence and messaging server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/channels/{channel_id}/messages", get(get_channel_messages))
            .route("/api/admin/messages", get(get_admin_messages))
            .route("/api/status/{user_id}", get(get_user_status))
            .route("/api/messages/{message_id}/pin", post(toggle_pin))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone());

        // Spawn the idle reaper interval task
        let reap_task = spawn_reaper(
            self.reap_idle_usecase,
            self.app_state.clone(),
            self.reap_interval_secs,
        );

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Presence server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        reap_task.abort();
        result?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Periodically reap idle connections and broadcast their offline events.
fn spawn_reaper(
    reap_idle_usecase: Arc<ReapIdleUseCase>,
    app_state: Arc<AppState>,
    reap_interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(reap_interval_secs));
        // 起動直後の tick は無視して最初の間隔から回収を始める
        interval.tick().await;
        loop {
            interval.tick().await;
            let now = Timestamp::new(app_state.clock.now_millis());
            let reaped = reap_idle_usecase.execute(now).await;
            for connection in reaped {
                let offline = match serde_json::to_string(&ServerEvent::from(
                    &PresenceEvent::offline(connection.user_id, connection.reaped_at),
                )) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize presence event: {}", e);
                        continue;
                    }
                };
                reap_idle_usecase.announce(&offline).await;
            }
        }
    })
}
