//! Realtime presence and direct-message server.
//!
//! Tracks who is online over WebSocket connections, relays chat messages
//! and typing indicators between two-party channels, and reaps idle
//! connections in the background.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --idle-threshold-secs 600
//! ```

use std::sync::Arc;

use clap::Parser;
use tayori::{
    common::{logger::setup_logger, time::SystemClock},
    infrastructure::{
        directory::InMemoryUserDirectory, notification::InMemoryNotificationGateway,
        registry::InMemoryConnectionRegistry, repository::InMemoryMessageRepository,
        router::InMemoryChannelRouter,
    },
    ui::{Server, state::AppState},
    usecase::{
        DisconnectUserUseCase, FetchHistoryUseCase, IdentifyUserUseCase, JoinChannelUseCase,
        LeaveChannelUseCase, NotifyTypingUseCase, PinMessageUseCase, QueryStatusUseCase,
        ReapIdleUseCase, SendMessageUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Realtime presence and direct-message server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds of inactivity before a connection is considered idle
    #[arg(long, default_value = "300")]
    idle_threshold_secs: u64,

    /// Interval in seconds between idle reaper sweeps
    #[arg(long, default_value = "60")]
    reap_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Infrastructure (registry, router, repository, directory, notifier)
    // 2. Clock
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create infrastructure implementations (in-memory)
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let router = Arc::new(InMemoryChannelRouter::new());
    let repository = Arc::new(InMemoryMessageRepository::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    let notifier = Arc::new(InMemoryNotificationGateway::new());

    // 2. Create Clock
    let clock = Arc::new(SystemClock);

    // 3. Create UseCases
    let identify_user_usecase = Arc::new(IdentifyUserUseCase::new(
        registry.clone(),
        directory.clone(),
    ));
    let disconnect_user_usecase = Arc::new(DisconnectUserUseCase::new(
        registry.clone(),
        router.clone(),
        directory.clone(),
    ));
    let join_channel_usecase = Arc::new(JoinChannelUseCase::new(router.clone()));
    let leave_channel_usecase = Arc::new(LeaveChannelUseCase::new(router.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        router.clone(),
        registry.clone(),
        directory.clone(),
        notifier.clone(),
    ));
    let pin_message_usecase = Arc::new(PinMessageUseCase::new(repository.clone()));
    let fetch_history_usecase = Arc::new(FetchHistoryUseCase::new(
        repository.clone(),
        directory.clone(),
    ));
    let query_status_usecase = Arc::new(QueryStatusUseCase::new(
        registry.clone(),
        directory.clone(),
    ));
    let notify_typing_usecase = Arc::new(NotifyTypingUseCase::new(
        router.clone(),
        registry.clone(),
    ));
    let reap_idle_usecase = Arc::new(ReapIdleUseCase::new(
        registry.clone(),
        router.clone(),
        directory.clone(),
        (args.idle_threshold_secs * 1_000) as i64,
    ));

    // 4. Create AppState
    let app_state = Arc::new(AppState {
        registry,
        clock,
        identify_user_usecase,
        disconnect_user_usecase,
        join_channel_usecase,
        leave_channel_usecase,
        send_message_usecase,
        pin_message_usecase,
        fetch_history_usecase,
        query_status_usecase,
        notify_typing_usecase,
    });

    // 5. Create and run the server
    let server = Server::new(app_state, reap_idle_usecase, args.reap_interval_secs);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
