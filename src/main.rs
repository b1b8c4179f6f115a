//! Todo Backend server
//!
//! JWT-authenticated task list API with read-through cache demo endpoints,
//! an asynchronous creation notifier and scheduled maintenance jobs.

mod api;
mod auth;
mod cache;
mod config;
mod error;
mod jobs;
mod models;
mod notify;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use jobs::{spawn_cache_cleanup_job, spawn_count_incomplete_job, spawn_delete_completed_job};
use notify::{spawn_notification_worker, LogMailer, Mailer};

/// Main entry point for the backend server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create application state (stores, cache, JWT handler, queue)
/// 4. Start the notification worker and both maintenance jobs
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Todo Backend");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, token_ttl={}m, delay_cache_ttl={}s, weather_cache_ttl={}s",
        config.server_port, config.token_ttl_minutes, config.delay_cache_ttl,
        config.weather_cache_ttl
    );

    // Create application state; the mailer seam is shared between the
    // notification worker and the send-email endpoint
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
    let (state, notify_rx) = AppState::from_config(&config, mailer.clone());
    info!("Application state initialized");

    // Start background workers
    let background = vec![
        spawn_notification_worker(state.tasks.clone(), mailer, notify_rx),
        spawn_count_incomplete_job(state.tasks.clone(), config.count_job_interval),
        spawn_delete_completed_job(state.tasks.clone(), config.cleanup_job_interval),
        spawn_cache_cleanup_job(state.cache.clone(), config.cache_cleanup_interval),
    ];
    info!("Notification worker and maintenance jobs started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(background))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the background tasks and allows graceful shutdown.
async fn shutdown_signal(background: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the background tasks
    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");
}
