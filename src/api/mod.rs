//! API Module
//!
//! HTTP handlers and routing for the backend REST API.
//!
//! # Endpoints
//! - `POST /accounts/register` - Create an account, returns a token
//! - `POST /accounts/login` - Verify credentials, returns a token
//! - `POST /accounts/logout` - Authenticated logout
//! - `POST /accounts/change-password` - Rotate the caller's password
//! - `POST /accounts/send-email` - Demo email dispatch
//! - `GET/POST /tasks` - List/create the caller's tasks
//! - `GET/PUT/PATCH/DELETE /tasks/:id` - Item operations, owner-scoped
//! - `GET /cache/delay` - Cached delayed third-party call
//! - `GET /cache/weather/:city` - Cached per-city weather lookup
//! - `GET /health` - Health check endpoint

pub mod auth_handlers;
pub mod cache_handlers;
pub mod routes;
pub mod task_handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use chrono::Duration as ChronoDuration;
use tokio::sync::{mpsc, RwLock};

use crate::auth::{Claims, JwtAuth};
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::error::Result;
use crate::models::HealthResponse;
use crate::notify::{Mailer, NotificationQueue};
use crate::store::{TaskStore, User, UserStore};

pub use routes::create_router;

/// Application state shared across all handlers.
///
/// The stores and cache sit behind `Arc<RwLock<_>>`; everything else is
/// cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<RwLock<UserStore>>,
    pub tasks: Arc<RwLock<TaskStore>>,
    pub cache: Arc<RwLock<ResponseCache>>,
    pub jwt: Arc<JwtAuth>,
    /// Producer side of the creation-notification queue
    pub notifier: NotificationQueue,
    /// Outgoing mail seam, shared with the notification worker
    pub mailer: Arc<dyn Mailer>,
    pub http: reqwest::Client,
    pub token_ttl_minutes: i64,
    pub delay_cache_ttl: u64,
    pub weather_cache_ttl: u64,
    pub delay_api_url: String,
    pub weather_api_url: String,
    pub upstream_timeout: Duration,
}

impl AppState {
    /// Creates application state from configuration.
    ///
    /// Returns the state together with the receiver half of the
    /// notification queue; the caller decides where the worker runs.
    pub fn from_config(
        config: &Config,
        mailer: Arc<dyn Mailer>,
    ) -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (notifier, notify_rx) = NotificationQueue::new();

        let state = Self {
            users: Arc::new(RwLock::new(UserStore::new())),
            tasks: Arc::new(RwLock::new(TaskStore::new())),
            cache: Arc::new(RwLock::new(ResponseCache::new())),
            jwt: Arc::new(JwtAuth::new(config.jwt_secret.as_bytes())),
            notifier,
            mailer,
            http: reqwest::Client::new(),
            token_ttl_minutes: config.token_ttl_minutes,
            delay_cache_ttl: config.delay_cache_ttl,
            weather_cache_ttl: config.weather_cache_ttl,
            delay_api_url: config.delay_api_url.clone(),
            weather_api_url: config.weather_api_url.clone(),
            upstream_timeout: Duration::from_secs(config.upstream_timeout_secs),
        };

        (state, notify_rx)
    }

    /// Issues a fresh access token for a user.
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let claims = Claims::new(
            user.id,
            user.username.clone(),
            ChronoDuration::minutes(self.token_ttl_minutes),
        );
        self.jwt.encode(&claims)
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
