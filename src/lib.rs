//! Todo Backend
//!
//! Multi-app web backend: JWT-authenticated accounts, an owner-scoped task
//! list with asynchronous creation notifications, read-through cache demo
//! endpoints and scheduled maintenance jobs.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod notify;
pub mod store;

pub use api::{create_router, AppState};
pub use config::Config;
pub use jobs::{spawn_cache_cleanup_job, spawn_count_incomplete_job, spawn_delete_completed_job};
pub use notify::spawn_notification_worker;
