//! API Routes
//!
//! Configures the Axum router with all backend endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth_handlers::{
    change_password_handler, login_handler, logout_handler, register_handler, send_email_handler,
};
use super::cache_handlers::{delay_handler, weather_handler};
use super::task_handlers::{
    create_task_handler, delete_task_handler, list_tasks_handler, patch_task_handler,
    replace_task_handler, retrieve_task_handler,
};
use super::{health_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/accounts/register", post(register_handler))
        .route("/accounts/login", post(login_handler))
        .route("/accounts/logout", post(logout_handler))
        .route("/accounts/change-password", post(change_password_handler))
        .route("/accounts/send-email", post(send_email_handler))
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/:id",
            get(retrieve_task_handler)
                .put(replace_task_handler)
                .patch(patch_task_handler)
                .delete(delete_task_handler),
        )
        .route("/cache/delay", get(delay_handler))
        .route("/cache/weather/:city", get(weather_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
