//! Account Handlers
//!
//! Registration, login/logout, password change and the demo email endpoint.

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{password, AuthUser};
use crate::error::{ApiError, Result};
use crate::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    SendEmailRequest,
};
use crate::notify::NOTIFY_RECIPIENT;

use super::AppState;

/// Handler for POST /accounts/register
///
/// Creates the account and logs the user in immediately by returning a
/// fresh token alongside the username.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if let Some(errors) = req.validate() {
        return Err(ApiError::Validation(errors));
    }

    let hash = password::hash(&req.password1)?;

    let user = {
        let mut users = state.users.write().await;
        users
            .create(req.username.trim().to_string(), hash)
            .ok_or_else(|| {
                ApiError::field("username", "User already exists, pick another username.")
            })?
    };

    let token = state.issue_token(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(user.username, token)),
    ))
}

/// Handler for POST /accounts/login
///
/// Bad credentials are reported as a validation error; 401 is reserved
/// for missing or invalid tokens on protected routes.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    if let Some(errors) = req.validate() {
        return Err(ApiError::Validation(errors));
    }

    let user = {
        let users = state.users.read().await;
        users.find_by_username(req.username.trim())
    };

    let user = match user {
        Some(user) if password::verify(&req.password, &user.password_hash) => user,
        _ => {
            return Err(ApiError::field(
                "non_field_errors",
                "Unable to log in with provided credentials.",
            ))
        }
    };

    let token = state.issue_token(&user)?;
    Ok(Json(AuthResponse::new(user.username, token)))
}

/// Handler for POST /accounts/logout
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// endpoint exists to verify the token and confirm the logout.
pub async fn logout_handler(_user: AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new("successfully logged out"))
}

/// Handler for POST /accounts/change-password
pub async fn change_password_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(errors) = req.validate() {
        return Err(ApiError::Validation(errors));
    }

    let stored = {
        let users = state.users.read().await;
        users.get(user.id).ok_or(ApiError::AuthenticationRequired)?
    };
    if !password::verify(&req.old_password, &stored.password_hash) {
        return Err(ApiError::field("old_password", "Wrong password."));
    }

    let hash = password::hash(&req.new_password1)?;
    state.users.write().await.set_password(user.id, hash);

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// Handler for POST /accounts/send-email
///
/// Demo endpoint: dispatches one message through the configured mail
/// transport, synchronously.
pub async fn send_email_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<MessageResponse>> {
    let to = req.to.unwrap_or_else(|| NOTIFY_RECIPIENT.to_string());
    let subject = req.subject.unwrap_or_else(|| "Test email".to_string());
    let body = req
        .message
        .unwrap_or_else(|| format!("Hello {}, this is a test email.", user.username));

    state
        .mailer
        .send(&to, &subject, &body)
        .map_err(|e| ApiError::Internal(format!("email dispatch failed: {e}")))?;

    Ok(Json(MessageResponse::new("Email sent successfully")))
}
