//! Authenticated user extractor
//!
//! Turns the `Authorization: Bearer` header into an explicit caller
//! identity. Handlers take `AuthUser` as an argument, so the 401 fires
//! before any handler logic or store query runs.

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use crate::api::AppState;
use crate::error::ApiError;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: u64,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::AuthenticationRequired)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::AuthenticationRequired)?;

        let claims = state.jwt.decode(token)?;
        let id = claims.user_id()?;

        // The token may outlive the account; resolve the user to be sure.
        let users = state.users.read().await;
        let user = users.get(id).ok_or(ApiError::AuthenticationRequired)?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
        })
    }
}
