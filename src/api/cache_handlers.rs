//! Cache-Through Handlers
//!
//! Two read endpoints that consult the shared response cache before calling
//! an external HTTP service, writing the result back with a fixed expiry.
//! Upstream failure or timeout surfaces as 502, never as a fake success.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::models::CachedResponse;

use super::AppState;

/// Cache key for the delayed third-party call.
pub const DELAY_CACHE_KEY: &str = "api_delay";

/// Handler for GET /cache/delay
///
/// Fronts a deliberately slow upstream; the first caller within the TTL
/// pays the delay, everyone else gets the cached body.
pub async fn delay_handler(State(state): State<AppState>) -> Result<Json<CachedResponse>> {
    let url = state.delay_api_url.clone();
    let ttl = state.delay_cache_ttl;
    read_through(&state, DELAY_CACHE_KEY.to_string(), url, ttl).await
}

/// Handler for GET /cache/weather/:city
///
/// Per-city cache keys; different cities never share an entry.
pub async fn weather_handler(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<CachedResponse>> {
    let key = format!("weather:{}", city.to_lowercase());
    let url = format!(
        "{}/{}?format=j1",
        state.weather_api_url.trim_end_matches('/'),
        city
    );
    let ttl = state.weather_cache_ttl;
    read_through(&state, key, url, ttl).await
}

/// Consults the cache first; on a miss fetches the URL and stores the body
/// with the given TTL. Stale-but-unexpired entries are served as-is; the
/// fixed TTL is the only invalidation path.
async fn read_through(
    state: &AppState,
    key: String,
    url: String,
    ttl_seconds: u64,
) -> Result<Json<CachedResponse>> {
    if let Some(data) = state.cache.write().await.get(&key) {
        debug!("cache hit for {key}");
        return Ok(Json(CachedResponse::success(data)));
    }

    debug!("cache miss for {key}, fetching {url}");
    let data = fetch_json(state, &url).await?;
    state
        .cache
        .write()
        .await
        .put(key, data.clone(), ttl_seconds);

    Ok(Json(CachedResponse::success(data)))
}

/// Performs the upstream GET with a bounded wait.
async fn fetch_json(state: &AppState, url: &str) -> Result<Value> {
    let response = tokio::time::timeout(state.upstream_timeout, state.http.get(url).send())
        .await
        .map_err(|_| ApiError::UpstreamUnavailable(format!("timed out waiting for {url}")))?
        .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ApiError::UpstreamUnavailable(format!(
            "{url} returned {}",
            response.status()
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))
}
