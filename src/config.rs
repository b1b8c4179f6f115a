//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Secret used to sign and verify JWT access tokens
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub token_ttl_minutes: i64,
    /// TTL in seconds for the cached delay-endpoint response
    pub delay_cache_ttl: u64,
    /// TTL in seconds for cached per-city weather responses
    pub weather_cache_ttl: u64,
    /// Upstream URL for the delayed third-party call
    pub delay_api_url: String,
    /// Upstream base URL for weather lookups (city appended as a path segment)
    pub weather_api_url: String,
    /// Bounded wait in seconds for any upstream HTTP call
    pub upstream_timeout_secs: u64,
    /// Interval in seconds between incomplete-task count reports
    pub count_job_interval: u64,
    /// Interval in seconds between completed-task cleanup runs
    pub cleanup_job_interval: u64,
    /// Interval in seconds between expired-cache-entry sweeps
    pub cache_cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `JWT_SECRET` - token signing secret (default: dev-only value)
    /// - `TOKEN_TTL_MINUTES` - access token lifetime (default: 60)
    /// - `DELAY_CACHE_TTL` - delay endpoint cache TTL in seconds (default: 120)
    /// - `WEATHER_CACHE_TTL` - weather cache TTL in seconds (default: 300)
    /// - `DELAY_API_URL` - upstream URL for the delay demo
    /// - `WEATHER_API_URL` - upstream base URL for weather lookups
    /// - `UPSTREAM_TIMEOUT_SECS` - upstream call timeout (default: 15)
    /// - `COUNT_JOB_INTERVAL` - count job interval in seconds (default: 300)
    /// - `CLEANUP_JOB_INTERVAL` - cleanup job interval in seconds (default: 3600)
    /// - `CACHE_CLEANUP_INTERVAL` - expired-cache sweep interval (default: 60)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "insecure-dev-secret-change-me".to_string()),
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            delay_cache_ttl: env::var("DELAY_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            weather_cache_ttl: env::var("WEATHER_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            delay_api_url: env::var("DELAY_API_URL")
                .unwrap_or_else(|_| "https://postman-echo.com/delay/10".to_string()),
            weather_api_url: env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| "https://wttr.in".to_string()),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            count_job_interval: env::var("COUNT_JOB_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cleanup_job_interval: env::var("CLEANUP_JOB_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            cache_cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            jwt_secret: "insecure-dev-secret-change-me".to_string(),
            token_ttl_minutes: 60,
            delay_cache_ttl: 120,
            weather_cache_ttl: 300,
            delay_api_url: "https://postman-echo.com/delay/10".to_string(),
            weather_api_url: "https://wttr.in".to_string(),
            upstream_timeout_secs: 15,
            count_job_interval: 300,
            cleanup_job_interval: 3600,
            cache_cleanup_interval: 60,
        }
    }
}
