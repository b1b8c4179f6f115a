//! Cache Entry Module
//!
//! A single cached upstream response with its expiry.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A cached JSON payload with a fixed expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached payload
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    /// Creates an entry expiring `ttl_seconds` from now.
    pub fn new(value: Value, ttl_seconds: u64) -> Self {
        Self {
            value,
            expires_at: current_timestamp_ms() + ttl_seconds * 1000,
        }
    }

    /// An entry is expired once the current time reaches the expiry instant.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
