//! JWT issuance and verification
//!
//! HS256 access tokens carrying the user id and username.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix seconds)
    pub exp: i64,
    /// Issued at (Unix seconds)
    pub iat: i64,
    pub username: String,
}

impl Claims {
    /// Builds claims for a user with the given lifetime.
    pub fn new(user_id: u64, username: String, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            username,
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Result<u64> {
        self.sub.parse().map_err(|_| ApiError::AuthenticationRequired)
    }
}

/// JWT encode/decode handler bound to one signing secret.
pub struct JwtAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    /// Creates a handler from a shared secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
        }
    }

    /// Signs claims into a token string.
    pub fn encode(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    /// Verifies a token and returns its claims.
    ///
    /// Any decode failure (bad signature, expired, malformed) is an
    /// authentication failure, not an internal error.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::AuthenticationRequired)
    }
}
