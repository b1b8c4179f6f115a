//! Response DTOs for the API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::store::Task;

/// JSON shape of a task row.
///
/// `user` is the owner's id; `created_date` is immutable and
/// `updated_date` changes on every persisted mutation.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub user: u64,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            completed: task.completed,
            user: task.user,
            created_date: task.created_date,
            updated_date: task.updated_date,
        }
    }
}

/// Response body for register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub username: String,
    pub token: String,
}

impl AuthResponse {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }
}

/// Generic message body for logout, change-password and send-email.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the cache-through demo endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CachedResponse {
    pub status: String,
    pub data: Value,
}

impl CachedResponse {
    /// Wraps an upstream (or cached) payload in the success envelope.
    pub fn success(data: Value) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

/// Response body for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_response_shape() {
        let now = Utc::now();
        let task = Task {
            id: 7,
            user: 3,
            title: "Task 1".to_string(),
            completed: false,
            created_date: now,
            updated_date: now,
        };

        let json = serde_json::to_value(TaskResponse::from(task)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["user"], 3);
        assert_eq!(json["title"], "Task 1");
        assert_eq!(json["completed"], false);
        assert!(json["created_date"].is_string());
        assert!(json["updated_date"].is_string());
    }

    #[test]
    fn test_auth_response_serialize() {
        let resp = AuthResponse::new("testuser", "token123");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("testuser"));
        assert!(json.contains("token123"));
    }

    #[test]
    fn test_cached_response_envelope() {
        let resp = CachedResponse::success(json!({"delay": 10}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["delay"], 10);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
