//! Request DTOs for the API
//!
//! Defines the structure of incoming HTTP request bodies. Each request type
//! carries a `validate()` returning per-field problems, checked by the
//! handler before anything is persisted.

use serde::Deserialize;

use crate::error::FieldErrors;
use crate::store::MAX_TITLE_LENGTH;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

// == Accounts ==

/// Request body for POST /accounts/register
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

impl RegisterRequest {
    /// Validates the registration payload.
    ///
    /// Returns per-field messages if invalid, None if valid. Username
    /// uniqueness is checked against the store by the handler.
    pub fn validate(&self) -> Option<FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.username.trim().is_empty() {
            push_error(&mut errors, "username", "This field may not be blank.");
        }
        if self.password1.len() < MIN_PASSWORD_LENGTH {
            push_error(
                &mut errors,
                "password1",
                "This password is too short. It must contain at least 8 characters.",
            );
        }
        if self.password1 != self.password2 {
            push_error(&mut errors, "password2", "Passwords must be equal.");
        }

        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }
}

/// Request body for POST /accounts/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Option<FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.username.trim().is_empty() {
            push_error(&mut errors, "username", "This field may not be blank.");
        }
        if self.password.is_empty() {
            push_error(&mut errors, "password", "This field may not be blank.");
        }

        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }
}

/// Request body for POST /accounts/change-password
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

impl ChangePasswordRequest {
    /// Validates the new password pair. The old password is verified
    /// against the stored hash by the handler.
    pub fn validate(&self) -> Option<FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.new_password1.len() < MIN_PASSWORD_LENGTH {
            push_error(
                &mut errors,
                "new_password1",
                "This password is too short. It must contain at least 8 characters.",
            );
        }
        if self.new_password1 != self.new_password2 {
            push_error(&mut errors, "new_password2", "Passwords must be equal.");
        }

        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }
}

/// Request body for POST /accounts/send-email (demo endpoint)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendEmailRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// == Tasks ==

/// Request body for POST /tasks and PUT /tasks/:id
///
/// `title` is modelled as Option so that a missing field produces a
/// field-level validation message instead of a deserialization rejection.
/// A `user` field, if supplied, is accepted and ignored: the owner is
/// always bound from the authenticated caller.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub user: Option<u64>,
}

impl TaskPayload {
    /// Validates the payload and returns the title to persist.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.as_deref().map(str::trim).unwrap_or("");
        if title.is_empty() {
            push_error(&mut errors, "title", "This field is required.");
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            push_error(
                &mut errors,
                "title",
                "Ensure this field has no more than 200 characters.",
            );
        }

        if errors.is_empty() {
            Ok(title.to_string())
        } else {
            Err(errors)
        }
    }
}

/// Request body for PATCH /tasks/:id
///
/// All fields optional; an absent field leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub user: Option<u64>,
}

impl TaskPatch {
    /// Validates the supplied fields; returns the trimmed title if present.
    pub fn validate(&self) -> Result<Option<String>, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.as_deref().map(str::trim);
        if let Some(t) = title {
            if t.is_empty() {
                push_error(&mut errors, "title", "This field may not be blank.");
            } else if t.chars().count() > MAX_TITLE_LENGTH {
                push_error(
                    &mut errors,
                    "title",
                    "Ensure this field has no more than 200 characters.",
                );
            }
        }

        if errors.is_empty() {
            Ok(title.map(|t| t.to_string()))
        } else {
            Err(errors)
        }
    }
}
