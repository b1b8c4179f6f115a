//! Request and Response models for the API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, SendEmailRequest, TaskPatch, TaskPayload,
};
pub use responses::{AuthResponse, CachedResponse, HealthResponse, MessageResponse, TaskResponse};
