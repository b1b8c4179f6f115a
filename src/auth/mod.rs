//! Auth Module
//!
//! Password hashing, JWT issuance/verification and the request extractor
//! that resolves the authenticated caller.

mod extractor;
pub mod jwt;
pub mod password;

pub use extractor::AuthUser;
pub use jwt::{Claims, JwtAuth};
