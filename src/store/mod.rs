//! Store Module
//!
//! In-memory task and user storage. What matters here is the query
//! surface, in particular that every user-facing task operation is
//! owner-scoped.

mod tasks;
mod users;


pub use tasks::{Task, TaskStore};
pub use users::{User, UserStore};

// == Public Constants ==
/// Maximum allowed task title length in characters
pub const MAX_TITLE_LENGTH: usize = 200;
