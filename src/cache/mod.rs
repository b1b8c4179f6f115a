//! Cache Module
//!
//! Shared read-through cache for the demo endpoints that front slow or
//! rate-limited upstream HTTP services.

mod entry;
mod store;

pub use entry::CacheEntry;
pub use store::ResponseCache;
