//! Cache Module
//!
//! In-memory key/value storage with per-key TTL expiration.

mod backend;
mod clock;
mod entry;
mod indexed;
mod stats;
mod store;


// Re-export public types
pub use backend::{open_backend, Backend, BackendKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use indexed::IndexedStore;
pub use stats::CacheStats;
pub use store::CacheStore;
