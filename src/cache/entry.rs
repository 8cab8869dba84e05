//! Cache Entry Module
//!
//! Defines the structure for individual entries with TTL support.

use serde_json::Value;

// == Cache Entry ==
/// Represents a single stored value and its optional deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry relative to `now_ms`.
    ///
    /// A TTL of zero is treated the same as no TTL: the entry never expires.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    /// * `now_ms` - Current time in Unix milliseconds
    pub fn new(value: Value, ttl_seconds: Option<u64>, now_ms: u64) -> Self {
        let expires_at = ttl_seconds
            .filter(|ttl| *ttl > 0)
            .map(|ttl| now_ms.saturating_add(ttl.saturating_mul(1000)));

        Self { value, expires_at }
    }

    /// Creates an entry with an absolute deadline, as read back from a snapshot.
    pub fn with_deadline(value: Value, expires_at: Option<u64>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time reaches its deadline, so
    /// a TTL of N seconds gives exactly N seconds of visibility.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}
