//! Store Entry Module
//!
//! Defines the structure for individual in-memory store entries with TTL support.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

// == Entry Value ==
/// Data held under a key: a single string or a field-mapped hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    /// Plain string value (GET/SET)
    Scalar(String),
    /// Field to value mapping (HGET/HSET)
    Hash(HashMap<String, String>),
}

// == Store Entry ==
/// Represents a single key with its value and expiration metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: EntryValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: EntryValue, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            expires_at: ttl_seconds.map(|ttl| now.saturating_add(ttl.saturating_mul(1000))),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Expire In ==
    /// Replaces the expiration with one `ttl_seconds` from now.
    pub fn expire_in(&mut self, ttl_seconds: u64) {
        self.expires_at =
            Some(current_timestamp_ms().saturating_add(ttl_seconds.saturating_mul(1000)));
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired (TTL elapsed)
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry has no TTL (never expires)
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }

    /// Returns remaining TTL in whole seconds, rounded to the nearest second
    /// the way the TTL command reports it.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.ttl_remaining_ms().map(|ms| (ms + 500) / 1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
