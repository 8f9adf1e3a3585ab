//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::codec::Document;

/// Maximum accepted key or field length in bytes.
pub const MAX_NAME_LENGTH: usize = 512;

fn validate_name(kind: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return Some(format!("{} cannot be empty", kind));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Some(format!(
            "{} exceeds maximum length of {} bytes",
            kind, MAX_NAME_LENGTH
        ));
    }
    None
}

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON document
/// - `ttl`: Optional TTL in seconds (no expiration if absent or 0)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The document to store
    #[serde(default)]
    pub value: Document,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_name("Key", &self.key)
    }
}

/// Request body for the HSET operation (PUT /hset)
#[derive(Debug, Clone, Deserialize)]
pub struct HashSetRequest {
    pub key: String,
    pub field: String,
    #[serde(default)]
    pub value: Document,
}

impl HashSetRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        validate_name("Key", &self.key).or_else(|| validate_name("Field", &self.field))
    }
}

/// Request body for the EXPIRE operation (PUT /expire)
#[derive(Debug, Clone, Deserialize)]
pub struct ExpireRequest {
    pub key: String,
    /// New TTL in seconds; 0 deletes the key
    pub ttl: u64,
}

impl ExpireRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        validate_name("Key", &self.key)
    }
}
