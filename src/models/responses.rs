//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::Ttl;
use crate::codec::Document;
use crate::connection::ConnectionState;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored document
    pub value: Document,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Document) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Acknowledgement token from the store
    pub ack: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>, ack: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
            ack: ack.into(),
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
    /// Number of keys removed
    pub deleted: u64,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>, deleted: u64) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
            deleted,
        }
    }
}

/// Response body for HGET (GET /hget/:key/:field)
#[derive(Debug, Clone, Serialize)]
pub struct HashGetResponse {
    pub key: String,
    pub field: String,
    pub value: Document,
}

/// Response body for HSET (PUT /hset)
#[derive(Debug, Clone, Serialize)]
pub struct HashSetResponse {
    pub key: String,
    pub field: String,
    /// True if the field did not exist before
    pub created: bool,
}

/// Response body for HDEL (DELETE /hdel/:key/:field)
#[derive(Debug, Clone, Serialize)]
pub struct HashDeleteResponse {
    pub message: String,
    pub key: String,
    pub field: String,
    /// Number of fields removed
    pub deleted: u64,
}

impl HashDeleteResponse {
    /// Creates a new HashDeleteResponse
    pub fn new(key: impl Into<String>, field: impl Into<String>, deleted: u64) -> Self {
        let key = key.into();
        let field = field.into();
        Self {
            message: format!("Field '{}' of '{}' deleted successfully", field, key),
            key,
            field,
            deleted,
        }
    }
}

/// Response body for HGETALL (GET /hgetall/:key)
#[derive(Debug, Clone, Serialize)]
pub struct HashGetAllResponse {
    pub key: String,
    pub fields: HashMap<String, Document>,
}

/// Response body for HLEN (GET /hlen/:key)
#[derive(Debug, Clone, Serialize)]
pub struct HashLenResponse {
    pub key: String,
    pub len: u64,
}

/// Response body for EXPIRE (PUT /expire)
#[derive(Debug, Clone, Serialize)]
pub struct ExpireResponse {
    pub key: String,
    pub ttl: u64,
}

/// Response body for TTL (GET /ttl/:key)
///
/// `raw` keeps the wire sentinels (-2 missing, -1 no expiry).
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    pub raw: i64,
    pub ttl: Ttl,
}

impl TtlResponse {
    /// Creates a new TtlResponse
    pub fn new(key: impl Into<String>, ttl: Ttl) -> Self {
        Self {
            key: key.into(),
            raw: ttl.as_raw(),
            ttl,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status ("healthy" or "unhealthy")
    pub status: String,
    /// Store connection state
    pub connection: ConnectionState,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a HealthResponse from the connection state, with current timestamp
    pub fn from_state(connection: ConnectionState) -> Self {
        let status = if connection == ConnectionState::Connected {
            "healthy"
        } else {
            "unhealthy"
        };
        Self {
            status: status.to_string(),
            connection,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
