//! Error types for the object cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Decode Error Enum ==
/// Failure to turn a stored transport string back into a value.
///
/// Never produced for data written through [`crate::codec::encode`]; seeing one
/// means the stored bytes are corrupted or were written by something else.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Stored string is not valid base64
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not a valid zlib stream
    #[error("invalid deflate stream: {0}")]
    Inflate(#[source] std::io::Error),

    /// Inflated bytes are not valid JSON for the requested type
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

// == Cache Error Enum ==
/// Unified error type for the object cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Transport failed to connect, failed during shutdown, or is no longer usable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Operation against a key holding the wrong kind of value.
    /// The store's message is kept verbatim.
    #[error("{0}")]
    TypeMismatch(String),

    /// Value could not be serialized to JSON
    #[error("Encode error: {0}")]
    Encode(String),

    /// Stored value could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Any other error reply from the store
    #[error("Store error: {0}")]
    Store(String),

    /// Key or field not found (gateway only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data (gateway only)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            return CacheError::Connection(err.to_string());
        }
        match err.code() {
            Some(code) => CacheError::from_reply(code, err.detail()),
            None => CacheError::Store(err.to_string()),
        }
    }
}

impl From<JsonRejection> for CacheError {
    fn from(rejection: JsonRejection) -> Self {
        CacheError::InvalidRequest(rejection.body_text())
    }
}

impl CacheError {
    /// Returns true if the error means the connection can no longer be used.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, CacheError::Connection(_))
    }

    /// Builds an error from a store error reply, e.g. `WRONGTYPE Operation against ...`.
    pub(crate) fn from_reply(code: &str, detail: Option<&str>) -> Self {
        let message = match detail {
            Some(detail) => format!("{} {}", code, detail),
            None => code.to_string(),
        };
        if code == "WRONGTYPE" {
            CacheError::TypeMismatch(message)
        } else {
            CacheError::Store(message)
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::Encode(_) => StatusCode::BAD_REQUEST,
            CacheError::TypeMismatch(_) => StatusCode::CONFLICT,
            CacheError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Store(_) => StatusCode::BAD_GATEWAY,
            CacheError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the object cache.
pub type Result<T> = std::result::Result<T, CacheError>;
