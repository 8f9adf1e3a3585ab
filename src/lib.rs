//! Object Cache - Compressed JSON values on top of a key-value store
//!
//! Caches any serializable value as `base64(zlib(json))`, in plain keys or in
//! hash fields, with TTL control and an explicit connection lifecycle.

pub mod api;
pub mod cache;
pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{ObjectCache, Ttl};
pub use codec::Document;
pub use config::Config;
pub use connection::{ConnectOptions, Connection, ConnectionState};
pub use error::{CacheError, DecodeError, Result};
