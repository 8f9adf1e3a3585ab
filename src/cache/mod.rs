//! Cache Module
//!
//! The object cache facade: structured values in, compressed transport strings
//! out, over a single store connection.
//!
//! # Operations
//! - Scalar: `get`, `set`, `del`
//! - Hash: `hget`, `hset`, `hdel`, `hgetall`, `hlen`
//! - Expiration: `expire`, `ttl`

mod expiry;
mod hash;
mod scalar;


use crate::connection::{ConnectOptions, Connection, ConnectionState};
use crate::error::Result;

// Re-export public types
pub use expiry::Ttl;

// == Object Cache ==
/// Caches serializable values in a key-value store.
///
/// Every value is stored as `base64(zlib(json))`. The cache owns its
/// connection; share the cache itself (e.g. behind an `Arc`) to issue
/// concurrent operations.
#[derive(Debug)]
pub struct ObjectCache {
    conn: Connection,
}

impl ObjectCache {
    // == Constructors ==
    /// Connects to the store at `address` and wraps the connection.
    pub async fn create(address: &str, options: ConnectOptions) -> Result<Self> {
        let conn = Connection::create(address, options).await?;
        Ok(Self::new(conn))
    }

    /// Wraps an existing connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    // == Connection Access ==
    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns true while the connection is usable.
    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.conn.state()
    }

    /// Closes the connection. See [`Connection::close`].
    pub async fn quit(&self) -> Result<bool> {
        self.conn.close().await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ObjectCache;
    use crate::connection::ConnectOptions;

    /// Cache over a fresh in-memory store.
    pub async fn memory_cache() -> ObjectCache {
        ObjectCache::create("memory://", ConnectOptions::default())
            .await
            .unwrap()
    }
}
