//! Scalar operations: one encoded value per key.

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::ObjectCache;
use crate::codec::{decode, encode};
use crate::error::Result;

impl ObjectCache {
    // == Get ==
    /// Fetches and decodes the value stored at `key`.
    ///
    /// Returns `None` if the key does not exist. Fails with
    /// [`CacheError::TypeMismatch`](crate::error::CacheError::TypeMismatch) if the
    /// key holds a hash, and with a decode error if the stored string is not an
    /// encoded document.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        debug!(key, "GET");
        let store = self.conn.store()?;
        let raw = self.conn.track(store.get(key).await)?;
        Ok(decode(raw.as_deref())?)
    }

    // == Set ==
    /// Encodes `value` and stores it at `key`, replacing what was there.
    ///
    /// A non-zero `ttl_seconds` is applied atomically with the write.
    /// Returns the store's acknowledgement (`"OK"`).
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> Result<String> {
        let encoded = encode(value)?.unwrap_or_default();
        let ttl_seconds = ttl_seconds.filter(|&secs| secs > 0);
        debug!(key, ttl = ?ttl_seconds, bytes = encoded.len(), "SET");

        let store = self.conn.store()?;
        self.conn.track(store.set(key, &encoded, ttl_seconds).await)
    }

    // == Delete ==
    /// Deletes `key`, whatever it holds. Returns 1 if it existed, 0 otherwise.
    pub async fn del(&self, key: &str) -> Result<u64> {
        debug!(key, "DEL");
        let store = self.conn.store()?;
        self.conn.track(store.del(key).await)
    }
}
