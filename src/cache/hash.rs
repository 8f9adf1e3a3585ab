//! Hash operations: independently encoded values under the fields of one key.
//!
//! Fields carry no TTL of their own; only the whole key can expire. Removing
//! the last field removes the key.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use super::ObjectCache;
use crate::codec::{decode, encode};
use crate::error::Result;

impl ObjectCache {
    // == Hash Get ==
    /// Fetches and decodes `field` of the hash at `key`.
    ///
    /// Returns `None` if the key or the field does not exist.
    pub async fn hget<T: DeserializeOwned>(&self, key: &str, field: &str) -> Result<Option<T>> {
        debug!(key, field, "HGET");
        let store = self.conn.store()?;
        let raw = self.conn.track(store.hget(key, field).await)?;
        Ok(decode(raw.as_deref())?)
    }

    // == Hash Set ==
    /// Encodes `value` into `field` of the hash at `key`, creating the hash if needed.
    ///
    /// Returns 1 if the field is new, 0 if an existing field was overwritten.
    pub async fn hset<T: Serialize + ?Sized>(
        &self,
        key: &str,
        field: &str,
        value: &T,
    ) -> Result<u64> {
        let encoded = encode(value)?.unwrap_or_default();
        debug!(key, field, bytes = encoded.len(), "HSET");

        let store = self.conn.store()?;
        self.conn.track(store.hset(key, field, &encoded).await)
    }

    // == Hash Delete ==
    /// Removes `field` from the hash at `key`. Returns 1 if removed, 0 if absent.
    pub async fn hdel(&self, key: &str, field: &str) -> Result<u64> {
        debug!(key, field, "HDEL");
        let store = self.conn.store()?;
        self.conn.track(store.hdel(key, field).await)
    }

    // == Hash Get All ==
    /// Fetches every field of the hash at `key`, decoding each one.
    ///
    /// Returns an empty map if the key does not exist. A field holding an
    /// absent value maps to `T`'s null form (`Document::Null`, `None`), and is
    /// left out only when `T` has none.
    pub async fn hgetall<T: DeserializeOwned>(&self, key: &str) -> Result<HashMap<String, T>> {
        debug!(key, "HGETALL");
        let store = self.conn.store()?;
        let raw = self.conn.track(store.hgetall(key).await)?;

        let mut values = HashMap::with_capacity(raw.len());
        for (field, encoded) in raw {
            match decode(Some(&encoded))? {
                Some(value) => {
                    values.insert(field, value);
                }
                None => {
                    if let Ok(value) = serde_json::from_value(Value::Null) {
                        values.insert(field, value);
                    }
                }
            }
        }
        Ok(values)
    }

    // == Hash Length ==
    /// Number of fields in the hash at `key`, 0 if it does not exist.
    pub async fn hlen(&self, key: &str) -> Result<u64> {
        debug!(key, "HLEN");
        let store = self.conn.store()?;
        self.conn.track(store.hlen(key).await)
    }
}
