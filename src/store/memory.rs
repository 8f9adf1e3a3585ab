//! Memory Store Module
//!
//! In-process store with the GET/SET/HASH/TTL semantics of a Redis server:
//! wrong-type errors, hash removal on last field, lazy expiration on access.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::entry::{EntryValue, StoreEntry};
use super::KvStore;
use crate::error::{CacheError, Result};

/// Acknowledgement token returned by a successful SET.
const OK: &str = "OK";

// == Memory Store ==
/// In-memory key-value storage with TTL support.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a new empty MemoryStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the current number of keys, including expired keys not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn wrong_type() -> CacheError {
    CacheError::from_reply(
        "WRONGTYPE",
        Some("Operation against a key holding the wrong kind of value"),
    )
}

/// Drops `key` if it has expired.
fn evict_if_expired(entries: &mut HashMap<String, StoreEntry>, key: &str) {
    if entries.get(key).is_some_and(StoreEntry::is_expired) {
        debug!(key, "lazily evicting expired key");
        entries.remove(key);
    }
}

/// Returns the entry under `key` unless it is absent or expired.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, StoreEntry>,
    key: &str,
) -> Option<&'a mut StoreEntry> {
    evict_if_expired(entries, key);
    entries.get_mut(key)
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key).map(|entry| &entry.value) {
            None => Ok(None),
            Some(EntryValue::Scalar(value)) => Ok(Some(value.clone())),
            Some(EntryValue::Hash(_)) => Err(wrong_type()),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<String> {
        if ttl_seconds == Some(0) {
            return Err(CacheError::from_reply(
                "ERR",
                Some("invalid expire time in 'set' command"),
            ));
        }

        // SET replaces whatever the key held, hashes included
        let entry = StoreEntry::new(EntryValue::Scalar(value.to_string()), ttl_seconds);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(OK.to_string())
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);
        Ok(u64::from(entries.remove(key).is_some()))
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key).map(|entry| &entry.value) {
            None => Ok(None),
            Some(EntryValue::Hash(fields)) => Ok(fields.get(field).cloned()),
            Some(EntryValue::Scalar(_)) => Err(wrong_type()),
        }
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<u64> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::new(EntryValue::Hash(HashMap::new()), None));
        match &mut entry.value {
            EntryValue::Hash(fields) => {
                let created = fields.insert(field.to_string(), value.to_string()).is_none();
                Ok(u64::from(created))
            }
            EntryValue::Scalar(_) => Err(wrong_type()),
        }
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<u64> {
        let mut entries = self.entries.write().await;

        let (removed, now_empty) = match live_entry(&mut entries, key).map(|e| &mut e.value) {
            None => return Ok(0),
            Some(EntryValue::Hash(fields)) => (fields.remove(field).is_some(), fields.is_empty()),
            Some(EntryValue::Scalar(_)) => return Err(wrong_type()),
        };

        // A hash without fields does not exist
        if now_empty {
            entries.remove(key);
        }
        Ok(u64::from(removed))
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key).map(|entry| &entry.value) {
            None => Ok(HashMap::new()),
            Some(EntryValue::Hash(fields)) => Ok(fields.clone()),
            Some(EntryValue::Scalar(_)) => Err(wrong_type()),
        }
    }

    async fn hlen(&self, key: &str) -> Result<u64> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key).map(|entry| &entry.value) {
            None => Ok(0),
            Some(EntryValue::Hash(fields)) => Ok(fields.len() as u64),
            Some(EntryValue::Scalar(_)) => Err(wrong_type()),
        }
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let Some(entry) = live_entry(&mut entries, key) else {
            return Ok(false);
        };

        if ttl_seconds == 0 {
            entries.remove(key);
        } else {
            entry.expire_in(ttl_seconds);
        }
        Ok(true)
    }

    async fn ttl(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        Ok(match live_entry(&mut entries, key) {
            None => -2,
            Some(entry) => entry
                .ttl_remaining()
                .map_or(-1, |secs| i64::try_from(secs).unwrap_or(i64::MAX)),
        })
    }

    async fn quit(&self) -> Result<()> {
        Ok(())
    }
}
