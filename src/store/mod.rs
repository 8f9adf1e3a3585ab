//! Store Module
//!
//! The key-value store primitives the object cache is built on, and the
//! backends that provide them.
//!
//! # Backends
//! - [`RedisStore`] - Multiplexed connection to a Redis server
//! - [`MemoryStore`] - In-process store with the same semantics, for local use and tests

mod entry;
mod memory;
mod redis_store;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use redis_store::RedisStore;
pub use entry::{EntryValue, StoreEntry};
pub use memory::MemoryStore;

// == Store Primitives ==
/// Raw string primitives exposed by a key-value store.
///
/// Values are opaque transport strings; encoding happens above this layer.
/// Every method resolves exactly once, either with the store's reply or an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// `GET key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// `SET key value [EX seconds]`, returns the acknowledgement token
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<String>;

    /// `DEL key`, returns the number of keys removed
    async fn del(&self, key: &str) -> Result<u64>;

    /// `HGET key field`
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// `HSET key field value`, returns the number of fields created
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<u64>;

    /// `HDEL key field`, returns the number of fields removed
    async fn hdel(&self, key: &str, field: &str) -> Result<u64>;

    /// `HGETALL key`
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;

    /// `HLEN key`
    async fn hlen(&self, key: &str) -> Result<u64>;

    /// `EXPIRE key seconds`, returns true if the key exists
    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool>;

    /// `TTL key`, with -2 for a missing key and -1 for a key without expiry
    async fn ttl(&self, key: &str) -> Result<i64>;

    /// `QUIT`, resolves once the store confirms the session is over
    async fn quit(&self) -> Result<()>;
}
