//! Expiration operations. These act on raw keys and never touch the codec.

use serde::Serialize;
use tracing::debug;

use super::ObjectCache;
use crate::error::Result;

// == Time To Live ==
/// Remaining lifetime of a key as reported by the TTL command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "seconds", rename_all = "lowercase")]
pub enum Ttl {
    /// The key does not exist (wire value -2)
    Missing,
    /// The key exists without an expiration (wire value -1)
    Persistent,
    /// The key expires in this many seconds
    Remaining(u64),
}

impl Ttl {
    /// Wire value for a missing key.
    pub const MISSING: i64 = -2;
    /// Wire value for a key without expiration.
    pub const PERSISTENT: i64 = -1;

    /// Interprets a raw TTL reply.
    ///
    /// Negative values other than -1 are treated as a missing key.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            Self::PERSISTENT => Ttl::Persistent,
            secs if secs >= 0 => Ttl::Remaining(secs as u64),
            _ => Ttl::Missing,
        }
    }

    /// Raw TTL reply with the -2/-1 sentinels.
    pub fn as_raw(self) -> i64 {
        match self {
            Ttl::Missing => Self::MISSING,
            Ttl::Persistent => Self::PERSISTENT,
            Ttl::Remaining(secs) => i64::try_from(secs).unwrap_or(i64::MAX),
        }
    }

    /// Remaining seconds, if the key expires.
    pub fn remaining(self) -> Option<u64> {
        match self {
            Ttl::Remaining(secs) => Some(secs),
            _ => None,
        }
    }
}

impl From<i64> for Ttl {
    fn from(raw: i64) -> Self {
        Ttl::from_raw(raw)
    }
}

impl ObjectCache {
    // == Expire ==
    /// Sets or replaces the expiration of `key`.
    ///
    /// Returns false if the key does not exist. An expiration of 0 deletes the key.
    pub async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool> {
        debug!(key, ttl = ttl_seconds, "EXPIRE");
        let store = self.conn.store()?;
        self.conn.track(store.expire(key, ttl_seconds).await)
    }

    // == TTL ==
    /// Remaining lifetime of `key`.
    pub async fn ttl(&self, key: &str) -> Result<Ttl> {
        self.ttl_raw(key).await.map(Ttl::from_raw)
    }

    /// Remaining lifetime of `key` as the raw reply: -2 missing, -1 no expiry.
    pub async fn ttl_raw(&self, key: &str) -> Result<i64> {
        debug!(key, "TTL");
        let store = self.conn.store()?;
        self.conn.track(store.ttl(key).await)
    }
}
