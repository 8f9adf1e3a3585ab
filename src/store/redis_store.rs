//! Redis Store Module
//!
//! Backend talking to a Redis server over a single multiplexed connection.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, IntoConnectionInfo};
use tracing::debug;

use super::KvStore;
use crate::connection::ConnectOptions;
use crate::error::{CacheError, Result};

// == Redis Store ==
/// Store backed by a Redis server.
///
/// The multiplexed connection pipelines concurrent commands over one socket and
/// answers them in issuance order.
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
}

impl RedisStore {
    /// Opens a connection and completes the handshake (including AUTH when a
    /// password is configured).
    ///
    /// Credentials in `options` take precedence over those embedded in `address`.
    pub async fn connect(address: &str, options: &ConnectOptions) -> Result<Self> {
        let mut info = address
            .into_connection_info()
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        if let Some(password) = &options.password {
            info.redis.password = Some(password.clone());
        }
        if let Some(username) = &options.username {
            info.redis.username = Some(username.clone());
        }

        let client = Client::open(info).map_err(|e| CacheError::Connection(e.to_string()))?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        debug!(address, "redis handshake complete");

        Ok(Self { connection })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<String> {
        let mut conn = self.connection.clone();
        let ack: String = match ttl_seconds {
            Some(seconds) => conn.set_ex(key, value, seconds).await?,
            None => conn.set(key, value).await?,
        };
        Ok(ack)
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        Ok(conn.del(key).await?)
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        Ok(conn.hget(key, field).await?)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        Ok(conn.hset(key, field, value).await?)
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        Ok(conn.hdel(key, field).await?)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut conn = self.connection.clone();
        Ok(conn.hgetall(key).await?)
    }

    async fn hlen(&self, key: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        Ok(conn.hlen(key).await?)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool> {
        let mut conn = self.connection.clone();
        let seconds = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        Ok(conn.expire(key, seconds).await?)
    }

    async fn ttl(&self, key: &str) -> Result<i64> {
        let mut conn = self.connection.clone();
        Ok(conn.ttl(key).await?)
    }

    async fn quit(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = redis::cmd("QUIT").query_async(&mut conn).await?;
        Ok(())
    }
}
