//! Connection Module
//!
//! Owns the session with the backing store and tracks its lifecycle:
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> Closing -> Closed
//!                      \            \
//!                       `-> Error    `-> Error
//! ```
//!
//! `Error` and `Closed` are terminal. There is no reconnect; create a new
//! connection instead.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};
use crate::store::{KvStore, MemoryStore, RedisStore};
use crate::tasks::spawn_expiry_sweeper;

// == Connection State ==
/// Lifecycle state of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closing,
    Closed,
    Error,
}

impl ConnectionState {
    /// Returns true for states no transition leaves.
    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Error)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
            ConnectionState::Error => "error",
        };
        f.write_str(name)
    }
}

// == Connect Options ==
/// Options applied when opening a connection.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Password sent during the handshake
    pub password: Option<String>,
    /// ACL username sent with the password
    pub username: Option<String>,
    /// Expired-key sweep interval for `memory://` stores, None = lazy expiry only
    pub sweep_interval: Option<Duration>,
}

impl ConnectOptions {
    /// Options carrying only a password.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Self::default()
        }
    }
}

// == Connection ==
/// A single session with the backing store.
///
/// The backend is owned exclusively by this value; cache operations borrow it.
pub struct Connection {
    address: String,
    store: Arc<dyn KvStore>,
    state: watch::Sender<ConnectionState>,
    sweeper: Option<JoinHandle<()>>,
}

impl Connection {
    // == Create ==
    /// Opens a connection to the store at `address`.
    ///
    /// The backend is chosen from the URL scheme: `redis://`, `rediss://`,
    /// `unix://` and `redis+unix://` reach a Redis server, `memory://` opens
    /// an in-process store. Resolves once the handshake completes, or fails
    /// with [`CacheError::Connection`] on the first transport error.
    pub async fn create(address: &str, options: ConnectOptions) -> Result<Self> {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        transition(&state, ConnectionState::Connecting);
        info!(address = %redact(address), "Connecting to store");

        let scheme = address.split_once("://").map(|(scheme, _)| scheme);
        let opened = match scheme {
            Some("redis" | "rediss" | "unix" | "redis+unix") => {
                RedisStore::connect(address, &options)
                    .await
                    .map(|store| (Arc::new(store) as Arc<dyn KvStore>, None))
            }
            Some("memory") => {
                let store = Arc::new(MemoryStore::new());
                let sweeper = options
                    .sweep_interval
                    .map(|interval| spawn_expiry_sweeper(store.clone(), interval));
                Ok((store as Arc<dyn KvStore>, sweeper))
            }
            _ => Err(CacheError::Connection(format!(
                "unsupported store address: {}",
                redact(address)
            ))),
        };

        match opened {
            Ok((store, sweeper)) => {
                transition(&state, ConnectionState::Connected);
                info!(address = %redact(address), "Connected to store");
                Ok(Self {
                    address: address.to_string(),
                    store,
                    state,
                    sweeper,
                })
            }
            Err(err) => {
                transition(&state, ConnectionState::Error);
                warn!(address = %redact(address), error = %err, "Failed to connect to store");
                Err(err)
            }
        }
    }

    /// Wraps a backend that is already connected.
    pub fn from_store(address: impl Into<String>, store: Arc<dyn KvStore>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Connected);
        Self {
            address: address.into(),
            store,
            state,
            sweeper: None,
        }
    }

    // == State Queries ==
    /// Returns true only while the connection is usable.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Subscribes to state changes, e.g. to notice a dropped connection.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Address the connection was opened with.
    pub fn address(&self) -> &str {
        &self.address
    }

    // == Close ==
    /// Asks the store to end the session.
    ///
    /// Returns `true` once the store confirms. Closing a connection that is
    /// not connected fails without touching the transport.
    pub async fn close(&self) -> Result<bool> {
        let mut current = ConnectionState::Connected;
        let claimed = self.state.send_if_modified(|state| {
            if *state == ConnectionState::Connected {
                *state = ConnectionState::Closing;
                true
            } else {
                current = *state;
                false
            }
        });
        if !claimed {
            return Err(CacheError::Connection(format!(
                "cannot close a connection that is {}",
                current
            )));
        }
        debug!(from = %current, to = %ConnectionState::Closing, "connection state change");

        if let Some(sweeper) = &self.sweeper {
            sweeper.abort();
        }

        match self.store.quit().await {
            Ok(()) => {
                transition(&self.state, ConnectionState::Closed);
                info!(address = %redact(&self.address), "Connection closed");
                Ok(true)
            }
            Err(err) => {
                transition(&self.state, ConnectionState::Error);
                warn!(address = %redact(&self.address), error = %err, "Error while closing connection");
                Err(match err {
                    CacheError::Connection(msg) => CacheError::Connection(msg),
                    other => CacheError::Connection(other.to_string()),
                })
            }
        }
    }

    // == Operation Plumbing ==
    /// Borrows the backend for one operation, failing if the connection is not usable.
    pub(crate) fn store(&self) -> Result<&dyn KvStore> {
        match self.state() {
            ConnectionState::Connected => Ok(self.store.as_ref()),
            state => Err(CacheError::Connection(format!("connection is {}", state))),
        }
    }

    /// Passes an operation's outcome through, moving to `Error` on transport failure.
    pub(crate) fn track<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_connection_error() && !self.state().is_terminal() {
                transition(&self.state, ConnectionState::Error);
                warn!(address = %redact(&self.address), error = %err, "Connection failed");
            }
        }
        result
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("address", &redact(&self.address))
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

fn transition(state: &watch::Sender<ConnectionState>, next: ConnectionState) {
    let previous = state.send_replace(next);
    debug!(from = %previous, to = %next, "connection state change");
}

/// Hides any password embedded in a store URL.
fn redact(address: &str) -> String {
    match (address.split_once("://"), address.rfind('@')) {
        (Some((scheme, _)), Some(at)) if at > scheme.len() => {
            format!("{}://***{}", scheme, &address[at..])
        }
        _ => address.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_connection() {
        let conn = Connection::create("memory://", ConnectOptions::default())
            .await
            .unwrap();

        assert!(conn.is_connected());
        assert_eq!(conn.state(), ConnectionState::Connected);
        assert_eq!(conn.address(), "memory://");
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_scheme() {
        let result = Connection::create("ftp://localhost", ConnectOptions::default()).await;
        assert!(matches!(result, Err(CacheError::Connection(_))));
    }

    #[tokio::test]
    async fn test_create_fails_when_nothing_listens() {
        // Port 1 on loopback is never a Redis server
        let result = Connection::create("redis://127.0.0.1:1", ConnectOptions::default()).await;
        assert!(matches!(result, Err(CacheError::Connection(_))));
    }

    #[tokio::test]
    async fn test_close_transitions_to_closed() {
        let conn = Connection::create("memory://", ConnectOptions::default())
            .await
            .unwrap();
        let mut states = conn.subscribe();

        assert!(conn.close().await.unwrap());
        assert_eq!(conn.state(), ConnectionState::Closed);
        assert!(!conn.is_connected());
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_close_twice_is_rejected() {
        let conn = Connection::create("memory://", ConnectOptions::default())
            .await
            .unwrap();

        conn.close().await.unwrap();
        let result = conn.close().await;
        assert!(matches!(result, Err(CacheError::Connection(_))));
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_operations_fail_after_close() {
        let conn = Connection::create("memory://", ConnectOptions::default())
            .await
            .unwrap();
        conn.close().await.unwrap();

        assert!(matches!(conn.store(), Err(CacheError::Connection(_))));
    }

    #[tokio::test]
    async fn test_transport_error_moves_to_error_state() {
        let conn = Connection::from_store("memory://", Arc::new(MemoryStore::new()));

        let result: Result<()> = conn.track(Err(CacheError::Connection("reset".to_string())));
        assert!(result.is_err());
        assert_eq!(conn.state(), ConnectionState::Error);
        assert!(!conn.is_connected());
    }

    #[tokio::test]
    async fn test_reply_errors_keep_connection_usable() {
        let conn = Connection::from_store("memory://", Arc::new(MemoryStore::new()));

        let result: Result<()> = conn.track(Err(CacheError::TypeMismatch("WRONGTYPE".into())));
        assert!(result.is_err());
        assert!(conn.is_connected());
    }

    #[tokio::test]
    async fn test_memory_connection_runs_sweeper() {
        let options = ConnectOptions {
            sweep_interval: Some(Duration::from_millis(100)),
            ..ConnectOptions::default()
        };
        let conn = Connection::create("memory://", options).await.unwrap();
        assert!(conn.sweeper.is_some());

        conn.close().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(conn.sweeper.as_ref().unwrap().is_finished());
    }

    #[tokio::test]
    async fn test_close_failure_moves_to_error_state() {
        let conn = Connection::from_store("redis://localhost:6379", Arc::new(FailingQuitStore));

        let result = conn.close().await;
        assert!(matches!(
            result,
            Err(CacheError::Connection(ref msg)) if msg.contains("ERR shutdown")
        ));
        assert_eq!(conn.state(), ConnectionState::Error);
        assert!(matches!(conn.close().await, Err(CacheError::Connection(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_close_succeeds_once() {
        let conn = Arc::new(Connection::from_store(
            "memory://",
            Arc::new(MemoryStore::new()),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let conn = Arc::clone(&conn);
                tokio::spawn(async move { conn.close().await.is_ok() })
            })
            .collect();

        let mut closed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                closed += 1;
            }
        }
        assert_eq!(closed, 1);
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    /// Store whose shutdown always fails; every other call is unused.
    struct FailingQuitStore;

    #[async_trait::async_trait]
    impl KvStore for FailingQuitStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Option<u64>) -> Result<String> {
            Ok("OK".to_string())
        }
        async fn del(&self, _key: &str) -> Result<u64> {
            Ok(0)
        }
        async fn hget(&self, _key: &str, _field: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn hset(&self, _key: &str, _field: &str, _value: &str) -> Result<u64> {
            Ok(1)
        }
        async fn hdel(&self, _key: &str, _field: &str) -> Result<u64> {
            Ok(0)
        }
        async fn hgetall(&self, _key: &str) -> Result<std::collections::HashMap<String, String>> {
            Ok(Default::default())
        }
        async fn hlen(&self, _key: &str) -> Result<u64> {
            Ok(0)
        }
        async fn expire(&self, _key: &str, _seconds: u64) -> Result<bool> {
            Ok(false)
        }
        async fn ttl(&self, _key: &str) -> Result<i64> {
            Ok(-2)
        }
        async fn quit(&self) -> Result<()> {
            Err(CacheError::Store("ERR shutdown".to_string()))
        }
    }

    #[test]
    fn test_redact_hides_credentials() {
        assert_eq!(
            redact("redis://:secret@localhost:6379"),
            "redis://***@localhost:6379"
        );
        assert_eq!(redact("redis://localhost:6379"), "redis://localhost:6379");
        assert_eq!(redact("memory://"), "memory://");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
        assert!(ConnectionState::Error.is_terminal());
        assert!(!ConnectionState::Closing.is_terminal());
    }
}
