//! Expiry Sweeper Task
//!
//! Background task that periodically purges expired keys from a [`MemoryStore`].
//! Reads already skip expired keys; the sweep only reclaims their memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a background task that periodically purges expired keys.
///
/// The task loops forever, sleeping for `interval` between runs. Abort the
/// returned handle to stop it.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let sweeper = spawn_expiry_sweeper(store.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_expiry_sweeper(store: Arc<MemoryStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry sweeper with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired keys", removed);
            } else {
                debug!("Expiry sweep: no expired keys found");
            }
        }
    })
}
