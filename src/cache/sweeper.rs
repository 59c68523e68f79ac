//! Background reclamation of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::store::CacheStore;

/// Calls [`CacheStore::purge_expired`] every `every` until the handle is
/// aborted. The first sweep runs one full period after spawning.
pub fn spawn_expiry_sweeper(store: Arc<dyn CacheStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;
        loop {
            interval.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => debug!(
                    target: "folio::cache",
                    removed,
                    "purged expired cache entries"
                ),
                Err(err) => warn!(
                    target: "folio::cache",
                    error = %err,
                    "failed to purge expired cache entries"
                ),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::cache::MemoryCacheStore;

    #[tokio::test(start_paused = true)]
    async fn sweeper_empties_store_once_ttls_elapse() {
        let store = Arc::new(MemoryCacheStore::new());
        for id in 0..50 {
            store
                .put(&format!("article:{id}"), Value::Null, Some(Duration::from_secs(60)))
                .await
                .unwrap();
        }

        let handle = spawn_expiry_sweeper(store.clone(), Duration::from_secs(300));

        tokio::time::sleep(Duration::from_secs(301)).await;
        assert!(store.is_empty());

        handle.abort();
    }
}
