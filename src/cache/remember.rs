//! Typed cache-aside helpers.

use std::future::Future;
use std::time::Duration;

use metrics::counter;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::keys::CacheKey;
use super::store::{CacheError, CacheStore};

pub const METRIC_CACHE_HIT: &str = "folio_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "folio_cache_miss_total";
pub const METRIC_CACHE_FORGET: &str = "folio_cache_forget_total";

/// How long a freshly loaded value is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    Forever,
    For(Duration),
    /// Return the value without caching it.
    Skip,
}

/// Returns the cached value under `key`, or runs `loader`, stores its
/// result for as long as `retention` decides, and returns it.
///
/// A cached document that no longer decodes as `T` is treated as a miss
/// and overwritten.
pub async fn remember<T, E, F, Fut, R>(
    store: &dyn CacheStore,
    key: &CacheKey,
    loader: F,
    retention: R,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    E: From<CacheError>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: FnOnce(&T) -> Retention,
{
    let raw_key = key.as_string();

    if let Some(cached) = store.get(&raw_key).await? {
        match serde_json::from_value::<T>(cached) {
            Ok(value) => {
                counter!(METRIC_CACHE_HIT, "key_kind" => key.kind()).increment(1);
                debug!(target: "folio::cache", key = %raw_key, "cache hit");
                return Ok(value);
            }
            Err(err) => {
                warn!(
                    target: "folio::cache",
                    key = %raw_key,
                    error = %err,
                    "discarding cached value that no longer decodes"
                );
            }
        }
    }

    counter!(METRIC_CACHE_MISS, "key_kind" => key.kind()).increment(1);
    debug!(target: "folio::cache", key = %raw_key, "cache miss");

    let value = loader().await?;

    let ttl = match retention(&value) {
        Retention::Forever => None,
        Retention::For(ttl) => Some(ttl),
        Retention::Skip => return Ok(value),
    };

    let encoded = serde_json::to_value(&value).map_err(|err| CacheError::Encode {
        key: raw_key.clone(),
        message: err.to_string(),
    })?;
    store.put(&raw_key, encoded, ttl).await?;

    Ok(value)
}

/// [`remember`] with no expiration.
pub async fn remember_forever<T, E, F, Fut>(
    store: &dyn CacheStore,
    key: &CacheKey,
    loader: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    E: From<CacheError>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    remember(store, key, loader, |_| Retention::Forever).await
}

/// Evicts `key`; evicting an absent key is not an error.
pub async fn forget(store: &dyn CacheStore, key: &CacheKey) -> Result<(), CacheError> {
    let raw_key = key.as_string();
    let removed = store.forget(&raw_key).await?;
    counter!(METRIC_CACHE_FORGET, "key_kind" => key.kind()).increment(1);
    debug!(target: "folio::cache", key = %raw_key, removed, "cache key forgotten");
    Ok(())
}
