//! Cache storage contract and the in-process driver.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;

use super::lock::recover;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache value for `{key}` could not be encoded: {message}")]
    Encode { key: String, message: String },
}

impl CacheError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Shared key/value cache reached by every request.
///
/// Values are JSON documents. A `None` ttl keeps an entry until it is
/// forgotten or the store is flushed.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    async fn put(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn set_forever(&self, key: &str, value: Value) -> Result<(), CacheError> {
        self.put(key, value, None).await
    }

    /// Evicts `key`, returning whether an entry was present. Absent keys are
    /// a no-op.
    async fn forget(&self, key: &str) -> Result<bool, CacheError>;

    async fn flush(&self) -> Result<(), CacheError>;

    /// Drops every entry whose ttl has elapsed and returns how many went.
    /// Expired entries already read as misses; this only reclaims space.
    async fn purge_expired(&self) -> Result<u64, CacheError>;
}

/// Writes between two opportunistic sweeps of the memory driver.
const SWEEP_EVERY_PUTS: usize = 256;

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// Process-local cache driver.
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
    puts_since_sweep: AtomicUsize,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            puts_since_sweep: AtomicUsize::new(0),
        }
    }

    /// Number of entries held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        recover(self.entries.read(), "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep(entries: &mut HashMap<String, Entry>, now: Instant) -> u64 {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    (before - entries.len()) as u64
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let now = Instant::now();
        {
            let entries = recover(self.entries.read(), "get");
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = recover(self.entries.write(), "get.evict_expired");
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = ttl.map(|ttl| now + ttl);
        let mut entries = recover(self.entries.write(), "put");
        if self.puts_since_sweep.fetch_add(1, Ordering::Relaxed) + 1 >= SWEEP_EVERY_PUTS {
            self.puts_since_sweep.store(0, Ordering::Relaxed);
            sweep(&mut entries, now);
        }
        entries.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<bool, CacheError> {
        Ok(recover(self.entries.write(), "forget")
            .remove(key)
            .is_some())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        recover(self.entries.write(), "flush").clear();
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, CacheError> {
        let mut entries = recover(self.entries.write(), "purge_expired");
        self.puts_since_sweep.store(0, Ordering::Relaxed);
        Ok(sweep(&mut entries, Instant::now()))
    }
}
