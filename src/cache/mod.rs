//! Folio cache layer.
//!
//! Reads go through [`remember`]/[`remember_forever`] against an injected
//! [`CacheStore`]; writes evict the affected keys with [`forget`].
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! driver = "memory"          # or "database"
//! negative_ttl_seconds = 60  # 0 disables caching "not found" lookups
//! purge_interval_seconds = 300  # 0 disables the expiry sweeper
//! ```

mod config;
mod keys;
mod lock;
mod remember;
mod store;
mod sweeper;

pub use config::{CacheConfig, CacheDriver};
pub use keys::CacheKey;
pub use remember::{
    METRIC_CACHE_FORGET, METRIC_CACHE_HIT, METRIC_CACHE_MISS, Retention, forget, remember,
    remember_forever,
};
pub use store::{CacheError, CacheStore, MemoryCacheStore};
pub use sweeper::spawn_expiry_sweeper;
