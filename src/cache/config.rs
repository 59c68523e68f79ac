//! Cache configuration.
//!
//! Selects the cache driver, how long "not found" lookups are kept and how
//! often expired entries are reclaimed.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_NEGATIVE_TTL_SECS: u64 = 60;
const DEFAULT_PURGE_INTERVAL_SECS: u64 = 300;

/// Backing store for cached entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheDriver {
    /// Process-local map; cleared when the process exits.
    Memory,
    /// `cache_entries` table shared by every process using the database.
    Database,
}

impl CacheDriver {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheDriver::Memory => "memory",
            CacheDriver::Database => "database",
        }
    }
}

impl FromStr for CacheDriver {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheDriver::Memory),
            "database" | "db" => Ok(CacheDriver::Database),
            other => Err(format!(
                "unknown cache driver `{other}` (expected `memory` or `database`)"
            )),
        }
    }
}

/// Resolved cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub driver: CacheDriver,
    /// How long a "not found" lookup stays cached; `None` disables caching
    /// negative lookups entirely.
    pub negative_ttl: Option<Duration>,
    /// Period of the background expiry sweep; `None` disables it.
    pub purge_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            driver: CacheDriver::Memory,
            negative_ttl: Some(Duration::from_secs(DEFAULT_NEGATIVE_TTL_SECS)),
            purge_interval: Some(Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS)),
        }
    }
}

impl CacheConfig {
    /// Builds the negative TTL from seconds, where zero disables it.
    pub fn negative_ttl_from_secs(seconds: u64) -> Option<Duration> {
        (seconds > 0).then(|| Duration::from_secs(seconds))
    }

    pub fn default_negative_ttl_secs() -> u64 {
        DEFAULT_NEGATIVE_TTL_SECS
    }

    /// Same zero-disables rule as the negative TTL.
    pub fn purge_interval_from_secs(seconds: u64) -> Option<Duration> {
        Self::negative_ttl_from_secs(seconds)
    }

    pub fn default_purge_interval_secs() -> u64 {
        DEFAULT_PURGE_INTERVAL_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert_eq!(config.driver, CacheDriver::Memory);
        assert_eq!(config.negative_ttl, Some(Duration::from_secs(60)));
        assert_eq!(config.purge_interval, Some(Duration::from_secs(300)));
    }

    #[test]
    fn zero_seconds_disables_negative_caching() {
        assert_eq!(CacheConfig::negative_ttl_from_secs(0), None);
        assert_eq!(
            CacheConfig::negative_ttl_from_secs(5),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn driver_parses_case_insensitively() {
        assert_eq!("Memory".parse::<CacheDriver>(), Ok(CacheDriver::Memory));
        assert_eq!(" database ".parse::<CacheDriver>(), Ok(CacheDriver::Database));
        assert!("redis".parse::<CacheDriver>().is_err());
    }
}
