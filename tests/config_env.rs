use std::time::Duration;

use clap::Parser;
use folio::cache::CacheDriver;
use folio::config::{CliArgs, LoadError, load};
use serial_test::serial;

struct EnvGuard(&'static [&'static str]);

impl EnvGuard {
    fn set(pairs: &[(&'static str, &str)], keys: &'static [&'static str]) -> Self {
        for (key, value) in pairs {
            // SAFETY: tests touching the environment are serialized.
            unsafe { std::env::set_var(key, value) };
        }
        Self(keys)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in self.0 {
            // SAFETY: see EnvGuard::set.
            unsafe { std::env::remove_var(key) };
        }
    }
}

#[test]
#[serial]
fn environment_overrides_file_defaults() {
    let _guard = EnvGuard::set(
        &[
            ("FOLIO__SERVER__PORT", "4555"),
            ("FOLIO__CACHE__NEGATIVE_TTL_SECONDS", "5"),
        ],
        &["FOLIO__SERVER__PORT", "FOLIO__CACHE__NEGATIVE_TTL_SECONDS"],
    );

    let settings = load(&CliArgs::parse_from(["folio"])).expect("settings");

    assert_eq!(settings.server.addr.port(), 4555);
    assert_eq!(settings.cache.negative_ttl, Some(Duration::from_secs(5)));
    assert_eq!(settings.cache.driver, CacheDriver::Memory);
}

#[test]
#[serial]
fn cli_flags_beat_environment() {
    let _guard = EnvGuard::set(&[("FOLIO__SERVER__PORT", "4555")], &["FOLIO__SERVER__PORT"]);

    let settings = load(&CliArgs::parse_from(["folio", "serve", "--server-port", "4600"]))
        .expect("settings");

    assert_eq!(settings.server.addr.port(), 4600);
}

#[test]
#[serial]
fn database_cache_without_url_is_rejected() {
    let _guard = EnvGuard::set(
        &[("FOLIO__CACHE__DRIVER", "database")],
        &["FOLIO__CACHE__DRIVER"],
    );

    let err = load(&CliArgs::parse_from(["folio", "cache-clear"])).expect_err("invalid");
    assert!(matches!(err, LoadError::Invalid { key: "cache.driver", .. }));
}
