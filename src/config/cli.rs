use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the Folio binary.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Folio article service")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(Box<ServeArgs>),
    /// Insert the sample articles and drop the cached list.
    Seed(StoreArgs),
    /// Remove every entry from the configured cache store.
    #[command(name = "cache-clear")]
    CacheClear(StoreArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct StoreOverrides {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the cache driver (memory|database).
    #[arg(long = "cache-driver", value_name = "DRIVER")]
    pub cache_driver: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct StoreArgs {
    #[command(flatten)]
    pub store: StoreOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub store: StoreOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override how long "not found" lookups stay cached; 0 disables them.
    #[arg(long = "cache-negative-ttl-seconds", value_name = "SECONDS")]
    pub cache_negative_ttl_seconds: Option<u64>,

    /// Override how often expired cache entries are purged; 0 disables it.
    #[arg(long = "cache-purge-interval-seconds", value_name = "SECONDS")]
    pub cache_purge_interval_seconds: Option<u64>,
}
