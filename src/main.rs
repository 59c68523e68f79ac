use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use folio::{
    application::{
        articles::{ArticleCachePolicy, ArticleService},
        error::AppError,
        repos::ArticlesRepo,
        seed::seed_articles,
    },
    cache::{CacheDriver, CacheKey, CacheStore, MemoryCacheStore, forget, spawn_expiry_sweeper},
    config,
    infra::{
        db::{PostgresCacheStore, PostgresRepositories},
        error::InfraError,
        http,
        memory::InMemoryRepositories,
        telemetry,
    },
};
use tokio::sync::watch;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Seed(_) => run_seed(settings).await,
        config::Command::CacheClear(_) => run_cache_clear(settings).await,
    }
}

/// Article store and cache selected by configuration.
struct Backends {
    articles: Arc<dyn ArticlesRepo>,
    cache: Arc<dyn CacheStore>,
    persistent: bool,
}

async fn init_backends(settings: &config::Settings) -> Result<Backends, AppError> {
    let db = match settings.database.url.as_deref() {
        Some(url) => Some(init_database(url, settings.database.max_connections.get()).await?),
        None => None,
    };

    let cache: Arc<dyn CacheStore> = match (settings.cache.driver, db.as_ref()) {
        (CacheDriver::Database, Some(db)) => Arc::new(PostgresCacheStore::new(db.clone())),
        (CacheDriver::Database, None) => {
            return Err(InfraError::configuration(
                "cache driver `database` requires database.url",
            )
            .into());
        }
        (CacheDriver::Memory, _) => Arc::new(MemoryCacheStore::new()),
    };

    let persistent = db.is_some();
    let articles: Arc<dyn ArticlesRepo> = match db {
        Some(db) => Arc::new(db),
        None => {
            warn!(
                target: "folio::bootstrap",
                "database.url is not set; articles are kept in memory"
            );
            Arc::new(InMemoryRepositories::new())
        }
    };

    info!(
        target: "folio::bootstrap",
        cache_driver = settings.cache.driver.as_str(),
        persistent,
        "backends ready"
    );

    Ok(Backends {
        articles,
        cache,
        persistent,
    })
}

async fn init_database(url: &str, max_connections: u32) -> Result<PostgresRepositories, AppError> {
    let pool = PostgresRepositories::connect(url, max_connections)
        .await
        .map_err(InfraError::from)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;

    Ok(PostgresRepositories::new(pool))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let backends = init_backends(&settings).await?;
    let sweeper = settings
        .cache
        .purge_interval
        .map(|every| spawn_expiry_sweeper(backends.cache.clone(), every));
    let articles = ArticleService::new(backends.articles, backends.cache)
        .with_policy(ArticleCachePolicy::from(&settings.cache));

    let result = serve_http(&settings, http::build_app(articles)).await;

    if let Some(handle) = sweeper {
        handle.abort();
        let _ = handle.await;
    }

    result
}

async fn serve_http(settings: &config::Settings, app: axum::Router) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target: "folio::bootstrap",
        addr = %settings.server.addr,
        "listening"
    );

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = stop_tx.send(true);
        })
        .into_future();

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = drain_deadline(&mut stop_rx, grace) => {
            warn!(
                target: "folio::bootstrap",
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    Ok(())
}

async fn drain_deadline(stop: &mut watch::Receiver<bool>, grace: Duration) {
    if stop.wait_for(|stopped| *stopped).await.is_err() {
        // Sender gone without a signal: the server already finished.
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target: "folio::bootstrap", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target: "folio::bootstrap", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(target: "folio::bootstrap", "shutdown signal received");
}

async fn run_seed(settings: config::Settings) -> Result<(), AppError> {
    let backends = init_backends(&settings).await?;
    if !backends.persistent {
        warn!(
            target: "folio::seed",
            "seeding the in-memory store; the articles vanish when this command exits"
        );
    }

    let seeded = seed_articles(backends.articles.as_ref())
        .await
        .map_err(|err| AppError::unexpected(format!("failed to seed articles: {err}")))?;
    forget(backends.cache.as_ref(), &CacheKey::ArticleAll)
        .await
        .map_err(InfraError::from)?;

    info!(target: "folio::seed", count = seeded.len(), "seed complete");
    Ok(())
}

async fn run_cache_clear(settings: config::Settings) -> Result<(), AppError> {
    let backends = init_backends(&settings).await?;
    if settings.cache.driver == CacheDriver::Memory {
        warn!(
            target: "folio::cache",
            "memory cache belongs to each server process; nothing shared to clear"
        );
    }

    backends
        .cache
        .flush()
        .await
        .map_err(InfraError::from)?;

    info!(
        target: "folio::cache",
        driver = settings.cache.driver.as_str(),
        "cache cleared"
    );
    Ok(())
}
