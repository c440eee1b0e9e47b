//! # Service Bootstrap
//!
//! Client wiring and the serve loop shared by the service binaries.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{CachedServiceConfig, OrderServiceConfig};
use crate::{ServiceContext, build_router};
use storefront_domain::{Order, Record};
use storefront_persistence::repository::{
    ScyllaClient, ScyllaRecordStore, SqlClient, SqlRecordStore,
};
use storefront_persistence::{
    CacheClient, CacheConfig, CachedRepository, ExportSink, Exporter, ObjectStoreSink,
    ReadStrategy, SharedCache, WriteStrategy,
};

/// Initialize tracing with a JSON formatter. `RUST_LOG` wins over
/// `log_level`.
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Log level before configuration is parsed, so config errors are logged.
pub fn log_level_from_env() -> String {
    crate::config::log_level(&crate::config::env_lookup)
}

/// Run a MySQL-backed service for `T` with an optional Redis cache.
///
/// # Errors
///
/// Returns an error if MySQL is unreachable, the table name is invalid or
/// the listener cannot bind. A Redis failure only disables the cache.
pub async fn run_cached_service<T: Record>(config: CachedServiceConfig) -> anyhow::Result<()> {
    tracing::info!(
        version = crate::VERSION,
        entity = T::ENTITY,
        "Starting {} service",
        T::LABEL
    );

    tracing::info!(
        host = %config.mysql.host,
        database = %config.mysql.database,
        table = %config.table,
        "Connecting to MySQL"
    );
    let sql = SqlClient::new(&config.mysql).await?;
    tracing::info!("MySQL connected");

    let store = SqlRecordStore::<T>::new(sql, &config.table)?;
    let cache = match &config.redis {
        Some(redis) => connect_cache(redis).await,
        None => {
            tracing::error!("No Redis location configured, running without cache");
            None
        }
    };

    let repository = CachedRepository::with_strategies(
        Arc::new(store),
        cache,
        config.server.read_strategy,
        config.server.write_strategy,
    );
    log_strategies(&repository);

    serve(config.server.server_addr, build_router(ServiceContext::new(repository))).await
}

/// Run the ScyllaDB-backed order service with its S3 export endpoint.
///
/// # Errors
///
/// Returns an error if ScyllaDB is unreachable, the export target cannot
/// be built or the listener cannot bind.
pub async fn run_order_service(config: OrderServiceConfig) -> anyhow::Result<()> {
    tracing::info!(version = crate::VERSION, "Starting Order service");

    tracing::info!(
        hosts = ?config.scylla.hosts,
        keyspace = %config.scylla.keyspace,
        table = %config.table,
        "Connecting to ScyllaDB"
    );
    let scylla = Arc::new(ScyllaClient::new(config.scylla.clone()).await?);
    tracing::info!("ScyllaDB connected");

    let store = Arc::new(ScyllaRecordStore::<Order>::new(scylla, &config.table)?);

    let sink: Option<Arc<dyn ExportSink>> = match &config.export.object_store {
        Some(object_store) => Some(Arc::new(ObjectStoreSink::s3(object_store)?)),
        None => {
            tracing::warn!("S3_BUCKET not set, order export will fail");
            None
        }
    };
    let exporter = Exporter::new(store.clone(), sink)
        .with_object_key(config.export.object_key.clone())
        .with_warn_threshold(config.export.warn_threshold);

    let repository = CachedRepository::with_strategies(
        store,
        None,
        ReadStrategy::DbOnly,
        WriteStrategy::DbOnly,
    );
    log_strategies(&repository);

    let ctx = ServiceContext::new(repository).with_exporter(exporter);
    serve(config.server.server_addr, build_router(ctx)).await
}

async fn connect_cache(config: &CacheConfig) -> Option<SharedCache> {
    let connected = match CacheClient::new(config.clone()).await {
        Ok(client) => client.ping().await.map(|()| client),
        Err(e) => Err(e),
    };

    match connected {
        Ok(client) => {
            tracing::info!("Redis connected");
            Some(client.into_shared())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to Redis, running without cache");
            None
        }
    }
}

fn log_strategies<T: Record>(repository: &CachedRepository<T>) {
    tracing::info!(
        read_strategy = %repository.read_strategy(),
        write_strategy = %repository.write_strategy(),
        cache = repository.has_cache(),
        "Repository ready"
    );
}

async fn serve(addr: SocketAddr, app: axum::Router) -> anyhow::Result<()> {
    tracing::info!(%addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
