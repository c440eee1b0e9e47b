//! # Product Service
//!
//! MySQL-backed product API with a Redis read cache.

use storefront_api::server::{init_tracing, log_level_from_env, run_cached_service};
use storefront_api::CachedServiceConfig;
use storefront_domain::{Product, EntityKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing(&log_level_from_env());

    let config = match CachedServiceConfig::from_env(EntityKind::Product) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    run_cached_service::<Product>(config).await
}
