//! # Order Service
//!
//! ScyllaDB-backed order API with a bulk export to S3.

use storefront_api::OrderServiceConfig;
use storefront_api::server::{init_tracing, log_level_from_env, run_order_service};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing(&log_level_from_env());

    let config = match OrderServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    run_order_service(config).await
}
