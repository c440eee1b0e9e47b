//! Storefront smoke CLI
//!
//! Generates records, posts them to the services and reads them back.

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::Client;
use std::time::Duration;
use storefront_domain::{Customer, EntityKind, Order, Product, Record};
use storefront_smoke::{RecordGenerator, ServiceClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storefront-smoke")]
#[command(about = "Seed and verify the storefront services")]
struct Args {
    /// Order service base URL
    #[arg(long, env = "ORDER_URL", default_value = "http://localhost:8080")]
    order_url: String,

    /// Product service base URL
    #[arg(long, env = "PRODUCT_URL", default_value = "http://localhost:8081")]
    product_url: String,

    /// Customer service base URL
    #[arg(long, env = "CUSTOMER_URL", default_value = "http://localhost:8082")]
    customer_url: String,

    /// Records to create per entity
    #[arg(short, long, default_value = "10")]
    count: usize,

    /// Entities to exercise, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "product,customer,order")]
    entities: Vec<EntityKind>,

    /// Trigger the order export after seeding
    #[arg(long)]
    export: bool,

    /// Seed for reproducible records
    #[arg(long)]
    seed: Option<u64>,

    /// Request timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Dry run (generate and log records, don't call the services)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("storefront_smoke=info".parse()?))
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut generator = RecordGenerator::with_rng(StdRng::seed_from_u64(seed));
    let http = Client::builder()
        .timeout(Duration::from_millis(args.timeout_ms))
        .build()?;

    info!(seed, count = args.count, entities = ?args.entities, "Starting smoke run");

    let products: Vec<Product> = (0..args.count).map(|_| generator.product()).collect();
    let customers: Vec<Customer> = (0..args.count).map(|_| generator.customer()).collect();
    let orders: Vec<Order> = (0..args.count)
        .map(|_| generator.order(&customers, &products))
        .collect();

    let mut failures = 0;
    for entity in &args.entities {
        failures += match entity {
            EntityKind::Product => {
                let client = ServiceClient::new(http.clone(), &args.product_url);
                run(&client, &products, args.dry_run).await
            }
            EntityKind::Customer => {
                let client = ServiceClient::new(http.clone(), &args.customer_url);
                run(&client, &customers, args.dry_run).await
            }
            EntityKind::Order => {
                let client = ServiceClient::new(http.clone(), &args.order_url);
                run(&client, &orders, args.dry_run).await
            }
        };
    }

    if args.export && !args.dry_run {
        let client = ServiceClient::new(http.clone(), &args.order_url);
        match client.export::<Order>().await {
            Ok(message) => info!(%message, "Export triggered"),
            Err(err) => {
                warn!(error = %err, "Export failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} smoke checks failed");
    }

    info!("Smoke run complete!");
    Ok(())
}

/// Round-trip every record; returns the number of failures.
async fn run<T: Record>(client: &ServiceClient, records: &[T], dry_run: bool) -> usize {
    let mut failures = 0;

    for record in records {
        if dry_run {
            info!(entity = T::ENTITY, ?record, "Generated");
            continue;
        }

        match client.round_trip(record).await {
            Ok(()) => info!(entity = T::ENTITY, id = record.id(), "Round trip ok"),
            Err(err) => {
                warn!(entity = T::ENTITY, id = record.id(), error = %err, "Round trip failed");
                failures += 1;
            }
        }
    }

    info!(
        entity = T::ENTITY,
        total = records.len(),
        failures,
        "Finished entity"
    );
    failures
}
