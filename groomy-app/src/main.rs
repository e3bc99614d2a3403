//! # Groomy Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter
//! - Build the resilient payment gateway client
//! - Spawn the notification worker and the retention sweeper
//! - Start the HTTP server

mod config;

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use groomy_gateway::{TossClient, TossConfig};
use groomy_hex::{ReservationPaymentService, RetentionSweeper, inbound::HttpServer, notifier};
use groomy_repo::build_repo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,groomy_app=debug,groomy_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting reservation payments server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    // Resilient gateway client for the payment provider
    let mut toss_config = TossConfig::new(config.toss_secret_key.clone());
    toss_config.base_url = config.toss_base_url.clone();
    let gateway = TossClient::new(toss_config);

    // Notification worker consumes post-commit reservation events
    let (publisher, worker) = notifier::channel(repo.clone());
    tokio::spawn(worker.run());

    // Retention sweeper purges logically deleted payments past 30 days
    let sweeper = RetentionSweeper::new(
        repo.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    );
    tokio::spawn(sweeper.run());

    // Create the payment service
    let service = ReservationPaymentService::new(repo, gateway, publisher);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
