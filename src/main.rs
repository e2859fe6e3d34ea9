//! Fleet HTTP server binary entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleet::UnitRepository;
use fleet::clock::SystemClock;
use fleet::server::{CliArgs, FleetServer, FleetServerConfig};
use fleet::store::create_store;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();

    let store_config = args.to_store_config();
    let server_config = FleetServerConfig::from(&args);

    tracing::info!("Opening store with config: {:?}", store_config);

    // Open the store
    let clock = Arc::new(SystemClock);
    let store = create_store(&store_config.storage, clock.clone())
        .await
        .expect("Failed to open store");
    let repo = Arc::new(UnitRepository::new(store, clock));

    // Create and run the server
    let server = FleetServer::new(repo, server_config);
    server.run().await;
}
