//! Development server for UI work
//!
//! Serves the in-memory recall API seeded with sample recalls, a user, a
//! subscription and a couple of tracked items, so the UI can be run
//! against something without the real backend.
//!
//! Usage: cargo run -p dev-server
//!
//! `IP_ADDRESS`, `PORT` and `ALLOWED_ORIGINS` (from the environment or a
//! `.env` file) override the defaults of 127.0.0.1, an OS-assigned port
//! and any origin.

use anyhow::Result;
use test_helpers::{Config, MockStore, mock::DevDataset, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber);

    info!("🚀 Starting recall API dev server");

    let mut config = Config::from_env()?;
    let store = MockStore::new();
    let dataset = DevDataset::create(&store);

    let server = test_helpers::build(&mut config, store)?;
    let handle = server.handle();
    let server = tokio::spawn(server);

    info!("✅ API server running on http://{}:{}", config.ip, config.port);
    info!(
        "   UI:  cd ui && BACKEND_URL=http://{}:{} trunk serve",
        config.ip, config.port
    );
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    handle.stop(true).await;
    if let Err(e) = server.await? {
        telemetry::log_error(e);
    }
    Ok(())
}
