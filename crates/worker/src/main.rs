//! `relay-worker` -- extraction worker daemon.
//!
//! Attaches to the relay over WebSocket, runs the extraction binary on
//! every text it is handed, and posts the output (or an error) back to the
//! relay's HTTP API. See [`WorkerConfig::from_env`] for the environment
//! variables it reads.

use std::sync::Arc;

use relay_core::extractor::CommandExtractor;
use relay_worker::config::WorkerConfig;
use relay_worker::reporter::Reporter;
use relay_worker::session;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "relay_worker={level},relay_core={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        ws_url = %config.ws_url,
        api_url = %config.api_url,
        binary = %config.extractor.binary,
        model = %config.extractor.model,
        timeout_secs = config.extractor.timeout.as_secs(),
        "Starting relay-worker",
    );

    let reporter = Reporter::new(&config.api_url).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });
    let extractor = Arc::new(CommandExtractor::new(config.extractor.clone()));

    tokio::select! {
        () = session::run(&config.ws_url, extractor, Arc::new(reporter)) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
            tracing::info!("Shutdown requested, exiting");
        }
    }
}
