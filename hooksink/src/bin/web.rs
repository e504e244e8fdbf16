//! HookSink Web Server - logs every push it receives.
//!
//! Binds a logging push handler to `/build`. Configuration comes from the
//! environment (`HOOKSINK_ADDR` or `HOST`/`PORT`, and `HOOKSINK_SECRET`).

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hooksink::{async_trait, Config, HookSink, PushHandler, PushMessage, QueryParams};

/// Push handler that writes every event to the log.
struct Logger;

#[async_trait]
impl PushHandler for Logger {
    async fn push(&self, msg: PushMessage, params: QueryParams) {
        info!(
            repo_name = %msg.repository.repo_name,
            repo_url = %msg.repository.repo_url,
            pusher = %msg.push_data.pusher,
            images = ?msg.push_data.images,
            head_commit = %msg.head_commit.id,
            after = %msg.after,
            params = ?params,
            "push_received"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("hooksink_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        address = %config.addr,
        signature_verification = !config.secret.is_empty(),
        "config_loaded"
    );

    if config.secret.is_empty() {
        warn!("hooksink_secret_not_configured");
    }

    let mut sink = HookSink::new(config);

    // A bad registration must stop startup before anything is served
    sink.add("/build", Logger)
        .context("Failed to register /build handler")?;

    sink.start().await.context("Server error")?;

    Ok(())
}
