use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfolio::config::Config;
use portfolio::{ContentClient, PortfolioSession};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the rendered page.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting portfolio client v{}", env!("CARGO_PKG_VERSION"));

    let client = ContentClient::new(config.backend_url.clone())
        .context("Failed to build content service client")?;
    info!("Content service: {}", client.base_url());

    let session = PortfolioSession::mount(Arc::new(client));

    // No request timeout: a hung load keeps its section pending until Ctrl-C.
    let view = tokio::select! {
        view = session.settled() => view,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted before all content arrived; rendering what is ready");
            session.view()
        }
    };

    println!("{view}");
    session.unmount();

    Ok(())
}
