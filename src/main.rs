mod cli;

use crate::cli::{Cli, Workspace};
use anyhow::{Context, Result};
use clap::Parser;
use crewboard::config::BoardConfig;
use crewboard::session::{AppSession, DemoAuthenticator};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Delay the demo applies to loads and saves unless overridden.
const DEMO_LATENCY: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = BoardConfig::default().simulated_latency(DEMO_LATENCY);
    let overrides = BoardConfig::from_env().context("invalid CREWBOARD_* environment")?;
    if std::env::var_os(crewboard::config::ENV_LATENCY_MS).is_some() {
        config = config.simulated_latency(overrides.simulated_latency);
    }
    let config = config
        .page_size(overrides.page_size)
        .page_window(overrides.page_window)
        .data_dir(overrides.data_dir)
        .namespace(&overrides.namespace);

    let authenticator = DemoAuthenticator::new()?;
    let session = AppSession::login(&authenticator, &cli.user, &cli.password)
        .await
        .context("login failed")?;

    let workspace = Workspace::open(config, session)?;
    let outcome = workspace.run(cli.command).await;
    workspace.into_session().logout();
    outcome
}

fn init_tracing() {
    let filter = std::env::var("CREWBOARD_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("crewboard=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
