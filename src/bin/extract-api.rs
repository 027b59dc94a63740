#[path = "extract-api/args.rs"]
mod args;
#[path = "extract-api/logging.rs"]
mod logging;

use anyhow::Context;
use clap::Parser;

use extract_api::api::{self, ServerState};
use extract_api::config::load_config;

use args::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let loaded = load_config(args.config.as_deref())?;
    let mut config = loaded.config;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let _logger = logging::init_logging(&config.logging)?;
    if loaded.config_exists {
        log::info!("loaded config from {}", loaded.path.display());
    } else {
        log::info!("no config at {}, using defaults", loaded.path.display());
    }

    let state = ServerState::from_config(&config)?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    log::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {err}");
        return;
    }
    log::info!("shutting down");
}
