//! Stellar Forge API Server
//!
//! Run with: cargo run --bin stellar-forge -- --config config.toml
//!
//! Configuration is read from the given file or the default locations, with
//! `STELLAR_FORGE_*` environment overrides (see `stellar_forge::config`).
//! `RUST_LOG` takes precedence over the configured log level.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use stellar_forge::api::{serve, AppState};
use stellar_forge::config::{Config, LoggingConfig};
use stellar_forge::store::WaitlistStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "stellar-forge")]
#[command(about = "Stellar Forge waitlist server", version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::resolve(args.config.as_deref())?;

    init_tracing(&config.logging);

    tracing::info!("Starting Stellar Forge server v{}", env!("CARGO_PKG_VERSION"));

    let store_config = config.store.to_store_config();
    tracing::info!("Data directory: {:?}", store_config.data_dir);

    let store = Arc::new(WaitlistStore::open(&store_config)?);
    match store.stats().await {
        Ok(stats) => tracing::info!("Waitlist: {}", stats),
        Err(e) => tracing::warn!("Could not read waitlist stats: {}", e),
    }

    let admin = config.admin.credentials();
    if !admin.is_enabled() {
        tracing::warn!("No admin code configured; admin dashboard is disabled");
    }

    let api_config = config.api.to_server_config();
    let state = AppState::with_ws_config(
        Arc::clone(&store),
        api_config.clone(),
        admin,
        config.realtime.to_hub_config(),
    );

    serve(state, &api_config).await?;

    tracing::info!(
        "Stellar Forge server stopped ({} live queries still open)",
        store.active_listeners()
    );
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stellar_forge={},tower_http=info",
            logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
