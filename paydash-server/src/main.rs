//! PayDash Server
//!
//! Contractor dashboard backend: payroll claims, USDC offramp, and a
//! stablecoin-funded virtual card, plus the card-issuer proxy routes.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, get_database_url};
use paydash_core::config::ConfigStore;
use paydash_core::flows::{Dashboard, DashboardDeps};
use paydash_core::issuing::IssuerProcessor;
use paydash_core::processors::BalancePollerConfig;
use paydash_core::store::{KeyValueStore, MemoryStore, PgStore};
use paydash_sdk::client::{IssuerClient, WalletClient};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Timeout applied to every outbound API call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

/// PayDash - contractor payroll, offramp and virtual card dashboard
#[derive(Parser, Debug)]
#[command(name = "paydash-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./paydash-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting paydash-server v{}", env!("CARGO_PKG_VERSION"));

    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let (store, db_pool) = open_store(args.migrate).await?;

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let issuer = IssuerClient::new(
        loaded_config.issuer.base_url.clone(),
        loaded_config.issuer.api_key.clone(),
    )
    .with_http_client(http.clone());
    let issuing = Arc::new(
        IssuerProcessor::new(Arc::new(issuer), store)
            .with_card_limit(loaded_config.issuer.card_limit_cents),
    );

    let wallet = WalletClient::new(
        loaded_config.wallet.base_url.clone(),
        loaded_config.wallet.api_key.clone(),
        loaded_config.wallet.address.clone(),
        loaded_config.wallet.chain.clone(),
        loaded_config.wallet.token.clone(),
    )
    .with_http_client(http.clone());
    tracing::info!(wallet = %loaded_config.wallet.address, "Wallet client ready");

    let dashboard_config = ConfigStore::new(loaded_config.dashboard);
    let chain_id = loaded_config.issuer.chain_id;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let dashboard = Arc::new(Dashboard::start(
        DashboardDeps {
            wallet: Arc::new(wallet),
            issuing: issuing.clone(),
            config: dashboard_config.clone(),
            chain_id,
            owner_email: loaded_config.wallet.owner_email,
            http,
        },
        BalancePollerConfig::default(),
        shutdown_rx,
    ));

    let state = AppState::new(issuing, dashboard, chain_id);

    // Spawn config reload handler (listens for SIGHUP)
    let reload_notify = spawn_config_reload_handler(config_loader, dashboard_config);

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    reload_notify.notify_one();
    let _ = shutdown_tx.send(true);

    if let Some(pool) = db_pool {
        tracing::info!("Closing database connections...");
        pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Pick the key-value backend: PostgreSQL when `DATABASE_URL` is set,
/// memory otherwise.
async fn open_store(migrate: bool) -> anyhow::Result<(Arc<dyn KeyValueStore>, Option<PgPool>)> {
    let Some(database_url) = get_database_url() else {
        if migrate {
            tracing::warn!("--migrate ignored: DATABASE_URL is not set");
        }
        tracing::info!("DATABASE_URL not set, using the in-memory store");
        return Ok((Arc::new(MemoryStore::new()), None));
    };

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    if migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    Ok((Arc::new(PgStore::new(db_pool.clone())), Some(db_pool)))
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
