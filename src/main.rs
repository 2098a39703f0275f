//! Order Analytics Dashboard
//!
//! Loads an e-commerce order-line dataset once at startup and serves:
//! - KPI summary (revenue, orders, customers, delivery and review means)
//! - Top categories by revenue
//! - Delivery duration by review score
//! - Delivery-date range filtering

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use api::{router, AppState};
use dashboard_core::limits::DEFAULT_TOP_N;
use pipeline::{Dashboard, DashboardView, LogView};
use record_loader::{source_from_config, LoaderConfig};
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Categories in the revenue ranking when a request does not say
    #[serde(default = "default_top_n")]
    default_top_n: usize,

    #[serde(default)]
    loader: LoaderConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_top_n: default_top_n(),
            loader: LoaderConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Order Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config()?;

    // A locator on the command line wins over every other source
    if let Some(locator) = std::env::args().nth(1) {
        config.loader.source = locator;
    }

    info!(
        source = %config.loader.source,
        fetch_timeout_secs = config.loader.fetch_timeout_secs,
        "Loaded configuration"
    );

    if config.default_top_n == 0 {
        anyhow::bail!("default_top_n must be at least 1");
    }

    // Load failures are fatal: no partial dashboard
    let source = source_from_config(&config.loader).context("Invalid data source")?;
    let dashboard = Dashboard::bootstrap(source.as_ref())
        .await
        .context("Failed to load order dataset")?;

    // Render the unfiltered dashboard once so the log shows what was loaded
    let mut view = LogView;
    match dashboard.run(None, config.default_top_n) {
        Ok(snapshot) => view.render(&snapshot),
        Err(e) => view.render_error(&e),
    }

    let state = AppState::new(dashboard, config.default_top_n);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("DASHBOARD")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat aliases for the nested loader settings
    if let Ok(source) = std::env::var("DASHBOARD_SOURCE") {
        config.loader.source = source;
    }
    if let Ok(timeout) = std::env::var("DASHBOARD_FETCH_TIMEOUT_SECS") {
        config.loader.fetch_timeout_secs = timeout
            .trim()
            .parse()
            .context("DASHBOARD_FETCH_TIMEOUT_SECS must be an integer")?;
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
