//! lpdash CLI
//!
//! Terminal front end for the liquidity-pool dashboard:
//! - Watch the dashboard, refreshing on an interval
//! - Fetch it once (table or raw JSON)
//! - Generate a default config file
//!
//! # Configuration
//!
//! Settings come from the first config file found (see `lpdash config`),
//! then `LPDASH_*` environment variables, then command-line flags.
//! `RUST_LOG` overrides the configured log level.

use clap::{Parser, Subcommand, ValueEnum};
use lpdash::chart::MemoryChart;
use lpdash::config::{generate_default_config, Config, LoggingConfig};
use lpdash::{
    AppContext, ChartHandle, ConsoleView, DashboardClient, DashboardUpdater, RefreshOutcome,
    SharedContext,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "lpdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live dashboard for a liquidity-pool monitoring API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Monitoring API base URL
    #[arg(long, global = true)]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the dashboard and render every update
    Watch {
        /// Seconds between refreshes
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Fetch the dashboard once
    Once {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = generate_default_config();
        match output {
            Some(path) => {
                // Create parent directory if needed
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => {
                print!("{}", config);
            }
        }
        return Ok(());
    }

    let loaded = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    let mut config = loaded.config.clone();
    if let Some(url) = &cli.url {
        config.poller.base_url = url.clone();
    }
    if let Commands::Watch { interval: Some(secs) } = &cli.command {
        config.poller.interval_secs = *secs;
    }

    init_logging(&config.logging);
    loaded.log();
    config.validate()?;

    tracing::info!("lpdash v{}", env!("CARGO_PKG_VERSION"));

    let client = DashboardClient::new(config.client_config())?;
    tracing::info!(url = client.url(), "Dashboard endpoint");

    match cli.command {
        Commands::Watch { .. } => watch(&config, client).await,
        Commands::Once {
            format: OutputFormat::Json,
        } => {
            let body = client.fetch_raw().await.map_err(|e| {
                tracing::error!(error_code = e.code(), "Dashboard fetch failed: {}", e);
                e
            })?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Commands::Once {
            format: OutputFormat::Table,
        } => once(&config, client).await,
        Commands::Config { .. } => Ok(()),
    }
}

/// Initialize tracing from the logging config; `RUST_LOG` wins when set
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lpdash={}", logging.level)));

    // Logs go to stderr so stdout only carries the dashboard
    let (json, pretty) = if logging.is_json() {
        (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
}

fn chart_context() -> (Arc<MemoryChart>, SharedContext) {
    let chart = Arc::new(MemoryChart::new());
    let handle: Arc<dyn ChartHandle + Send + Sync> = chart.clone();
    (chart, AppContext::with_revenue_chart(handle))
}

async fn watch(config: &Config, client: DashboardClient) -> Result<(), Box<dyn std::error::Error>> {
    let (chart, context) = chart_context();
    let updater = DashboardUpdater::new(
        client,
        ConsoleView::stdout(),
        context,
        config.updater_config()?,
    );

    let handle = updater.start();
    shutdown_signal().await;
    updater.stop();

    // Aborted tasks resolve with a cancellation error
    let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;

    let status = updater.status().await;
    tracing::info!(
        attempts = status.attempts,
        applied = status.applied,
        failures = status.failures,
        skipped = status.skipped,
        superseded = status.superseded,
        chart = %chart.summary(),
        "Watch finished"
    );
    Ok(())
}

async fn once(config: &Config, client: DashboardClient) -> Result<(), Box<dyn std::error::Error>> {
    let (chart, context) = chart_context();
    let updater = DashboardUpdater::new(
        client,
        ConsoleView::stdout(),
        context,
        config.updater_config()?,
    );

    match updater.refresh().await {
        RefreshOutcome::Applied { .. } => {
            if chart.update_count() > 0 {
                println!();
                println!("Revenue chart: {}", chart.summary());
            }
            Ok(())
        }
        RefreshOutcome::Failed { error, .. } => Err(error.into()),
        other => Err(format!("Refresh did not complete: {:?}", other).into()),
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping");
}
