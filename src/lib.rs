//! # lpdash
//!
//! Live dashboard client for a liquidity-pool monitoring API. Polls the
//! dashboard endpoint on a fixed interval and renders the portfolio KPIs,
//! the revenue chart and the recent transaction table.
//!
//! ## Modules
//!
//! - [`snapshot`]: the dashboard payload as served by the API
//! - [`format`]: currency, percentage and timestamp formatting
//! - [`render`]: turns a snapshot into text and applies it to a view
//! - [`view`]: the rendering seam plus terminal and in-memory views
//! - [`chart`]: the chart handle seam and the application context
//! - [`refresh`]: overlap guard, refresh status and the shared settle step
//! - [`client`]: reqwest-based snapshot source (`native` feature)
//! - [`updater`]: tokio poll loop (`native` feature)
//! - [`config`]: TOML config with environment overrides (`native` feature)
//!
//! Everything outside the `native` modules is runtime-agnostic and is shared
//! with the browser front end.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lpdash::{AppContext, ClientConfig, ConsoleView, DashboardClient, DashboardUpdater, UpdaterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DashboardClient::new(ClientConfig::new("http://localhost:5000"))?;
//!     let updater = DashboardUpdater::new(
//!         client,
//!         ConsoleView::stdout(),
//!         AppContext::new(),
//!         UpdaterConfig::default(),
//!     );
//!
//!     // One refresh now, then one every 30 seconds
//!     let handle = updater.start();
//!     tokio::signal::ctrl_c().await?;
//!     updater.stop();
//!     let _ = handle.await;
//!
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod error;
pub mod format;
pub mod refresh;
pub mod render;
pub mod snapshot;
pub mod view;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod updater;

// Re-export top-level types for convenience
pub use snapshot::{DashboardSnapshot, DASHBOARD_ENDPOINT, TimestampValue, Transaction, TransactionStatus};

pub use format::{format_currency, format_percent, format_timestamp, DisplayOptions, DisplayZone};

pub use render::{apply_snapshot, ApplyReport, BadgeStyle, KpiText, TransactionRow};

pub use view::{ConsoleView, DashboardView, MemoryView};

pub use chart::{AppContext, ChartError, ChartHandle, MemoryChart, SharedContext};

pub use refresh::{
    settle, OverlapPolicy, RefreshFailure, RefreshGuard, RefreshOutcome, RefreshStatus,
    RefreshTicket,
};

pub use error::{FetchError, FetchResult};

#[cfg(feature = "native")]
pub use client::{ClientConfig, DashboardClient, SnapshotSource};

#[cfg(feature = "native")]
pub use updater::{DashboardUpdater, UpdaterConfig};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LoadedConfig, LoggingConfig};
