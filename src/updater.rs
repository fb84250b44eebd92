//! Dashboard Updater
//!
//! Polls the snapshot source on a fixed interval and renders each response.
//! The first refresh runs immediately, then one per interval until stopped.
//! Every refresh runs in its own task so a slow request never holds up the
//! timer, and a failed refresh never ends the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::MissedTickBehavior;

use crate::chart::SharedContext;
use crate::client::SnapshotSource;
use crate::format::DisplayOptions;
use crate::refresh::{settle, OverlapPolicy, RefreshGuard, RefreshOutcome, RefreshStatus};
use crate::view::DashboardView;

/// Default poll interval
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for the poll loop
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Time between refreshes
    pub interval: Duration,
    /// What to do with ticks that overlap an in-flight refresh
    pub overlap: OverlapPolicy,
    /// Formatting applied to every snapshot
    pub display: DisplayOptions,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            overlap: OverlapPolicy::default(),
            display: DisplayOptions::default(),
        }
    }
}

/// Keeps a view in sync with the dashboard API
pub struct DashboardUpdater<S, V> {
    source: Arc<S>,
    view: Arc<Mutex<V>>,
    context: SharedContext,
    guard: RefreshGuard,
    status: Arc<RwLock<RefreshStatus>>,
    config: Arc<UpdaterConfig>,
    running: Arc<AtomicBool>,
    loop_task: Arc<std::sync::Mutex<Option<AbortHandle>>>,
    current: Arc<std::sync::Mutex<Option<AbortHandle>>>,
}

impl<S, V> Clone for DashboardUpdater<S, V> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            view: Arc::clone(&self.view),
            context: self.context.clone(),
            guard: self.guard.clone(),
            status: Arc::clone(&self.status),
            config: Arc::clone(&self.config),
            running: Arc::clone(&self.running),
            loop_task: Arc::clone(&self.loop_task),
            current: Arc::clone(&self.current),
        }
    }
}

impl<S, V> DashboardUpdater<S, V>
where
    S: SnapshotSource + 'static,
    V: DashboardView + Send + 'static,
{
    /// Create an updater; nothing is fetched until `refresh` or `start`
    pub fn new(source: S, view: V, context: SharedContext, config: UpdaterConfig) -> Self {
        Self {
            source: Arc::new(source),
            view: Arc::new(Mutex::new(view)),
            context,
            guard: RefreshGuard::new(config.overlap),
            status: Arc::new(RwLock::new(RefreshStatus::default())),
            config: Arc::new(config),
            running: Arc::new(AtomicBool::new(false)),
            loop_task: Arc::new(std::sync::Mutex::new(None)),
            current: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Shared handle to the view
    pub fn view(&self) -> Arc<Mutex<V>> {
        Arc::clone(&self.view)
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Snapshot of the loop counters
    pub async fn status(&self) -> RefreshStatus {
        self.status.read().await.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Fetch the latest snapshot and render it
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(ticket) = self.guard.try_begin() else {
            self.status.write().await.record_skipped();
            tracing::debug!("Refresh still in flight, skipping tick");
            return RefreshOutcome::Skipped;
        };
        self.status.write().await.record_attempt();

        let fetched = self.source.fetch_snapshot().await;

        // Lock order: view, then status
        let mut view = self.view.lock().await;
        let mut status = self.status.write().await;
        settle(
            &self.guard,
            ticket,
            fetched,
            &mut *view,
            self.context.revenue_chart(),
            &mut status,
            &self.config.display,
        )
    }

    /// Start the background poll loop
    pub fn start(&self) -> JoinHandle<()> {
        let updater = self.clone();
        self.running.store(true, Ordering::Release);

        tracing::info!(
            interval_secs = self.config.interval.as_secs_f64(),
            overlap = ?self.config.overlap,
            chart = self.context.has_chart(),
            "Starting dashboard poll loop"
        );

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(updater.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                // First tick completes immediately
                ticker.tick().await;

                if !updater.is_running() {
                    break;
                }

                updater.spawn_refresh();
            }
        });

        if let Ok(mut slot) = self.loop_task.lock() {
            if let Some(previous) = slot.replace(handle.abort_handle()) {
                previous.abort();
            }
        }

        handle
    }

    /// Stop the loop and abandon any in-flight refresh
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);

        for slot in [&self.loop_task, &self.current] {
            if let Ok(mut slot) = slot.lock() {
                if let Some(handle) = slot.take() {
                    handle.abort();
                }
            }
        }

        tracing::info!("Dashboard poll loop stopped");
    }

    fn spawn_refresh(&self) {
        let updater = self.clone();
        let handle = tokio::spawn(async move {
            updater.refresh().await;
        });

        let Ok(mut current) = self.current.lock() else {
            return;
        };
        let previous = current.replace(handle.abort_handle());

        // Cancel-and-replace: the older request will never be applied anyway
        if self.config.overlap == OverlapPolicy::Replace {
            if let Some(previous) = previous {
                previous.abort();
            }
        }
    }
}
