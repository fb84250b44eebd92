//! Refresh Coordination
//!
//! Keeps overlapping polls from racing each other. Every refresh takes a
//! [`RefreshTicket`] from the [`RefreshGuard`]; a response is only applied
//! when its ticket is newer than the last one applied, so a slow response
//! can never overwrite fresher data.
//!
//! Runtime-agnostic: the native updater and the browser poller both drive
//! the same guard and call [`settle`] once their fetch completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::chart::ChartHandle;
use crate::error::FetchError;
use crate::format::DisplayOptions;
use crate::render::{apply_snapshot, ApplyReport};
use crate::snapshot::DashboardSnapshot;
use crate::view::DashboardView;

/// What to do when a tick fires while a refresh is still in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Skip the tick
    #[default]
    Skip,
    /// Issue a new refresh; the older one is superseded
    Replace,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(OverlapPolicy::Skip),
            "replace" => Ok(OverlapPolicy::Replace),
            other => Err(format!("unknown overlap policy '{}' (expected skip or replace)", other)),
        }
    }
}

#[derive(Debug, Default)]
struct GuardState {
    next_seq: AtomicU64,
    latest_issued: AtomicU64,
    last_applied: AtomicU64,
    in_flight: AtomicUsize,
}

/// Issues tickets and decides which responses may be applied
#[derive(Debug, Clone)]
pub struct RefreshGuard {
    policy: OverlapPolicy,
    state: Arc<GuardState>,
}

/// One refresh attempt. Dropping it releases the in-flight slot.
#[derive(Debug)]
pub struct RefreshTicket {
    seq: u64,
    state: Arc<GuardState>,
}

impl RefreshTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for RefreshTicket {
    fn drop(&mut self) {
        self.state.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl RefreshGuard {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            state: Arc::new(GuardState::default()),
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Number of refreshes currently in flight
    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::Acquire)
    }

    /// Sequence number of the last applied response (0 if none)
    pub fn last_applied(&self) -> u64 {
        self.state.last_applied.load(Ordering::Acquire)
    }

    /// Start a refresh, or `None` if the policy says to skip this tick
    pub fn try_begin(&self) -> Option<RefreshTicket> {
        match self.policy {
            OverlapPolicy::Skip => {
                self.state
                    .in_flight
                    .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
                    .ok()?;
            }
            OverlapPolicy::Replace => {
                self.state.in_flight.fetch_add(1, Ordering::AcqRel);
            }
        }

        let seq = self.state.next_seq.fetch_add(1, Ordering::AcqRel) + 1;
        self.state.latest_issued.fetch_max(seq, Ordering::AcqRel);

        Some(RefreshTicket {
            seq,
            state: Arc::clone(&self.state),
        })
    }

    /// Whether a response for `ticket` would still be applied
    pub fn is_current(&self, ticket: &RefreshTicket) -> bool {
        if ticket.seq <= self.state.last_applied.load(Ordering::Acquire) {
            return false;
        }
        match self.policy {
            OverlapPolicy::Skip => true,
            OverlapPolicy::Replace => ticket.seq == self.state.latest_issued.load(Ordering::Acquire),
        }
    }

    /// Mark `ticket` as applied. Returns false if it has been superseded.
    ///
    /// Callers serialize `commit` and the render that follows (the view
    /// lock natively, the single thread in the browser).
    pub fn commit(&self, ticket: &RefreshTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state.last_applied.fetch_max(ticket.seq, Ordering::AcqRel);
        true
    }
}

/// A failed refresh as shown by the error indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshFailure {
    pub message: String,
    pub code: &'static str,
    pub consecutive_failures: u32,
    pub at: DateTime<Utc>,
}

/// Running counters for the poll loop
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshStatus {
    /// Refreshes that issued a request
    pub attempts: u64,
    pub applied: u64,
    pub failures: u64,
    pub consecutive_failures: u32,
    pub skipped: u64,
    pub superseded: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl RefreshStatus {
    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_superseded(&mut self) {
        self.superseded += 1;
    }

    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.applied += 1;
        self.consecutive_failures = 0;
        self.last_success = Some(at);
    }

    pub fn record_failure(&mut self, error: &FetchError, at: DateTime<Utc>) -> RefreshFailure {
        self.failures += 1;
        self.consecutive_failures += 1;
        self.last_error = Some(error.to_string());

        RefreshFailure {
            message: error.to_string(),
            code: error.code(),
            consecutive_failures: self.consecutive_failures,
            at,
        }
    }
}

/// Result of one refresh
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Snapshot rendered
    Applied { seq: u64, report: ApplyReport },
    /// Another refresh was in flight; nothing was requested
    Skipped,
    /// A newer refresh was issued or applied first; response dropped
    Superseded { seq: u64 },
    /// Fetch failed; the view shows the error, previous data stays
    Failed { seq: u64, error: FetchError },
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

/// Settle a finished fetch: apply it, drop it as stale, or report the error.
pub fn settle<V, C>(
    guard: &RefreshGuard,
    ticket: RefreshTicket,
    fetched: Result<DashboardSnapshot, FetchError>,
    view: &mut V,
    chart: Option<&C>,
    status: &mut RefreshStatus,
    options: &DisplayOptions,
) -> RefreshOutcome
where
    V: DashboardView + ?Sized,
    C: ChartHandle + ?Sized,
{
    let seq = ticket.seq();

    match fetched {
        Ok(snapshot) => {
            if !guard.commit(&ticket) {
                status.record_superseded();
                tracing::debug!(seq, "Dropping superseded dashboard response");
                return RefreshOutcome::Superseded { seq };
            }

            let report = apply_snapshot(&snapshot, view, chart, options);
            if status.consecutive_failures > 0 {
                view.clear_error();
            }
            status.record_success(Utc::now());

            tracing::info!(
                seq,
                transactions = snapshot.transaction_count(),
                chart = ?report.chart,
                "Dashboard refreshed"
            );
            RefreshOutcome::Applied { seq, report }
        }
        Err(error) => {
            if !guard.is_current(&ticket) {
                status.record_superseded();
                tracing::debug!(seq, error = %error, "Ignoring failure of superseded refresh");
                return RefreshOutcome::Superseded { seq };
            }

            let failure = status.record_failure(&error, Utc::now());
            tracing::warn!(
                seq,
                error_code = failure.code,
                consecutive_failures = failure.consecutive_failures,
                error = %error,
                "Dashboard refresh failed"
            );
            view.show_error(&failure);
            RefreshOutcome::Failed { seq, error }
        }
    }
}
