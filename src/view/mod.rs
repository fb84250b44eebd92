//! Dashboard Views
//!
//! The seam between the updater and whatever displays the dashboard.
//!
//! - [`ConsoleView`]: terminal rendering for the `lpdash` binary
//! - [`MemoryView`]: records what was rendered, for headless checks
//!
//! The browser front end implements the same trait over DOM bindings.

mod console;

pub use console::ConsoleView;

use crate::refresh::RefreshFailure;
use crate::render::{KpiText, TransactionRow};

/// A surface the updater renders snapshots into
pub trait DashboardView {
    /// Update the KPI text fields
    fn set_kpis(&mut self, kpis: &KpiText);

    /// Whether a transaction table is bound
    fn has_transaction_table(&self) -> bool;

    /// Replace the whole table contents with `rows`
    fn replace_transactions(&mut self, rows: &[TransactionRow]);

    /// Show the "update failed" indicator. Previously rendered data stays.
    fn show_error(&mut self, failure: &RefreshFailure);

    /// Hide the "update failed" indicator
    fn clear_error(&mut self);
}

/// View that just keeps the last rendered state
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    pub kpis: Option<KpiText>,
    pub rows: Option<Vec<TransactionRow>>,
    pub error: Option<RefreshFailure>,
    table: bool,
}

impl MemoryView {
    pub fn new() -> Self {
        Self {
            table: true,
            ..Default::default()
        }
    }

    /// A view with no transaction table bound
    pub fn without_table() -> Self {
        Self::default()
    }
}

impl DashboardView for MemoryView {
    fn set_kpis(&mut self, kpis: &KpiText) {
        self.kpis = Some(kpis.clone());
    }

    fn has_transaction_table(&self) -> bool {
        self.table
    }

    fn replace_transactions(&mut self, rows: &[TransactionRow]) {
        self.rows = Some(rows.to_vec());
    }

    fn show_error(&mut self, failure: &RefreshFailure) {
        self.error = Some(failure.clone());
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}
