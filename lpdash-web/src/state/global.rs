//! Dashboard State
//!
//! Reactive state using Leptos signals. The updater writes through
//! [`DomView`]; the mounted components read the signals.

use chrono::{DateTime, Utc};
use leptos::*;
use lpdash::{DashboardView, KpiText, RefreshFailure, TransactionRow};

/// Everything the page shows
#[derive(Clone, Copy)]
pub struct DashboardState {
    /// Latest KPI text; `None` until the first snapshot arrives
    pub kpis: RwSignal<Option<KpiText>>,
    /// Latest table rows; `None` until a snapshot carries a list
    pub rows: RwSignal<Option<Vec<TransactionRow>>>,
    /// Failure shown by the status indicator
    pub error: RwSignal<Option<RefreshFailure>>,
    /// When a snapshot was last rendered
    pub last_update: RwSignal<Option<DateTime<Utc>>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            kpis: create_rw_signal(None),
            rows: create_rw_signal(None),
            error: create_rw_signal(None),
            last_update: create_rw_signal(None),
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// View that renders by updating [`DashboardState`]
pub struct DomView {
    state: DashboardState,
    table: bool,
}

impl DomView {
    pub fn new(state: DashboardState, table: bool) -> Self {
        Self { state, table }
    }
}

impl DashboardView for DomView {
    fn set_kpis(&mut self, kpis: &KpiText) {
        self.state.kpis.set(Some(kpis.clone()));
        self.state.last_update.set(Some(Utc::now()));
    }

    fn has_transaction_table(&self) -> bool {
        self.table
    }

    fn replace_transactions(&mut self, rows: &[TransactionRow]) {
        self.state.rows.set(Some(rows.to_vec()));
    }

    fn show_error(&mut self, failure: &RefreshFailure) {
        self.state.error.set(Some(failure.clone()));
    }

    fn clear_error(&mut self) {
        self.state.error.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpdash::BadgeStyle;

    fn row(kind: &str) -> TransactionRow {
        TransactionRow {
            timestamp: "2024/1/5 9:03:07".to_string(),
            kind: kind.to_string(),
            amount: "$1.00".to_string(),
            status: "success".to_string(),
            badge: BadgeStyle::Success,
        }
    }

    #[test]
    fn test_dom_view_writes_signals() {
        let state = DashboardState::new();
        let mut view = DomView::new(state, true);

        view.set_kpis(&KpiText {
            total_value: "$10.00".to_string(),
            ..Default::default()
        });
        view.replace_transactions(&[row("deposit"), row("swap")]);

        assert_eq!(
            state.kpis.get_untracked().map(|k| k.total_value),
            Some("$10.00".to_string())
        );
        assert_eq!(state.rows.get_untracked().map(|r| r.len()), Some(2));
        assert!(state.last_update.get_untracked().is_some());
    }

    #[test]
    fn test_error_cleared() {
        let state = DashboardState::new();
        let mut view = DomView::new(state, false);

        view.show_error(&RefreshFailure {
            message: "Request timeout".to_string(),
            code: "TIMEOUT",
            consecutive_failures: 1,
            at: Utc::now(),
        });
        assert!(state.error.get_untracked().is_some());

        view.clear_error();
        assert!(state.error.get_untracked().is_none());
        assert!(!view.has_transaction_table());
    }
}
