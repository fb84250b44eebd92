//! Render Plan
//!
//! Converts a snapshot into display strings and applies them to a view in
//! a fixed order: KPI fields, then the chart, then the transaction table.

use serde::Serialize;

use crate::chart::ChartHandle;
use crate::format::{format_percent, DisplayOptions};
use crate::snapshot::{DashboardSnapshot, Transaction};
use crate::view::DashboardView;

/// Text for every KPI field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiText {
    pub total_value: String,
    pub total_fees: String,
    pub roi: String,
    pub total_investment: Option<String>,
    pub total_gas: Option<String>,
    pub net_profit: Option<String>,
}

impl KpiText {
    pub fn from_snapshot(snapshot: &DashboardSnapshot, options: &DisplayOptions) -> Self {
        Self {
            total_value: options.currency(snapshot.total_value),
            total_fees: options.abs_currency(snapshot.total_fees),
            roi: format_percent(snapshot.roi),
            total_investment: snapshot.total_investment.map(|v| options.currency(v)),
            total_gas: snapshot.total_gas.map(|v| options.currency(v)),
            net_profit: snapshot.net_profit.map(|v| options.currency(v)),
        }
    }
}

/// Visual style of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStyle {
    Success,
    Failure,
}

impl BadgeStyle {
    /// Bootstrap class used by the page
    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeStyle::Success => "bg-success",
            BadgeStyle::Failure => "bg-danger",
        }
    }
}

/// One formatted table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    pub timestamp: String,
    pub kind: String,
    pub amount: String,
    pub status: String,
    pub badge: BadgeStyle,
}

impl TransactionRow {
    pub fn from_transaction(tx: &Transaction, options: &DisplayOptions) -> Self {
        let badge = if tx.status.is_success() {
            BadgeStyle::Success
        } else {
            BadgeStyle::Failure
        };

        Self {
            timestamp: options.timestamp(&tx.timestamp),
            kind: tx.kind.clone(),
            amount: options.currency(tx.amount),
            status: tx.status.label().to_string(),
            badge,
        }
    }
}

/// Format every transaction in order
pub fn transaction_rows(transactions: &[Transaction], options: &DisplayOptions) -> Vec<TransactionRow> {
    transactions
        .iter()
        .map(|tx| TransactionRow::from_transaction(tx, options))
        .collect()
}

/// What happened to the chart during an apply
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ChartStep {
    Updated,
    /// No chart handle, or no chart data in the snapshot
    Skipped,
    Failed { error: String },
}

/// What happened to the transaction table during an apply
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TableStep {
    Replaced { rows: usize },
    /// No table bound, or no transaction list in the snapshot
    Skipped,
}

/// Summary of one apply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyReport {
    pub chart: ChartStep,
    pub table: TableStep,
}

/// Apply `snapshot` to `view` and `chart`.
///
/// A chart failure is recorded but does not stop the table update.
pub fn apply_snapshot<V, C>(
    snapshot: &DashboardSnapshot,
    view: &mut V,
    chart: Option<&C>,
    options: &DisplayOptions,
) -> ApplyReport
where
    V: DashboardView + ?Sized,
    C: ChartHandle + ?Sized,
{
    view.set_kpis(&KpiText::from_snapshot(snapshot, options));

    let chart_step = match (chart, snapshot.revenue_chart_data.as_ref()) {
        (Some(chart), Some(data)) => match chart.set_data(data) {
            Ok(()) => ChartStep::Updated,
            Err(e) => {
                tracing::warn!(error = %e, "Revenue chart update failed");
                ChartStep::Failed {
                    error: e.to_string(),
                }
            }
        },
        _ => ChartStep::Skipped,
    };

    let table_step = match snapshot.recent_transactions.as_deref() {
        Some(transactions) if view.has_transaction_table() => {
            let rows = transaction_rows(transactions, options);
            view.replace_transactions(&rows);
            TableStep::Replaced { rows: rows.len() }
        }
        _ => TableStep::Skipped,
    };

    ApplyReport {
        chart: chart_step,
        table: table_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartError, MemoryChart};
    use crate::snapshot::{TimestampValue, TransactionStatus};
    use crate::view::MemoryView;
    use chrono::FixedOffset;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    struct BrokenChart;

    impl ChartHandle for BrokenChart {
        fn set_data(&self, _data: &serde_json::Value) -> Result<(), ChartError> {
            Err(ChartError::Rejected("canvas detached".to_string()))
        }
    }

    fn options() -> DisplayOptions {
        DisplayOptions::with_offset(FixedOffset::east_opt(0).unwrap())
    }

    fn snapshot(json: &str) -> DashboardSnapshot {
        serde_json::from_str(json).unwrap()
    }

    fn tx(status: &str) -> Transaction {
        Transaction {
            timestamp: TimestampValue::Text("2024-01-05T09:03:07Z".to_string()),
            kind: "deposit".to_string(),
            amount: Decimal::from_str("10").unwrap(),
            status: TransactionStatus::from(status),
        }
    }

    #[test]
    fn test_kpi_text() {
        let snap = snapshot(r#"{"total_value": 1234.5, "total_fees": -42.315, "roi": 7.05}"#);
        let kpis = KpiText::from_snapshot(&snap, &options());

        assert_eq!(kpis.total_value, "$1234.50");
        assert_eq!(kpis.total_fees, "$42.32");
        assert_eq!(kpis.roi, "7.1%");
        assert_eq!(kpis.total_investment, None);
    }

    #[test]
    fn test_success_row() {
        let row = TransactionRow::from_transaction(&tx("success"), &options());
        assert_eq!(row.timestamp, "2024/1/5 9:03:07");
        assert_eq!(row.kind, "deposit");
        assert_eq!(row.amount, "$10.00");
        assert_eq!(row.badge, BadgeStyle::Success);
        assert_eq!(row.badge.css_class(), "bg-success");
    }

    #[test]
    fn test_any_other_status_is_failure() {
        for status in ["failed", "pending", "SUCCESS", ""] {
            let row = TransactionRow::from_transaction(&tx(status), &options());
            assert_eq!(row.badge, BadgeStyle::Failure, "status {:?}", status);
            assert_eq!(row.status, status);
        }
    }

    #[test]
    fn test_apply_single_transaction() {
        let snap = snapshot(
            r#"{"total_value": 1, "total_fees": 0, "roi": 0, "recent_transactions": [
                {"timestamp": "2024-01-05T09:03:07Z", "type": "deposit", "amount": 10, "status": "success"}
            ]}"#,
        );
        let mut view = MemoryView::new();
        let chart = MemoryChart::new();

        let report = apply_snapshot(&snap, &mut view, Some(&chart), &options());

        assert_eq!(report.table, TableStep::Replaced { rows: 1 });
        let rows = view.rows.as_ref().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].badge, BadgeStyle::Success);
        assert_eq!(rows[0].amount, "$10.00");
    }

    #[test]
    fn test_apply_with_unusable_timestamps() {
        let snap = snapshot(
            r#"{"total_value": 5, "total_fees": 0, "roi": 0, "recent_transactions": [
                {"timestamp": null, "type": "swap", "amount": 1, "status": "success"},
                {"type": "deposit", "amount": 2, "status": "failed"}
            ]}"#,
        );
        let mut view = MemoryView::new();

        let report = apply_snapshot(&snap, &mut view, None::<&MemoryChart>, &options());

        assert_eq!(report.table, TableStep::Replaced { rows: 2 });
        assert_eq!(view.kpis.as_ref().unwrap().total_value, "$5.00");
        let rows = view.rows.as_ref().unwrap();
        assert_eq!(rows[0].timestamp, "Invalid Date");
        assert_eq!(rows[1].timestamp, "Invalid Date");
        assert_eq!(rows[1].amount, "$2.00");
    }

    #[test]
    fn test_apply_without_chart_data_skips_chart() {
        let snap = snapshot(r#"{"total_value": 1, "total_fees": 0, "roi": 0}"#);
        let mut view = MemoryView::new();
        let chart = MemoryChart::new();

        let report = apply_snapshot(&snap, &mut view, Some(&chart), &options());

        assert_eq!(report.chart, ChartStep::Skipped);
        assert_eq!(chart.update_count(), 0);
    }

    #[test]
    fn test_apply_without_chart_handle_skips_chart() {
        let snap = snapshot(r#"{"total_value": 1, "total_fees": 0, "roi": 0, "revenue_chart_data": [1, 2]}"#);
        let mut view = MemoryView::new();

        let report = apply_snapshot::<_, MemoryChart>(&snap, &mut view, None, &options());
        assert_eq!(report.chart, ChartStep::Skipped);
    }

    #[test]
    fn test_chart_failure_does_not_block_table() {
        let snap = snapshot(
            r#"{"total_value": 1, "total_fees": 0, "roi": 0, "revenue_chart_data": [1],
                "recent_transactions": []}"#,
        );
        let mut view = MemoryView::new();

        let report = apply_snapshot(&snap, &mut view, Some(&BrokenChart), &options());

        assert!(matches!(report.chart, ChartStep::Failed { .. }));
        assert_eq!(report.table, TableStep::Replaced { rows: 0 });
        assert_eq!(view.rows, Some(Vec::new()));
    }

    #[test]
    fn test_absent_transactions_leave_table_untouched() {
        let mut view = MemoryView::new();
        view.rows = Some(vec![TransactionRow::from_transaction(&tx("success"), &options())]);

        let snap = snapshot(r#"{"total_value": 1, "total_fees": 0, "roi": 0}"#);
        let report = apply_snapshot::<_, MemoryChart>(&snap, &mut view, None, &options());

        assert_eq!(report.table, TableStep::Skipped);
        assert_eq!(view.rows.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_view_without_table_is_skipped() {
        let mut view = MemoryView::without_table();
        let snap = snapshot(r#"{"total_value": 1, "total_fees": 0, "roi": 0, "recent_transactions": []}"#);

        let report = apply_snapshot::<_, MemoryChart>(&snap, &mut view, None, &options());

        assert_eq!(report.table, TableStep::Skipped);
        assert!(view.rows.is_none());
        assert_eq!(view.kpis.as_ref().map(|k| k.total_value.as_str()), Some("$1.00"));
    }
}
