//! Console View
//!
//! Renders the dashboard as plain text: a KPI block followed by a
//! fixed-width transaction table.

use std::io::Write;

use super::DashboardView;
use crate::refresh::RefreshFailure;
use crate::render::{BadgeStyle, KpiText, TransactionRow};

/// Terminal renderer over any writer
pub struct ConsoleView<W: Write> {
    out: W,
    table: bool,
}

impl ConsoleView<std::io::Stdout> {
    /// Render to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out, table: true }
    }

    /// Skip the transaction table entirely
    pub fn kpis_only(mut self) -> Self {
        self.table = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_kpis(&mut self, kpis: &KpiText) -> std::io::Result<()> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(self.out)?;
        writeln!(self.out, "Dashboard ({})", now)?;
        writeln!(self.out, "  {:<18}{}", "Total value:", kpis.total_value)?;
        writeln!(self.out, "  {:<18}{}", "Total fees:", kpis.total_fees)?;
        writeln!(self.out, "  {:<18}{}", "ROI:", kpis.roi)?;

        let optional = [
            ("Investment:", &kpis.total_investment),
            ("Gas:", &kpis.total_gas),
            ("Net profit:", &kpis.net_profit),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                writeln!(self.out, "  {:<18}{}", label, value)?;
            }
        }
        self.out.flush()
    }

    fn write_table(&mut self, rows: &[TransactionRow]) -> std::io::Result<()> {
        writeln!(self.out)?;
        if rows.is_empty() {
            writeln!(self.out, "No recent transactions")?;
            return self.out.flush();
        }

        writeln!(
            self.out,
            "{:<20} | {:<12} | {:>12} | {}",
            "Time", "Type", "Amount", "Status"
        )?;
        writeln!(self.out, "{}", "-".repeat(62))?;

        for row in rows {
            let badge = match row.badge {
                BadgeStyle::Success => "[OK]",
                BadgeStyle::Failure => "[FAIL]",
            };
            writeln!(
                self.out,
                "{:<20} | {:<12} | {:>12} | {} {}",
                row.timestamp, row.kind, row.amount, badge, row.status
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> DashboardView for ConsoleView<W> {
    fn set_kpis(&mut self, kpis: &KpiText) {
        if let Err(e) = self.write_kpis(kpis) {
            tracing::warn!(error = %e, "Failed to write KPIs");
        }
    }

    fn has_transaction_table(&self) -> bool {
        self.table
    }

    fn replace_transactions(&mut self, rows: &[TransactionRow]) {
        if let Err(e) = self.write_table(rows) {
            tracing::warn!(error = %e, "Failed to write transaction table");
        }
    }

    fn show_error(&mut self, failure: &RefreshFailure) {
        let result = writeln!(
            self.out,
            "! Update failed at {} ({} in a row): {}",
            failure.at.with_timezone(&chrono::Local).format("%H:%M:%S"),
            failure.consecutive_failures,
            failure.message
        );
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write error indicator");
        }
    }

    fn clear_error(&mut self) {
        let result = writeln!(
            self.out,
            "Updates resumed at {}",
            chrono::Local::now().format("%H:%M:%S")
        );
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write recovery notice");
        }
    }
}
