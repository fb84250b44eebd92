//! Dashboard Snapshot
//!
//! The payload returned by `GET /api/dashboard_data`. A snapshot is built
//! fresh from every poll response and dropped once it has been rendered.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Path of the dashboard endpoint on the monitoring API
pub const DASHBOARD_ENDPOINT: &str = "/api/dashboard_data";

/// One poll response from the monitoring API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardSnapshot {
    /// Current value of the position
    pub total_value: Decimal,
    /// Collected fees (may arrive negative, displayed as absolute value)
    pub total_fees: Decimal,
    /// Return on investment in percent
    pub roi: Decimal,
    /// Opaque chart payload handed straight to the chart handle
    #[serde(default)]
    pub revenue_chart_data: Option<serde_json::Value>,
    /// Most recent transactions, newest first as sent by the server.
    /// `None` leaves the table untouched; an empty list clears it.
    #[serde(default)]
    pub recent_transactions: Option<Vec<Transaction>>,
    /// Cumulative deposits minus withdrawals
    #[serde(default)]
    pub total_investment: Option<Decimal>,
    /// Gas spent on rebalances
    #[serde(default)]
    pub total_gas: Option<Decimal>,
    /// Fees minus gas
    #[serde(default)]
    pub net_profit: Option<Decimal>,
}

impl DashboardSnapshot {
    /// Number of transactions carried by this snapshot
    pub fn transaction_count(&self) -> usize {
        self.recent_transactions.as_ref().map(Vec::len).unwrap_or(0)
    }

    /// Whether the chart step has anything to hand over
    pub fn has_chart_data(&self) -> bool {
        self.revenue_chart_data.is_some()
    }
}

/// A single row of the recent transactions table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub timestamp: TimestampValue,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub amount: Decimal,
    #[serde(default)]
    pub status: TransactionStatus,
}

/// Raw timestamp as sent by the server.
///
/// Parsing is deferred to display time so an odd value only affects its own
/// cell instead of rejecting the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampValue {
    /// Unix epoch milliseconds
    Millis(i64),
    /// Fractional epoch milliseconds
    Fractional(f64),
    /// Any textual date representation
    Text(String),
    /// Null, booleans, objects or a missing key. Always displayed as
    /// `Invalid Date`. Must stay the last variant.
    Other(serde_json::Value),
}

impl Default for TimestampValue {
    fn default() -> Self {
        TimestampValue::Other(serde_json::Value::Null)
    }
}

/// Transaction outcome. Only `"success"` is distinguished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Other(String),
}

impl TransactionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionStatus::Success)
    }

    /// Label exactly as received
    pub fn label(&self) -> &str {
        match self {
            TransactionStatus::Success => "success",
            TransactionStatus::Other(raw) => raw,
        }
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Other(String::new())
    }
}

impl From<&str> for TransactionStatus {
    fn from(raw: &str) -> Self {
        if raw == "success" {
            TransactionStatus::Success
        } else {
            TransactionStatus::Other(raw.to_string())
        }
    }
}

impl<'de> Deserialize<'de> for TransactionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(TransactionStatus::from).unwrap_or_default())
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_full_payload() {
        let json = r#"{
            "total_value": 12450.23,
            "total_fees": -42.315,
            "roi": 7.05,
            "revenue_chart_data": {"labels": ["a"], "values": [1.0]},
            "recent_transactions": [
                {"timestamp": "2024-01-05T09:03:07Z", "type": "deposit", "amount": 10, "status": "success"}
            ]
        }"#;

        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.total_value, dec("12450.23"));
        assert_eq!(snapshot.total_fees, dec("-42.315"));
        assert_eq!(snapshot.roi, dec("7.05"));
        assert!(snapshot.has_chart_data());
        assert_eq!(snapshot.transaction_count(), 1);

        let tx = &snapshot.recent_transactions.as_ref().unwrap()[0];
        assert_eq!(tx.kind, "deposit");
        assert_eq!(tx.amount, dec("10"));
        assert!(tx.status.is_success());
    }

    #[test]
    fn test_optional_sections_absent() {
        let json = r#"{"total_value": 1, "total_fees": 0, "roi": 0}"#;
        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.revenue_chart_data.is_none());
        assert!(snapshot.recent_transactions.is_none());
        assert!(snapshot.total_investment.is_none());
    }

    #[test]
    fn test_null_chart_data_is_absent() {
        let json = r#"{"total_value": 1, "total_fees": 0, "roi": 0, "revenue_chart_data": null}"#;
        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert!(!snapshot.has_chart_data());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let json = r#"{"total_value": 1, "roi": 0}"#;
        let result = serde_json::from_str::<DashboardSnapshot>(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("total_fees"));
    }

    #[test]
    fn test_backend_extra_fields() {
        let json = r#"{
            "total_value": 12450.23, "total_fees": 120.5, "roi": 3.2,
            "total_investment": 12000, "total_gas": 14.25, "net_profit": 106.25,
            "unknown_field": true
        }"#;
        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.total_investment, Some(dec("12000")));
        assert_eq!(snapshot.total_gas, Some(dec("14.25")));
        assert_eq!(snapshot.net_profit, Some(dec("106.25")));
    }

    #[test]
    fn test_status_variants() {
        let json = r#"[
            {"timestamp": 1704445387000, "type": "swap", "amount": 1, "status": "failed"},
            {"timestamp": "2024-01-05", "type": "swap", "amount": 1, "status": "Success"},
            {"timestamp": "2024-01-05", "type": "swap", "amount": 1}
        ]"#;
        let txs: Vec<Transaction> = serde_json::from_str(json).unwrap();

        assert_eq!(txs[0].timestamp, TimestampValue::Millis(1704445387000));
        assert_eq!(txs[0].status, TransactionStatus::Other("failed".to_string()));
        // Matching is exact, so a capitalized label is not a success
        assert!(!txs[1].status.is_success());
        assert_eq!(txs[1].status.label(), "Success");
        assert_eq!(txs[2].status.label(), "");
    }

    #[test]
    fn test_unusable_timestamp_keeps_snapshot() {
        let json = r#"{
            "total_value": 100, "total_fees": 1.5, "roi": 2,
            "recent_transactions": [
                {"timestamp": null, "type": "swap", "amount": 1, "status": "success"},
                {"type": "deposit", "amount": 2, "status": "success"},
                {"timestamp": true, "type": "withdraw", "amount": 3, "status": "failed"}
            ]
        }"#;

        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.total_value, dec("100"));
        assert_eq!(snapshot.transaction_count(), 3);

        let txs = snapshot.recent_transactions.unwrap();
        assert_eq!(txs[0].timestamp, TimestampValue::Other(serde_json::Value::Null));
        assert_eq!(txs[1].timestamp, TimestampValue::default());
        assert_eq!(txs[2].timestamp, TimestampValue::Other(serde_json::Value::Bool(true)));
        assert_eq!(txs[1].kind, "deposit");
    }
}
