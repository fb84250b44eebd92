//! Chart Handles
//!
//! The chart is an external collaborator created once at startup and fed
//! new data in place. [`AppContext`] carries the handle to the updater so
//! nothing lives in a global.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Something that accepts a revenue chart payload
pub trait ChartHandle {
    /// Replace the chart's data with `data`
    fn set_data(&self, data: &serde_json::Value) -> Result<(), ChartError>;
}

/// Errors raised by a chart handle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Chart rejected data: {0}")]
    Rejected(String),

    #[error("Chart data could not be converted: {0}")]
    Conversion(String),
}

/// Application context built once at startup and handed to the updater
pub struct AppContext<C: ?Sized> {
    revenue_chart: Option<Arc<C>>,
}

/// Context shared across tokio tasks
pub type SharedContext = AppContext<dyn ChartHandle + Send + Sync>;

impl<C: ChartHandle + ?Sized> AppContext<C> {
    /// Context without a chart; chart updates are skipped
    pub fn new() -> Self {
        Self { revenue_chart: None }
    }

    /// Context with a revenue chart handle
    pub fn with_revenue_chart(chart: Arc<C>) -> Self {
        Self {
            revenue_chart: Some(chart),
        }
    }

    pub fn revenue_chart(&self) -> Option<&C> {
        self.revenue_chart.as_deref()
    }

    pub fn has_chart(&self) -> bool {
        self.revenue_chart.is_some()
    }
}

impl<C: ChartHandle + ?Sized> Default for AppContext<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for AppContext<C> {
    fn clone(&self) -> Self {
        Self {
            revenue_chart: self.revenue_chart.clone(),
        }
    }
}

/// Chart handle that keeps the latest payload in memory.
///
/// Used by the terminal front end, which has no chart widget but reports
/// what the chart would show.
#[derive(Debug, Default)]
pub struct MemoryChart {
    latest: Mutex<Option<serde_json::Value>>,
    updates: AtomicUsize,
}

impl MemoryChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest payload received, if any
    pub fn latest(&self) -> Option<serde_json::Value> {
        self.latest.lock().ok().and_then(|guard| guard.clone())
    }

    /// How many times `set_data` succeeded
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::Relaxed)
    }

    /// One-line description of the latest payload
    pub fn summary(&self) -> String {
        match self.latest() {
            Some(data) => describe_chart_data(&data),
            None => "no data".to_string(),
        }
    }
}

impl ChartHandle for MemoryChart {
    fn set_data(&self, data: &serde_json::Value) -> Result<(), ChartError> {
        let mut latest = self
            .latest
            .lock()
            .map_err(|e| ChartError::Rejected(e.to_string()))?;
        *latest = Some(data.clone());
        self.updates.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(summary = %describe_chart_data(data), "Revenue chart updated");
        Ok(())
    }
}

/// Rough shape of a chart payload
pub fn describe_chart_data(data: &serde_json::Value) -> String {
    match data {
        serde_json::Value::Array(points) => format!("{} points", points.len()),
        serde_json::Value::Object(fields) => {
            let series = fields
                .get("datasets")
                .and_then(|d| d.as_array())
                .map(|d| d.len());
            let labels = fields
                .get("labels")
                .and_then(|l| l.as_array())
                .map(|l| l.len());

            match (series, labels) {
                (Some(s), Some(l)) => format!("{} series x {} labels", s, l),
                (Some(s), None) => format!("{} series", s),
                (None, Some(l)) => format!("{} labels", l),
                (None, None) => format!("{} fields", fields.len()),
            }
        }
        serde_json::Value::Null => "no data".to_string(),
        _ => "scalar".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_chart_keeps_latest() {
        let chart = MemoryChart::new();
        assert_eq!(chart.summary(), "no data");

        chart.set_data(&json!([1, 2, 3])).unwrap();
        chart.set_data(&json!([1, 2])).unwrap();

        assert_eq!(chart.update_count(), 2);
        assert_eq!(chart.latest(), Some(json!([1, 2])));
        assert_eq!(chart.summary(), "2 points");
    }

    #[test]
    fn test_context_without_chart() {
        let context: SharedContext = AppContext::new();
        assert!(!context.has_chart());
        assert!(context.revenue_chart().is_none());
    }

    #[test]
    fn test_shared_context_clone_shares_handle() {
        let chart = Arc::new(MemoryChart::new());
        let handle: Arc<dyn ChartHandle + Send + Sync> = chart.clone();
        let context: SharedContext = AppContext::with_revenue_chart(handle);
        let cloned = context.clone();

        cloned
            .revenue_chart()
            .unwrap()
            .set_data(&json!({"labels": [], "datasets": []}))
            .unwrap();
        assert_eq!(chart.update_count(), 1);
    }

    #[test]
    fn test_describe_chart_data() {
        let data = json!({"labels": ["mon", "tue"], "datasets": [{"data": [1, 2]}]});
        assert_eq!(describe_chart_data(&data), "1 series x 2 labels");
        assert_eq!(describe_chart_data(&json!({"a": 1})), "1 fields");
    }
}
