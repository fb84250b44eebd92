//! Revenue Chart Handle
//!
//! The chart widget is created by the page's own script and exposed as a
//! global. This wraps it so the shared render step can call `setData`.

use js_sys::{Function, Reflect, JSON};
use lpdash::{ChartError, ChartHandle};
use wasm_bindgen::{JsCast, JsValue};

/// Global the page stores its chart under
pub const DEFAULT_CHART_GLOBAL: &str = "revenueChart";

/// Chart object living in page JavaScript
pub struct JsChart {
    chart: JsValue,
    set_data: Function,
}

impl JsChart {
    /// Look up `window[global]`; `None` when absent or without `setData`
    pub fn find(global: &str) -> Option<Self> {
        let window = web_sys::window()?;
        let chart = Reflect::get(&window, &JsValue::from_str(global)).ok()?;
        if chart.is_undefined() || chart.is_null() {
            return None;
        }

        let set_data = Reflect::get(&chart, &JsValue::from_str("setData"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;

        Some(Self { chart, set_data })
    }
}

impl ChartHandle for JsChart {
    fn set_data(&self, data: &serde_json::Value) -> Result<(), ChartError> {
        let text = serde_json::to_string(data).map_err(|e| ChartError::Conversion(e.to_string()))?;
        let value = JSON::parse(&text).map_err(|e| ChartError::Conversion(format!("{:?}", e)))?;

        self.set_data
            .call1(&self.chart, &value)
            .map(|_| ())
            .map_err(|e| ChartError::Rejected(format!("{:?}", e)))
    }
}
