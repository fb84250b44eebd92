//! lpdash Browser Dashboard
//!
//! Binds to a server-rendered dashboard page and keeps it live (WASM).
//!
//! # Architecture
//!
//! The page already contains the KPI fields, the transaction table and the
//! revenue chart. This module looks those elements up once, mounts small
//! Leptos components into them and polls the monitoring API every 30
//! seconds. Snapshot parsing, formatting and stale-response handling come
//! from the `lpdash` crate.

use lpdash::{AppContext, DisplayOptions};
use std::sync::Arc;

mod api;
mod app;
mod chart;
mod components;
mod poller;
mod state;

use chart::{JsChart, DEFAULT_CHART_GLOBAL};
use poller::WebUpdater;
use state::{DashboardState, DomBindings, DomView};

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        web_sys::console::error_1(&"lpdash: no document available".into());
        return;
    };

    let bindings = match DomBindings::resolve(&document) {
        Ok(bindings) => bindings,
        Err(e) => {
            web_sys::console::error_1(&format!("lpdash: {}", e).into());
            return;
        }
    };

    let state = DashboardState::new();
    app::mount(&bindings, state);

    let context = match JsChart::find(DEFAULT_CHART_GLOBAL) {
        Some(chart) => AppContext::with_revenue_chart(Arc::new(chart)),
        None => {
            web_sys::console::log_1(
                &format!("lpdash: window.{} not found, chart updates disabled", DEFAULT_CHART_GLOBAL).into(),
            );
            AppContext::new()
        }
    };

    let url = api::dashboard_url(&api::get_api_base());
    let view = DomView::new(state, bindings.has_transaction_table());

    // Timestamps follow the browser's time zone, DST included
    let options = DisplayOptions::default();

    // The interval keeps the updater alive for the lifetime of the page
    WebUpdater::new(url, view, context, options).start();
}
