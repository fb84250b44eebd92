//! Browser Poll Loop
//!
//! Refreshes the dashboard once at startup and then on a fixed interval.
//! Each refresh runs as its own local future; responses are settled through
//! the shared guard so an overlapping or late response never wins.

use gloo_timers::callback::Interval;
use lpdash::render::ChartStep;
use lpdash::{
    settle, AppContext, DisplayOptions, OverlapPolicy, RefreshGuard, RefreshOutcome, RefreshStatus,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::chart::JsChart;
use crate::state::DomView;

/// Poll interval in milliseconds
pub const REFRESH_INTERVAL_MS: u32 = 30_000;

struct Inner {
    url: String,
    view: RefCell<DomView>,
    context: AppContext<JsChart>,
    guard: RefreshGuard,
    status: RefCell<RefreshStatus>,
    options: DisplayOptions,
    interval: RefCell<Option<Interval>>,
}

/// Keeps the page in sync with the dashboard API
#[derive(Clone)]
pub struct WebUpdater {
    inner: Rc<Inner>,
}

impl WebUpdater {
    pub fn new(url: String, view: DomView, context: AppContext<JsChart>, options: DisplayOptions) -> Self {
        Self {
            inner: Rc::new(Inner {
                url,
                view: RefCell::new(view),
                context,
                guard: RefreshGuard::new(OverlapPolicy::Skip),
                status: RefCell::new(RefreshStatus::default()),
                options,
                interval: RefCell::new(None),
            }),
        }
    }

    /// Refresh now, then every [`REFRESH_INTERVAL_MS`]
    pub fn start(&self) {
        web_sys::console::log_1(
            &format!("lpdash: polling {} (chart: {})", self.inner.url, self.inner.context.has_chart()).into(),
        );
        self.refresh();

        let updater = self.clone();
        let interval = Interval::new(REFRESH_INTERVAL_MS, move || updater.refresh());

        // Dropping a previous interval cancels it
        *self.inner.interval.borrow_mut() = Some(interval);
    }

    /// Start one refresh unless one is already running
    pub fn refresh(&self) {
        let Some(ticket) = self.inner.guard.try_begin() else {
            self.inner.status.borrow_mut().record_skipped();
            web_sys::console::debug_1(&"lpdash: refresh still in flight, skipping tick".into());
            return;
        };
        self.inner.status.borrow_mut().record_attempt();

        let inner = Rc::clone(&self.inner);
        spawn_local(async move {
            let fetched = api::fetch_snapshot(&inner.url).await;

            let outcome = settle(
                &inner.guard,
                ticket,
                fetched,
                &mut *inner.view.borrow_mut(),
                inner.context.revenue_chart(),
                &mut inner.status.borrow_mut(),
                &inner.options,
            );

            match outcome {
                RefreshOutcome::Failed { error, .. } => {
                    web_sys::console::error_1(&format!("lpdash: dashboard update failed: {}", error).into());
                }
                RefreshOutcome::Applied { report, .. } => {
                    if let ChartStep::Failed { error } = report.chart {
                        web_sys::console::warn_1(&format!("lpdash: chart update failed: {}", error).into());
                    }
                }
                RefreshOutcome::Skipped | RefreshOutcome::Superseded { .. } => {}
            }
        });
    }
}
