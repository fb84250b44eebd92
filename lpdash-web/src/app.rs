//! Page Mounting
//!
//! Mounts one component into each bound element. The page keeps its own
//! layout; only the contents of these elements are owned by the app.

use leptos::*;
use lpdash::KpiText;
use web_sys::HtmlElement;

use crate::components::{KpiValue, TransactionRows, UpdateStatus};
use crate::state::{DashboardState, DomBindings};

/// Mount the dashboard components into the resolved elements
pub fn mount(bindings: &DomBindings, state: DashboardState) {
    mount_kpi(&bindings.total_value, state, |k| Some(k.total_value.clone()));
    mount_kpi(&bindings.total_fees, state, |k| Some(k.total_fees.clone()));
    mount_kpi(&bindings.roi, state, |k| Some(k.roi.clone()));

    let optional: [(&Option<HtmlElement>, fn(&KpiText) -> Option<String>); 3] = [
        (&bindings.total_investment, |k| k.total_investment.clone()),
        (&bindings.total_gas, |k| k.total_gas.clone()),
        (&bindings.net_profit, |k| k.net_profit.clone()),
    ];
    for (element, pick) in optional {
        if let Some(element) = element {
            mount_kpi(element, state, pick);
        }
    }

    if let Some(tbody) = &bindings.transactions {
        // Placeholder rows from the page are replaced by live data
        tbody.set_inner_html("");
        let rows = Signal::derive(move || state.rows.get().unwrap_or_default());
        mount_to(tbody.clone(), move || view! { <TransactionRows rows=rows /> });
    }

    if let Some(status) = &bindings.status {
        status.set_inner_html("");
        mount_to(status.clone(), move || view! { <UpdateStatus state=state /> });
    }
}

fn mount_kpi(element: &HtmlElement, state: DashboardState, pick: fn(&KpiText) -> Option<String>) {
    // Keep the server-rendered text until the first snapshot
    let fallback = element.text_content().unwrap_or_default();
    element.set_text_content(None);

    let value = Signal::derive(move || state.kpis.with(|kpis| kpis.as_ref().and_then(pick)));
    mount_to(element.clone(), move || view! { <KpiValue value=value fallback=fallback /> });
}
