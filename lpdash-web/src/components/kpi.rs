//! KPI Value Component
//!
//! Text of a single KPI field.

use leptos::*;

/// KPI text; shows `fallback` until a value arrives
#[component]
pub fn KpiValue(
    /// Formatted value, `None` before the first snapshot
    #[prop(into)]
    value: Signal<Option<String>>,
    /// Text the page was rendered with
    #[prop(into)]
    fallback: String,
) -> impl IntoView {
    move || value.get().unwrap_or_else(|| fallback.clone())
}
