//! Update Status Component
//!
//! Shows when the dashboard last updated, or that updates are failing.

use chrono::{DateTime, Local, Utc};
use leptos::*;
use lpdash::RefreshFailure;

use crate::state::DashboardState;

/// Status text and its CSS class
pub fn status_line(
    error: Option<&RefreshFailure>,
    last_update: Option<DateTime<Utc>>,
) -> (String, &'static str) {
    match (error, last_update) {
        (Some(failure), _) => {
            let mut text = format!("Update failed: {}", failure.message);
            if failure.consecutive_failures > 1 {
                text.push_str(&format!(" ({} in a row)", failure.consecutive_failures));
            }
            (text, "text-danger")
        }
        (None, Some(at)) => (
            format!("Updated {}", at.with_timezone(&Local).format("%H:%M:%S")),
            "text-muted",
        ),
        (None, None) => ("Waiting for data...".to_string(), "text-muted"),
    }
}

/// Status indicator
#[component]
pub fn UpdateStatus(state: DashboardState) -> impl IntoView {
    let line = create_memo(move |_| {
        let last_update = state.last_update.get();
        state.error.with(|error| status_line(error.as_ref(), last_update))
    });

    view! {
        <span class=move || line.with(|(_, class)| *class)>
            {move || line.with(|(text, _)| text.clone())}
        </span>
    }
}
