//! Transaction Rows Component
//!
//! Body of the recent transactions table. Every update replaces all rows.

use leptos::*;
use lpdash::TransactionRow;

/// All rows of the transaction table
#[component]
pub fn TransactionRows(
    /// Rows to render, newest first
    #[prop(into)]
    rows: Signal<Vec<TransactionRow>>,
) -> impl IntoView {
    move || {
        rows.get()
            .into_iter()
            .map(|row| view! { <TransactionRowView row=row /> })
            .collect_view()
    }
}

/// A single `<tr>`
#[component]
fn TransactionRowView(row: TransactionRow) -> impl IntoView {
    let badge = format!("badge {}", row.badge.css_class());

    view! {
        <tr>
            <td>{row.timestamp}</td>
            <td>{row.kind}</td>
            <td>{row.amount}</td>
            <td><span class=badge>{row.status}</span></td>
        </tr>
    }
}
