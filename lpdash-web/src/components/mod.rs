//! UI Components
//!
//! Leptos components mounted into the page's existing elements.

pub mod kpi;
pub mod status;
pub mod transactions;

pub use kpi::KpiValue;
pub use status::UpdateStatus;
pub use transactions::TransactionRows;
