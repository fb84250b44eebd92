//! State Management
//!
//! Element bindings and the reactive dashboard state.

pub mod bindings;
pub mod global;

pub use bindings::DomBindings;
pub use global::{DashboardState, DomView};
