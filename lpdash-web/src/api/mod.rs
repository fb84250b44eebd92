//! API Access
//!
//! Talks to the monitoring API's dashboard endpoint.

mod client;

pub use client::{dashboard_url, fetch_snapshot, get_api_base};
