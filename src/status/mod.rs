//! Consumer-side status display and diagnostics.
//!
//! This module holds the terminal dashboard that renders the polled feeds
//! and keeps a short diagnostic history.

pub mod dashboard;

pub use dashboard::Dashboard;
