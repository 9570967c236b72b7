//! UI layer for the planner GUI: app shell and the selection panels.

pub mod app;

pub use app::{PlannerApp, StartupConfig};
