//! Backend worker: executes session effects off the UI thread.

pub mod commands;
pub mod runtime;
