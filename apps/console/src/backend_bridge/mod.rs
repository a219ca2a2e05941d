//! Bridge between the UI thread and the worker that performs HTTP calls.

pub mod commands;
pub mod runtime;
