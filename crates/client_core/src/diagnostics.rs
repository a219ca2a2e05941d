//! Where failed backend calls get reported. Call sites only see the trait, so
//! the destination can change from logs to a user-visible channel.

use std::sync::Mutex;

use crate::{
    error::{ClientError, ErrorCategory},
    Operation,
};

pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, error: &ClientError);
}

/// Default sink: one structured `warn` event per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, error: &ClientError) {
        tracing::warn!(
            operation = error.operation().as_str(),
            category = error.category().as_str(),
            "backend call failed: {error}"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub operation: Operation,
    pub category: ErrorCategory,
    pub message: String,
}

/// Keeps every report in memory; used by tests and by front ends that want to
/// show the latest failure.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<Report>>,
}

impl MemorySink {
    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticsSink for MemorySink {
    fn report(&self, error: &ClientError) {
        if let Ok(mut guard) = self.reports.lock() {
            guard.push(Report {
                operation: error.operation(),
                category: error.category(),
                message: error.to_string(),
            });
        }
    }
}
