// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Warning sink used by the pipelines for recoverable problems.

/// Receives non-fatal warnings raised while processing an input.
///
/// Pipelines take a `&dyn Diagnostics` instead of logging directly so callers
/// can collect, count, or silence warnings.
pub trait Diagnostics {
    /// Report a warning about `source` (usually a file path).
    fn warn(&self, source: &str, message: &str);
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, source: &str, message: &str) {
        tracing::warn!(source, "{message}");
    }
}

/// Records warnings in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    warnings: std::sync::Mutex<Vec<(String, String)>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `(source, message)` pairs in arrival order.
    pub fn warnings(&self) -> Vec<(String, String)> {
        self.warnings
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn warn(&self, source: &str, message: &str) {
        if let Ok(mut guard) = self.warnings.lock() {
            guard.push((source.to_owned(), message.to_owned()));
        }
    }
}
