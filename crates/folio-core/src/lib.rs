// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Core types and error definitions shared across all crates.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use config::{AssembleConfig, FolioConfig, SplitConfig};
pub use diagnostics::{CollectingDiagnostics, Diagnostics, TracingDiagnostics};
pub use error::{FolioError, Result};
pub use types::*;
