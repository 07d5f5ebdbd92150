// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Input errors --
    #[error("no page images matching *.{extension} in {}", dir.display())]
    EmptyInput { dir: PathBuf, extension: String },

    #[error("range file line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("page index {index} out of range (document has {page_count} pages)")]
    IndexOutOfRange { index: usize, page_count: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // -- Codec errors --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Build a [`FolioError::Parse`] for the given 1-based line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
