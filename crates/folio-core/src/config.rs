// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FolioError, Result};
use crate::types::DocumentInfo;

/// Producer string written into every assembled PDF unless overridden.
pub const DEFAULT_PRODUCER: &str = "folio";

/// Settings for both pipelines, as stored in a JSON config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub assemble: AssembleConfig,
    pub split: SplitConfig,
}

impl FolioConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

/// Settings for turning a directory of page images into one PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssembleConfig {
    /// `/Title` for the output document.
    pub title: Option<String>,
    /// `/Author` for the output document.
    pub author: Option<String>,
    /// `/Producer` for the output document.
    pub producer: String,
    /// Add pages to an existing output file instead of replacing it.
    pub append: bool,
    /// Page image extension, matched case-insensitively, without the dot.
    pub image_extension: String,
    /// Resolution used to size pages; at 72 one pixel maps to one point.
    pub dpi: f32,
    /// When combining a root directory, use each subdirectory's name as the
    /// title of its PDF.
    pub title_from_directory: bool,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            producer: DEFAULT_PRODUCER.to_string(),
            append: false,
            image_extension: "jpg".to_string(),
            dpi: 72.0,
            title_from_directory: false,
        }
    }
}

impl AssembleConfig {
    /// Metadata attached to the first page write.
    pub fn document_info(&self) -> DocumentInfo {
        DocumentInfo {
            title: self.title.clone(),
            author: self.author.clone(),
            producer: Some(self.producer.clone()),
        }
    }

    /// Reject settings no pipeline run could honour.
    pub fn validate(&self) -> Result<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(FolioError::InvalidInput(format!(
                "dpi must be a positive number, got {}",
                self.dpi
            )));
        }
        let extension = self.image_extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\', '*', '?', '[']) {
            return Err(FolioError::InvalidInput(format!(
                "invalid image extension {:?}",
                self.image_extension
            )));
        }
        Ok(())
    }
}

/// Settings for splitting a PDF by a range file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Directory receiving `<title>.<extension>` outputs.
    pub output_dir: PathBuf,
    /// Output file extension, without the dot.
    pub output_extension: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            output_extension: "pdf".to_string(),
        }
    }
}

impl SplitConfig {
    /// Path of the output document for a WorkPacket title.
    pub fn output_path(&self, title: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", title, self.output_extension))
    }
}
