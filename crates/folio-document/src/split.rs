// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF splitting — one output document per work packet of a range file.

use std::path::{Path, PathBuf};

use folio_core::SplitConfig;
use folio_core::error::{FolioError, Result};
use tracing::{debug, info, instrument};

use crate::pdf::PdfReader;
use crate::ranges::RangeFile;

/// One document written by [`split_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    pub title: String,
    pub path: PathBuf,
    pub pages: usize,
}

/// Split `source` into one PDF per work packet in `ranges`.
///
/// The source is opened once and never modified. Packets are handled in file
/// order; the first malformed line or out-of-range page stops the run, and
/// documents written before it stay on disk.
#[instrument(skip_all, fields(source = %source.display(), ranges = %ranges.path().display()))]
pub fn split_document(
    source: &Path,
    ranges: &RangeFile,
    config: &SplitConfig,
) -> Result<Vec<SplitOutput>> {
    let is_pdf = source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(FolioError::InvalidInput(format!(
            "{} does not look like a PDF",
            source.display()
        )));
    }

    let reader = PdfReader::open(source)?;
    let mut outputs = Vec::new();
    for packet in ranges.packets()? {
        let packet = packet?;
        info!("Processing {}", packet.title);

        let path = config.output_path(&packet.title);
        let pages = reader.extract_to_file(&packet.intervals, &path)?;
        info!(pages, "Done.");
        outputs.push(SplitOutput {
            title: packet.title,
            path,
            pages,
        });
    }

    debug!(documents = outputs.len(), "Split finished");
    Ok(outputs)
}
