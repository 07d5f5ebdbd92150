// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open an existing PDF once and extract interval lists of pages
// into new documents using the `lopdf` crate.

use std::path::Path;

use folio_core::Interval;
use folio_core::error::FolioError;
use lopdf::{Document, ObjectId};
use tracing::{debug, info, instrument};

use super::pages::{detached_page, page_tree_root, set_page_tree_kids};

/// Catalog entries that describe the whole source document and would point at
/// pages an extract no longer contains, keeping them alive through pruning.
const DOCUMENT_LEVEL_CATALOG_KEYS: [&[u8]; 7] = [
    b"Outlines",
    b"PageLabels",
    b"Metadata",
    b"OpenAction",
    b"Names",
    b"Dests",
    b"AcroForm",
];

/// Read-only access to a source PDF.
///
/// The wrapped document is never modified; every extraction works on a copy,
/// so one reader can serve any number of extractions in any order.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Page object ids in page order.
    page_ids: Vec<ObjectId>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            FolioError::Pdf(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        let reader = Self::from_document(document);
        debug!(pages = reader.page_count(), "PDF loaded");
        Ok(reader)
    }

    /// Wrap an already-loaded document.
    pub fn from_document(document: Document) -> Self {
        let page_ids = document.get_pages().into_values().collect();
        Self { document, page_ids }
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    // -- Extraction -----------------------------------------------------------

    /// Resolve intervals to page object ids, in the order they are listed.
    ///
    /// Every index is checked against the page count; nothing is assumed about
    /// where the intervals came from. An interval reaching past the last page
    /// is rejected before any of its pages are collected.
    pub fn resolve(&self, intervals: &[Interval]) -> Result<Vec<ObjectId>, FolioError> {
        let page_count = self.page_count();
        let mut selected = Vec::new();
        for interval in intervals {
            if interval.end() >= page_count {
                return Err(FolioError::IndexOutOfRange {
                    index: interval.start().max(page_count),
                    page_count,
                });
            }
            for index in interval.indices() {
                let page_id = self
                    .page_ids
                    .get(index)
                    .copied()
                    .ok_or(FolioError::IndexOutOfRange { index, page_count })?;
                selected.push(page_id);
            }
        }
        Ok(selected)
    }

    /// Build a new document holding the pages named by `intervals`, in order.
    ///
    /// Pages keep their content streams and resources byte-for-byte. A page
    /// requested more than once appears once per request. The result carries
    /// no `/Info` metadata and no outline.
    #[instrument(skip_all, fields(interval_count = intervals.len()))]
    pub fn extract(&self, intervals: &[Interval]) -> Result<Document, FolioError> {
        let selected = self.resolve(intervals)?;
        if selected.is_empty() {
            return Err(FolioError::InvalidInput("no pages requested".into()));
        }

        let mut output = self.document.clone();
        let root = page_tree_root(&output)?;

        let mut kids = Vec::with_capacity(selected.len());
        for page_id in selected {
            let page = detached_page(&self.document, page_id)?;
            kids.push(output.add_object(page));
        }
        set_page_tree_kids(&mut output, root, &kids)?;

        if let Ok(catalog) = output.catalog_mut() {
            for key in DOCUMENT_LEVEL_CATALOG_KEYS {
                catalog.remove(key);
            }
        }
        output.trailer.remove(b"Info");

        output.prune_objects();
        output.renumber_objects();

        debug!(pages = kids.len(), "Pages extracted");
        Ok(output)
    }

    /// Extract `intervals` and write the result to `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn extract_to_file(
        &self,
        intervals: &[Interval],
        path: impl AsRef<Path>,
    ) -> Result<usize, FolioError> {
        let path = path.as_ref();
        let mut output = self.extract(intervals)?;
        let pages = output.get_pages().len();
        output.save(path).map_err(|err| {
            FolioError::Pdf(format!("failed to write {}: {}", path.display(), err))
        })?;
        Ok(pages)
    }
}
