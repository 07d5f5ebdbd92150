// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — compose page images into a PDF using `printpdf` 0.8, then
// stamp metadata and optionally append to an existing file with `lopdf`.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::PathBuf;

use folio_core::DocumentInfo;
use folio_core::error::FolioError;
use image::DynamicImage;
use lopdf::{Document, Object, ObjectId};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use super::info::apply_info;
use super::pages::{detached_page, page_tree_root, set_page_tree_kids};

/// How a single page write should be treated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageWrite<'a> {
    /// Document metadata. Only the first write of a document carries it.
    pub info: Option<&'a DocumentInfo>,
    /// Add to whatever the target already holds instead of replacing it.
    pub append: bool,
}

impl<'a> PageWrite<'a> {
    /// The first write of a document: metadata plus the caller's append choice.
    pub fn first(info: &'a DocumentInfo, append: bool) -> Self {
        Self {
            info: Some(info),
            append,
        }
    }

    /// Every later write: no metadata, always appending.
    pub fn next() -> Self {
        Self {
            info: None,
            append: true,
        }
    }
}

/// Destination for assembled pages.
pub trait PageSink {
    /// Add `page` as the next page of the document.
    fn write_page(&mut self, page: &DynamicImage, write: PageWrite<'_>) -> Result<(), FolioError>;

    /// Flush the document. No output exists until this succeeds.
    fn finish(&mut self) -> Result<(), FolioError>;
}

/// Builds a PDF with one page per image, each page sized to its image.
pub struct PdfWriter {
    /// Output file.
    target: PathBuf,
    /// Resolution used to convert pixels to page size.
    dpi: f32,
    /// Document holding the embedded images.
    document: PdfDocument,
    /// Pages composed so far, in write order.
    pages: Vec<PdfPage>,
    /// Metadata from the first page write.
    info: Option<DocumentInfo>,
    /// Append flag from the first page write.
    append: bool,
}

impl PdfWriter {
    /// Create a writer for `target` at the given resolution.
    pub fn new(target: impl Into<PathBuf>, dpi: f32) -> Self {
        Self {
            target: target.into(),
            dpi,
            document: PdfDocument::new(""),
            pages: Vec::new(),
            info: None,
            append: false,
        }
    }

    /// Serialise the composed pages and stamp metadata, without touching the
    /// filesystem.
    fn render(&mut self) -> Result<Document, FolioError> {
        let pages = std::mem::take(&mut self.pages);
        self.document.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = self.document.save(&PdfSaveOptions::default(), &mut warnings);
        for warning in &warnings {
            debug!(?warning, "printpdf warning");
        }

        let mut rendered = Document::load_mem(&bytes).map_err(|err| {
            FolioError::Pdf(format!("failed to reload composed PDF: {}", err))
        })?;

        if self.append && self.target.exists() {
            let mut existing = Document::load(&self.target).map_err(|err| {
                FolioError::Pdf(format!(
                    "failed to open {} for appending: {}",
                    self.target.display(),
                    err
                ))
            })?;
            append_document(&mut existing, rendered)?;
            rendered = existing;
        }

        if let Some(info) = &self.info {
            apply_info(&mut rendered, info)?;
        }
        Ok(rendered)
    }
}

impl PageSink for PdfWriter {
    #[instrument(skip_all, fields(page = self.pages.len() + 1))]
    fn write_page(&mut self, page: &DynamicImage, write: PageWrite<'_>) -> Result<(), FolioError> {
        if self.pages.is_empty() {
            self.append = write.append;
        }
        if let Some(info) = write.info {
            if !self.pages.is_empty() {
                warn!("Ignoring metadata on a page after the first");
            } else {
                self.info = Some(info.clone());
            }
        }

        let width = page.width() as usize;
        let height = page.height() as usize;
        let raw = RawImage {
            pixels: RawImageData::U8(page.to_rgb8().into_raw()),
            width,
            height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.document.add_image(&raw);

        // The image is drawn at its natural size for `dpi`, so the page is
        // exactly as large as the picture.
        let page_w = Mm(width as f32 / self.dpi * 25.4);
        let page_h = Mm(height as f32 / self.dpi * 25.4);
        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: None,
                scale_y: None,
                dpi: Some(self.dpi),
                rotate: None,
            },
        }];
        self.pages.push(PdfPage::new(page_w, page_h, ops));

        debug!(width, height, "Page composed");
        Ok(())
    }

    #[instrument(skip_all, fields(target = %self.target.display(), pages = self.pages.len()))]
    fn finish(&mut self) -> Result<(), FolioError> {
        if self.pages.is_empty() {
            return Err(FolioError::Pdf(format!(
                "no pages were written for {}",
                self.target.display()
            )));
        }

        let mut document = self.render()?;
        document.save(&self.target).map_err(|err| {
            FolioError::Pdf(format!(
                "failed to write {}: {}",
                self.target.display(),
                err
            ))
        })?;

        info!(
            pages = document.get_pages().len(),
            append = self.append,
            "Wrote PDF to {}",
            self.target.display()
        );
        Ok(())
    }
}

/// Move every page of `addition` to the end of `base`, hanging all pages
/// directly under the root page tree node.
fn append_document(base: &mut Document, mut addition: Document) -> Result<(), FolioError> {
    let base_root = page_tree_root(base)?;

    let mut kids: Vec<ObjectId> = Vec::new();
    for page_id in base.get_pages().into_values().collect::<Vec<_>>() {
        let page = detached_page(base, page_id)?;
        base.objects.insert(page_id, Object::Dictionary(page));
        kids.push(page_id);
    }

    addition.renumber_objects_with(base.max_id + 1);
    let new_pages = addition
        .get_pages()
        .into_values()
        .map(|page_id| detached_page(&addition, page_id))
        .collect::<Result<Vec<_>, _>>()?;

    let addition_max = addition.objects.keys().map(|id| id.0).max().unwrap_or(0);
    base.max_id = base.max_id.max(addition_max);
    base.objects.extend(addition.objects);
    for page in new_pages {
        kids.push(base.add_object(page));
    }

    set_page_tree_kids(base, base_root, &kids)?;
    base.prune_objects();
    base.renumber_objects();
    Ok(())
}
