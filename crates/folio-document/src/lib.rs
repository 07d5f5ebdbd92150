// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Document processing for Folio.
//
// Provides page image preparation (EXIF orientation, transparency flattening),
// PDF assembly from a directory of page images, and PDF splitting driven by a
// range file.

pub mod assemble;
pub mod image;
pub mod pdf;
pub mod ranges;
pub mod split;

// Re-export the primary entry points so callers can use `folio_document::PdfReader` etc.
pub use assemble::{CombineReport, assemble_directory, assemble_into, combine_root, page_images};
pub use crate::image::processor::PageImage;
pub use pdf::reader::PdfReader;
pub use pdf::writer::{PageSink, PageWrite, PdfWriter};
pub use ranges::{RangeFile, WorkPackets, parse_line, parse_ranges};
pub use split::{SplitOutput, split_document};
