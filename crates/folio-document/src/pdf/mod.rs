// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — composing pages from images, extracting page intervals, and
// document metadata.

pub mod info;
pub(crate) mod pages;
pub mod reader;
pub mod writer;

pub use info::{apply_info, read_info};
pub use reader::PdfReader;
pub use writer::{PageSink, PageWrite, PdfWriter};
