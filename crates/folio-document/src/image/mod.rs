// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — EXIF orientation, transparency flattening, and the per-page
// decode pipeline.

pub mod orientation;
pub mod processor;
pub mod transparency;

pub use orientation::{Transpose, normalize_orientation, transform_for};
pub use processor::PageImage;
pub use transparency::flatten_transparency;
