// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// EXIF orientation normalisation. Maps the CIPA DC-008-2012 orientation tag to
// a fixed sequence of lossless flips and quarter turns that puts row 0 at the
// visual top and column 0 at the visual left.

use std::io::BufReader;
use std::path::Path;

use image::DynamicImage;
use tracing::debug;

/// A lossless geometric operation. Rotations are counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transpose {
    FlipHorizontal,
    FlipVertical,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Transpose {
    /// The operation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Self::Rotate90 => Self::Rotate270,
            Self::Rotate270 => Self::Rotate90,
            other => other,
        }
    }

    /// Apply to an image. `image` rotates clockwise, hence the swapped turns.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::FlipHorizontal => image.fliph(),
            Self::FlipVertical => image.flipv(),
            Self::Rotate90 => image.rotate270(),
            Self::Rotate180 => image.rotate180(),
            Self::Rotate270 => image.rotate90(),
        }
    }
}

use Transpose::*;

/// Operation sequences indexed by orientation tag. Index 0 is reserved.
const TRANSPOSE_SEQUENCES: [&[Transpose]; 9] = [
    &[],                         // 0 reserved
    &[],                         // 1 upright
    &[FlipHorizontal],           // 2 mirrored
    &[Rotate180],                // 3 upside down
    &[FlipVertical],             // 4 mirrored, upside down
    &[FlipHorizontal, Rotate90], // 5 transposed
    &[Rotate270],                // 6 needs a clockwise turn
    &[FlipVertical, Rotate90],   // 7 transversed
    &[Rotate90],                 // 8 needs a counter-clockwise turn
];

/// Operations for an orientation tag. Missing, reserved and out-of-range tags
/// yield the identity (empty) sequence.
pub fn transform_for(tag: Option<u32>) -> &'static [Transpose] {
    tag.and_then(|value| TRANSPOSE_SEQUENCES.get(value as usize).copied())
        .unwrap_or(&[])
}

/// Apply `ops` left to right.
pub fn apply_transform(image: DynamicImage, ops: &[Transpose]) -> DynamicImage {
    ops.iter().fold(image, |image, op| op.apply(image))
}

/// The sequence that undoes `ops`.
pub fn inverse_transform(ops: &[Transpose]) -> Vec<Transpose> {
    ops.iter().rev().map(|op| op.inverse()).collect()
}

/// Rotate/flip `image` upright according to its orientation tag.
pub fn normalize_orientation(image: DynamicImage, tag: Option<u32>) -> DynamicImage {
    let ops = transform_for(tag);
    if !ops.is_empty() {
        debug!(?tag, ?ops, "Normalising orientation");
    }
    apply_transform(image, ops)
}

/// Read the raw EXIF orientation value of an image file.
///
/// Any failure (no EXIF block, unreadable file, non-integer field) is
/// reported as `None`, which normalises to the identity.
pub fn read_orientation_tag(path: impl AsRef<Path>) -> Option<u32> {
    let file = std::fs::File::open(path.as_ref()).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?
        .value
        .get_uint(0)
}
