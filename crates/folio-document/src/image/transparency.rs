// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Alpha channel removal. PDF pages are composed from opaque RGB, so any alpha
// is dropped (not composited) and a warning is raised when that changes what
// the page looks like.

use folio_core::Diagnostics;
use image::DynamicImage;
use tracing::debug;

/// Message attached to the transparency warning.
pub const TRANSPARENCY_WARNING: &str = "image contains transparency; color will be off";

/// Smallest and largest alpha value in the image, scaled to 16 bits.
///
/// Returns `None` for colour types without an alpha channel.
pub fn alpha_extrema(image: &DynamicImage) -> Option<(u16, u16)> {
    if !image.color().has_alpha() {
        return None;
    }
    let rgba = image.to_rgba16();
    let extrema = rgba
        .pixels()
        .map(|pixel| pixel.0[3])
        .fold((u16::MAX, u16::MIN), |(lo, hi), alpha| {
            (lo.min(alpha), hi.max(alpha))
        });
    Some(extrema)
}

/// Drop the alpha channel of `image`, warning through `diagnostics` when any
/// pixel was not fully opaque. Images without alpha are returned unchanged.
pub fn flatten_transparency(
    image: DynamicImage,
    source: &str,
    diagnostics: &dyn Diagnostics,
) -> DynamicImage {
    let Some((min, max)) = alpha_extrema(&image) else {
        return image;
    };

    // An empty image folds to (MAX, MIN); treat it as opaque.
    let opaque = image.width() == 0 || image.height() == 0 || (min, max) == (u16::MAX, u16::MAX);
    if !opaque {
        diagnostics.warn(source, TRANSPARENCY_WARNING);
    }

    debug!(source, color = ?image.color(), "Dropping alpha channel");
    DynamicImage::ImageRgb8(image.to_rgb8())
}
