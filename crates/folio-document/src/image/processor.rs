// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page image pipeline — decode a photographed page, flatten transparency and
// normalise EXIF orientation before it is placed on a PDF page.

use std::path::Path;

use folio_core::Diagnostics;
use folio_core::error::FolioError;
use image::DynamicImage;
use tracing::{debug, instrument};

use super::orientation::{normalize_orientation, read_orientation_tag};
use super::transparency::flatten_transparency;

/// A decoded page image together with the metadata the pipeline needs.
///
/// Each step consumes `self` and returns the transformed image, so the usual
/// sequence reads as a chain:
///
/// ```ignore
/// let page = PageImage::open("box-1/IMG_0001.JPG")?
///     .flatten(&diagnostics)
///     .normalize_orientation();
/// ```
pub struct PageImage {
    /// The current working image.
    image: DynamicImage,
    /// Raw EXIF orientation value, if one could be read.
    orientation: Option<u32>,
    /// Identifier used in warnings (normally the file path).
    source: String,
}

impl PageImage {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file and read its orientation tag.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|err| {
            FolioError::Image(format!("failed to open {}: {}", path.display(), err))
        })?;
        let orientation = read_orientation_tag(path);
        debug!(
            width = image.width(),
            height = image.height(),
            ?orientation,
            "Page image decoded"
        );
        Ok(Self {
            image,
            orientation,
            source: path.display().to_string(),
        })
    }

    /// Wrap an already-decoded image.
    pub fn from_dynamic(
        image: DynamicImage,
        orientation: Option<u32>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            image,
            orientation,
            source: source.into(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn orientation(&self) -> Option<u32> {
        self.orientation
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Pipeline steps -------------------------------------------------------

    /// Drop any alpha channel, warning if it was not fully opaque.
    pub fn flatten(self, diagnostics: &dyn Diagnostics) -> Self {
        let image = flatten_transparency(self.image, &self.source, diagnostics);
        Self { image, ..self }
    }

    /// Apply the orientation tag. The tag is consumed so a second call is a
    /// no-op.
    pub fn normalize_orientation(self) -> Self {
        let image = normalize_orientation(self.image, self.orientation);
        Self {
            image,
            orientation: None,
            source: self.source,
        }
    }

    /// Decode, flatten, then normalise: the full per-file pipeline.
    pub fn load(path: impl AsRef<Path>, diagnostics: &dyn Diagnostics) -> Result<Self, FolioError> {
        Ok(Self::open(path)?.flatten(diagnostics).normalize_orientation())
    }
}
