// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembly — turn a directory of photographed pages into one PDF, or a
// root of such directories into one PDF each.

use std::path::{Path, PathBuf};

use folio_core::error::{FolioError, Result};
use folio_core::{AssembleConfig, Diagnostics};
use glob::{MatchOptions, Pattern};
use tracing::{error, info, instrument};

use crate::image::PageImage;
use crate::pdf::{PageSink, PageWrite, PdfWriter};

/// Page image files directly inside `dir` with the configured extension,
/// sorted by file name.
pub fn page_images(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FolioError::InvalidInput(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let extension = extension.trim_start_matches('.');
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(extension)
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)
        .map_err(|err| FolioError::InvalidInput(format!("bad page pattern {pattern}: {err}")))?
    {
        let path = entry.map_err(|err| FolioError::Io(err.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Feed every page image in `dir` through `sink`: load, flatten, normalise,
/// write. Only the first write carries the document metadata.
///
/// Fails with [`FolioError::EmptyInput`] before touching the sink when there
/// are no page images. Returns the number of pages written.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn assemble_into(
    dir: &Path,
    config: &AssembleConfig,
    diagnostics: &dyn Diagnostics,
    sink: &mut dyn PageSink,
) -> Result<usize> {
    config.validate()?;
    let files = page_images(dir, &config.image_extension)?;
    let Some((first, rest)) = files.split_first() else {
        return Err(FolioError::EmptyInput {
            dir: dir.to_path_buf(),
            extension: config.image_extension.clone(),
        });
    };

    let info = config.document_info();
    let page = PageImage::load(first, diagnostics)?;
    sink.write_page(page.as_dynamic(), PageWrite::first(&info, config.append))?;

    for file in rest {
        let page = PageImage::load(file, diagnostics)?;
        sink.write_page(page.as_dynamic(), PageWrite::next())?;
    }

    sink.finish()?;
    Ok(files.len())
}

/// Convert the page images in `dir` into the PDF at `output`.
pub fn assemble_directory(
    dir: &Path,
    output: &Path,
    config: &AssembleConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<usize> {
    let mut writer = PdfWriter::new(output, config.dpi);
    assemble_into(dir, config, diagnostics, &mut writer)
}

/// Outcome of combining a root directory.
#[derive(Debug, Default)]
pub struct CombineReport {
    /// PDFs written, in processing order.
    pub written: Vec<PathBuf>,
    /// Subdirectories skipped because they held no page images.
    pub empty: Vec<PathBuf>,
}

impl CombineReport {
    pub fn is_complete(&self) -> bool {
        self.empty.is_empty()
    }
}

/// Build `<root>/<name>.pdf` for every subdirectory `<root>/<name>`, in name
/// order.
///
/// A subdirectory without page images is logged and recorded in the report
/// while the others carry on; any other error stops the run.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn combine_root(
    root: &Path,
    config: &AssembleConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<CombineReport> {
    let mut directories = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            directories.push(path);
        }
    }
    directories.sort();

    let mut report = CombineReport::default();
    for directory in directories {
        let Some(name) = directory.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        info!("Processing {name}");

        let mut dir_config = config.clone();
        if config.title_from_directory && dir_config.title.is_none() {
            dir_config.title = Some(name.clone());
        }
        let output = root.join(format!("{name}.pdf"));

        match assemble_directory(&directory, &output, &dir_config, diagnostics) {
            Ok(pages) => {
                info!(pages, "Saved {}", output.display());
                report.written.push(output);
            }
            Err(err @ FolioError::EmptyInput { .. }) => {
                error!("{err}");
                report.empty.push(directory);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::info::read_info;
    use folio_core::{CollectingDiagnostics, DocumentInfo, TracingDiagnostics};
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
    use lopdf::Document;

    /// Records what the assembler asks of a sink.
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<(u32, u32, Option<DocumentInfo>, bool)>,
        finished: bool,
    }

    impl PageSink for RecordingSink {
        fn write_page(&mut self, page: &DynamicImage, write: PageWrite<'_>) -> Result<()> {
            self.writes
                .push((page.width(), page.height(), write.info.cloned(), write.append));
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([200, 190, 180]))
            .save(dir.join(name))
            .unwrap();
    }

    fn config() -> AssembleConfig {
        AssembleConfig {
            title: Some("Parish register".into()),
            author: Some("County archive".into()),
            ..AssembleConfig::default()
        }
    }

    #[test]
    fn page_images_sorted_by_name_and_extension_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write_jpeg(dir.path(), "c.jpg", 4, 4);
        write_jpeg(dir.path(), "a.JPG", 4, 4);
        write_jpeg(dir.path(), "b.jpg", 4, 4);
        std::fs::write(dir.path().join("notes.txt"), "not a page").unwrap();

        let files = page_images(dir.path(), "jpg").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn only_first_write_carries_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_jpeg(dir.path(), "b.jpg", 20, 10);
        write_jpeg(dir.path(), "a.jpg", 10, 10);
        write_jpeg(dir.path(), "c.jpg", 30, 10);

        let mut sink = RecordingSink::default();
        let pages = assemble_into(dir.path(), &config(), &TracingDiagnostics, &mut sink).unwrap();

        assert_eq!(pages, 3);
        assert!(sink.finished);
        let widths: Vec<u32> = sink.writes.iter().map(|w| w.0).collect();
        assert_eq!(widths, vec![10, 20, 30]);

        let first_info = sink.writes[0].2.as_ref().unwrap();
        assert_eq!(first_info.title.as_deref(), Some("Parish register"));
        assert_eq!(first_info.author.as_deref(), Some("County archive"));
        assert_eq!(first_info.producer.as_deref(), Some("folio"));
        assert!(!sink.writes[0].3);
        for write in &sink.writes[1..] {
            assert!(write.2.is_none());
            assert!(write.3);
        }
    }

    #[test]
    fn append_flag_reaches_first_write_only() {
        let dir = tempfile::tempdir().unwrap();
        write_jpeg(dir.path(), "a.jpg", 8, 8);
        let config = AssembleConfig {
            append: true,
            ..config()
        };

        let mut sink = RecordingSink::default();
        assemble_into(dir.path(), &config, &TracingDiagnostics, &mut sink).unwrap();
        assert!(sink.writes[0].3);
    }

    #[test]
    fn empty_directory_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), "no pages here").unwrap();
        let output = dir.path().join("out.pdf");

        let err = assemble_directory(dir.path(), &output, &config(), &TracingDiagnostics)
            .err()
            .unwrap();

        assert!(matches!(err, FolioError::EmptyInput { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn decode_failure_aborts_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_jpeg(dir.path(), "a.jpg", 8, 8);
        std::fs::write(dir.path().join("b.jpg"), b"truncated").unwrap();
        let output = dir.path().join("out.pdf");

        let err = assemble_directory(dir.path(), &output, &config(), &TracingDiagnostics)
            .err()
            .unwrap();

        assert!(matches!(err, FolioError::Image(_)));
        assert!(!output.exists());
    }

    #[test]
    fn three_pages_in_filename_order_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("pages");
        std::fs::create_dir(&pages).unwrap();
        write_jpeg(&pages, "c.jpg", 50, 60);
        write_jpeg(&pages, "a.jpg", 10, 20);
        write_jpeg(&pages, "b.jpg", 30, 40);
        let output = dir.path().join("pages.pdf");

        let written = assemble_directory(&pages, &output, &config(), &TracingDiagnostics).unwrap();
        assert_eq!(written, 3);

        let doc = Document::load(&output).unwrap();
        let widths = crate::pdf::pages::fixtures::page_widths(&doc);
        assert_eq!(widths.len(), 3);
        for (width, expected) in widths.iter().zip([10.0, 30.0, 50.0]) {
            assert!((width - expected).abs() < 0.5, "{widths:?}");
        }

        let info = read_info(&doc);
        assert_eq!(info.title.as_deref(), Some("Parish register"));
        assert_eq!(info.author.as_deref(), Some("County archive"));
        assert_eq!(info.producer.as_deref(), Some("folio"));
    }

    #[test]
    fn sideways_photo_becomes_portrait_page() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("pages");
        std::fs::create_dir(&pages).unwrap();
        std::fs::write(
            pages.join("001.jpg"),
            crate::image::orientation::fixtures::jpeg_with_orientation(40, 20, 6),
        )
        .unwrap();
        let output = dir.path().join("pages.pdf");

        assemble_directory(&pages, &output, &config(), &TracingDiagnostics).unwrap();

        let doc = Document::load(&output).unwrap();
        let widths = crate::pdf::pages::fixtures::page_widths(&doc);
        assert_eq!(widths.len(), 1);
        assert!((widths[0] - 20.0).abs() < 0.5, "{widths:?}");
    }

    #[test]
    fn transparent_png_pages_warn_once_each() {
        let dir = tempfile::tempdir().unwrap();
        let mut see_through = RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255]));
        see_through.put_pixel(3, 3, Rgba([0, 0, 0, 10]));
        see_through.save(dir.path().join("01.png")).unwrap();
        RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255]))
            .save(dir.path().join("02.png"))
            .unwrap();

        let config = AssembleConfig {
            image_extension: "png".into(),
            ..config()
        };
        let diagnostics = CollectingDiagnostics::new();
        let mut sink = RecordingSink::default();
        assemble_into(dir.path(), &config, &diagnostics, &mut sink).unwrap();

        let warnings = diagnostics.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].0.ends_with("01.png"));
    }

    #[test]
    fn combine_root_writes_one_pdf_per_directory_and_reports_empty_ones() {
        let root = tempfile::tempdir().unwrap();
        for (name, count) in [("box-a", 2), ("box-b", 0), ("box-c", 1)] {
            let dir = root.path().join(name);
            std::fs::create_dir(&dir).unwrap();
            for index in 0..count {
                write_jpeg(&dir, &format!("{index:03}.jpg"), 12, 12);
            }
        }

        let config = AssembleConfig {
            title_from_directory: true,
            ..AssembleConfig::default()
        };
        let report = combine_root(root.path(), &config, &TracingDiagnostics).unwrap();

        assert_eq!(
            report.written,
            vec![root.path().join("box-a.pdf"), root.path().join("box-c.pdf")]
        );
        assert_eq!(report.empty, vec![root.path().join("box-b")]);
        assert!(!report.is_complete());
        assert!(!root.path().join("box-b.pdf").exists());

        let doc = Document::load(root.path().join("box-a.pdf")).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert_eq!(read_info(&doc).title.as_deref(), Some("box-a"));
    }
}
