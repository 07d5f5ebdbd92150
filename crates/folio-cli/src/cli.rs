// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and their mapping onto pipeline configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio_core::FolioConfig;

/// Build PDFs from directories of photographed pages, and split PDFs by
/// page-range files.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Build PDFs from page images and split PDFs by range file", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Verbose output - log every page and extraction step
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    ///
    /// Values given on the command line override values from the file.
    #[arg(long, global = true, value_name = "FILE", env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one PDF per subdirectory of ROOT, named after the subdirectory
    ///
    /// Example:
    ///   folio combine scans/ --author "County archive" --title-from-dir
    Combine {
        /// Directory holding one subdirectory of page images per document
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Set author metadata for every output PDF
        #[arg(long, value_name = "TEXT")]
        author: Option<String>,

        /// Use each subdirectory's name as its PDF title
        #[arg(long)]
        title_from_dir: bool,
    },

    /// Convert the page images in one directory into a single PDF
    ///
    /// Example:
    ///   folio dir scans/box-3 -o box-3.pdf --title "Box 3"
    Dir {
        /// Directory of page images, assembled in file name order
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Set title metadata for the output PDF
        #[arg(long, value_name = "TEXT")]
        title: Option<String>,

        /// Set author metadata for the output PDF
        #[arg(long, value_name = "TEXT")]
        author: Option<String>,

        /// Add pages to the end of an existing output file
        #[arg(long)]
        append: bool,
    },

    /// Split PDF into one document per line of RANGES
    ///
    /// Each line reads `title: ranges`, for example `Chapter1: 2-4,7`.
    /// Page numbers are 1-based and inclusive.
    Split {
        /// Range file
        #[arg(value_name = "RANGES")]
        ranges: PathBuf,

        /// Source PDF
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Directory receiving `<title>.pdf` outputs
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

impl Command {
    /// Fold this command's flags over `config`.
    pub fn apply_overrides(&self, config: &mut FolioConfig) {
        match self {
            Command::Combine {
                author,
                title_from_dir,
                ..
            } => {
                if author.is_some() {
                    config.assemble.author = author.clone();
                }
                if *title_from_dir {
                    config.assemble.title_from_directory = true;
                }
            }
            Command::Dir {
                title,
                author,
                append,
                ..
            } => {
                if title.is_some() {
                    config.assemble.title = title.clone();
                }
                if author.is_some() {
                    config.assemble.author = author.clone();
                }
                if *append {
                    config.assemble.append = true;
                }
            }
            Command::Split { output_dir, .. } => {
                if let Some(dir) = output_dir {
                    config.split.output_dir = dir.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_flags_override_file_values() {
        let cli = Cli::try_parse_from([
            "folio",
            "combine",
            "scans",
            "--author",
            "Archivist",
            "--title-from-dir",
        ])
        .unwrap();

        let mut config = FolioConfig::default();
        config.assemble.author = Some("From file".into());
        cli.command.apply_overrides(&mut config);

        assert_eq!(config.assemble.author.as_deref(), Some("Archivist"));
        assert!(config.assemble.title_from_directory);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let cli = Cli::try_parse_from(["folio", "dir", "pages", "-o", "out.pdf"]).unwrap();

        let mut config = FolioConfig::default();
        config.assemble.title = Some("From file".into());
        config.assemble.append = true;
        cli.command.apply_overrides(&mut config);

        assert_eq!(config.assemble.title.as_deref(), Some("From file"));
        assert!(config.assemble.append);
    }

    #[test]
    fn split_takes_ranges_then_pdf() {
        let cli = Cli::try_parse_from([
            "folio", "-v", "split", "ranges.txt", "book.pdf", "-o", "parts",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Command::Split { ranges, pdf, .. } = &cli.command else {
            panic!("expected split, got {:?}", cli.command);
        };
        assert_eq!(ranges, &PathBuf::from("ranges.txt"));
        assert_eq!(pdf, &PathBuf::from("book.pdf"));

        let mut config = FolioConfig::default();
        cli.command.apply_overrides(&mut config);
        assert_eq!(config.split.output_dir, PathBuf::from("parts"));
    }

    #[test]
    fn dir_requires_output() {
        assert!(Cli::try_parse_from(["folio", "dir", "pages"]).is_err());
    }
}
