// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — build PDFs from directories of photographed pages, and split PDFs
// by page-range files.
//
// Entry point. Initialises logging, loads configuration, and dispatches to
// the combine and split pipelines.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use folio_core::{FolioConfig, TracingDiagnostics};
use folio_document::{RangeFile, assemble_directory, combine_root, split_document};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    tracing::debug!("Folio starting");

    let mut config = match &cli.config {
        Some(path) => FolioConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FolioConfig::default(),
    };
    cli.command.apply_overrides(&mut config);

    run(&cli.command, &config)
}

fn run(command: &Command, config: &FolioConfig) -> Result<()> {
    let diagnostics = TracingDiagnostics;
    match command {
        Command::Combine { root, .. } => {
            let report = combine_root(root, &config.assemble, &diagnostics)
                .with_context(|| format!("failed to combine {}", root.display()))?;
            if !report.is_complete() {
                bail!(
                    "{} of {} directories had no page images",
                    report.empty.len(),
                    report.empty.len() + report.written.len()
                );
            }
        }
        Command::Dir { dir, output, .. } => {
            assemble_directory(dir, output, &config.assemble, &diagnostics)
                .with_context(|| format!("failed to assemble {}", dir.display()))?;
            tracing::info!("Saved {}", output.display());
        }
        Command::Split { ranges, pdf, .. } => {
            split_document(pdf, &RangeFile::new(ranges), &config.split)
                .with_context(|| format!("failed to split {}", pdf.display()))?;
        }
    }
    Ok(())
}
