//! Command-line interface for violation-tracker.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **track**: Match the violations of a new analysis against the previous one
//! - **checksums**: Print the per-line checksums of a source file
//! - **diff**: Print the line mapping between two revisions of a file
//!
//! ## Usage
//!
//! ```text
//! # Classify current violations, translating lines through the file's two revisions
//! violation-tracker track current.json previous.json \
//!     --reference-source Foo.java.orig --current-source Foo.java
//!
//! # JSON output for scripting
//! violation-tracker --format json track current.tsv previous.tsv
//!
//! # Inspect how lines moved
//! violation-tracker diff Foo.java.orig Foo.java
//! ```

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

pub mod checksums;
pub mod diff;
pub mod track;

#[derive(Parser)]
#[command(name = "violation-tracker")]
#[command(version)]
#[command(about = "Track static-analysis violations across revisions of a source file")]
#[command(
    long_about = "violation-tracker decides which findings of a new analysis are genuinely new and which persist from the previous analysis of the same file.\n\nIt matches findings by:\n- Permanent id, when both sides have one\n- Whitespace-insensitive line checksum\n- Line position, translated across inserted and removed lines\n- Message, for findings without a line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify current violations as new or tracked
    Track(track::TrackArgs),

    /// Print per-line checksums of a source file
    Checksums(checksums::ChecksumsArgs),

    /// Print the line mapping between two revisions of a file
    Diff(diff::DiffArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Read a source file as UTF-8 text, replacing invalid sequences
pub(crate) fn read_source(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
