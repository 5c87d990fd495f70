use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_source, OutputFormat};
use crate::source::checksum::ChecksumSet;

#[derive(Args)]
pub struct ChecksumsArgs {
    /// Source file to checksum
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute checksums subcommand
///
/// # Errors
///
/// Returns an error if the file cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ChecksumsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let text = read_source(&args.input)?;
    let checksums = ChecksumSet::of_text(&text);

    if verbose {
        eprintln!("{}: {} lines", args.input.display(), checksums.len());
    }

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": args.input.display().to_string(),
                "checksums": checksums,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text | OutputFormat::Tsv => {
            for line in checksums.source_lines() {
                println!("{}\t{}", line.line_number, line.checksum);
            }
        }
    }

    Ok(())
}
