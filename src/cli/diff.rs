use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_source, OutputFormat};
use crate::source::checksum::ChecksumSet;
use crate::source::diff::LineDiffMapper;

#[derive(Args)]
pub struct DiffArgs {
    /// Previous revision of the file
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Current revision of the file
    #[arg(required = true)]
    pub current: PathBuf,
}

/// Execute diff subcommand
///
/// # Errors
///
/// Returns an error if either file cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DiffArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let reference = ChecksumSet::of_text(&read_source(&args.reference)?);
    let current = ChecksumSet::of_text(&read_source(&args.current)?);
    let map = LineDiffMapper::new(&reference, &current).compute();

    if verbose {
        eprintln!(
            "Mapped {} of {} reference lines ({} current lines)",
            map.len(),
            reference.len(),
            current.len()
        );
    }

    match format {
        OutputFormat::Text => {
            println!("Line Mapping");
            println!("{}", "=".repeat(60));
            for line in reference.source_lines() {
                match map.get(line.line_number) {
                    Some(current_line) => {
                        println!("  {:>6} -> {current_line}", line.line_number);
                    }
                    None => println!("  {:>6} -> (removed or changed)", line.line_number),
                }
            }
        }
        OutputFormat::Json => {
            let pairs: Vec<serde_json::Value> = map
                .iter()
                .map(|(r, c)| serde_json::json!({ "reference": r, "current": c }))
                .collect();
            let output = serde_json::json!({
                "reference_lines": reference.len(),
                "current_lines": current.len(),
                "mapping": pairs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("reference\tcurrent");
            for (r, c) in map.iter() {
                println!("{r}\t{c}");
            }
        }
    }

    Ok(())
}
