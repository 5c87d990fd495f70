use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;

use crate::cli::{read_source, OutputFormat};
use crate::core::violation::{ReferenceViolation, Violation};
use crate::matching::classification::{MatchResult, TrackedViolation};
use crate::matching::engine::{TrackingConfig, ViolationMatcher};
use crate::parsing;

#[derive(Args)]
pub struct TrackArgs {
    /// Violations of the current analysis (JSON, TSV or CSV)
    #[arg(required = true)]
    pub current: PathBuf,

    /// Violations recorded by the previous analysis (JSON, TSV or CSV)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Current revision of the analyzed file
    #[arg(long, requires = "reference_source")]
    pub current_source: Option<PathBuf>,

    /// Previous revision of the analyzed file
    #[arg(long, requires = "current_source")]
    pub reference_source: Option<PathBuf>,

    /// Timestamp given to new violations (RFC 3339, defaults to now)
    #[arg(long)]
    pub analysis_time: Option<DateTime<Utc>>,

    /// Path to a JSON tracking configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Compare messages on their first N characters
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub message_max_length: Option<u32>,

    /// Fill missing checksums from the flagged line of each revision
    #[arg(long)]
    pub derive_checksums: bool,
}

/// Execute track subcommand
///
/// # Errors
///
/// Returns an error if an input or the configuration cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: TrackArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => TrackingConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TrackingConfig::default(),
    };
    if let Some(max) = args.message_max_length {
        config.message_max_length = max as usize;
    }
    if args.derive_checksums {
        config.derive_missing_checksums = true;
    }

    let current = parsing::load_violations(&args.current)
        .with_context(|| format!("Failed to load {}", args.current.display()))?;
    let reference = parsing::load_references(&args.reference)
        .with_context(|| format!("Failed to load {}", args.reference.display()))?;

    if verbose {
        eprintln!(
            "Loaded {} current and {} reference violations",
            current.len(),
            reference.len()
        );
    }

    let analysis_time = args.analysis_time.unwrap_or_else(Utc::now);
    let matcher = ViolationMatcher::with_config(config);

    let result = match (&args.reference_source, &args.current_source) {
        (Some(reference_path), Some(current_path)) => {
            let reference_source = read_source(reference_path)?;
            let current_source = read_source(current_path)?;
            matcher.match_with_sources(
                &current,
                &reference,
                &reference_source,
                &current_source,
                analysis_time,
            )
        }
        _ => matcher.match_violations(&current, &reference, None, analysis_time),
    };

    let tracked = result.apply(&current);

    match format {
        OutputFormat::Text => print_text_results(&tracked, &reference, &result),
        OutputFormat::Json => print_json_results(&tracked, &reference, &result)?,
        OutputFormat::Tsv => print_tsv_results(&tracked),
    }

    Ok(())
}

fn line_label(line: Option<u32>) -> String {
    line.map_or_else(|| "-".to_string(), |l| l.to_string())
}

fn print_text_results(
    tracked: &[TrackedViolation],
    reference: &[ReferenceViolation],
    result: &MatchResult,
) {
    let summary = result.summary();

    println!("Tracking Results");
    println!("{}", "=".repeat(60));
    println!("  New: {}", summary.new);
    println!("  Tracked: {}", summary.tracked);
    println!("  Closed: {}", summary.closed);

    println!("\nViolations:");
    for t in tracked {
        let Violation {
            rule_key,
            line,
            message,
            ..
        } = &t.violation;
        let status = match (t.reference_id, t.tier) {
            (Some(id), Some(tier)) => format!("TRACKED #{id} via {tier}"),
            _ => "NEW".to_string(),
        };
        println!(
            "  [{status}] {rule_key} line {} since {}: {message}",
            line_label(*line),
            t.created_at.to_rfc3339()
        );
    }

    if !result.unmatched_references.is_empty() {
        println!("\nClosed:");
        for u in &result.unmatched_references {
            let r = &reference[u.reference_index];
            let location = if u.removed {
                "removed".to_string()
            } else {
                format!("line {}", line_label(u.relocated_line))
            };
            println!("  #{} {} {location}: {}", u.reference_id, r.rule_key, r.message);
        }
    }
}

fn print_json_results(
    tracked: &[TrackedViolation],
    reference: &[ReferenceViolation],
    result: &MatchResult,
) -> anyhow::Result<()> {
    let closed: Vec<serde_json::Value> = result
        .unmatched_references
        .iter()
        .map(|u| {
            let r = &reference[u.reference_index];
            serde_json::json!({
                "id": u.reference_id,
                "rule_key": r.rule_key,
                "line": r.line,
                "relocated_line": u.relocated_line,
                "removed": u.removed,
                "message": r.message,
                "created_at": r.created_at,
            })
        })
        .collect();

    let output = serde_json::json!({
        "summary": result.summary(),
        "violations": tracked,
        "closed": closed,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(tracked: &[TrackedViolation]) {
    println!("rule_key\tline\tis_new\tcreated_at\tpermanent_id\treference_id\ttier\tmessage");
    for t in tracked {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            escape_tsv_field(t.violation.rule_key.as_str()),
            t.violation.line.map(|l| l.to_string()).unwrap_or_default(),
            t.is_new,
            t.created_at.to_rfc3339(),
            t.violation
                .permanent_id
                .map(|p| p.to_string())
                .unwrap_or_default(),
            t.reference_id.map(|r| r.to_string()).unwrap_or_default(),
            t.tier.map(|tier| tier.to_string()).unwrap_or_default(),
            escape_tsv_field(&t.violation.message),
        );
    }
}

/// Escape the characters that would break a TSV row
fn escape_tsv_field(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '\t', '\n', '\r']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
