use std::str::FromStr;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::core::types::{ReferenceId, RuleKey};
use crate::core::violation::{ReferenceViolation, Violation};
use crate::parsing::{validate_reference, validate_violation, ParseError};
use crate::utils::validation::check_violation_limit;

/// Read the data rows of a delimited file, skipping blanks, comments and an
/// optional header row whose first field is one of `header_names`.
///
/// CSV fields may be quoted so messages can contain the delimiter; TSV fields
/// are taken literally. Yields `(1-based line number, fields)`.
fn data_rows(
    text: &str,
    delimiter: char,
    header_names: &[&str],
) -> Result<Vec<(u64, StringRecord)>, ParseError> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| ParseError::InvalidFormat(format!("Unsupported delimiter {delimiter:?}")))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(delimiter != b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut first_data_line = true;

    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) || record.get(0).is_some_and(|f| f.starts_with('#')) {
            continue;
        }

        if first_data_line {
            first_data_line = false;
            let first = record.get(0).map(str::to_lowercase).unwrap_or_default();
            if header_names.contains(&first.as_str()) {
                continue;
            }
        }

        let line_num = record.position().map_or(0, csv::Position::line);
        rows.push((line_num, record));
    }

    Ok(rows)
}

/// Parse an optional cell; empty means absent
fn optional<T: FromStr>(
    fields: &StringRecord,
    index: usize,
    column: &str,
    line_num: u64,
) -> Result<Option<T>, ParseError> {
    match fields.get(index) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ParseError::InvalidFormat(format!("Invalid {column} on line {line_num}: '{value}'"))
        }),
    }
}

/// Parse TSV/CSV text with columns: rule_key, line, message, [checksum], [permanent_id]
///
/// # Errors
///
/// Returns `ParseError::Csv` for malformed quoting, `ParseError::InvalidFormat`
/// if lines have fewer than 3 or more than 5 fields or contain invalid numbers,
/// `ParseError::Validation` for invalid records, or
/// `ParseError::TooManyViolations` if the limit is exceeded.
pub fn parse_violations_text(text: &str, delimiter: char) -> Result<Vec<Violation>, ParseError> {
    let mut violations = Vec::new();

    for (line_num, fields) in data_rows(text, delimiter, &["rule_key", "rule"])? {
        if fields.len() < 3 || fields.len() > 5 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has {} fields, expected 3 to 5",
                fields.len()
            )));
        }

        let mut violation = Violation {
            rule_key: RuleKey::new(&fields[0]),
            line: optional(&fields, 1, "line", line_num)?,
            message: fields[2].to_string(),
            checksum: optional(&fields, 3, "checksum", line_num)?,
            permanent_id: optional(&fields, 4, "permanent_id", line_num)?,
        };
        validate_violation(&mut violation)?;

        // Check violation limit for DOS protection
        if check_violation_limit(violations.len()).is_some() {
            return Err(ParseError::TooManyViolations(violations.len()));
        }

        violations.push(violation);
    }

    Ok(violations)
}

/// Parse TSV/CSV text with columns:
/// id, rule_key, line, message, checksum, permanent_id, created_at
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line does not have exactly 7 fields,
/// the id or a number is invalid, or `created_at` is not RFC 3339;
/// `ParseError::Validation` for invalid records; or
/// `ParseError::TooManyViolations` if the limit is exceeded.
pub fn parse_references_text(
    text: &str,
    delimiter: char,
) -> Result<Vec<ReferenceViolation>, ParseError> {
    let mut references = Vec::new();

    for (line_num, fields) in data_rows(text, delimiter, &["id"])? {
        if fields.len() != 7 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has {} fields, expected 7",
                fields.len()
            )));
        }

        let id: i64 = fields[0].parse().map_err(|_| {
            ParseError::InvalidFormat(format!("Invalid id on line {line_num}: '{}'", &fields[0]))
        })?;
        let created_at = DateTime::parse_from_rfc3339(&fields[6])
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| {
                ParseError::InvalidFormat(format!(
                    "Invalid created_at on line {line_num}: '{}' ({e})",
                    &fields[6]
                ))
            })?;

        let mut reference = ReferenceViolation {
            id: ReferenceId(id),
            rule_key: RuleKey::new(&fields[1]),
            line: optional(&fields, 2, "line", line_num)?,
            message: fields[3].to_string(),
            checksum: optional(&fields, 4, "checksum", line_num)?,
            permanent_id: optional(&fields, 5, "permanent_id", line_num)?,
            created_at,
        };
        validate_reference(&mut reference)?;

        if check_violation_limit(references.len()).is_some() {
            return Err(ParseError::TooManyViolations(references.len()));
        }

        references.push(reference);
    }

    Ok(references)
}
