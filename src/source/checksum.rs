use serde::Serialize;
use tracing::warn;

/// Convert a 0-based position into a 1-based line number
#[inline]
pub(crate) fn line_number(index: usize) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    {
        (index + 1) as u32
    }
}

/// Remove every whitespace run from a line.
///
/// `"\tvoid  method()  {\n"` and `"  void method() {"` both normalize to
/// `"voidmethod(){"`.
#[must_use]
pub fn normalize_line(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whitespace-insensitive MD5 of a single line, as 32 lowercase hex characters
#[must_use]
pub fn normalized_checksum(line: &str) -> String {
    let digest = md5::compute(normalize_line(line).as_bytes());
    format!("{digest:x}")
}

/// Split text on `\r\n`, `\n` or `\r`.
///
/// A terminator at the very end yields a trailing empty line, and empty text
/// yields a single empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut saw_crlf = false;
    let mut saw_lone = false;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                saw_lone = true;
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    saw_crlf = true;
                    i += 2;
                } else {
                    saw_lone = true;
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&text[start..]);

    if saw_crlf && saw_lone {
        warn!("Source text mixes CRLF with bare CR/LF line endings");
    }

    lines
}

/// A line of a source revision and its checksum, only used while diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub line_number: u32,
    pub checksum: &'a str,
}

/// Per-line checksums of one revision of a file, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChecksumSet {
    checksums: Vec<String>,
}

impl ChecksumSet {
    /// Compute the checksum of every physical line of `text`
    #[must_use]
    pub fn of_text(text: &str) -> Self {
        let checksums = split_lines(text)
            .into_iter()
            .map(normalized_checksum)
            .collect();
        Self { checksums }
    }

    /// Wrap checksums computed elsewhere (e.g. loaded from a previous analysis)
    #[must_use]
    pub fn from_checksums(checksums: Vec<String>) -> Self {
        Self { checksums }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checksums.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checksums.is_empty()
    }

    /// Checksum of a 1-based line, `None` when out of range
    #[must_use]
    pub fn checksum_at(&self, line: u32) -> Option<&str> {
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        self.checksums.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.checksums
    }

    pub fn source_lines(&self) -> impl Iterator<Item = SourceLine<'_>> {
        self.checksums
            .iter()
            .enumerate()
            .map(|(i, checksum)| SourceLine {
                line_number: line_number(i),
                checksum,
            })
    }

    /// 1-based lines carrying `checksum`, in file order
    pub fn lines_matching<'a>(&'a self, checksum: &'a str) -> impl Iterator<Item = u32> + 'a {
        self.source_lines()
            .filter(move |l| l.checksum == checksum)
            .map(|l| l.line_number)
    }
}

/// Checksums of every line of a file's content
#[must_use]
pub fn checksums_of_file(text: &str) -> Vec<String> {
    ChecksumSet::of_text(text).checksums
}
