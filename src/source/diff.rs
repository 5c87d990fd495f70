use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::source::checksum::ChecksumSet;

/// Partial, order-preserving translation of reference line numbers to current line numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineMap {
    lines: BTreeMap<u32, u32>,
}

impl LineMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from explicit `(reference_line, current_line)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self {
            lines: pairs.into_iter().collect(),
        }
    }

    /// Current line of an unchanged reference line, `None` if it was not mapped
    #[must_use]
    pub fn get(&self, reference_line: u32) -> Option<u32> {
        self.lines.get(&reference_line).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Pairs in reference line order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.lines.iter().map(|(&r, &c)| (r, c))
    }
}

/// Aligns two revisions of a file by line checksum
pub struct LineDiffMapper<'a> {
    reference: &'a ChecksumSet,
    current: &'a ChecksumSet,
}

impl<'a> LineDiffMapper<'a> {
    pub fn new(reference: &'a ChecksumSet, current: &'a ChecksumSet) -> Self {
        Self { reference, current }
    }

    /// Map every reference line to the first current line with the same checksum
    /// that lies after the previously mapped current line.
    ///
    /// Reference lines with no such candidate stay unmapped, so the result is
    /// strictly increasing on both sides.
    #[must_use]
    pub fn compute(&self) -> LineMap {
        // Index: checksum -> current line numbers, ascending
        let mut positions: HashMap<&str, Vec<u32>> = HashMap::new();
        for line in self.current.source_lines() {
            positions
                .entry(line.checksum)
                .or_default()
                .push(line.line_number);
        }

        let mut lines = BTreeMap::new();
        let mut last_current = 0u32;

        for line in self.reference.source_lines() {
            let Some(candidates) = positions.get(line.checksum) else {
                continue;
            };
            let next = candidates.partition_point(|&c| c <= last_current);
            if let Some(&current_line) = candidates.get(next) {
                lines.insert(line.line_number, current_line);
                last_current = current_line;
            }
        }

        debug!(
            "Mapped {} of {} reference lines onto {} current lines",
            lines.len(),
            self.reference.len(),
            self.current.len()
        );

        LineMap { lines }
    }
}

/// Compute the line map between two revisions of a file's content
#[must_use]
pub fn map_lines(reference_text: &str, current_text: &str) -> LineMap {
    let reference = ChecksumSet::of_text(reference_text);
    let current = ChecksumSet::of_text(current_text);
    LineDiffMapper::new(&reference, &current).compute()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_maps_identity() {
        let text = "a\nb\nc";
        let map = map_lines(text, text);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_inserted_lines_shift_mapping() {
        let reference = "package foo;\nclass A {\n  void run() {}\n}";
        let current = "// header\n// more\npackage foo;\nclass A {\n  void run() {}\n}";
        let map = map_lines(reference, current);
        assert_eq!(map.get(1), Some(3));
        assert_eq!(map.get(2), Some(4));
        assert_eq!(map.get(3), Some(5));
        assert_eq!(map.get(4), Some(6));
    }

    #[test]
    fn test_removed_lines_are_unmapped() {
        let reference = "a\nremoved\nb";
        let current = "a\nb";
        let map = map_lines(reference, current);
        assert_eq!(map.get(1), Some(1));
        assert_eq!(map.get(2), None);
        assert_eq!(map.get(3), Some(2));
    }

    #[test]
    fn test_reformatting_keeps_mapping() {
        let map = map_lines("int  x = 1;\nint y=2;", "\tint x = 1;\n  int y = 2;");
        assert_eq!(map.get(1), Some(1));
        // "int y=2;" and "int y = 2;" normalize identically
        assert_eq!(map.get(2), Some(2));
    }

    #[test]
    fn test_duplicate_lines_resolve_in_order() {
        let reference = "}\n}\n}";
        let current = "x\n}\n}";
        let map = map_lines(reference, current);
        assert_eq!(map.get(1), Some(2));
        assert_eq!(map.get(2), Some(3));
        assert_eq!(map.get(3), None);
    }

    #[test]
    fn test_mapping_is_monotonic() {
        let reference = "a\nb\nc\nd";
        let current = "d\nc\nb\na";
        let map = map_lines(reference, current);
        let pairs: Vec<_> = map.iter().collect();
        assert!(pairs.windows(2).all(|w| w[0].1 < w[1].1));
        // "a" takes the last current line, nothing after it can map
        assert_eq!(pairs, vec![(1, 4)]);
    }

    #[test]
    fn test_empty_current_maps_nothing() {
        let reference = ChecksumSet::of_text("a\nb");
        let current = ChecksumSet::from_checksums(Vec::new());
        assert!(LineDiffMapper::new(&reference, &current).compute().is_empty());
    }
}
