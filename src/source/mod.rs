//! Source text processing: line checksums and line alignment between revisions.
//!
//! - [`checksum`]: Whitespace-insensitive per-line MD5 checksums
//! - [`diff`]: Order-preserving mapping of reference lines onto current lines
//!
//! ## Example
//!
//! ```rust
//! use violation_tracker::source::diff::map_lines;
//!
//! let reference = "class A {\n  int x;\n}";
//! let current = "// added\nclass A {\n    int   x;\n}";
//!
//! let map = map_lines(reference, current);
//! assert_eq!(map.get(2), Some(3));
//! ```

pub mod checksum;
pub mod diff;

pub use checksum::{checksums_of_file, normalized_checksum, ChecksumSet, SourceLine};
pub use diff::{map_lines, LineDiffMapper, LineMap};
