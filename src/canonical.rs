//! Canonical names for archived JSON files.
//!
//! The archive keeps re-downloaded records next to the originals with a
//! parenthesized counter before the extension (`EPA-0001(1).json`,
//! `EPA-0001(1)(2).json`). All of those variants describe the same record, so
//! they collapse to one canonical name before being counted.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Extension of archived record files.
pub const JSON_SUFFIX: &str = ".json";

fn version_marker() -> &'static Regex {
    static VERSION_MARKER: OnceLock<Regex> = OnceLock::new();
    VERSION_MARKER.get_or_init(|| {
        Regex::new(r"(?:\([0-9]+\))+\.json$").expect("version marker pattern is valid")
    })
}

/// Base name of an object key (everything after the last `/`).
pub fn base_name(key: &str) -> &str {
    match key.rfind('/') {
        Some(idx) => &key[idx + 1..],
        None => key,
    }
}

/// Whether an object key names a JSON record.
pub fn is_json_key(key: &str) -> bool {
    key.ends_with(JSON_SUFFIX)
}

/// Map an object key to the canonical filename of the record it holds.
///
/// Any run of `(<digits>)` markers directly before `.json` is replaced by a
/// plain `.json`. Names without markers are returned borrowed and unchanged.
///
/// ```
/// use docket_stats::canonical_filename;
///
/// assert_eq!(canonical_filename("raw-data/EPA/x/comments/c(1)(2).json"), "c.json");
/// assert_eq!(canonical_filename("report(1).txt"), "report(1).txt");
/// ```
pub fn canonical_filename(key: &str) -> Cow<'_, str> {
    version_marker().replace(base_name(key), JSON_SUFFIX)
}
