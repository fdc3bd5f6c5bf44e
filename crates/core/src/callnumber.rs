//! Call number normalization
//!
//! Catalog records often carry several identifiers in their first call number value, for
//! example an accession number followed by box details (`AR 25.3 Box 2`) or a microfilm
//! number followed by the accession number it was filmed from (`MF 912 AR 7014`). The
//! normalized form keeps only the accession number, which is what the report sorts on.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ReportError;

/// Number of leading characters dropped before the numeric part of a sort key
pub const SORT_KEY_PREFIX_LEN: usize = 3;

/// Which normalization rule applies to a call number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationRule {
    /// Starts with `A` and contains `.`: keep the word/space run before the first `.`
    AccessionPrefix,
    /// Starts with `M` and contains `AR`: keep everything from the first `AR`
    MicrofilmWithAccession,
    /// Kept as is
    Identity,
}

/// Pick the first rule whose precondition holds.
pub fn classify_call_number(value: &str) -> NormalizationRule {
    if value.starts_with('A') && value.contains('.') {
        NormalizationRule::AccessionPrefix
    } else if value.starts_with('M') && value.contains("AR") {
        NormalizationRule::MicrofilmWithAccession
    } else {
        NormalizationRule::Identity
    }
}

/// Normalize a call number to the value used as the report's primary key.
///
/// A rule whose pattern fails to match leaves the value unchanged. The microfilm rule keeps
/// everything from the *first* `AR`; older tooling with a greedy `.*(AR.*)` kept the last one.
pub fn normalize_call_number(value: &str) -> String {
    static RE_ACCESSION: OnceLock<Regex> = OnceLock::new();
    static RE_FROM_AR: OnceLock<Regex> = OnceLock::new();

    match classify_call_number(value) {
        NormalizationRule::AccessionPrefix => {
            let re = RE_ACCESSION.get_or_init(|| Regex::new(r"([\w\s]*)\.").unwrap());
            re.captures(value)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| value.to_string())
        }
        NormalizationRule::MicrofilmWithAccession => {
            let re = RE_FROM_AR.get_or_init(|| Regex::new(r"(?s)AR.*").unwrap());
            re.find(value)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| value.to_string())
        }
        NormalizationRule::Identity => value.to_string(),
    }
}

/// Extract the integer sort key: drop the first three characters and parse the rest.
///
/// Surrounding whitespace in the remainder is ignored: `AR 25` and `AR  25 ` both yield 25.
pub fn sort_key(main_call_number: &str) -> Result<i64, ReportError> {
    let fail = |reason: &str| ReportError::SortKey {
        call_number: main_call_number.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = main_call_number.char_indices().skip(SORT_KEY_PREFIX_LEN);
    let rest = match chars.next() {
        Some((offset, _)) => &main_call_number[offset..],
        None => return Err(fail("nothing follows the three-character prefix")),
    };

    let digits = rest.trim();
    if digits.is_empty() {
        return Err(fail("nothing follows the three-character prefix"));
    }

    digits
        .parse::<i64>()
        .map_err(|e| fail(&format!("{digits:?} is not an integer ({e})")))
}
