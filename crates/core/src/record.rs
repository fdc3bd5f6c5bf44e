use serde::{Deserialize, Serialize};

use crate::callnumber::normalize_call_number;
use crate::solr::RawEntry;

/// One report row
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub main_call_number: String,
    pub raw_call_number: String,
    pub title: String,
    pub extent: String,
}

/// Join extent values with single spaces and trim trailing whitespace only.
///
/// Leading and interior whitespace of the values is kept as is.
pub fn collect_extent(values: &[String]) -> String {
    let mut extent = String::new();
    for value in values {
        extent.push_str(value);
        extent.push(' ');
    }
    extent.trim_end().to_string()
}

/// Derive a report row from a search doc
pub fn build_record(entry: &RawEntry) -> Record {
    let raw_call_number = entry.first_call_number().to_string();

    Record {
        main_call_number: normalize_call_number(&raw_call_number),
        raw_call_number,
        title: entry.first_title().to_string(),
        extent: collect_extent(&entry.extent),
    }
}

/// Derive report rows for all docs, preserving their order
pub fn build_records(entries: &[RawEntry]) -> Vec<Record> {
    entries.iter().map(build_record).collect()
}
