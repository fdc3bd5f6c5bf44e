//! Search service response parsing
//!
//! The catalog search export is a Solr select response. Only `response.docs` matters here;
//! every doc must carry `callnumber` and `title` lists with at least one value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReportError;

/// One element of `response.docs`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub callnumber: Vec<String>,
    pub title: Vec<String>,
    #[serde(default)]
    pub extent: Vec<String>,
}

impl RawEntry {
    /// The authoritative (first) call number
    pub fn first_call_number(&self) -> &str {
        self.callnumber.first().map(String::as_str).unwrap_or_default()
    }

    /// The first title value
    pub fn first_title(&self) -> &str {
        self.title.first().map(String::as_str).unwrap_or_default()
    }
}

/// The `response` object of a Solr select response
#[derive(Debug, Deserialize, Clone)]
pub struct ResponseBody {
    #[serde(rename = "numFound")]
    pub num_found: Option<u64>,
    pub docs: Vec<Value>,
}

/// Top-level Solr select response
#[derive(Debug, Deserialize, Clone)]
pub struct SearchResponse {
    pub response: ResponseBody,
}

/// Docs of one search response plus the match count the service reported
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResults {
    pub num_found: Option<u64>,
    pub entries: Vec<RawEntry>,
}

/// Parse a search response and validate every doc against the [`RawEntry`] shape.
///
/// Entries keep document order.
pub fn parse_search_results(text: &str) -> Result<SearchResults, ReportError> {
    let parsed: SearchResponse = serde_json::from_str(text)
        .map_err(|e| ReportError::DataFormat(format!("expected {{\"response\": {{\"docs\": [...]}}}}: {e}")))?;

    let entries = parsed
        .response
        .docs
        .into_iter()
        .enumerate()
        .map(|(index, doc)| parse_doc(index, doc))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SearchResults {
        num_found: parsed.response.num_found,
        entries,
    })
}

/// Parse a search response, keeping only the entries.
pub fn parse_search_response(text: &str) -> Result<Vec<RawEntry>, ReportError> {
    parse_search_results(text).map(|results| results.entries)
}

fn parse_doc(index: usize, doc: Value) -> Result<RawEntry, ReportError> {
    let entry: RawEntry = serde_json::from_value(doc)
        .map_err(|e| ReportError::DataFormat(format!("doc {index}: {e}")))?;

    if entry.callnumber.is_empty() {
        return Err(ReportError::DataFormat(format!(
            "doc {index}: callnumber has no values"
        )));
    }

    if entry.title.is_empty() {
        return Err(ReportError::DataFormat(format!(
            "doc {index}: title has no values"
        )));
    }

    Ok(entry)
}
