//! Sorting and rendering of report rows
//!
//! Rendering never touches the filesystem: text, JSON and CSV are produced in memory so the
//! caller can decide where they go once sorting has succeeded.

use crate::callnumber::sort_key;
use crate::error::ReportError;
use crate::record::{build_records, Record};
use crate::solr::parse_search_results;

/// Header of the console report
pub const TEXT_HEADER: &str = "main call number, all call numbers, title, extent";

/// Header row of the CSV report
pub const CSV_HEADER: [&str; 4] = ["main call number", "all call numbers", "title", "extent"];

/// What to do with a record whose normalized call number yields no sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKeyPolicy {
    /// Abort the sort with a [`ReportError::SortKey`]
    #[default]
    Error,
    /// Drop the record from the report
    Skip,
    /// Place the record after all keyed records, in input order
    Last,
}

/// Result of sorting: the ordered rows plus the call numbers that could not be keyed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    pub records: Vec<Record>,
    pub rejected: Vec<ReportError>,
}

/// All rows of one run, in input order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    records: Vec<Record>,
    num_found: Option<u64>,
}

impl Report {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            num_found: None,
        }
    }

    /// Parse a search response and build one row per doc.
    pub fn from_json(text: &str) -> Result<Self, ReportError> {
        let results = parse_search_results(text)?;
        Ok(Self {
            records: build_records(&results.entries),
            num_found: results.num_found,
        })
    }

    /// Match count reported by the search service, if the response carried one
    pub fn num_found(&self) -> Option<u64> {
        self.num_found
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows ordered by sort key. See [`sort_records`].
    pub fn sorted(&self, policy: SortKeyPolicy) -> Result<SortOutcome, ReportError> {
        sort_records(&self.records, policy)
    }
}

/// Stable ascending sort on the integer found after the first three characters of each
/// normalized call number.
pub fn sort_records(
    records: &[Record],
    policy: SortKeyPolicy,
) -> Result<SortOutcome, ReportError> {
    let mut keyed = Vec::with_capacity(records.len());
    let mut unkeyed = Vec::new();
    let mut rejected = Vec::new();

    for record in records {
        match sort_key(&record.main_call_number) {
            Ok(key) => keyed.push((key, record.clone())),
            Err(err) => match policy {
                SortKeyPolicy::Error => return Err(err),
                SortKeyPolicy::Skip => rejected.push(err),
                SortKeyPolicy::Last => {
                    rejected.push(err);
                    unkeyed.push(record.clone());
                }
            },
        }
    }

    keyed.sort_by_key(|(key, _)| *key);

    let records = keyed
        .into_iter()
        .map(|(_, record)| record)
        .chain(unkeyed)
        .collect();

    Ok(SortOutcome { records, rejected })
}

/// Console report: header line, then `main, raw, title` per row.
///
/// The extent column is listed in the header but not printed per row; only the CSV output
/// carries it.
pub fn render_text(records: &[Record]) -> String {
    let mut output = String::new();
    output.push_str(TEXT_HEADER);
    output.push('\n');

    for record in records {
        output.push_str(&format!(
            "{}, {}, {}\n",
            record.main_call_number, record.raw_call_number, record.title
        ));
    }

    output
}

/// Pretty JSON array with all four fields of every row
pub fn render_json(records: &[Record]) -> Result<String, ReportError> {
    serde_json::to_string_pretty(records)
        .map_err(|e| ReportError::Render(format!("JSON serialization failed: {e}")))
}

/// CSV report with header row and all four fields, quoted where necessary.
///
/// Rows always end in CRLF, whatever platform the report is produced on.
pub fn render_csv(records: &[Record]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    let csv_err = |e: csv::Error| ReportError::Render(format!("CSV serialization failed: {e}"));

    writer.write_record(CSV_HEADER).map_err(csv_err)?;

    for record in records {
        writer
            .write_record([
                &record.main_call_number,
                &record.raw_call_number,
                &record.title,
                &record.extent,
            ])
            .map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Render(format!("CSV serialization failed: {}", e.error())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(main: &str, raw: &str, title: &str, extent: &str) -> Record {
        Record {
            main_call_number: main.to_string(),
            raw_call_number: raw.to_string(),
            title: title.to_string(),
            extent: extent.to_string(),
        }
    }

    fn mains(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.main_call_number.as_str()).collect()
    }

    // ============================================================================
    // Report tests
    // ============================================================================

    #[test]
    fn test_report_from_json_end_to_end() {
        let text = r#"{"response":{"docs":[{"callnumber":["ARC.123 Extra"],"title":["Diary"],"extent":["2 folders","1 box"]}]}}"#;
        let report = Report::from_json(text).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report.num_found(), None);
        assert_eq!(
            report.records()[0],
            record("ARC", "ARC.123 Extra", "Diary", "2 folders 1 box")
        );

        // "ARC" leaves nothing after the three-character prefix
        let err = report.sorted(SortKeyPolicy::Error).unwrap_err();
        assert!(matches!(err, ReportError::SortKey { .. }));

        let outcome = report.sorted(SortKeyPolicy::Last).unwrap();
        assert_eq!(mains(&outcome.records), vec!["ARC"]);
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn test_report_from_json_empty_docs() {
        let report = Report::from_json(r#"{"response":{"docs":[]}}"#).unwrap();
        assert!(report.is_empty());

        let outcome = report.sorted(SortKeyPolicy::Error).unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(render_text(&outcome.records), format!("{TEXT_HEADER}\n"));
    }

    #[test]
    fn test_report_from_json_keeps_num_found() {
        let report = Report::from_json(
            r#"{"response":{"numFound":41,"docs":[{"callnumber":["AR 1"],"title":["T"]}]}}"#,
        )
        .unwrap();

        assert_eq!(report.num_found(), Some(41));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_report_from_json_invalid() {
        assert!(matches!(
            Report::from_json("[]"),
            Err(ReportError::DataFormat(_))
        ));
    }

    // ============================================================================
    // sort_records tests
    // ============================================================================

    #[test]
    fn test_sort_numeric_not_lexicographic() {
        let records = vec![
            record("ARC123", "", "", ""),
            record("ARC45", "", "", ""),
            record("ARC9", "", "", ""),
        ];
        let outcome = sort_records(&records, SortKeyPolicy::Error).unwrap();

        assert_eq!(mains(&outcome.records), vec!["ARC9", "ARC45", "ARC123"]);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_sort_is_stable() {
        let records = vec![
            record("AR 7", "first", "", ""),
            record("AR 3", "", "", ""),
            record("AR 7", "second", "", ""),
        ];
        let outcome = sort_records(&records, SortKeyPolicy::Error).unwrap();

        let raws: Vec<&str> = outcome
            .records
            .iter()
            .map(|r| r.raw_call_number.as_str())
            .collect();
        assert_eq!(raws, vec!["", "first", "second"]);
    }

    #[test]
    fn test_sort_error_policy_fails_on_first_bad_key() {
        let records = vec![
            record("AR 1", "", "", ""),
            record("MF 912 Reel", "", "", ""),
            record("XX", "", "", ""),
        ];
        let err = sort_records(&records, SortKeyPolicy::Error).unwrap_err();

        assert!(
            matches!(err, ReportError::SortKey { ref call_number, .. } if call_number == "MF 912 Reel")
        );
    }

    #[test]
    fn test_sort_skip_policy_drops_bad_keys() {
        let records = vec![
            record("AR 20", "", "", ""),
            record("Broken", "", "", ""),
            record("AR 10", "", "", ""),
        ];
        let outcome = sort_records(&records, SortKeyPolicy::Skip).unwrap();

        assert_eq!(mains(&outcome.records), vec!["AR 10", "AR 20"]);
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn test_sort_last_policy_appends_bad_keys_in_input_order() {
        let records = vec![
            record("zzz", "", "", ""),
            record("AR 20", "", "", ""),
            record("aaa", "", "", ""),
            record("AR 10", "", "", ""),
        ];
        let outcome = sort_records(&records, SortKeyPolicy::Last).unwrap();

        assert_eq!(mains(&outcome.records), vec!["AR 10", "AR 20", "zzz", "aaa"]);
        assert_eq!(outcome.rejected.len(), 2);
    }

    // ============================================================================
    // render tests
    // ============================================================================

    #[test]
    fn test_render_text_omits_extent() {
        let records = vec![record("AR 25", "AR 25.3", "Family papers", "2 boxes")];
        let text = render_text(&records);

        assert_eq!(
            text,
            "main call number, all call numbers, title, extent\nAR 25, AR 25.3, Family papers\n"
        );
        assert!(!text.contains("2 boxes"));
    }

    #[test]
    fn test_render_json_all_fields() {
        let records = vec![record("AR 25", "AR 25.3", "Papers", "2 boxes")];
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&records).unwrap()).unwrap();

        assert_eq!(json[0]["mainCallNumber"], "AR 25");
        assert_eq!(json[0]["extent"], "2 boxes");
    }

    #[test]
    fn test_render_csv_header_only() {
        let bytes = render_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "main call number,all call numbers,title,extent\r\n"
        );
    }

    #[test]
    fn test_render_csv_quotes_when_needed() {
        let records = vec![record(
            "AR 25",
            "AR 25.3, Box 2",
            "The \"Berlin\" letters",
            "1 box",
        )];
        let csv = String::from_utf8(render_csv(&records).unwrap()).unwrap();

        assert_eq!(
            csv,
            "main call number,all call numbers,title,extent\r\n\
             AR 25,\"AR 25.3, Box 2\",\"The \"\"Berlin\"\" letters\",1 box\r\n"
        );
    }

    #[test]
    fn test_render_csv_rows_end_in_crlf() {
        let records = vec![record("AR 1", "AR 1", "T", ""), record("AR 2", "AR 2", "U", "")];
        let csv = String::from_utf8(render_csv(&records).unwrap()).unwrap();

        assert_eq!(
            csv,
            "main call number,all call numbers,title,extent\r\nAR 1,AR 1,T,\r\nAR 2,AR 2,U,\r\n"
        );
        assert_eq!(csv.replace("\r\n", "").matches('\n').count(), 0);
    }

    #[test]
    fn test_render_csv_round_trip() {
        let records = vec![
            record("AR 3", "AR 3.1", "Line one\nline two", "2 boxes, 1 folder"),
            record("AR 12", "MF 4 AR 12", "Plain", ""),
            record("AR 40", "AR 40.2", "Quote \" inside", " leading space"),
        ];
        let bytes = render_csv(&records).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_HEADER.to_vec());

        let parsed: Vec<Record> = reader
            .records()
            .map(|row| {
                let row = row.unwrap();
                record(&row[0], &row[1], &row[2], &row[3])
            })
            .collect();

        assert_eq!(parsed, records);
    }
}
