//! Core library for solr-report
//!
//! This crate implements the **Functional Core** of the solr-report application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`solr_report_core`** (this crate): Pure transformation functions with zero I/O
//! - **`solr-report`**: File access, console output and orchestration (the Imperative Shell)
//!
//! Everything here works on in-memory strings and returns in-memory results. Reading the
//! search export and writing the CSV file belong to the binary.
//!
//! # Module Organization
//!
//! - [`solr`]: Parsing of the search service response (`response.docs`)
//! - [`callnumber`]: Call number normalization rules and sort key extraction
//! - [`record`]: Report rows built from search docs
//! - [`report`]: Sorting and rendering to text, JSON and CSV
//! - [`error`]: The [`ReportError`](error::ReportError) shared by all of the above
//!
//! # Example Usage
//!
//! ```rust
//! use solr_report_core::report::{render_text, Report, SortKeyPolicy};
//!
//! let text = r#"{"response":{"docs":[
//!     {"callnumber":["AR 120.4"],"title":["Letters"],"extent":["1 box"]},
//!     {"callnumber":["MF 3 AR 45"],"title":["Diaries"],"extent":[]}
//! ]}}"#;
//!
//! let report = Report::from_json(text).unwrap();
//! let sorted = report.sorted(SortKeyPolicy::Error).unwrap();
//!
//! assert_eq!(
//!     render_text(&sorted.records),
//!     "main call number, all call numbers, title, extent\n\
//!      AR 45, MF 3 AR 45, Diaries\n\
//!      AR 120, AR 120.4, Letters\n"
//! );
//! ```

pub mod callnumber;
pub mod error;
pub mod record;
pub mod report;
pub mod solr;
