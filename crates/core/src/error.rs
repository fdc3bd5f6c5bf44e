//! Error type shared by the pure report transformations.

/// Failures raised while loading, sorting or rendering a report.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The input is not JSON, lacks `response.docs`, or a doc has the wrong shape.
    #[error("Invalid search response: {0}")]
    DataFormat(String),

    /// A normalized call number does not yield an integer after its first three characters.
    #[error("Cannot derive a sort key from call number {call_number:?}: {reason}")]
    SortKey { call_number: String, reason: String },

    /// Serializing the sorted records failed.
    #[error("Failed to render report: {0}")]
    Render(String),
}
