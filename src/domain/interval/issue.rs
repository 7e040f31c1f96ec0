use thiserror::Error;

/// Problems found in individual records while aggregating.
///
/// None of these abort a pass: each one degrades a single record's
/// contribution and is logged and counted in the diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalIssue {
    #[error("record #{index}: unparsable {field} {raw:?}")]
    ParseError {
        index: usize,
        field: &'static str,
        raw: String,
    },

    #[error("record #{index}: unrecognised status {raw:?}, defaulting to OFF")]
    UnknownStatus { index: usize, raw: String },

    #[error("record #{index}: end precedes start by {lag_secs}s, treating as zero-length")]
    NegativeDuration { index: usize, lag_secs: i64 },

    #[error("interval starting at {start} spans {span_hours}h, capped to {cap_hours}h")]
    BoundaryOverflow {
        start: String,
        span_hours: i64,
        cap_hours: i64,
    },
}
