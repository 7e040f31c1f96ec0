use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tracing::warn;

use crate::domain::common::model::QueryWindow;

/// Window used when the caller gives no bounds.
pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;

/// Resolves optional naive (UTC) bounds into a window ending at `now` by default.
pub fn resolve_query_window(
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
    now: DateTime<Utc>,
) -> QueryWindow {
    let to = to
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        .unwrap_or(now);

    let from = from
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        .unwrap_or_else(|| to - Duration::hours(DEFAULT_LOOKBACK_HOURS));

    if from > to {
        // Soft validation: log but never fail
        warn!("Query window reversed ({} > {}), swapping bounds", from, to);
    }

    QueryWindow::new(from, to)
}
