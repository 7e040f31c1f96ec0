use serde_json::Value;
use tracing::{debug, warn};

use crate::core::util::time_util::TimeUtil;
use crate::domain::common::model::{Interval, MachineStatus, QueryWindow, RawIntervalRecord};
use crate::domain::interval::dto::AggregationDiagnostics;
use crate::domain::interval::issue::IntervalIssue;

#[derive(Debug, Default)]
pub struct NormalizedIntervals {
    pub intervals: Vec<Interval>,
    pub diagnostics: AggregationDiagnostics,
}

/// Parses raw records, tags durations and drops records fully outside `window`.
///
/// Records overlapping the window edges are kept unclipped. A bad status
/// becomes OFF; a bad or missing end time (or an end before the start)
/// collapses the record to zero length. Only a record whose start cannot be
/// parsed is skipped, since it has no position on the time axis.
pub fn normalize_intervals(records: &[RawIntervalRecord], window: &QueryWindow) -> NormalizedIntervals {
    let mut out = NormalizedIntervals::default();
    out.diagnostics.received = records.len();

    for (index, record) in records.iter().enumerate() {
        // --- start ---
        let start = match record.start_time.as_ref().and_then(TimeUtil::parse_wire_timestamp) {
            Some(ts) => ts,
            None => {
                let issue = IntervalIssue::ParseError {
                    index,
                    field: "start_time",
                    raw: describe(record.start_time.as_ref()),
                };
                warn!("Skipping interval: {}", issue);
                out.diagnostics.skipped_unparsable += 1;
                continue;
            }
        };

        // --- end ---
        let mut end_unparsable = false;
        let end = match record.end_time.as_ref().and_then(TimeUtil::parse_wire_timestamp) {
            Some(ts) if ts >= start => ts,
            Some(ts) => {
                let issue = IntervalIssue::NegativeDuration {
                    index,
                    lag_secs: (start - ts).num_seconds(),
                };
                warn!("{}", issue);
                start
            }
            None => {
                let issue = IntervalIssue::ParseError {
                    index,
                    field: "end_time",
                    raw: describe(record.end_time.as_ref()),
                };
                warn!("Zeroing interval duration: {}", issue);
                end_unparsable = true;
                start
            }
        };

        if window.excludes(start, end) {
            out.diagnostics.outside_window += 1;
            continue;
        }

        // --- status ---
        let status = match record.status.as_ref() {
            None => MachineStatus::Off,
            Some(raw) => MachineStatus::from_wire(raw).unwrap_or_else(|| {
                let issue = IntervalIssue::UnknownStatus {
                    index,
                    raw: raw.to_string(),
                };
                debug!("{}", issue);
                out.diagnostics.defaulted_status += 1;
                MachineStatus::Off
            }),
        };

        if end_unparsable {
            out.diagnostics.zeroed_unparsable += 1;
        }

        let duration_secs = (end - start).num_seconds();
        if duration_secs == 0 {
            out.diagnostics.zero_length += 1;
        }

        out.intervals.push(Interval {
            start,
            end,
            status,
            label: record
                .label
                .as_ref()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            alert_id: record.alert_id.as_ref().and_then(alert_id_text),
            duration_secs,
        });
    }

    out.diagnostics.kept = out.intervals.len();
    debug!(
        "Normalized {} of {} interval records ({} outside window, {} unparsable)",
        out.diagnostics.kept,
        out.diagnostics.received,
        out.diagnostics.outside_window,
        out.diagnostics.skipped_unparsable
    );
    out
}

fn describe(value: Option<&Value>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "<missing>".to_string())
}

fn alert_id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn window() -> QueryWindow {
        QueryWindow::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        )
    }

    fn raw(start: Value, end: Value, status: Value) -> RawIntervalRecord {
        RawIntervalRecord {
            start_time: Some(start),
            end_time: Some(end),
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn parses_and_tags_duration() {
        let out = normalize_intervals(
            &[raw(json!("2024-05-01T08:00:00Z"), json!("2024-05-01 09:30:00"), json!("ON"))],
            &window(),
        );

        assert_eq!(out.intervals.len(), 1);
        let i = &out.intervals[0];
        assert_eq!(i.status, MachineStatus::On);
        assert_eq!(i.duration_secs, 5400);
        assert_eq!(out.diagnostics.kept, 1);
    }

    #[test]
    fn fractional_seconds_truncate() {
        let out = normalize_intervals(
            &[raw(
                json!("2024-05-01T08:00:00.900Z"),
                json!("2024-05-01T08:00:02.100Z"),
                json!(1),
            )],
            &window(),
        );
        assert_eq!(out.intervals[0].duration_secs, 1);
    }

    #[test]
    fn unknown_status_defaults_to_off() {
        let out = normalize_intervals(
            &[raw(json!("2024-05-01T08:00:00Z"), json!("2024-05-01T08:10:00Z"), json!("BROKEN"))],
            &window(),
        );
        assert_eq!(out.intervals[0].status, MachineStatus::Off);
        assert_eq!(out.diagnostics.defaulted_status, 1);
    }

    #[test]
    fn drops_records_fully_outside_window_but_keeps_overlaps_unclipped() {
        let out = normalize_intervals(
            &[
                raw(json!("2024-04-30T10:00:00Z"), json!("2024-04-30T11:00:00Z"), json!("ON")),
                raw(json!("2024-04-30T23:30:00Z"), json!("2024-05-01T00:30:00Z"), json!("ON")),
                raw(json!("2024-05-02T00:00:01Z"), json!("2024-05-02T01:00:00Z"), json!("ON")),
            ],
            &window(),
        );

        assert_eq!(out.intervals.len(), 1);
        assert_eq!(out.intervals[0].duration_secs, 3600);
        assert_eq!(out.diagnostics.outside_window, 2);
    }

    #[test]
    fn bad_end_time_zeroes_duration_instead_of_failing() {
        let out = normalize_intervals(
            &[
                raw(json!("2024-05-01T08:00:00Z"), json!("not a time"), json!("ON")),
                raw(json!("2024-05-01T09:00:00Z"), json!("2024-05-01T08:00:00Z"), json!("ON")),
            ],
            &window(),
        );

        assert_eq!(out.intervals.len(), 2);
        assert!(out.intervals.iter().all(|i| i.duration_secs == 0 && i.start == i.end));
        assert_eq!(out.diagnostics.skipped_unparsable, 0);
        assert_eq!(out.diagnostics.zeroed_unparsable, 1);
        assert_eq!(out.diagnostics.zero_length, 2);
        assert_eq!(out.diagnostics.kept, 2);
    }

    #[test]
    fn every_received_record_is_accounted_once() {
        let records = vec![
            raw(json!("2024-05-01T08:00:00Z"), json!("2024-05-01T08:30:00Z"), json!("ON")),
            raw(json!("2024-05-01T09:00:00Z"), json!(null), json!("OFF")),
            raw(json!("2024-04-29T09:00:00Z"), json!("garbage"), json!("ON")),
            raw(json!("??"), json!("2024-05-01T08:00:00Z"), json!("ON")),
        ];
        let d = normalize_intervals(&records, &window()).diagnostics;

        assert_eq!(d.received, d.kept + d.outside_window + d.skipped_unparsable);
        assert_eq!((d.kept, d.outside_window, d.skipped_unparsable), (2, 1, 1));
        assert_eq!(d.zeroed_unparsable, 1);
    }

    #[test]
    fn bad_start_time_is_skipped() {
        let records = vec![
            RawIntervalRecord {
                start_time: None,
                end_time: Some(json!("2024-05-01T08:00:00Z")),
                ..Default::default()
            },
            raw(json!("??"), json!("2024-05-01T08:00:00Z"), json!("ON")),
        ];
        let out = normalize_intervals(&records, &window());
        assert!(out.intervals.is_empty());
        assert_eq!(out.diagnostics.skipped_unparsable, 2);
        assert_eq!(out.diagnostics.received, 2);
    }

    #[test]
    fn trims_labels_and_stringifies_alert_ids() {
        let records = vec![RawIntervalRecord {
            start_time: Some(json!("2024-05-01T08:00:00Z")),
            end_time: Some(json!("2024-05-01T08:05:00Z")),
            status: None,
            label: Some("   ".into()),
            alert_id: Some(json!(17)),
        }];
        let out = normalize_intervals(&records, &window());
        let i = &out.intervals[0];
        assert_eq!(i.label, None);
        assert_eq!(i.alert_id.as_deref(), Some("17"));
        assert_eq!(i.status, MachineStatus::Off);
        // a missing status is not counted as a coercion
        assert_eq!(out.diagnostics.defaulted_status, 0);
    }
}
