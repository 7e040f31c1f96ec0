use std::collections::HashMap;

use crate::domain::common::model::{GroupBy, Interval};

pub const UNKNOWN_ALERT_KEY: &str = "alert_unknown";

/// Grouping key of one interval. A pure function of the record, so identical
/// input always produces identical keys.
pub fn interval_key(interval: &Interval, group_by: GroupBy) -> String {
    match group_by {
        GroupBy::Status => interval.status.as_code().to_string(),
        GroupBy::Label => match (&interval.label, &interval.alert_id) {
            (Some(label), _) => label.clone(),
            (None, Some(alert_id)) => format!("alert_{}", alert_id),
            (None, None) => UNKNOWN_ALERT_KEY.to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalGroup {
    pub key: String,
    pub intervals: Vec<Interval>,
}

impl IntervalGroup {
    pub fn total_secs(&self) -> i64 {
        self.intervals.iter().map(|i| i.duration_secs).sum()
    }
}

/// Intervals partitioned by key, groups in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedDataset {
    pub groups: Vec<IntervalGroup>,
}

impl GroupedDataset {
    pub fn get(&self, key: &str) -> Option<&IntervalGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn group_intervals(intervals: &[Interval], group_by: GroupBy) -> GroupedDataset {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut dataset = GroupedDataset::default();

    for interval in intervals {
        let key = interval_key(interval, group_by);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                dataset.groups.push(IntervalGroup {
                    key: key.clone(),
                    intervals: Vec::new(),
                });
                index.insert(key, dataset.groups.len() - 1);
                dataset.groups.len() - 1
            }
        };
        dataset.groups[slot].intervals.push(interval.clone());
    }

    dataset
}
