//! Interval API DTOs

use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::common::model::{AggregationOptions, BucketSource, GroupBy};

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct IntervalRangeQuery {
    /// Window start (UTC, `YYYY-MM-DDTHH:MM:SS`). Defaults to 24h before `to`.
    pub from: Option<NaiveDateTime>,
    /// Window end (UTC). Defaults to now.
    pub to: Option<NaiveDateTime>,
    pub group_by: Option<GroupBy>,
    pub bucket_source: Option<BucketSource>,
    #[validate(range(min = 1, max = 5000))]
    pub max_points: Option<usize>,
    #[validate(range(min = 1, max = 1000))]
    pub page_size: Option<usize>,
    /// Dashboard view whose queries supersede each other. Defaults to the machine id.
    #[validate(length(min = 1, max = 128))]
    pub view: Option<String>,
}

impl IntervalRangeQuery {
    pub fn to_options(&self, defaults: &AggregationOptions) -> AggregationOptions {
        let view = defaults.for_group_by(self.group_by.unwrap_or(defaults.group_by));
        AggregationOptions {
            bucket_source: self.bucket_source.unwrap_or(view.bucket_source),
            max_points: self.max_points.unwrap_or(view.max_points),
            page_size: self.page_size.unwrap_or(view.page_size),
            ..view
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct MachineSummaryQuery {
    /// Comma-separated machine ids.
    #[validate(length(min = 1))]
    pub ids: String,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub group_by: Option<GroupBy>,
}

impl MachineSummaryQuery {
    pub fn machine_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct VisitListQuery {
    pub entity_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
