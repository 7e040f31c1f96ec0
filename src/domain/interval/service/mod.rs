//! Interval aggregation engine and the query service that drives it.

pub mod downsampler;
pub mod duration_accumulator;
pub mod hour_bucketizer;
pub mod interval_aggregation_service;
pub mod interval_normalizer;
pub mod interval_query_service;
pub mod label_color;
pub mod label_grouper;
pub mod paginator;
