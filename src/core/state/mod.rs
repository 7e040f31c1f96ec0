pub mod query_version;
