//! Shared domain services/utils (time window resolution)

pub mod time_window;
