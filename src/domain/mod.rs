pub mod common;
pub mod interval;
pub mod visit;
