//! HTTP controllers

pub mod machine;
pub mod visit;
