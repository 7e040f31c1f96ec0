//! API route declarations (e.g., /api/v1/*)

pub mod machine_routes;
pub mod visit_routes;
