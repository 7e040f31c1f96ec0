pub mod visit_service;
