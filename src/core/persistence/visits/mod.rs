pub mod visit_log_entity;
pub mod visit_log_fs_adapter;
pub mod visit_log_fs_adapter_trait;
pub mod visit_log_repository;
