pub mod dto;
pub mod issue;
pub mod service;
