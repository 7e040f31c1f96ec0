pub mod storage_path;
pub mod visits;
