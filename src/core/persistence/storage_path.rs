use std::path::{Path, PathBuf};

pub fn visit_log_dir_path(data_dir: &Path) -> PathBuf {
    data_dir.join("visits")
}

pub fn visit_log_file_path(data_dir: &Path) -> PathBuf {
    visit_log_dir_path(data_dir).join("visits.jsonl")
}
