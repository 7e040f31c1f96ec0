use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing::warn;

use crate::core::persistence::storage_path::visit_log_file_path;

use super::visit_log_entity::VisitLogEntity;
use super::visit_log_fs_adapter_trait::VisitLogFsAdapterTrait;

/// FS adapter for the visit log.
///
/// Stores one JSON object per line at `{data_dir}/visits/visits.jsonl`.
/// Corrupt lines are skipped on read so a torn write never hides the rest.
pub struct VisitLogFsAdapter {
    path: PathBuf,
    // serialises appends from concurrent requests
    write_lock: Mutex<()>,
}

impl VisitLogFsAdapter {
    pub fn new(data_dir: &std::path::Path) -> Self {
        Self {
            path: visit_log_file_path(data_dir),
            write_lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl VisitLogFsAdapterTrait for VisitLogFsAdapter {
    fn append(&self, entry: &VisitLogEntity) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create visit log directory")?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open visit log")?;
        let mut writer = BufWriter::new(file);

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<VisitLogEntity>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).context("Failed to open visit log")?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<VisitLogEntity>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping corrupt visit log line {} in {:?}: {}", no + 1, self.path, e),
            }
        }

        Ok(entries)
    }
}
