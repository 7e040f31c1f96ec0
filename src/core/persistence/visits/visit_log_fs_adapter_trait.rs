use anyhow::Result;

use super::visit_log_entity::VisitLogEntity;

/// Append-only storage for visit records.
pub trait VisitLogFsAdapterTrait: Send + Sync {
    fn append(&self, entry: &VisitLogEntity) -> Result<()>;

    /// All readable entries, oldest first.
    fn read_all(&self) -> Result<Vec<VisitLogEntity>>;
}
