use std::path::Path;

use super::visit_log_entity::VisitLogEntity;
use super::visit_log_fs_adapter::VisitLogFsAdapter;
use super::visit_log_fs_adapter_trait::VisitLogFsAdapterTrait;

/// API-facing repository abstraction for the visit log.
pub trait VisitLogRepository: Send + Sync {
    fn fs_adapter(&self) -> &dyn VisitLogFsAdapterTrait;

    fn record(&self, entry: &VisitLogEntity) -> anyhow::Result<()> {
        self.fs_adapter().append(entry)
    }

    fn list(&self) -> anyhow::Result<Vec<VisitLogEntity>> {
        self.fs_adapter().read_all()
    }
}

pub struct VisitLogRepositoryImpl {
    adapter: VisitLogFsAdapter,
}

impl VisitLogRepositoryImpl {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            adapter: VisitLogFsAdapter::new(data_dir),
        }
    }
}

impl VisitLogRepository for VisitLogRepositoryImpl {
    fn fs_adapter(&self) -> &dyn VisitLogFsAdapterTrait {
        &self.adapter
    }
}
