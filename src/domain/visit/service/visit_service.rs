use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error};

use crate::api::dto::paginated_response::PaginatedResponse;
use crate::core::persistence::visits::visit_log_entity::VisitLogEntity;
use crate::core::persistence::visits::visit_log_repository::VisitLogRepository;
use crate::domain::common::model::QueryWindow;

pub const DEFAULT_VISIT_LIMIT: usize = 50;

pub struct VisitService {
    repo: Arc<dyn VisitLogRepository>,
}

impl VisitService {
    pub fn new(repo: Arc<dyn VisitLogRepository>) -> Self {
        Self { repo }
    }

    /// Records a visit. Failures are logged and swallowed: a broken visit log
    /// must never fail the query that triggered it.
    pub fn record_visit(&self, entity_id: &str, view: &str, window: &QueryWindow) {
        let entry = VisitLogEntity::new(entity_id, view, window.from, window.to);
        match self.repo.record(&entry) {
            Ok(_) => debug!("Recorded {} visit for '{}'", view, entity_id),
            Err(err) => error!("⚠️ Failed to record visit for '{}': {}", entity_id, err),
        }
    }

    /// Newest visits first, optionally filtered by machine.
    pub async fn list_visits(
        &self,
        entity_id: Option<&str>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<PaginatedResponse<VisitLogEntity>> {
        let mut visits = self.repo.list()?;
        if let Some(id) = entity_id {
            visits.retain(|v| v.entity_id == id);
        }
        visits.reverse();

        let limit = limit.unwrap_or(DEFAULT_VISIT_LIMIT).max(1);
        let offset = offset.unwrap_or(0);
        let total = visits.len();
        let items = visits.into_iter().skip(offset).take(limit).collect();

        Ok(PaginatedResponse {
            items,
            total,
            limit,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::visits::visit_log_fs_adapter_trait::VisitLogFsAdapterTrait;
    use anyhow::anyhow;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockVisitAdapter {
        state: Mutex<Vec<VisitLogEntity>>,
        fail: bool,
    }

    impl VisitLogFsAdapterTrait for MockVisitAdapter {
        fn append(&self, entry: &VisitLogEntity) -> Result<()> {
            if self.fail {
                return Err(anyhow!("disk full"));
            }
            self.state.lock().unwrap().push(entry.clone());
            Ok(())
        }

        fn read_all(&self) -> Result<Vec<VisitLogEntity>> {
            Ok(self.state.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct MockVisitRepository {
        adapter: MockVisitAdapter,
    }

    impl VisitLogRepository for MockVisitRepository {
        fn fs_adapter(&self) -> &dyn VisitLogFsAdapterTrait {
            &self.adapter
        }
    }

    fn window() -> QueryWindow {
        QueryWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn lists_newest_first_with_filter_and_paging() {
        let repo = Arc::new(MockVisitRepository::default());
        let service = VisitService::new(repo.clone());

        for id in ["a", "b", "a", "a"] {
            service.record_visit(id, "status", &window());
        }

        let all = service.list_visits(None, None, None).await.unwrap();
        assert_eq!(all.total, 4);
        assert_eq!(all.items[0].entity_id, "a");
        assert_eq!(all.items[2].entity_id, "b");

        let only_a = service.list_visits(Some("a"), Some(2), Some(1)).await.unwrap();
        assert_eq!(only_a.total, 3);
        assert_eq!(only_a.items.len(), 2);
        assert_eq!(only_a.offset, 1);
    }

    #[tokio::test]
    async fn failing_log_does_not_panic() {
        let repo = Arc::new(MockVisitRepository {
            adapter: MockVisitAdapter {
                fail: true,
                ..Default::default()
            },
        });
        let service = VisitService::new(repo);

        service.record_visit("a", "status", &window());
        assert_eq!(service.list_visits(None, None, None).await.unwrap().total, 0);
    }
}
