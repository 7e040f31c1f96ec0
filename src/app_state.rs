use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::core::client::interval_client::{HttpIntervalFetcher, IntervalFetcher};
use crate::core::persistence::visits::visit_log_repository::{VisitLogRepository, VisitLogRepositoryImpl};
use crate::domain::interval::service::interval_query_service::IntervalQueryService;
use crate::domain::visit::service::visit_service::VisitService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub interval_service: Arc<IntervalQueryService>,
    pub visit_service: Arc<VisitService>,
}

impl AppState {
    /// Wires the services around any fetcher and visit repository.
    pub fn with_parts(
        config: AppConfig,
        fetcher: Arc<dyn IntervalFetcher>,
        visit_repo: Arc<dyn VisitLogRepository>,
    ) -> Self {
        let visit_service = Arc::new(VisitService::new(visit_repo));
        let interval_service = Arc::new(IntervalQueryService::new(
            fetcher,
            visit_service.clone(),
            config.aggregation_defaults(),
        ));

        Self {
            config: Arc::new(config),
            interval_service,
            visit_service,
        }
    }
}

pub fn build_app_state(config: &AppConfig) -> Result<AppState> {
    let fetcher = Arc::new(HttpIntervalFetcher::from_config(config)?);
    let visit_repo = Arc::new(VisitLogRepositoryImpl::new(&config.data_dir));
    Ok(AppState::with_parts(config.clone(), fetcher, visit_repo))
}
