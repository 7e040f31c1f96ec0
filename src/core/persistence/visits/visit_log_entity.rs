use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded look at a machine's interval data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitLogEntity {
    pub id: Uuid,
    /// Machine the view was opened for.
    pub entity_id: String,
    /// Which view produced the visit (`status` or `label`).
    pub view: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub visited_at: DateTime<Utc>,
}

impl VisitLogEntity {
    pub fn new(entity_id: &str, view: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id: entity_id.to_string(),
            view: view.to_string(),
            from,
            to,
            visited_at: Utc::now(),
        }
    }
}
