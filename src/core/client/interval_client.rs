use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::domain::common::model::RawIntervalRecord;

const INITIAL_BACKOFF_MS: u64 = 200;

/// Source of raw interval lists for a machine.
///
/// Implementations own retries and cancellation; the aggregation engine only
/// ever sees the records (or an empty list after a failure).
#[async_trait]
pub trait IntervalFetcher: Send + Sync {
    async fn fetch_intervals(
        &self,
        entity_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RawIntervalRecord>>;
}

/// The backend answers either with a bare array or with `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalListBody {
    Bare(Vec<RawIntervalRecord>),
    Wrapped { data: Vec<RawIntervalRecord> },
}

impl IntervalListBody {
    fn into_records(self) -> Vec<RawIntervalRecord> {
        match self {
            IntervalListBody::Bare(v) => v,
            IntervalListBody::Wrapped { data } => data,
        }
    }
}

/// Fetches intervals from the fleet backend over HTTP.
pub struct HttpIntervalFetcher {
    client: Client,
    base_url: String,
    token: Option<String>,
    attempts: usize,
}

impl HttpIntervalFetcher {
    pub fn new(client: Client, base_url: &str, token: Option<String>, retries: usize) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            attempts: retries + 1,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self::new(client, &cfg.api_base_url, cfg.api_token.clone(), cfg.fetch_retries))
    }

    pub fn intervals_url(&self, entity_id: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> String {
        format!(
            "{}/machines/{}/intervals?from={}&to={}",
            self.base_url,
            urlencoding::encode(entity_id),
            urlencoding::encode(&from.to_rfc3339_opts(SecondsFormat::Secs, true)),
            urlencoding::encode(&to.to_rfc3339_opts(SecondsFormat::Secs, true)),
        )
    }

    async fn get_once(&self, url: &str) -> Result<Vec<RawIntervalRecord>, (Option<StatusCode>, String)> {
        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| (None, e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err((Some(status), text));
        }

        resp.json::<IntervalListBody>()
            .await
            .map(IntervalListBody::into_records)
            .map_err(|e| (Some(status), format!("Failed to decode interval list: {}", e)))
    }
}

#[async_trait]
impl IntervalFetcher for HttpIntervalFetcher {
    /// Retries transport errors and 5xx/429 responses with exponential backoff.
    /// Auth and other 4xx responses fail immediately.
    async fn fetch_intervals(
        &self,
        entity_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RawIntervalRecord>> {
        let url = self.intervals_url(entity_id, from, to);
        let mut backoff = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            match self.get_once(&url).await {
                Ok(records) => {
                    debug!("Fetched {} interval records for '{}' (attempt {})", records.len(), entity_id, attempt);
                    return Ok(records);
                }
                Err((status, message)) => {
                    last_error = match status {
                        Some(s) => format!("{}: {}", s, message),
                        None => message,
                    };

                    if !is_retryable(status) {
                        break;
                    }
                    if attempt < self.attempts {
                        warn!(
                            "Interval fetch for '{}' failed (attempt {}/{}): {}; retrying in {:?}",
                            entity_id, attempt, self.attempts, last_error, backoff
                        );
                        sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(anyhow!("Interval fetch failed for '{}' (url={}): {}", entity_id, url, last_error))
    }
}

fn is_retryable(status: Option<StatusCode>) -> bool {
    match status {
        None => true,
        Some(s) => s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn builds_encoded_url() {
        let fetcher = HttpIntervalFetcher::new(Client::new(), "http://backend/api/", None, 0);
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        assert_eq!(
            fetcher.intervals_url("press 7/a", from, to),
            "http://backend/api/machines/press%207%2Fa/intervals?from=2024-01-01T00%3A00%3A00Z&to=2024-01-02T00%3A00%3A00Z"
        );
    }

    #[test]
    fn decodes_bare_and_wrapped_bodies() {
        let bare: IntervalListBody = serde_json::from_value(json!([
            { "start_time": "2024-01-01T00:00:00Z", "end_time": "2024-01-01T01:00:00Z", "status": "ON" }
        ]))
        .unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped: IntervalListBody = serde_json::from_value(json!({
            "data": [
                { "start_time": 1704067200, "end_time": 1704070800, "status": 1 },
                { "start_time": 1704070800, "end_time": 1704074400, "status": 0 }
            ]
        }))
        .unwrap();
        assert_eq!(wrapped.into_records().len(), 2);
    }

    #[test]
    fn retry_policy() {
        assert!(is_retryable(None));
        assert!(is_retryable(Some(StatusCode::BAD_GATEWAY)));
        assert!(is_retryable(Some(StatusCode::TOO_MANY_REQUESTS)));
        assert!(!is_retryable(Some(StatusCode::UNAUTHORIZED)));
        assert!(!is_retryable(Some(StatusCode::NOT_FOUND)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_error_not_a_panic() {
        let fetcher = HttpIntervalFetcher::new(Client::new(), "http://127.0.0.1:9", None, 0);
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let result = fetcher.fetch_intervals("m-1", from, from).await;
        assert!(result.is_err());
    }
}
