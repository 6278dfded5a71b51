//! Client for the upstream step-competition API.
//!
//! Every request gets a per-attempt timeout and is retried with exponential
//! backoff until the retry budget is spent. Retries run one after another.

use crate::models::{
    DateRangeQuery, GamificationData, ParticipantData, StepDataResponse, TabsResponse,
    TotalsResponse,
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001/api".to_string(),
            timeout: Duration::from_secs(10),
            retries: 2,
            retry_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    settings: ApiSettings,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: ApiSettings) -> Self {
        Self { http, settings }
    }

    pub async fn step_data(&self, tab: &str, year: Option<i32>) -> Result<StepDataResponse, ApiError> {
        let mut query = vec![("tab", tab.to_string())];
        if let Some(year) = year {
            query.push(("year", year.to_string()));
        }
        self.get_json(&["steps"], &query).await
    }

    pub async fn totals(&self) -> Result<TotalsResponse, ApiError> {
        self.get_json(&["totals"], &[]).await
    }

    pub async fn gamification(&self) -> Result<GamificationData, ApiError> {
        self.get_json(&["gamification"], &[]).await
    }

    pub async fn participant(
        &self,
        name: &str,
        range: &DateRangeQuery,
    ) -> Result<ParticipantData, ApiError> {
        let mut query = Vec::new();
        if let Some(start) = range.start_date {
            query.push(("start_date", start.to_string()));
        }
        if let Some(end) = range.end_date {
            query.push(("end_date", end.to_string()));
        }
        self.get_json(&["participants", name], &query).await
    }

    pub async fn tabs(&self) -> Result<TabsResponse, ApiError> {
        self.get_json(&["tabs"], &[]).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let mut attempt = 0;
        loop {
            match self.attempt(&url, query).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.settings.retries => {
                    let delay = self.backoff(attempt);
                    attempt += 1;
                    warn!(
                        %url,
                        attempt,
                        retries = self.settings.retries,
                        ?delay,
                        "upstream request failed: {err}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Delay before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.settings
            .retry_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!(%url, "fetching");
        let request = async {
            let response = self
                .http
                .get(url.clone())
                .query(query)
                .send()
                .await
                .map_err(|err| ApiError::Network(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|err| ApiError::Network(err.to_string()))?;
            serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
        };

        // dropping the request future on timeout aborts the connection
        tokio::time::timeout(self.settings.timeout, request)
            .await
            .map_err(|_| ApiError::Timeout(self.settings.timeout))?
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", self.settings.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.settings.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
