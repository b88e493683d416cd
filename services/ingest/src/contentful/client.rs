use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, StatusCode};

use super::models::CtfListResponse;
use catalog_config::env_parse_or;

pub const DEFAULT_BASE_URL: &str = "https://cdn.contentful.com";
pub const DEFAULT_MAX_RETRY_AFTER_MS: u64 = 60_000;

#[derive(Clone)]
pub struct ContentfulClientConfig {
    pub space_id: String,
    pub access_token: String,
    pub environment: String,
    pub content_type: String,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Extra attempts after the first one.
    pub retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Ceiling on a server-supplied `Retry-After` wait.
    pub max_retry_after_ms: u64,
}

impl ContentfulClientConfig {
    /// Load Contentful config from environment.
    ///
    /// Returns `Ok(None)` when `CONTENTFUL_SPACE_ID` or `CONTENTFUL_ACCESS_TOKEN`
    /// is missing or blank, which disables the connector.
    pub fn from_env() -> Result<Option<Self>, String> {
        let space_id = match non_blank_var("CONTENTFUL_SPACE_ID") {
            Some(v) => v,
            None => return Ok(None),
        };
        let access_token = match non_blank_var("CONTENTFUL_ACCESS_TOKEN") {
            Some(v) => v,
            None => return Ok(None),
        };

        let base_url = non_blank_var("CONTENTFUL_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(format!(
                "CONTENTFUL_BASE_URL must be an http(s) URL, got {base_url:?}"
            ));
        }

        Ok(Some(Self {
            space_id,
            access_token,
            environment: non_blank_var("CONTENTFUL_ENVIRONMENT")
                .unwrap_or_else(|| "master".to_string()),
            content_type: non_blank_var("CONTENTFUL_CONTENT_TYPE")
                .unwrap_or_else(|| "product".to_string()),
            base_url,
            timeout_ms: env_parse_or("HTTP_TIMEOUT_MS", 15_000),
            retries: env_parse_or("HTTP_RETRIES", 3),
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            max_retry_after_ms: DEFAULT_MAX_RETRY_AFTER_MS,
        }))
    }

    pub fn entries_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}/entries",
            self.base_url, self.space_id, self.environment
        )
    }
}

impl fmt::Debug for ContentfulClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentfulClientConfig")
            .field("space_id", &self.space_id)
            .field("access_token", &"<redacted>")
            .field("environment", &self.environment)
            .field("content_type", &self.content_type)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("retries", &self.retries)
            .field("max_retry_after_ms", &self.max_retry_after_ms)
            .finish()
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One page request against the entries endpoint.
#[derive(Debug, Clone, Copy)]
pub struct EntriesQuery {
    pub limit: u32,
    pub skip: u64,
    /// Inclusive lower bound on `sys.updatedAt`.
    pub updated_since: Option<DateTime<Utc>>,
}

impl EntriesQuery {
    fn params(&self, content_type: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("content_type", content_type.to_string()),
            ("limit", self.limit.to_string()),
            ("skip", self.skip.to_string()),
            ("order", "sys.updatedAt".to_string()),
        ];
        if let Some(since) = self.updated_since {
            params.push((
                "sys.updatedAt[gte]",
                since.to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }
        params
    }
}

#[derive(Clone)]
pub struct ContentfulClient {
    client: Client,
    config: ContentfulClientConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentfulClientError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl ContentfulClient {
    pub fn new(config: ContentfulClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: create a client pointing at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn config(&self) -> &ContentfulClientConfig {
        &self.config
    }

    /// Fetch one page of entries ordered by `sys.updatedAt` ascending.
    pub async fn list_entries(
        &self,
        query: &EntriesQuery,
    ) -> Result<CtfListResponse, ContentfulClientError> {
        let url = self.config.entries_url();
        let params = query.params(&self.config.content_type);
        self.request_with_retry(&url, &params).await
    }

    async fn request_with_retry(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<CtfListResponse, ContentfulClientError> {
        let attempts = self.config.retries + 1;
        let mut delay_ms = self.config.initial_backoff_ms;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let mut retry_after = None;

            match self
                .client
                .get(url)
                .bearer_auth(&self.config.access_token)
                .query(params)
                .send()
                .await
            {
                // No status at all: connection, timeout or DNS failure.
                Err(e) => {
                    last_error = e.to_string();
                }
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        match response.json::<CtfListResponse>().await {
                            Ok(page) => return Ok(page),
                            Err(e) if e.is_decode() => {
                                return Err(ContentfulClientError::RequestError(e))
                            }
                            // Body cut off mid-read: treated like a network failure.
                            Err(e) => last_error = e.to_string(),
                        }
                    } else {
                        retry_after = parse_retry_after(
                            response
                                .headers()
                                .get(reqwest::header::RETRY_AFTER)
                                .and_then(|v| v.to_str().ok()),
                            Duration::from_millis(self.config.max_retry_after_ms),
                        );
                        let body = response.text().await.unwrap_or_default();

                        if status != StatusCode::TOO_MANY_REQUESTS && !status.is_server_error() {
                            return Err(ContentfulClientError::HttpError { status, body });
                        }
                        last_error = format!("{status}: {body}");
                    }
                }
            }

            if attempt == attempts {
                break;
            }

            let wait = retry_after.unwrap_or(Duration::from_millis(delay_ms));
            tracing::warn!(
                attempt,
                wait_ms = wait.as_millis() as u64,
                error = %last_error,
                "contentful request failed, retrying"
            );
            tokio::time::sleep(wait).await;
            delay_ms = (delay_ms * 2).min(self.config.max_backoff_ms);
        }

        Err(ContentfulClientError::MaxRetriesExceeded {
            attempts,
            last_error,
        })
    }
}

/// `Retry-After` in (possibly fractional) seconds, clamped to `ceiling`.
/// HTTP-date and negative values are ignored.
fn parse_retry_after(value: Option<&str>, ceiling: Duration) -> Option<Duration> {
    let secs: f64 = value?.trim().parse().ok()?;
    if secs.is_nan() || secs < 0.0 {
        return None;
    }
    let wait = Duration::try_from_secs_f64(secs).unwrap_or(ceiling);
    Some(wait.min(ceiling))
}
