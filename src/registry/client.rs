//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Feed error classification: 401/403 are authentication failures and
//!   are never retried; 429 and transport errors are retried
//! - Basic auth from per-source credentials

use crate::domain::Credentials;
use crate::error::FeedError;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("dotup/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FeedError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                FeedError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request and parse the JSON response
    ///
    /// `package` and `source` are used for error context only. Transport
    /// errors, HTTP 429 and JSON parse failures are retried with
    /// exponential backoff; authentication failures and 404 are terminal.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        source: &str,
        credentials: Option<&Credentials>,
    ) -> Result<T, FeedError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }

            let mut request = self.client.get(url);
            if let Some(credentials) = credentials {
                request =
                    request.basic_auth(&credentials.username, Some(&credentials.password));
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(FeedError::network_error(package, source, e.to_string()));
                    continue;
                }
            };

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(FeedError::unauthorized(source));
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FeedError::not_found(package, source));
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                last_error = Some(FeedError::network_error(
                    package,
                    source,
                    "rate limited (HTTP 429)",
                ));
                continue;
            }
            if !status.is_success() {
                return Err(FeedError::network_error(
                    package,
                    source,
                    format!("HTTP {}", status),
                ));
            }

            match response.json::<T>().await {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    last_error = Some(FeedError::invalid_response(
                        package,
                        source,
                        format!("failed to parse JSON: {}", e),
                    ));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FeedError::network_error(package, source, "unknown error")))
    }
}
