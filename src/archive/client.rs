//! Blocking HTTP client with a politeness delay between requests and retries for transient failures.

use super::error::ArchiveError;
use reqwest::StatusCode;
use std::time::{Duration, Instant};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; ao3meta/0.1)";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DELAY_SECS: u64 = 2;
const MAX_REDIRECTS: usize = 10;

/// Attempts per request (initial plus retries).
const DEFAULT_RETRY_COUNT: u32 = 3;
const DEFAULT_BACKOFF_SECS: [u64; 3] = [1, 2, 4];
/// The archive answers bursts with 429; back off much further than for 5xx.
const BACKOFF_429_SECS: [u64; 4] = [30, 60, 90, 120];

/// Body the archive serves in place of some missing pages.
const NOT_FOUND_BODY: &str = "404: Not Found";

/// Blocking HTTP client that enforces a delay between requests.
#[derive(Debug)]
pub struct PoliteClient {
    inner: reqwest::blocking::Client,
    delay: Duration,
    last_request: Option<Instant>,
    retry_count: u32,
    backoff_secs: Vec<u64>,
}

impl PoliteClient {
    /// Build a polite client with default User-Agent, timeout, and delay.
    pub fn new() -> Result<Self, ArchiveError> {
        Self::builder().build()
    }

    pub fn builder() -> PoliteClientBuilder {
        PoliteClientBuilder::default()
    }

    /// GET `url` and return the body as text.
    pub fn fetch_text(&mut self, url: &str) -> Result<String, ArchiveError> {
        let response = self.checked_get(url)?;
        let body = response.text().map_err(|e| ArchiveError::BodyRead {
            url: url.to_string(),
            source: e,
        })?;
        if is_not_found_body(body.as_bytes()) {
            return Err(ArchiveError::NotFound {
                url: url.to_string(),
            });
        }
        Ok(body)
    }

    /// GET `url` and return the raw body, e.g. a downloaded EPUB.
    pub fn fetch_bytes(&mut self, url: &str) -> Result<Vec<u8>, ArchiveError> {
        let response = self.checked_get(url)?;
        let bytes = response.bytes().map_err(|e| ArchiveError::BodyRead {
            url: url.to_string(),
            source: e,
        })?;
        if is_not_found_body(&bytes) {
            return Err(ArchiveError::NotFound {
                url: url.to_string(),
            });
        }
        Ok(bytes.to_vec())
    }

    fn checked_get(&mut self, url: &str) -> Result<reqwest::blocking::Response, ArchiveError> {
        let response = self.get_with_retry(url).map_err(|e| ArchiveError::Network {
            url: url.to_string(),
            source: e,
        })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ArchiveError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ArchiveError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    /// GET with retries on timeout, connection errors, HTTP 5xx, and HTTP 429.
    ///
    /// Other failures are returned immediately. After the last attempt the response is returned
    /// as-is, whatever its status, so the caller can report it.
    fn get_with_retry(&mut self, url: &str) -> Result<reqwest::blocking::Response, reqwest::Error> {
        let max_attempts = self.retry_count.max(1);
        let mut attempt = 0u32;
        loop {
            self.wait_delay();
            tracing::debug!(url, attempt, "GET");
            let result = self.inner.get(url).send();
            self.last_request = Some(Instant::now());
            if attempt + 1 >= max_attempts {
                return result;
            }
            let backoff = match &result {
                Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                    tracing::warn!(url, "rate limited; backing off");
                    Some(backoff_for(&BACKOFF_429_SECS, attempt))
                }
                Ok(response) if response.status().is_server_error() => {
                    tracing::warn!(url, status = response.status().as_u16(), "retrying after HTTP error");
                    Some(backoff_for(&self.backoff_secs, attempt))
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    tracing::warn!(url, error = %e, "retrying after network error");
                    Some(backoff_for(&self.backoff_secs, attempt))
                }
                _ => None,
            };
            let Some(backoff) = backoff else {
                return result;
            };
            std::thread::sleep(Duration::from_secs(backoff));
            attempt += 1;
        }
    }

    fn wait_delay(&self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                std::thread::sleep(self.delay - elapsed);
            }
        }
    }
}

/// Exact match only; a page that merely contains the phrase is a real page.
fn is_not_found_body(body: &[u8]) -> bool {
    body == NOT_FOUND_BODY.as_bytes()
}

/// Backoff for the given attempt; the last entry repeats once the table runs out.
fn backoff_for(table: &[u64], attempt: u32) -> u64 {
    table
        .get(attempt as usize)
        .or_else(|| table.last())
        .copied()
        .unwrap_or(1)
}

/// Builder for PoliteClient with optional User-Agent, delay, timeout, and retry settings.
#[derive(Debug)]
pub struct PoliteClientBuilder {
    user_agent: Option<String>,
    delay_secs: u64,
    timeout_secs: u64,
    retry_count: u32,
    retry_backoff_secs: Vec<u64>,
}

impl Default for PoliteClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            delay_secs: DEFAULT_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_backoff_secs: DEFAULT_BACKOFF_SECS.to_vec(),
        }
    }
}

impl PoliteClientBuilder {
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Delay between requests in seconds.
    pub fn delay_secs(mut self, secs: u64) -> Self {
        self.delay_secs = secs;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Attempts per request; at least 1.
    pub fn retry_count(mut self, n: u32) -> Self {
        self.retry_count = n.max(1);
        self
    }

    /// Seconds to wait before each retry. If shorter than retry_count - 1, the last value is reused.
    pub fn retry_backoff_secs(mut self, secs: Vec<u64>) -> Self {
        self.retry_backoff_secs = secs;
        self
    }

    pub fn build(self) -> Result<PoliteClient, ArchiveError> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| ArchiveError::Client { source: e })?;
        let backoff_secs = if self.retry_backoff_secs.is_empty() {
            // 1, 2, 4, ... for (retry_count - 1) steps
            let n = self.retry_count.saturating_sub(1) as usize;
            (0..n).map(|i| 1u64 << i.min(4)).collect()
        } else {
            self.retry_backoff_secs
        };
        Ok(PoliteClient {
            inner,
            delay: Duration::from_secs(self.delay_secs),
            last_request: None,
            retry_count: self.retry_count,
            backoff_secs,
        })
    }
}
