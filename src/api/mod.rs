//! HTTP access to the Deep-Report article API.
//!
//! Three endpoints are consumed:
//!
//! - `GET  {base}/articles?index={n}` - one page of articles
//! - `POST {base}/articles/{id}/ask?question={q}` - question answering
//! - `GET  {base}/news-notifications` - server-sent notification stream
//!
//! JSON bodies are read through a size-limited stream before parsing. The
//! shared `reqwest::Client` has no overall request timeout because the
//! notification stream is long-lived; JSON calls are bounded individually.

mod sse;
mod types;

pub use sse::{SseDecoder, SseEvent, MAX_EVENT_SIZE};
pub use types::{
    Article, AskResponse, Notification, NotificationArticle, ReceivedNotification,
    NEW_ARTICLE_EVENT,
};

use futures::StreamExt;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound for a JSON response body.
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Default per-request timeout for JSON calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// True when the request never produced a usable response: transport
    /// failures, timeouts and unparseable bodies.
    pub fn is_network(&self) -> bool {
        match self {
            ApiError::Timeout(_)
            | ApiError::Network(_)
            | ApiError::Decode(_)
            | ApiError::ResponseTooLarge(_) => true,
            ApiError::HttpStatus(_) | ApiError::InvalidBaseUrl(_) => false,
        }
    }

    /// Status code for non-success HTTP responses.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// Redirect policy: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev == url) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Parse and check an API base address. Only `http` and `https` are accepted.
pub fn parse_base_url(base: &str) -> Result<Url, ApiError> {
    let url = Url::parse(base.trim()).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ApiError::InvalidBaseUrl(format!(
                "unsupported scheme '{}'",
                scheme
            )))
        }
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ApiError::InvalidBaseUrl(format!("'{}' has no host", base)));
    }
    Ok(url)
}

/// Cheaply cloneable handle to the article API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client with its own connection pool.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Self::with_client(http, base_url, timeout)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            http,
            base,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn articles_url(&self, page: usize) -> Url {
        let mut url = self.endpoint(&["articles"]);
        url.query_pairs_mut()
            .append_pair("index", &page.to_string());
        url
    }

    pub fn ask_url(&self, article_id: &str, question: &str) -> Url {
        let mut url = self.endpoint(&["articles", article_id, "ask"]);
        url.query_pairs_mut().append_pair("question", question);
        url
    }

    pub fn notifications_url(&self) -> Url {
        self.endpoint(&["news-notifications"])
    }

    /// Fetch one zero-based page of the article listing.
    pub async fn fetch_articles(&self, page: usize) -> Result<Vec<Article>, ApiError> {
        let url = self.articles_url(page);
        tracing::debug!(%url, page, "Fetching article page");
        let request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        self.send_json(request).await
    }

    /// Ask a question about one article.
    pub async fn ask(&self, article_id: &str, question: &str) -> Result<AskResponse, ApiError> {
        let url = self.ask_url(article_id, question);
        tracing::debug!(article_id, "Submitting question");
        let request = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json");
        self.send_json(request).await
    }

    /// Open the notification stream. Only connection setup is time-bounded;
    /// the returned response body stays open until the server closes it.
    pub async fn open_notifications(&self) -> Result<reqwest::Response, ApiError> {
        let url = self.notifications_url();
        tracing::debug!(%url, "Opening notification stream");
        let request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .header(reqwest::header::CACHE_CONTROL, "no-cache");

        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }
        Ok(response)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ApiError::Timeout(self.timeout.as_secs()))?
            .map_err(ApiError::Network)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }

        let bytes = tokio::time::timeout(self.timeout, read_limited_bytes(response, MAX_BODY_SIZE))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout.as_secs()))??;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
