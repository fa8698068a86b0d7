use crate::config::FetchConfig;
use crate::feed::rss_comments;
use crate::util::validate_url;
use feed_rs::model::Feed;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while retrieving a feed document.
///
/// Fetching is single-shot: none of these are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The feed URL was rejected before any request was made
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Response body exceeded the configured size limit
    #[error("Response too large (limit {0} bytes)")]
    ResponseTooLarge(usize),
    /// Body could not be decoded as RSS, Atom or JSON Feed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A decoded feed together with the location it was actually served from.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    /// Final URL after redirects.
    pub href: String,
    pub feed: Feed,
    /// RSS `<comments>` per entry; empty unless it lines up with `feed.entries`.
    comments: Vec<Option<String>>,
}

impl FeedDocument {
    /// Decodes raw feed bytes that were served from `href`.
    pub fn from_bytes(href: impl Into<String>, bytes: &[u8]) -> Result<Self, FetchError> {
        let feed = feed_rs::parser::parse(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

        let mut comments = rss_comments::scan(bytes);
        if comments.len() != feed.entries.len() {
            if !comments.is_empty() {
                tracing::debug!(
                    items = comments.len(),
                    entries = feed.entries.len(),
                    "RSS comments do not line up with entries, dropping them"
                );
            }
            comments.clear();
        }

        Ok(Self {
            href: href.into(),
            feed,
            comments,
        })
    }

    /// The RSS `<comments>` URL of the entry at `index`, if the item had one.
    pub fn item_comments(&self, index: usize) -> Option<&str> {
        self.comments.get(index)?.as_deref()
    }
}

/// Builds the HTTP client used for feed requests.
pub fn build_client(config: &FetchConfig) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Fetches `url` once and decodes the body as a feed.
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] - non-HTTP(S) scheme, or a private host while
///   `allow_private_hosts` is off
/// - [`FetchError::Timeout`] - no response within `timeout_secs`
/// - [`FetchError::Network`] - connection or TLS errors
/// - [`FetchError::HttpStatus`] - non-2xx response
/// - [`FetchError::ResponseTooLarge`] - body exceeded `max_feed_size`
/// - [`FetchError::Parse`] - body is not a feed
pub async fn fetch_document(
    client: &reqwest::Client,
    url: &str,
    config: &FetchConfig,
) -> Result<FeedDocument, FetchError> {
    let target = validate_url(url, config.allow_private_hosts)
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    let timeout = Duration::from_secs(config.timeout_secs);
    let response = tokio::time::timeout(timeout, client.get(target.as_str()).send())
        .await
        .map_err(|_| FetchError::Timeout(config.timeout_secs))?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let href = response.url().to_string();
    let bytes = read_limited_bytes(response, config.max_feed_size).await?;

    tracing::debug!(url = %url, href = %href, bytes = bytes.len(), "Fetched feed document");

    FeedDocument::from_bytes(href, &bytes)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
