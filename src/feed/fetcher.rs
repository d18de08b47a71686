use crate::feed::parser::{parse_feed, RawItem};
use futures::StreamExt;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use thiserror::Error;

/// Applied to every outbound request, body download included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Sent when no `--user-agent` / `userAgent` override is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_REDIRECTS: usize = 10;

/// Errors that can occur while fetching a feed or article page.
///
/// None of these are retried; the caller decides whether a failure skips a
/// task or leaves an item unenriched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, too many redirects, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 20-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Feed XML could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// A successful GET: the URL after redirects and the body.
#[derive(Debug)]
pub struct Fetched {
    pub final_url: String,
    pub bytes: Vec<u8>,
}

/// Builds the shared HTTP client.
///
/// Redirects are followed (up to 10 hops). Timeouts and the User-Agent
/// header are applied per request so tasks can carry their own agent.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Fetches a feed URL and parses its entries.
///
/// # Errors
///
/// - [`FetchError::Network`] - Connection, TLS or redirect errors
/// - [`FetchError::Timeout`] - Request plus download exceeded 20 seconds
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::ResponseTooLarge`] - Body exceeded 10MB
/// - [`FetchError::Parse`] - Invalid RSS/Atom XML
pub async fn fetch_items(
    client: &reqwest::Client,
    url: &str,
    user_agent: Option<&str>,
) -> Result<Vec<RawItem>, FetchError> {
    let fetched = get_limited(client, url, user_agent, MAX_FEED_SIZE).await?;

    let items = parse_feed(&fetched.bytes, url).map_err(|e| FetchError::Parse(e.to_string()))?;
    tracing::debug!(feed = %url, items = items.len(), "Fetched feed");

    Ok(items)
}

/// GET `url` with the configured User-Agent, following redirects, and read
/// at most `limit` bytes of body. The whole exchange is bounded by
/// [`REQUEST_TIMEOUT`].
pub(crate) async fn get_limited(
    client: &reqwest::Client,
    url: &str,
    user_agent: Option<&str>,
    limit: usize,
) -> Result<Fetched, FetchError> {
    let user_agent = user_agent
        .filter(|ua| !ua.is_empty())
        .unwrap_or(DEFAULT_USER_AGENT);

    let exchange = async {
        let response = client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let final_url = response.url().to_string();
        let bytes = read_limited_bytes(response, limit).await?;

        Ok::<_, FetchError>(Fetched { final_url, bytes })
    };

    tokio::time::timeout(REQUEST_TIMEOUT, exchange)
        .await
        .map_err(|_| FetchError::Timeout)?
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Capture Content-Length for completeness check
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
