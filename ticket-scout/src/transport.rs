//! Shared HTTP transport.
//!
//! The inventory service expects browser-shaped traffic: a session cookie
//! seeded by the init page, a desktop user agent, and AJAX headers on API
//! calls. Everything network-facing goes through one `HttpTransport` so the
//! whole process shares a single cookie jar and a single request pacer.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Desktop browser user agent sent on every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Referer sent on API-style requests; the server rejects bare calls.
const API_REFERER: &str = "https://kyfw.12306.cn/otn/leftTicket/init";

/// Default per-request connect/read timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default floor between consecutive requests, process-wide.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Error from a transport-level fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS, or timeout failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },
}

/// Minimal HTTP surface consumed by the API clients.
///
/// This abstraction lets the retry machinery and the route/station clients
/// be tested with scripted responses instead of a live endpoint.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// GET an API URL with AJAX headers, returning the raw body text.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// GET a page URL with HTML headers, returning the body.
    async fn get_page(&self, url: &str) -> Result<String, FetchError>;
}

/// Configuration for the shared transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// User agent header value.
    pub user_agent: String,
    /// Per-request connect/read timeout.
    pub timeout: Duration,
    /// Minimum spacing between any two requests.
    pub min_interval: Duration,
}

impl TransportConfig {
    /// Set a custom minimum request interval (for testing).
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Set a custom per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

/// Process-wide request pacer.
///
/// Guards the time of the last request behind an async mutex. The lock is
/// held across the sleep so concurrent callers queue instead of racing the
/// shared timestamp.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer with the given minimum spacing.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    /// Wait until one full interval has elapsed since the previous request,
    /// then record the current instant as the new last-request time.
    pub async fn pace(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let earliest = prev + self.min_interval;
            let now = Instant::now();
            if earliest > now {
                tokio::time::sleep(earliest - now).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// The real HTTP transport: one `reqwest::Client` with a cookie store plus
/// the shared pacer. Cloning shares both.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    pacer: Arc<Pacer>,
}

impl HttpTransport {
    /// Build the transport from config.
    pub fn new(config: TransportConfig) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            pacer: Arc::new(Pacer::new(config.min_interval)),
        })
    }

    async fn read_body(response: reqwest::Response, url: &str) -> Result<String, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

impl Fetch for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.pacer.pace().await;
        let response = self
            .http
            .get(url)
            .header(
                header::ACCEPT,
                "application/json, text/javascript, */*; q=0.01",
            )
            .header(header::REFERER, API_REFERER)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;
        Self::read_body(response, url).await
    }

    async fn get_page(&self, url: &str) -> Result<String, FetchError> {
        self.pacer.pace().await;
        let response = self
            .http
            .get(url)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;
        Self::read_body(response, url).await
    }
}
