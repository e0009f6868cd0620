//! Client for the left-ticket availability API.
//!
//! The service throttles aggressively and answers throttled calls with
//! empty or non-JSON bodies rather than error statuses. The client treats
//! those shapes as throttle signals and walks a retry ladder: three
//! progressively longer sleeps, then one session refresh, then giving up.
//! It also follows the server's `c_url` redirect hint when a query comes
//! back empty, adopting the advertised endpoint at most once per call.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::{AvailabilityEntry, Telecode};
use crate::stations::StationDirectory;
use crate::transport::{Fetch, FetchError};

use super::decode::decode_record;
use super::endpoint::{DEFAULT_ENDPOINT, EndpointState, discover_endpoint, final_segment};
use super::types::{LeftTicketResponse, QueryData};

/// Base URL of the left-ticket API, ending in `/`.
const DEFAULT_BASE_URL: &str = "https://kyfw.12306.cn/otn/leftTicket/";

/// Strikes answered with a backoff sleep before escalating.
const BACKOFF_STRIKES: u32 = 3;

/// Backoff sleep per strike; strike `n` sleeps `n` units.
const BACKOFF_UNIT: Duration = Duration::from_secs(3);

/// Response shapes that indicate throttling rather than a real answer.
#[derive(Debug, thiserror::Error)]
enum ThrottleSignal {
    #[error("transport failure: {0}")]
    Transport(#[from] FetchError),

    #[error("empty body")]
    EmptyBody,

    #[error("non-JSON body")]
    NotJson,
}

/// Configuration for the inventory client.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL of the left-ticket API, ending in `/`.
    pub base_url: String,
}

impl InventoryConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// URL of the booking page that seeds session cookies and advertises
    /// the active query endpoint.
    pub fn init_page_url(&self) -> String {
        format!("{}init", self.base_url)
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Client for availability queries.
///
/// Session state (endpoint, strike counter) lives behind an async mutex,
/// so queries on one client run strictly one at a time.
pub struct InventoryClient<F> {
    fetch: F,
    directory: Arc<StationDirectory>,
    config: InventoryConfig,
    state: Mutex<EndpointState>,
}

impl<F: Fetch> InventoryClient<F> {
    pub fn new(fetch: F, directory: Arc<StationDirectory>, config: InventoryConfig) -> Self {
        Self {
            fetch,
            directory,
            config,
            state: Mutex::new(EndpointState::new()),
        }
    }

    /// Establish the session and discover the query endpoint up front.
    ///
    /// Queries do this lazily on first use; calling `init` first surfaces
    /// connectivity problems before any search starts.
    pub async fn init(&self) -> Result<(), FetchError> {
        let mut state = self.state.lock().await;
        let html = self.fetch.get_page(&self.config.init_page_url()).await?;
        state.session_established = true;
        self.adopt_endpoint(&mut state, &html);
        Ok(())
    }

    /// The endpoint segment currently in use, if discovery has run.
    pub async fn active_endpoint(&self) -> Option<String> {
        self.state.lock().await.endpoint.clone()
    }

    /// Availability requests issued over this client's lifetime, retries
    /// included.
    pub async fn requests_issued(&self) -> u64 {
        self.state.lock().await.requests_issued()
    }

    /// Query seat availability for one origin, destination, and travel date.
    ///
    /// Returns the decoded entries, or an empty list when the service
    /// stays throttled past the retry budget or declares an error. Callers
    /// never see transport failures; this client degrades instead.
    pub async fn query_availability(
        &self,
        from: &Telecode,
        to: &Telecode,
        date: NaiveDate,
    ) -> Vec<AvailabilityEntry> {
        let mut state = self.state.lock().await;
        self.run_query(&mut state, from, to, date).await
    }

    async fn run_query(
        &self,
        state: &mut EndpointState,
        from: &Telecode,
        to: &Telecode,
        date: NaiveDate,
    ) -> Vec<AvailabilityEntry> {
        self.ensure_ready(state).await;

        let mut migrated = false;
        loop {
            let endpoint = state
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
            let url = self.query_url(&endpoint, from, to, date);
            state.note_request();

            let body = match self.attempt(&url).await {
                Ok(body) => body,
                Err(signal) => {
                    let strikes = state.record_throttle();
                    if strikes <= BACKOFF_STRIKES {
                        warn!(strikes, reason = %signal, "throttled, backing off");
                        tokio::time::sleep(BACKOFF_UNIT * strikes).await;
                    } else if strikes == BACKOFF_STRIKES + 1 {
                        warn!(strikes, reason = %signal, "still throttled, refreshing session");
                        self.refresh_session(state).await;
                    } else {
                        warn!(reason = %signal, "throttled past the retry budget, giving up");
                        state.reset_strikes();
                        return Vec::new();
                    }
                    continue;
                }
            };

            state.reset_strikes();

            let payload: LeftTicketResponse = match serde_json::from_str(&body) {
                Ok(payload) => payload,
                Err(err) => {
                    error!(error = %err, "availability response did not parse");
                    debug!(body = %body.chars().take(200).collect::<String>());
                    return Vec::new();
                }
            };

            if !payload.status {
                error!(messages = %payload.messages, "inventory service rejected the query");
                return Vec::new();
            }

            let entries = self.decode_entries(payload.data.as_ref());

            // An empty result with a redirect hint usually means the query
            // path rotated under us. Adopt the hint and ask again, once.
            if entries.is_empty() && !migrated {
                if let Some(hint) = payload.c_url.as_deref() {
                    let segment = final_segment(hint);
                    if !segment.is_empty() {
                        info!(endpoint = %segment, "server redirected the query endpoint");
                        state.endpoint = Some(segment.to_string());
                        migrated = true;
                        continue;
                    }
                }
            }

            return entries;
        }
    }

    /// Lazily establish the session before the first query.
    async fn ensure_ready(&self, state: &mut EndpointState) {
        if state.session_established {
            return;
        }
        match self.fetch.get_page(&self.config.init_page_url()).await {
            Ok(html) => {
                state.session_established = true;
                self.adopt_endpoint(state, &html);
            }
            Err(err) => {
                warn!(error = %err, "booking page unavailable, proceeding without a session");
            }
        }
    }

    /// Re-fetch the booking page to renew cookies and re-run endpoint
    /// discovery. Failures keep the current endpoint.
    async fn refresh_session(&self, state: &mut EndpointState) {
        match self.fetch.get_page(&self.config.init_page_url()).await {
            Ok(html) => {
                state.session_established = true;
                self.adopt_endpoint(state, &html);
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed, keeping current endpoint");
            }
        }
    }

    fn adopt_endpoint(&self, state: &mut EndpointState, html: &str) {
        match discover_endpoint(html) {
            Some(segment) => {
                info!(endpoint = %segment, "discovered query endpoint");
                state.endpoint = Some(segment);
            }
            None => {
                debug!("endpoint marker missing from booking page, using default");
                state.endpoint = Some(DEFAULT_ENDPOINT.to_string());
            }
        }
    }

    /// One availability request, classified: a usable JSON body, or a
    /// throttle signal.
    async fn attempt(&self, url: &str) -> Result<String, ThrottleSignal> {
        let body = self.fetch.get_text(url).await?;
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(ThrottleSignal::EmptyBody);
        }
        if !trimmed.starts_with('{') {
            return Err(ThrottleSignal::NotJson);
        }
        Ok(trimmed.to_string())
    }

    fn decode_entries(&self, data: Option<&QueryData>) -> Vec<AvailabilityEntry> {
        let Some(data) = data else {
            return Vec::new();
        };
        data.result
            .iter()
            .filter_map(|raw| decode_record(raw, &data.map, &self.directory))
            .collect()
    }

    fn query_url(&self, endpoint: &str, from: &Telecode, to: &Telecode, date: NaiveDate) -> String {
        format!(
            "{}{}?leftTicketDTO.train_date={}&leftTicketDTO.from_station={}&leftTicketDTO.to_station={}&purpose_codes=ADULT",
            self.config.base_url,
            endpoint,
            date.format("%Y-%m-%d"),
            from.as_str(),
            to.as_str(),
        )
    }
}
