//! Query-endpoint discovery and per-session throttle bookkeeping.
//!
//! The left-ticket site rotates the path segment behind its query API
//! (`query`, `queryA`, `queryZ`, ...). The current segment is published in
//! the booking page's inline script as `var CLeftTicketUrl = '...'`; we
//! scrape it there and fall back to `query` when the marker is missing.

use regex::Regex;

/// Path segment used when discovery finds nothing.
pub const DEFAULT_ENDPOINT: &str = "query";

/// Mutable per-session query state.
///
/// Tracks the active endpoint segment, whether a session has been
/// established against the booking page, and the throttle strike counter
/// that drives the retry ladder.
#[derive(Debug, Default)]
pub struct EndpointState {
    /// Discovered endpoint segment; `None` until discovery has run.
    pub endpoint: Option<String>,
    /// Whether the booking page has been fetched to seed session cookies.
    pub session_established: bool,
    throttle_strikes: u32,
    requests_issued: u64,
}

impl EndpointState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one throttled response and return the updated strike count.
    pub fn record_throttle(&mut self) -> u32 {
        self.throttle_strikes += 1;
        self.throttle_strikes
    }

    /// Clear the strike counter after a non-throttled response.
    pub fn reset_strikes(&mut self) {
        self.throttle_strikes = 0;
    }

    pub fn throttle_strikes(&self) -> u32 {
        self.throttle_strikes
    }

    /// Count one availability request against this session.
    pub fn note_request(&mut self) {
        self.requests_issued += 1;
    }

    pub fn requests_issued(&self) -> u64 {
        self.requests_issued
    }
}

/// Extract the active endpoint segment from the booking page's HTML.
///
/// Returns the final path segment of the advertised URL, or `None` when
/// the marker is absent.
pub fn discover_endpoint(html: &str) -> Option<String> {
    let pattern = Regex::new(r"var\s+CLeftTicketUrl\s*=\s*'([^']+)'").ok()?;
    let captures = pattern.captures(html)?;
    let advertised = captures.get(1)?.as_str();
    Some(final_segment(advertised).to_string())
}

/// The last `/`-separated segment of a path, or the path itself when it
/// has no separator.
pub fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
