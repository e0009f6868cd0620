//! Station directory error types.

use crate::transport::FetchError;

/// Errors that can occur while building the station directory.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] FetchError),

    /// The station list payload did not have the expected shape
    #[error("station list parse error: {0}")]
    Parse(&'static str),

    /// Disk snapshot could not be written
    #[error("{0}")]
    Snapshot(String),
}
