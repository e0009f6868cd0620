//! Route lookup errors.

use crate::transport::FetchError;

/// Errors from the route API.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Transport failure fetching the route
    #[error("HTTP error: {0}")]
    Http(#[from] FetchError),

    /// Response body was not the expected JSON shape
    #[error("unexpected route payload: {message}")]
    Json { message: String },
}
