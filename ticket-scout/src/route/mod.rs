//! Train route (stop sequence) lookups.
//!
//! [`RouteClient`] fetches a train's full stop sequence; [`CachedRouteClient`]
//! adds a (train, date) keyed cache on top. [`stops_after`] slices a route
//! to the stations beyond a queried destination.

mod cache;
mod client;
mod error;
mod locator;

pub use cache::{CachedRouteClient, RouteCache, RouteCacheConfig};
pub use client::{RouteClient, RouteConfig};
pub use error::RouteError;
pub use locator::stops_after;
