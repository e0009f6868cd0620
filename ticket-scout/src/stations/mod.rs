//! Station directory: list fetch, disk cache, and lookups.
//!
//! Provides telecode ↔ name mapping plus fuzzy keyword search, loaded from
//! the remote station list at startup and cached on disk for a week.

mod cache;
mod client;
mod directory;
mod error;

pub use cache::StationCache;
pub use client::{StationDto, StationsClient, StationsConfig, parse_station_js};
pub use directory::{Station, StationDirectory, load_directory};
pub use error::StationError;
