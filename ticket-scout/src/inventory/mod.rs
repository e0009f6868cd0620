//! Seat availability queries against the left-ticket API.
//!
//! [`InventoryClient`] owns the query session: endpoint discovery from the
//! booking page, the throttle retry ladder, and `c_url` endpoint migration.
//! [`decode_record`] turns the wire's positional records into
//! [`crate::domain::AvailabilityEntry`] values.

mod client;
mod decode;
mod endpoint;
mod types;

pub use client::{InventoryClient, InventoryConfig};
pub use decode::{MIN_FIELDS, decode_record};
pub use endpoint::{DEFAULT_ENDPOINT, EndpointState, discover_endpoint, final_segment};
pub use types::{LeftTicketResponse, QueryData};
