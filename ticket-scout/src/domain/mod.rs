//! Domain types for the availability scout.
//!
//! This module contains the core model types shared across the crate.
//! Validated types (station telecodes) enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod availability;
mod seat;
mod stop;
mod telecode;

pub use availability::AvailabilityEntry;
pub use seat::{SeatClass, SeatCount, SeatInventory};
pub use stop::StopRecord;
pub use telecode::{InvalidTelecode, Telecode};
