//! Opportunity search over sold-out trains.
//!
//! [`classify`] splits a query's entries by what to do next;
//! [`OpportunitySearch`] probes extendable trains for a longer segment
//! that is still on sale.

mod config;
mod opportunity;

pub use config::SearchConfig;
pub use opportunity::{
    ClassifiedEntries, ExtensionOutcome, InventorySource, Opportunity, OpportunitySearch,
    RouteSource, classify,
};
