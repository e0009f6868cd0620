//! Buy-long ride-short opportunity search.
//!
//! When a train is sold out for the queried segment but continues past the
//! destination, a ticket to a later stop sometimes remains on sale: the
//! rider buys the longer segment and alights early. The search walks a
//! sold-out train's stops beyond the destination looking for such a
//! purchase.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{AvailabilityEntry, StopRecord, Telecode};
use crate::inventory::InventoryClient;
use crate::route::{CachedRouteClient, RouteClient, RouteError, stops_after};
use crate::stations::StationDirectory;
use crate::transport::Fetch;

use super::config::SearchConfig;

/// Source of availability entries.
///
/// This abstraction allows the search to be tested with scripted data.
#[allow(async_fn_in_trait)]
pub trait InventorySource {
    /// Availability for one origin, destination, and travel date.
    async fn query_availability(
        &self,
        from: &Telecode,
        to: &Telecode,
        date: NaiveDate,
    ) -> Vec<AvailabilityEntry>;
}

impl<F: Fetch> InventorySource for InventoryClient<F> {
    async fn query_availability(
        &self,
        from: &Telecode,
        to: &Telecode,
        date: NaiveDate,
    ) -> Vec<AvailabilityEntry> {
        InventoryClient::query_availability(self, from, to, date).await
    }
}

/// Source of train stop sequences.
#[allow(async_fn_in_trait)]
pub trait RouteSource {
    /// The full stop sequence for one train run.
    async fn full_route(
        &self,
        train_id: &str,
        start: &Telecode,
        end: &Telecode,
        date: NaiveDate,
    ) -> Result<Arc<Vec<StopRecord>>, RouteError>;
}

impl<F: Fetch> RouteSource for RouteClient<F> {
    async fn full_route(
        &self,
        train_id: &str,
        start: &Telecode,
        end: &Telecode,
        date: NaiveDate,
    ) -> Result<Arc<Vec<StopRecord>>, RouteError> {
        self.fetch_route(train_id, start, end, date)
            .await
            .map(Arc::new)
    }
}

impl<F: Fetch> RouteSource for CachedRouteClient<F> {
    async fn full_route(
        &self,
        train_id: &str,
        start: &Telecode,
        end: &Telecode,
        date: NaiveDate,
    ) -> Result<Arc<Vec<StopRecord>>, RouteError> {
        self.fetch_route(train_id, start, end, date).await
    }
}

/// Entries from one query, classified by what to do with them next.
#[derive(Debug, Default)]
pub struct ClassifiedEntries {
    /// Purchasable as queried.
    pub available: Vec<AvailabilityEntry>,
    /// Sold out but continuing past the queried destination.
    pub extendable: Vec<AvailabilityEntry>,
    /// Sold out and terminating at the queried destination.
    pub dead_end: Vec<AvailabilityEntry>,
}

/// Split a query's entries into purchasable, extendable, and dead-end.
pub fn classify(entries: Vec<AvailabilityEntry>) -> ClassifiedEntries {
    let mut classified = ClassifiedEntries::default();
    for entry in entries {
        if entry.has_seats() {
            classified.available.push(entry);
        } else if entry.is_extendable() {
            classified.extendable.push(entry);
        } else {
            classified.dead_end.push(entry);
        }
    }
    classified
}

/// A buy-long purchase covering a sold-out segment.
#[derive(Debug, Clone)]
pub struct Opportunity {
    /// The sold-out entry for the segment the rider actually wants.
    pub original: AvailabilityEntry,
    /// The purchasable entry for the longer segment.
    pub extended: AvailabilityEntry,
    /// Display name of the station to buy to.
    pub buy_to: String,
}

/// Result of probing one sold-out train's later stops.
#[derive(Debug)]
pub enum ExtensionOutcome {
    /// The route could not be fetched, or came back empty.
    RouteUnavailable,
    /// The queried destination is the train's last stop.
    NoStopsBeyond,
    /// A purchasable longer segment was found.
    Found(Opportunity),
    /// Every probed stop was sold out or unusable; `sampled` counts the
    /// interior stops consumed after the terminal probe.
    Exhausted { sampled: usize },
}

/// Opportunity search over sold-out trains.
pub struct OpportunitySearch<'a, I, R> {
    inventory: &'a I,
    routes: &'a R,
    directory: &'a StationDirectory,
    config: &'a SearchConfig,
}

impl<'a, I: InventorySource, R: RouteSource> OpportunitySearch<'a, I, R> {
    pub fn new(
        inventory: &'a I,
        routes: &'a R,
        directory: &'a StationDirectory,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            inventory,
            routes,
            directory,
            config,
        }
    }

    /// Probe one sold-out train's stops beyond the queried destination.
    ///
    /// The terminal stop is probed first; if that fails and more than one
    /// stop lies beyond the destination, interior stops are sampled
    /// front-to-back at the configured stride, up to the sample budget.
    /// A stop that cannot be resolved to a telecode still consumes budget.
    /// The first purchasable probe wins.
    pub async fn analyze_train(
        &self,
        origin: &Telecode,
        destination_name: &str,
        train: &AvailabilityEntry,
        date: NaiveDate,
    ) -> ExtensionOutcome {
        let route = match self
            .routes
            .full_route(&train.train_id, &train.start_code, &train.end_code, date)
            .await
        {
            Ok(route) => route,
            Err(err) => {
                warn!(train = %train.train_code, error = %err, "route lookup failed");
                return ExtensionOutcome::RouteUnavailable;
            }
        };

        if route.is_empty() {
            return ExtensionOutcome::RouteUnavailable;
        }

        let beyond = stops_after(&route, destination_name, Some(train.to_code));
        let Some(terminal) = beyond.last() else {
            return ExtensionOutcome::NoStopsBeyond;
        };

        if let Some(extended) = self.probe_stop(origin, train, terminal, date).await {
            return found(train, extended);
        }

        if beyond.len() > 1 {
            let step = self.config.stride(beyond.len());
            let mut idx = 0;
            let mut sampled = 0;
            while idx < beyond.len() - 1 && sampled < self.config.max_interior_samples {
                if let Some(extended) = self.probe_stop(origin, train, &beyond[idx], date).await {
                    return found(train, extended);
                }
                sampled += 1;
                idx += step;
            }
            return ExtensionOutcome::Exhausted { sampled };
        }

        ExtensionOutcome::Exhausted { sampled: 0 }
    }

    /// Query the origin against one later stop and look for the same train.
    ///
    /// Returns the matched entry only when it has seats; a matched entry
    /// that is itself sold out is not an opportunity.
    async fn probe_stop(
        &self,
        origin: &Telecode,
        train: &AvailabilityEntry,
        stop: &StopRecord,
        date: NaiveDate,
    ) -> Option<AvailabilityEntry> {
        let Some(code) = self.resolve_stop_code(stop) else {
            debug!(stop = %stop.name, "no telecode for stop, skipping probe");
            return None;
        };

        debug!(train = %train.train_code, stop = %stop.name, "probing later stop");
        let entries = self.inventory.query_availability(origin, &code, date).await;
        let matched = entries
            .into_iter()
            .find(|e| e.train_code == train.train_code)?;
        matched.has_seats().then_some(matched)
    }

    fn resolve_stop_code(&self, stop: &StopRecord) -> Option<Telecode> {
        stop.code.or_else(|| {
            self.directory
                .lookup_by_name(&stop.name)
                .map(|station| station.code)
        })
    }
}

fn found(train: &AvailabilityEntry, extended: AvailabilityEntry) -> ExtensionOutcome {
    info!(
        train = %train.train_code,
        buy_to = %extended.to_name,
        seats = %extended.seat_summary(),
        "longer segment still on sale"
    );
    ExtensionOutcome::Found(Opportunity {
        original: train.clone(),
        buy_to: extended.to_name.clone(),
        extended,
    })
}
