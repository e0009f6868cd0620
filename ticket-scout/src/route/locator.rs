//! Locating the queried destination inside a stop sequence.

use crate::domain::{StopRecord, Telecode};

/// The tail of `route` strictly after the stop matching the queried
/// destination.
///
/// A telecode match identifies the stop outright. When the codes differ,
/// or either side lacks one, the names are compared instead, accepting an
/// exact match or a prefix in either direction: the availability API
/// sometimes reports `天津` where the route says `天津西`, and the two
/// feeds occasionally disagree on a station's code altogether. Returns an
/// empty slice when no stop matches.
pub fn stops_after<'r>(
    route: &'r [StopRecord],
    name: &str,
    code: Option<Telecode>,
) -> &'r [StopRecord] {
    match route.iter().position(|stop| matches_stop(stop, name, code)) {
        Some(idx) => &route[idx + 1..],
        None => &[],
    }
}

fn matches_stop(stop: &StopRecord, name: &str, code: Option<Telecode>) -> bool {
    if let (Some(stop_code), Some(code)) = (stop.code, code)
        && stop_code == code
    {
        return true;
    }
    if name.is_empty() || stop.name.is_empty() {
        return false;
    }
    stop.name == name || stop.name.starts_with(name) || name.starts_with(&stop.name)
}
