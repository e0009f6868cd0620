//! Stops on a train's physical route.

use super::telecode::Telecode;

/// One stop in a train's full route, as reported by the route API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRecord {
    /// 1-based position in the route.
    pub sequence: u32,
    pub name: String,
    /// Wire telecode; the route API omits it for some intermediate stops.
    pub code: Option<Telecode>,
    /// Arrival clock time; `----` at the origin stop.
    pub arrive_time: String,
    /// Departure clock time; `----` at the terminus.
    pub depart_time: String,
    /// Dwell duration at this stop.
    pub dwell: String,
    pub is_origin: bool,
    pub is_terminus: bool,
}
