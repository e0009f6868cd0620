//! Availability entries decoded from inventory responses.

use super::seat::SeatInventory;
use super::telecode::Telecode;

/// One train's offer for a queried origin/destination pair.
///
/// Carries both the *physical* run (start/end of the train's whole route)
/// and the *queried* segment (from/to). The queried segment is always a
/// sub-range of the physical run; when the queried destination is short of
/// the physical end, a sold-out entry can still be extended to a later stop.
///
/// Immutable after decoding; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityEntry {
    /// Internal train identifier used by the route API (e.g. `5l0000G10100`).
    pub train_id: String,
    /// Public train code shown to riders (e.g. `G101`).
    pub train_code: String,
    /// First station of the physical run.
    pub start_code: Telecode,
    /// Terminus of the physical run.
    pub end_code: Telecode,
    /// Queried boarding station.
    pub from_code: Telecode,
    /// Queried alighting station.
    pub to_code: Telecode,
    pub start_name: String,
    pub end_name: String,
    pub from_name: String,
    pub to_name: String,
    /// Departure clock time at the queried boarding station (`HH:MM`).
    pub depart_time: String,
    /// Arrival clock time at the queried alighting station (`HH:MM`).
    pub arrive_time: String,
    /// Segment duration (`HH:MM`).
    pub duration: String,
    /// Whether the booking button is active for this entry.
    pub bookable: bool,
    pub seats: SeatInventory,
}

impl AvailabilityEntry {
    /// Whether the train continues past the queried destination.
    pub fn is_extendable(&self) -> bool {
        self.to_code != self.end_code
    }

    /// Whether any seat class on the queried segment can be bought.
    pub fn has_seats(&self) -> bool {
        self.seats.any_available()
    }

    /// Purchasable classes as a short display string.
    pub fn seat_summary(&self) -> String {
        self.seats.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeatCount;

    fn code(s: &str) -> Telecode {
        Telecode::parse(s).unwrap()
    }

    fn entry(to: &str, end: &str) -> AvailabilityEntry {
        AvailabilityEntry {
            train_id: "5l0000G10100".to_string(),
            train_code: "G101".to_string(),
            start_code: code("VNP"),
            end_code: code(end),
            from_code: code("VNP"),
            to_code: code(to),
            start_name: "北京南".to_string(),
            end_name: "上海虹桥".to_string(),
            from_name: "北京南".to_string(),
            to_name: "南京南".to_string(),
            depart_time: "06:44".to_string(),
            arrive_time: "10:20".to_string(),
            duration: "03:36".to_string(),
            bookable: true,
            seats: SeatInventory::empty(),
        }
    }

    #[test]
    fn extendable_iff_to_differs_from_end() {
        assert!(entry("NKH", "AOH").is_extendable());
        assert!(!entry("AOH", "AOH").is_extendable());
    }

    #[test]
    fn has_seats_follows_inventory() {
        let mut e = entry("NKH", "AOH");
        assert!(!e.has_seats());

        e.seats.second_class = SeatCount::Available;
        assert!(e.has_seats());
    }

    #[test]
    fn seat_summary_delegates() {
        let mut e = entry("NKH", "AOH");
        e.seats.hard_seat = SeatCount::Count(4);
        assert_eq!(e.seat_summary(), "hard-seat: 4");
    }
}
