//! Decoding of the `|`-joined availability records.
//!
//! Each element of the response's `result` list is one train, serialised as
//! a positional record of 35-plus fields. Only the fields we consume are
//! named here; the rest ride along unparsed.

use std::collections::HashMap;

use crate::domain::{AvailabilityEntry, SeatCount, SeatInventory, Telecode};
use crate::stations::StationDirectory;

/// A record must carry at least this many fields to be decodable.
pub const MIN_FIELDS: usize = 35;

const IDX_TRAIN_ID: usize = 2;
const IDX_TRAIN_CODE: usize = 3;
const IDX_START_CODE: usize = 4;
const IDX_END_CODE: usize = 5;
const IDX_FROM_CODE: usize = 6;
const IDX_TO_CODE: usize = 7;
const IDX_DEPART: usize = 8;
const IDX_ARRIVE: usize = 9;
const IDX_DURATION: usize = 10;
const IDX_BOOKABLE: usize = 11;
const IDX_PREMIUM_SLEEPER: usize = 21;
const IDX_SOFT_SLEEPER: usize = 23;
const IDX_SOFT_SEAT: usize = 24;
const IDX_STANDING: usize = 26;
const IDX_HARD_SLEEPER: usize = 28;
const IDX_HARD_SEAT: usize = 29;
const IDX_SECOND_CLASS: usize = 30;
const IDX_FIRST_CLASS: usize = 31;
const IDX_BUSINESS: usize = 32;
const IDX_EMU_SLEEPER: usize = 33;

/// Decode one raw record into an [`AvailabilityEntry`].
///
/// Returns `None` for records that are too short or whose station codes
/// don't parse; callers skip those rather than aborting the batch. Station
/// names are resolved from the response's own code→name `map` first, then
/// the station directory, then the raw telecode as a last resort.
pub fn decode_record(
    raw: &str,
    name_map: &HashMap<String, String>,
    directory: &StationDirectory,
) -> Option<AvailabilityEntry> {
    let fields: Vec<&str> = raw.split('|').collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let start_code = Telecode::parse(field(&fields, IDX_START_CODE)).ok()?;
    let end_code = Telecode::parse(field(&fields, IDX_END_CODE)).ok()?;
    let from_code = Telecode::parse(field(&fields, IDX_FROM_CODE)).ok()?;
    let to_code = Telecode::parse(field(&fields, IDX_TO_CODE)).ok()?;

    let seats = SeatInventory {
        business: seat(&fields, IDX_BUSINESS),
        first_class: seat(&fields, IDX_FIRST_CLASS),
        second_class: seat(&fields, IDX_SECOND_CLASS),
        premium_sleeper: seat(&fields, IDX_PREMIUM_SLEEPER),
        soft_sleeper: seat(&fields, IDX_SOFT_SLEEPER),
        emu_sleeper: seat(&fields, IDX_EMU_SLEEPER),
        hard_sleeper: seat(&fields, IDX_HARD_SLEEPER),
        soft_seat: seat(&fields, IDX_SOFT_SEAT),
        hard_seat: seat(&fields, IDX_HARD_SEAT),
        standing: seat(&fields, IDX_STANDING),
    };

    Some(AvailabilityEntry {
        train_id: field(&fields, IDX_TRAIN_ID).to_string(),
        train_code: field(&fields, IDX_TRAIN_CODE).to_string(),
        start_code,
        end_code,
        from_code,
        to_code,
        start_name: resolve_name(&start_code, name_map, directory),
        end_name: resolve_name(&end_code, name_map, directory),
        from_name: resolve_name(&from_code, name_map, directory),
        to_name: resolve_name(&to_code, name_map, directory),
        depart_time: field(&fields, IDX_DEPART).to_string(),
        arrive_time: field(&fields, IDX_ARRIVE).to_string(),
        duration: field(&fields, IDX_DURATION).to_string(),
        bookable: field(&fields, IDX_BOOKABLE) == "Y",
        seats,
    })
}

fn field<'a>(fields: &[&'a str], idx: usize) -> &'a str {
    fields.get(idx).copied().unwrap_or("")
}

fn seat(fields: &[&str], idx: usize) -> SeatCount {
    SeatCount::parse(field(fields, idx))
}

fn resolve_name(
    code: &Telecode,
    name_map: &HashMap<String, String>,
    directory: &StationDirectory,
) -> String {
    if let Some(name) = name_map.get(code.as_str()) {
        return name.clone();
    }
    if let Some(station) = directory.lookup_by_code(code) {
        return station.name.clone();
    }
    code.as_str().to_string()
}
