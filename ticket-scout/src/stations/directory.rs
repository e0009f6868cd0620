//! In-memory station directory.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::Telecode;
use crate::transport::Fetch;

use super::cache::StationCache;
use super::client::{StationDto, StationsClient};
use super::error::StationError;

/// One station known to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: String,
    pub code: Telecode,
    /// Full pinyin, lowercase (e.g. `beijingnan`).
    pub pinyin: String,
    /// Pinyin initials, lowercase (e.g. `bjn`).
    pub initial: String,
    /// Short lookup key from the wire payload.
    pub abbr: String,
}

/// Immutable station index with exact and fuzzy lookup.
///
/// Built once at startup from the station list; entries with invalid
/// telecodes are dropped during construction.
pub struct StationDirectory {
    stations: Vec<Station>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<Telecode, usize>,
}

impl StationDirectory {
    /// Build the directory from wire DTOs, skipping invalid entries.
    pub fn from_dtos(dtos: Vec<StationDto>) -> Self {
        let mut stations = Vec::with_capacity(dtos.len());
        for dto in dtos {
            let Ok(code) = Telecode::parse(&dto.telecode) else {
                continue;
            };
            stations.push(Station {
                name: dto.name,
                code,
                pinyin: dto.pinyin.to_lowercase(),
                initial: dto.initial.to_lowercase(),
                abbr: dto.abbr.to_lowercase(),
            });
        }

        let mut by_name = HashMap::with_capacity(stations.len());
        let mut by_code = HashMap::with_capacity(stations.len());
        for (idx, station) in stations.iter().enumerate() {
            by_name.insert(station.name.clone(), idx);
            by_code.insert(station.code, idx);
        }

        Self {
            stations,
            by_name,
            by_code,
        }
    }

    /// An empty directory (for tests and degraded startup).
    pub fn empty() -> Self {
        Self::from_dtos(Vec::new())
    }

    /// Exact lookup by display name.
    pub fn lookup_by_name(&self, name: &str) -> Option<&Station> {
        self.by_name.get(name).map(|&idx| &self.stations[idx])
    }

    /// Lookup by telecode.
    pub fn lookup_by_code(&self, code: &Telecode) -> Option<&Station> {
        self.by_code.get(code).map(|&idx| &self.stations[idx])
    }

    /// Substring search over name, pinyin, initials and abbreviation.
    ///
    /// The keyword is trimmed and lowercased; an empty keyword matches
    /// nothing.
    pub fn fuzzy_search(&self, keyword: &str) -> Vec<&Station> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Vec::new();
        }

        self.stations
            .iter()
            .filter(|s| {
                s.name.contains(&keyword)
                    || s.pinyin.contains(&keyword)
                    || s.initial.contains(&keyword)
                    || s.abbr.contains(&keyword)
            })
            .collect()
    }

    /// Number of stations in the directory.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the directory holds no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Load the directory, preferring the disk cache over the network.
///
/// A failed cache write is logged and otherwise ignored; a fetch failure
/// with no usable cache is fatal to the load.
pub async fn load_directory<F: Fetch>(
    client: &StationsClient<F>,
    cache: &StationCache,
) -> Result<StationDirectory, StationError> {
    if let Some(dtos) = cache.load() {
        info!(count = dtos.len(), "loaded station list from disk cache");
        return Ok(StationDirectory::from_dtos(dtos));
    }

    let dtos = client.fetch_all().await?;
    info!(count = dtos.len(), "fetched station list");
    if let Err(e) = cache.save(&dtos) {
        warn!("failed to write station cache: {e}");
    }
    Ok(StationDirectory::from_dtos(dtos))
}
