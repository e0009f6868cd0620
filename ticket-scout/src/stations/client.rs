//! Station list client.
//!
//! The station directory is published as a JavaScript assignment whose
//! single-quoted payload packs every station into `@`-separated entries of
//! `|`-separated fields: `abbr|name|telecode|pinyin|initial|index[|…]`.

use serde::{Deserialize, Serialize};

use crate::transport::Fetch;

use super::error::StationError;

/// Default URL of the station list script.
const DEFAULT_SOURCE_URL: &str =
    "https://kyfw.12306.cn/otn/resources/js/framework/station_name.js";

/// Raw station entry as parsed from the wire (and stored in the disk cache).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDto {
    pub abbr: String,
    pub name: String,
    pub telecode: String,
    pub pinyin: String,
    pub initial: String,
}

/// Configuration for the station list client.
#[derive(Debug, Clone)]
pub struct StationsConfig {
    /// URL of the station list script.
    pub source_url: String,
}

impl StationsConfig {
    /// Set a custom source URL (for testing).
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
        }
    }
}

/// Client that fetches and parses the station list.
#[derive(Debug, Clone)]
pub struct StationsClient<F> {
    fetch: F,
    config: StationsConfig,
}

impl<F: Fetch> StationsClient<F> {
    /// Create a new station list client over the given transport.
    pub fn new(fetch: F, config: StationsConfig) -> Self {
        Self { fetch, config }
    }

    /// Fetch and parse every station.
    pub async fn fetch_all(&self) -> Result<Vec<StationDto>, StationError> {
        let body = self.fetch.get_text(&self.config.source_url).await?;
        parse_station_js(&body)
    }
}

/// Parse the station script body into DTOs.
///
/// Entries that are too short or empty are skipped; the payload grows extra
/// trailing fields in newer revisions, which are ignored.
pub fn parse_station_js(js: &str) -> Result<Vec<StationDto>, StationError> {
    let start = js
        .find('\'')
        .ok_or(StationError::Parse("no quoted payload"))?;
    let end = js.rfind('\'').ok_or(StationError::Parse("no quoted payload"))?;
    if end <= start {
        return Err(StationError::Parse("empty quoted payload"));
    }

    let payload = &js[start + 1..end];
    Ok(payload
        .split('@')
        .filter(|entry| !entry.is_empty())
        .filter_map(parse_entry)
        .collect())
}

fn parse_entry(entry: &str) -> Option<StationDto> {
    let fields: Vec<&str> = entry.split('|').collect();
    if fields.len() < 6 {
        return None;
    }

    Some(StationDto {
        abbr: fields[0].to_string(),
        name: fields[1].to_string(),
        telecode: fields[2].to_string(),
        pinyin: fields[3].to_string(),
        initial: fields[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JS: &str = "var station_names ='@bjb|北京北|VAP|beijingbei|bjb|0@bjd|北京东|BOP|beijingdong|bjd|1@bjn|北京南|VNP|beijingnan|bjn|2';";

    #[test]
    fn parse_sample_payload() {
        let stations = parse_station_js(SAMPLE_JS).unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].name, "北京北");
        assert_eq!(stations[0].telecode, "VAP");
        assert_eq!(stations[2].pinyin, "beijingnan");
        assert_eq!(stations[2].initial, "bjn");
    }

    #[test]
    fn parse_tolerates_extra_fields() {
        // Newer payload revisions append city fields after the index.
        let js = "var x ='@sha|上海|SHH|shanghai|sh|10|extra|more';";
        let stations = parse_station_js(js).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].telecode, "SHH");
    }

    #[test]
    fn parse_skips_short_entries() {
        let js = "var x ='@bad|entry@bjn|北京南|VNP|beijingnan|bjn|2';";
        let stations = parse_station_js(js).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "北京南");
    }

    #[test]
    fn parse_rejects_unquoted_body() {
        assert!(parse_station_js("<html>blocked</html>").is_err());
        assert!(parse_station_js("").is_err());
    }

    #[test]
    fn config_defaults() {
        let config = StationsConfig::default();
        assert!(config.source_url.contains("station_name.js"));
    }

    #[test]
    fn config_with_source_url() {
        let config = StationsConfig::default().with_source_url("http://localhost:8080/s.js");
        assert_eq!(config.source_url, "http://localhost:8080/s.js");
    }
}
