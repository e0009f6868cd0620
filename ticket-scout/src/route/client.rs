//! Client for the train-route API.
//!
//! Given a train's internal identifier and the endpoints of its physical
//! run, the route API returns the full stop sequence with arrival and
//! departure times. We use it to learn which stations lie beyond a queried
//! destination.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{StopRecord, Telecode};
use crate::transport::Fetch;

use super::error::RouteError;

const DEFAULT_BASE_URL: &str = "https://kyfw.12306.cn/otn/czxx/queryByTrainNo";

/// Configuration for the route client.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Base URL of the route API.
    pub base_url: String,
}

impl RouteConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Top-level route response; the stop list nests as `data.data`.
#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    data: Option<RouteData>,
}

#[derive(Debug, Deserialize)]
struct RouteData {
    #[serde(default)]
    data: Vec<StopDto>,
}

/// One stop as reported by the route API.
///
/// `station_no` is a 1-based sequence number serialised as a zero-padded
/// string. The origin has a dashed-out arrival time, the terminus a
/// dashed-out departure time.
#[derive(Debug, Deserialize)]
struct StopDto {
    #[serde(default)]
    station_no: String,
    #[serde(default)]
    station_name: String,
    #[serde(default)]
    station_telecode: Option<String>,
    #[serde(default)]
    arrive_time: String,
    #[serde(default)]
    start_time: String,
    #[serde(default)]
    stopover_time: String,
}

/// Client for route lookups.
pub struct RouteClient<F> {
    fetch: F,
    config: RouteConfig,
}

impl<F: Fetch> RouteClient<F> {
    pub fn new(fetch: F, config: RouteConfig) -> Self {
        Self { fetch, config }
    }

    /// Fetch the full stop sequence for one train run.
    ///
    /// `train_id` is the internal identifier from the availability record,
    /// not the public train code. `start` and `end` are the physical run's
    /// endpoints; the API requires them alongside the travel date.
    pub async fn fetch_route(
        &self,
        train_id: &str,
        start: &Telecode,
        end: &Telecode,
        date: NaiveDate,
    ) -> Result<Vec<StopRecord>, RouteError> {
        let url = self.route_url(train_id, start, end, date);
        let body = self.fetch.get_text(&url).await?;
        let response: RouteResponse =
            serde_json::from_str(&body).map_err(|err| RouteError::Json {
                message: err.to_string(),
            })?;

        let stops = response.data.map(|data| data.data).unwrap_or_default();
        Ok(stops.into_iter().filter_map(convert_stop).collect())
    }

    fn route_url(
        &self,
        train_id: &str,
        start: &Telecode,
        end: &Telecode,
        date: NaiveDate,
    ) -> String {
        format!(
            "{}?train_no={}&from_station_telecode={}&to_station_telecode={}&depart_date={}",
            self.config.base_url,
            train_id,
            start.as_str(),
            end.as_str(),
            date.format("%Y-%m-%d"),
        )
    }
}

fn is_terminus_marker(start_time: &str) -> bool {
    start_time.is_empty() || start_time == "----"
}

/// Convert one wire stop, or skip it when the sequence number is unusable.
fn convert_stop(dto: StopDto) -> Option<StopRecord> {
    let sequence = match dto.station_no.trim().parse::<u32>() {
        Ok(n) => n,
        Err(_) => {
            debug!(station = %dto.station_name, "stop with unparseable sequence, skipping");
            return None;
        }
    };

    let code = dto
        .station_telecode
        .as_deref()
        .and_then(|raw| Telecode::parse(raw).ok());
    let is_terminus = is_terminus_marker(&dto.start_time);

    Some(StopRecord {
        sequence,
        name: dto.station_name,
        code,
        arrive_time: dto.arrive_time,
        depart_time: dto.start_time,
        dwell: dto.stopover_time,
        is_origin: sequence == 1,
        is_terminus,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FetchError;

    struct FixedFetch(String);

    impl Fetch for FixedFetch {
        async fn get_text(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.clone())
        }

        async fn get_page(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn code(s: &str) -> Telecode {
        Telecode::parse(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn sample_body() -> String {
        serde_json::json!({
            "validateMessagesShowId": "_validatorMessage",
            "status": true,
            "data": {
                "data": [
                    {
                        "station_no": "01",
                        "station_name": "北京南",
                        "station_telecode": "VNP",
                        "arrive_time": "----",
                        "start_time": "09:00",
                        "stopover_time": "----"
                    },
                    {
                        "station_no": "02",
                        "station_name": "济南西",
                        "arrive_time": "10:32",
                        "start_time": "10:34",
                        "stopover_time": "2分钟"
                    },
                    {
                        "station_no": "03",
                        "station_name": "上海虹桥",
                        "station_telecode": "AOH",
                        "arrive_time": "13:25",
                        "start_time": "----",
                        "stopover_time": "----"
                    }
                ]
            }
        })
        .to_string()
    }

    #[test]
    fn route_url_format() {
        let client = RouteClient::new(FixedFetch(String::new()), RouteConfig::default());
        let url = client.route_url("5l000G101930", &code("VNP"), &code("AOH"), date());
        assert_eq!(
            url,
            "https://kyfw.12306.cn/otn/czxx/queryByTrainNo\
             ?train_no=5l000G101930\
             &from_station_telecode=VNP\
             &to_station_telecode=AOH\
             &depart_date=2025-10-01"
        );
    }

    #[tokio::test]
    async fn decodes_a_route() {
        let client = RouteClient::new(FixedFetch(sample_body()), RouteConfig::default());
        let stops = client
            .fetch_route("5l000G101930", &code("VNP"), &code("AOH"), date())
            .await
            .unwrap();

        assert_eq!(stops.len(), 3);

        assert_eq!(stops[0].sequence, 1);
        assert!(stops[0].is_origin);
        assert!(!stops[0].is_terminus);
        assert_eq!(stops[0].code, Some(code("VNP")));
        assert_eq!(stops[0].depart_time, "09:00");

        // Middle stop carries no telecode in this payload.
        assert_eq!(stops[1].sequence, 2);
        assert_eq!(stops[1].name, "济南西");
        assert_eq!(stops[1].code, None);
        assert_eq!(stops[1].dwell, "2分钟");

        assert_eq!(stops[2].sequence, 3);
        assert!(stops[2].is_terminus);
        assert_eq!(stops[2].arrive_time, "13:25");
    }

    #[tokio::test]
    async fn missing_data_yields_empty_route() {
        let client = RouteClient::new(
            FixedFetch(r#"{"status": true}"#.to_string()),
            RouteConfig::default(),
        );
        let stops = client
            .fetch_route("x", &code("VNP"), &code("AOH"), date())
            .await
            .unwrap();
        assert!(stops.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let client = RouteClient::new(
            FixedFetch("<html>login required</html>".to_string()),
            RouteConfig::default(),
        );
        let result = client
            .fetch_route("x", &code("VNP"), &code("AOH"), date())
            .await;
        assert!(matches!(result, Err(RouteError::Json { .. })));
    }

    #[tokio::test]
    async fn stops_without_sequence_are_skipped() {
        let body = serde_json::json!({
            "data": {
                "data": [
                    {"station_no": "", "station_name": "ghost"},
                    {"station_no": "01", "station_name": "北京南", "start_time": "09:00"}
                ]
            }
        })
        .to_string();

        let client = RouteClient::new(FixedFetch(body), RouteConfig::default());
        let stops = client
            .fetch_route("x", &code("VNP"), &code("AOH"), date())
            .await
            .unwrap();

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, "北京南");
    }

    #[test]
    fn terminus_marker_forms() {
        assert!(is_terminus_marker(""));
        assert!(is_terminus_marker("----"));
        assert!(!is_terminus_marker("09:00"));
    }
}
