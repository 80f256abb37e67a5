//! Reqwest-backed feed source adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and JSON decoding into domain readings. One call
//! issues one batched POST covering every requested series.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::warn;

use super::dto::{FeedRequestDto, FeedResponseDto};
use crate::domain::ports::{FeedSourceError, IndicatorFeedSource};
use crate::domain::{IndicatorReading, PeriodTag, SeriesId};

const SUCCESS_STATUS: &str = "REQUEST_SUCCEEDED";
const DEFAULT_FEED_TIMEOUT_SECONDS: u64 = 10;

/// Feed source adapter performing HTTP POST requests against one endpoint.
pub struct FeedHttpSource {
    client: Client,
    endpoint: Url,
    registration_key: String,
}

impl FeedHttpSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, registration_key: String) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            endpoint,
            registration_key,
            Duration::from_secs(DEFAULT_FEED_TIMEOUT_SECONDS),
        )
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        endpoint: Url,
        registration_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            registration_key,
        })
    }
}

#[async_trait]
impl IndicatorFeedSource for FeedHttpSource {
    async fn fetch_latest(
        &self,
        series: &[SeriesId],
    ) -> Result<BTreeMap<SeriesId, IndicatorReading>, FeedSourceError> {
        if series.is_empty() {
            return Ok(BTreeMap::new());
        }

        let request = FeedRequestDto {
            series_ids: series.iter().map(SeriesId::as_str).collect(),
            latest: true,
            registration_key: self.registration_key.as_str(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_readings(body.as_ref())
    }
}

fn parse_readings(
    body: &[u8],
) -> Result<BTreeMap<SeriesId, IndicatorReading>, FeedSourceError> {
    let decoded: FeedResponseDto = serde_json::from_slice(body).map_err(|error| {
        FeedSourceError::decode(format!("invalid feed JSON payload: {error}"))
    })?;

    if decoded.status != SUCCESS_STATUS {
        return Err(FeedSourceError::envelope(decoded.status));
    }

    let mut readings = BTreeMap::new();
    for series in decoded.results.series {
        let Some(entry) = series.latest_entry() else {
            continue;
        };
        let Ok(series_id) = SeriesId::new(series.series_id.as_str()) else {
            warn!(series = %series.series_id, "blank series id in feed payload; dropping");
            continue;
        };
        let Ok(value) = entry.value.trim().parse::<f64>() else {
            warn!(
                series = %series_id,
                value = %entry.value,
                "unparsable value in feed payload; dropping series"
            );
            continue;
        };
        let Ok(year) = entry.year.trim().parse::<i32>() else {
            warn!(
                series = %series_id,
                year = %entry.year,
                "unparsable year in feed payload; dropping series"
            );
            continue;
        };
        let period = match PeriodTag::from_parts(year, entry.period.as_str()) {
            Ok(period) => period,
            Err(error) => {
                warn!(
                    series = %series_id,
                    period = %entry.period,
                    error = %error,
                    "unparsable period in feed payload; dropping series"
                );
                continue;
            }
        };

        readings.insert(
            series_id.clone(),
            IndicatorReading {
                series_id,
                value,
                period,
            },
        );
    }
    Ok(readings)
}

fn map_transport_error(error: reqwest::Error) -> FeedSourceError {
    if error.is_timeout() {
        FeedSourceError::timeout(error.to_string())
    } else {
        FeedSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FeedSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            FeedSourceError::timeout(message)
        }
        _ if status.is_client_error() => FeedSourceError::invalid_request(message),
        _ => FeedSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network feed mapping helpers.

    use rstest::rstest;

    use super::*;

    fn eggs_id() -> SeriesId {
        SeriesId::new("APU0000708111").expect("valid id")
    }

    #[test]
    fn parses_the_latest_flagged_entry_per_series() {
        let body = r#"{
            "status": "REQUEST_SUCCEEDED",
            "Results": {
                "series": [
                    {
                        "seriesID": "APU0000708111",
                        "data": [
                            { "year": "2024", "period": "M12", "value": "3.90", "latest": "true" },
                            { "year": "2024", "period": "M11", "value": "3.25" }
                        ]
                    }
                ]
            }
        }"#;

        let readings = parse_readings(body.as_bytes()).expect("payload should decode");
        assert_eq!(readings.len(), 1);
        let reading = readings.get(&eggs_id()).expect("eggs reading present");
        assert_eq!(reading.value, 3.90);
        assert_eq!(
            reading.period,
            PeriodTag::from_parts(2024, "M12").expect("valid tag")
        );
    }

    #[test]
    fn falls_back_to_the_first_entry_without_a_latest_flag() {
        let body = r#"{
            "status": "REQUEST_SUCCEEDED",
            "Results": {
                "series": [
                    {
                        "seriesID": "APU0000708111",
                        "data": [
                            { "year": "2024", "period": "M12", "value": "3.90" },
                            { "year": "2024", "period": "M11", "value": "3.25" }
                        ]
                    }
                ]
            }
        }"#;

        let readings = parse_readings(body.as_bytes()).expect("payload should decode");
        let reading = readings.get(&eggs_id()).expect("eggs reading present");
        assert_eq!(reading.value, 3.90);
    }

    #[test]
    fn failure_envelope_is_a_hard_error() {
        let body = r#"{ "status": "REQUEST_NOT_PROCESSED", "Results": { "series": [] } }"#;
        let error = parse_readings(body.as_bytes()).expect_err("envelope should fail");
        assert_eq!(
            error,
            FeedSourceError::envelope("REQUEST_NOT_PROCESSED")
        );
    }

    #[test]
    fn unparsable_values_drop_the_series_not_the_batch() {
        let body = r#"{
            "status": "REQUEST_SUCCEEDED",
            "Results": {
                "series": [
                    {
                        "seriesID": "APU0000708111",
                        "data": [
                            { "year": "2024", "period": "M12", "value": "n/a", "latest": "true" }
                        ]
                    },
                    {
                        "seriesID": "APU0000702111",
                        "data": [
                            { "year": "2024", "period": "M12", "value": "1.97", "latest": "true" }
                        ]
                    },
                    {
                        "seriesID": "APU0000709213",
                        "data": [
                            { "year": "2024", "period": "P99", "value": "4.10", "latest": "true" }
                        ]
                    },
                    { "seriesID": "APU0000704111", "data": [] }
                ]
            }
        }"#;

        let readings = parse_readings(body.as_bytes()).expect("payload should decode");
        assert_eq!(readings.len(), 1, "only the clean series survives");
        let bread = SeriesId::new("APU0000702111").expect("valid id");
        assert!(readings.contains_key(&bread));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let error = parse_readings(b"not json").expect_err("decode should fail");
        assert!(matches!(error, FeedSourceError::Decode { .. }));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    fn timeout_statuses_map_to_timeout(#[case] status: StatusCode) {
        let error = map_status_error(status, b"");
        assert!(matches!(error, FeedSourceError::Timeout { .. }));
    }

    #[rstest]
    #[case::unauthorised(StatusCode::UNAUTHORIZED)]
    #[case::not_found(StatusCode::NOT_FOUND)]
    fn client_statuses_map_to_invalid_request(#[case] status: StatusCode) {
        let error = map_status_error(status, b"{\"message\":\"bad key\"}");
        assert!(matches!(error, FeedSourceError::InvalidRequest { .. }));
        assert!(error.to_string().contains("bad key"));
    }

    #[test]
    fn server_errors_map_to_transport() {
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, b"");
        assert!(matches!(error, FeedSourceError::Transport { .. }));
    }
}
