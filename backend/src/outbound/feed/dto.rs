//! Wire-format DTOs for the timeseries feed API.
//!
//! The feed wraps results in an envelope with a textual status and nests
//! readings two levels deep; values and years arrive as strings. These types
//! mirror that shape exactly and are translated to domain readings by the
//! adapter.

use serde::{Deserialize, Serialize};

/// Batched request body sent for the whole catalog.
#[derive(Debug, Serialize)]
pub(crate) struct FeedRequestDto<'a> {
    #[serde(rename = "seriesid")]
    pub series_ids: Vec<&'a str>,
    /// Ask the feed for only the most recent entry per series.
    pub latest: bool,
    #[serde(rename = "registrationkey")]
    pub registration_key: &'a str,
}

/// Top-level response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedResponseDto {
    pub status: String,
    #[serde(rename = "Results", default)]
    pub results: FeedResultsDto,
}

/// Result container; may be absent on failure envelopes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FeedResultsDto {
    #[serde(default)]
    pub series: Vec<FeedSeriesDto>,
}

/// All returned entries for one series.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedSeriesDto {
    #[serde(rename = "seriesID")]
    pub series_id: String,
    #[serde(default)]
    pub data: Vec<FeedEntryDto>,
}

/// One reading; the feed may include history alongside the latest entry.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedEntryDto {
    pub year: String,
    pub period: String,
    pub value: String,
    /// `"true"` on the entry the feed flags as most recent.
    #[serde(default)]
    pub latest: Option<String>,
}

impl FeedSeriesDto {
    /// The entry flagged as latest, falling back to the first listed entry
    /// (the feed orders newest first).
    pub fn latest_entry(&self) -> Option<&FeedEntryDto> {
        self.data
            .iter()
            .find(|entry| entry.latest.as_deref() == Some("true"))
            .or_else(|| self.data.first())
    }
}
