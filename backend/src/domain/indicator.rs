//! The persisted indicator aggregate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::percent_change::percent_change;
use super::period::PeriodTag;
use super::series::SeriesId;

/// One tracked indicator with its two most recent reconciled values.
///
/// ## Invariants
/// - `previous_value` always holds the value that was `latest_value`
///   immediately before the last applied update; a fresh insert sets both to
///   the same value. Only reconciliation mutates these fields.
/// - `period` identifies the reporting interval `latest_value` belongs to
///   and only ever moves forward.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    /// Stable row identifier.
    pub id: Uuid,
    /// Human-readable indicator name from the catalog.
    pub name: String,
    /// External series identifier; unique across indicators.
    pub series_id: SeriesId,
    /// Unit of measurement from the catalog.
    pub unit: String,
    /// Value reconciled before `latest_value`.
    pub previous_value: f64,
    /// Most recently reconciled value.
    pub latest_value: f64,
    /// Reporting interval of `latest_value`.
    pub period: PeriodTag,
    /// When reconciliation last touched this row.
    pub last_updated: DateTime<Utc>,
}

impl Indicator {
    /// Signed percentage movement between the stored previous and latest
    /// values.
    pub fn movement_percent(&self) -> f64 {
        percent_change(self.previous_value, self.latest_value)
    }
}
