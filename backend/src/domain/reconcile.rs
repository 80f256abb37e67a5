//! Pure reconciliation planning.
//!
//! The transactional adapter walks the fetched batch row by row; the
//! decision for each row is made here so the merge semantics stay pure and
//! unit-testable. The adapter applies whatever this module decides and
//! commits only when at least one mutation was applied.

use super::indicator::Indicator;
use super::percent_change::round2;
use super::series::{IndicatorReading, SeriesCatalog};

/// What reconciliation should do with one fetched reading.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileDecision {
    /// First sighting of a tracked series: create the row with both values
    /// equal to the rounded reading.
    Insert {
        /// Display name from the catalog.
        name: String,
        /// Unit from the catalog.
        unit: String,
        /// Reading value rounded to cents.
        value: f64,
    },
    /// The reading belongs to a strictly newer period: shift latest into
    /// previous and store the rounded reading.
    Update {
        /// New `previous_value` (the stored `latest_value`).
        previous_value: f64,
        /// New `latest_value` (the rounded reading).
        latest_value: f64,
    },
    /// The series is not in the catalog; ignore it without failing the
    /// batch.
    SkipUntracked,
    /// The stored period already covers this reading; reprocessing the same
    /// period on a later tick is a deliberate no-op.
    SkipStale,
}

/// Decide how one fetched reading reconciles against the stored row.
///
/// # Examples
/// ```
/// use backend::domain::{reconcile_decision, IndicatorReading, PeriodTag, ReconcileDecision,
///     SeriesCatalog, SeriesId};
///
/// let catalog = SeriesCatalog::consumer_prices();
/// let reading = IndicatorReading {
///     series_id: SeriesId::new("APU0000708111").expect("valid id"),
///     value: 3.899,
///     period: PeriodTag::from_parts(2024, "M12").expect("valid tag"),
/// };
/// let decision = reconcile_decision(None, &reading, &catalog);
/// assert!(matches!(decision, ReconcileDecision::Insert { value, .. } if value == 3.9));
/// ```
pub fn reconcile_decision(
    existing: Option<&Indicator>,
    reading: &IndicatorReading,
    catalog: &SeriesCatalog,
) -> ReconcileDecision {
    match existing {
        None => match catalog.entry(&reading.series_id) {
            Some(entry) => ReconcileDecision::Insert {
                name: entry.name.clone(),
                unit: entry.unit.clone(),
                value: round2(reading.value),
            },
            None => ReconcileDecision::SkipUntracked,
        },
        Some(stored) => {
            if reading.period.is_newer_than(stored.period) {
                ReconcileDecision::Update {
                    previous_value: stored.latest_value,
                    latest_value: round2(reading.value),
                }
            } else {
                ReconcileDecision::SkipStale
            }
        }
    }
}

/// Counts of what one reconciliation batch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconciliationOutcome {
    /// Rows created for first-seen series.
    pub inserted: u32,
    /// Rows shifted to a newer period.
    pub updated: u32,
    /// Readings ignored as stale or untracked.
    pub skipped: u32,
}

impl ReconciliationOutcome {
    /// Outcome of a batch that wrote nothing.
    pub fn unchanged(skipped: u32) -> Self {
        Self {
            inserted: 0,
            updated: 0,
            skipped,
        }
    }

    /// Whether the batch applied at least one mutation. A batch that changed
    /// nothing is rolled back rather than committed.
    pub fn changed(self) -> bool {
        self.inserted > 0 || self.updated > 0
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the reconcile planner.

    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;
    use crate::domain::period::PeriodTag;
    use crate::domain::series::SeriesId;

    #[fixture]
    fn catalog() -> SeriesCatalog {
        SeriesCatalog::consumer_prices()
    }

    fn eggs() -> SeriesId {
        SeriesId::new("APU0000708111").expect("valid id")
    }

    fn reading(series_id: SeriesId, value: f64, year: i32, code: &str) -> IndicatorReading {
        IndicatorReading {
            series_id,
            value,
            period: PeriodTag::from_parts(year, code).expect("valid tag"),
        }
    }

    fn stored(value: f64, year: i32, code: &str) -> Indicator {
        Indicator {
            id: Uuid::new_v4(),
            name: "Eggs, grade A, large".to_owned(),
            series_id: eggs(),
            unit: "per doz.".to_owned(),
            previous_value: value,
            latest_value: value,
            period: PeriodTag::from_parts(year, code).expect("valid tag"),
            last_updated: Utc::now(),
        }
    }

    #[rstest]
    fn first_sighting_of_tracked_series_inserts_rounded_value(catalog: SeriesCatalog) {
        let decision = reconcile_decision(None, &reading(eggs(), 3.899, 2024, "M11"), &catalog);
        assert_eq!(
            decision,
            ReconcileDecision::Insert {
                name: "Eggs, grade A, large".to_owned(),
                unit: "per doz.".to_owned(),
                value: 3.9,
            }
        );
    }

    #[rstest]
    fn untracked_series_is_skipped_not_failed(catalog: SeriesCatalog) {
        let unknown = SeriesId::new("APU9999999999").expect("valid id");
        let decision = reconcile_decision(None, &reading(unknown, 1.0, 2024, "M11"), &catalog);
        assert_eq!(decision, ReconcileDecision::SkipUntracked);
    }

    #[rstest]
    #[case(2024, "M11")] // same period
    #[case(2024, "M10")] // older month
    #[case(2023, "M12")] // older year
    fn stale_readings_are_no_ops(
        catalog: SeriesCatalog,
        #[case] year: i32,
        #[case] code: &str,
    ) {
        let row = stored(3.25, 2024, "M11");
        let decision = reconcile_decision(Some(&row), &reading(eggs(), 9.99, year, code), &catalog);
        assert_eq!(decision, ReconcileDecision::SkipStale);
    }

    #[rstest]
    fn newer_period_shifts_latest_into_previous(catalog: SeriesCatalog) {
        let row = stored(3.25, 2024, "M11");
        let decision =
            reconcile_decision(Some(&row), &reading(eggs(), 3.901, 2024, "M12"), &catalog);
        assert_eq!(
            decision,
            ReconcileDecision::Update {
                previous_value: 3.25,
                latest_value: 3.9,
            }
        );
    }

    #[test]
    fn outcome_reports_changed_only_when_rows_were_written() {
        assert!(!ReconciliationOutcome::unchanged(4).changed());
        let outcome = ReconciliationOutcome {
            inserted: 1,
            updated: 0,
            skipped: 3,
        };
        assert!(outcome.changed());
    }
}
