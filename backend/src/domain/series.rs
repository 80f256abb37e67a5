//! Series identifiers, ephemeral feed readings, and the tracked-series
//! catalog.
//!
//! The catalog is an immutable configuration value constructed once at
//! startup and injected into the feed source, the reconcile adapter, and the
//! monitor. Nothing in the system mutates it after construction.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::period::PeriodTag;

/// Stable identifier of one externally tracked indicator series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(String);

impl SeriesId {
    /// Construct a series id after validating that it is non-empty and
    /// trimmed.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::SeriesId;
    ///
    /// let id = SeriesId::new("APU0000708111").expect("valid id");
    /// assert_eq!(id.as_str(), "APU0000708111");
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, SeriesIdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(SeriesIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(SeriesIdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for SeriesId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`SeriesId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesIdValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("series id must not be empty")]
    Empty,
    /// Identifier contains leading or trailing whitespace.
    #[error("series id must not contain surrounding whitespace")]
    ContainsWhitespace,
}

/// One freshly fetched reading for a series. Produced by the feed source per
/// cycle and never persisted directly.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorReading {
    /// Series the reading belongs to.
    pub series_id: SeriesId,
    /// Reported value, as published by the feed.
    pub value: f64,
    /// Reporting interval of the reading.
    pub period: PeriodTag,
}

/// Static display metadata for one tracked series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Human-readable indicator name.
    pub name: String,
    /// Unit of measurement, e.g. `per doz.`.
    pub unit: String,
}

/// Immutable catalog of tracked series and their display metadata.
///
/// The key set doubles as the tracked-series set: readings for series absent
/// from the catalog are ignored by reconciliation, and threshold definitions
/// referencing untracked series are skipped by evaluation.
#[derive(Debug, Clone, Default)]
pub struct SeriesCatalog {
    entries: BTreeMap<SeriesId, CatalogEntry>,
}

impl SeriesCatalog {
    /// Build a catalog from explicit entries.
    pub fn new(entries: BTreeMap<SeriesId, CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The default consumer-price catalog tracked by the service.
    ///
    /// # Panics
    /// Never panics: every identifier below is a non-empty literal.
    pub fn consumer_prices() -> Self {
        let seed = [
            ("APU0000708111", "Eggs, grade A, large", "per doz."),
            ("APU0000702111", "Bread, white, pan", "per lb."),
            ("APU0000709213", "Milk, fresh, low fat", "per gal."),
            ("APU0000FF1101", "Chicken breast, boneless", "per lb."),
            ("APU0000704111", "Bacon, sliced", "per lb."),
            ("APU0000711111", "Apples, Red Delicious", "per lb."),
            ("APU0000711311", "Oranges, Navel", "per lb."),
            ("APU00007471A", "Gasoline, all types", "per gal."),
            ("LEU0252881600", "Median usual weekly earnings", "per week"),
        ];

        let entries = seed
            .into_iter()
            .map(|(id, name, unit)| {
                let id = SeriesId::new(id).expect("catalog literals are valid series ids");
                (
                    id,
                    CatalogEntry {
                        name: name.to_owned(),
                        unit: unit.to_owned(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Whether `series_id` is tracked.
    pub fn contains(&self, series_id: &SeriesId) -> bool {
        self.entries.contains_key(series_id)
    }

    /// Display metadata for a tracked series.
    pub fn entry(&self, series_id: &SeriesId) -> Option<&CatalogEntry> {
        self.entries.get(series_id)
    }

    /// All tracked series ids, in stable order.
    pub fn series_ids(&self) -> Vec<SeriesId> {
        self.entries.keys().cloned().collect()
    }

    /// Number of tracked series.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog tracks no series.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
