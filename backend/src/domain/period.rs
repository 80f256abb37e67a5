//! Reporting-period tags for externally sourced readings.
//!
//! The feed labels every reading with a `(year, period)` pair such as
//! `(2024, "M12")`. Staleness detection needs a total order over those pairs,
//! and comparing the raw strings is wrong (`"M2" > "M10"` lexicographically),
//! so the pair is parsed into a structured tag ordered by year and then
//! period index.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// Reporting cadence encoded in the first character of a period code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    /// `M01`–`M13`; `M13` is the annual average pseudo-month.
    Monthly,
    /// `Q01`–`Q05`.
    Quarterly,
    /// `S01`–`S03`.
    Semiannual,
    /// `A01`.
    Annual,
}

impl PeriodKind {
    fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'M' => Some(Self::Monthly),
            'Q' => Some(Self::Quarterly),
            'S' => Some(Self::Semiannual),
            'A' => Some(Self::Annual),
            _ => None,
        }
    }

    fn marker(self) -> char {
        match self {
            Self::Monthly => 'M',
            Self::Quarterly => 'Q',
            Self::Semiannual => 'S',
            Self::Annual => 'A',
        }
    }

    fn max_index(self) -> u8 {
        match self {
            Self::Monthly => 13,
            Self::Quarterly => 5,
            Self::Semiannual => 3,
            Self::Annual => 1,
        }
    }
}

/// Errors raised when parsing a period code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodParseError {
    /// The code was empty after trimming.
    #[error("period code must not be empty")]
    Empty,
    /// The leading cadence marker is not one of `M`, `Q`, `S`, `A`.
    #[error("unknown period marker {0:?}")]
    UnknownMarker(char),
    /// The digits after the marker did not form a valid index.
    #[error("invalid period index {0:?}")]
    InvalidIndex(String),
}

/// One reporting interval within a year, e.g. `M12` or `Q03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    kind: PeriodKind,
    index: u8,
}

impl Period {
    /// Parse a period code such as `"M12"`. Unpadded indices (`"M2"`) are
    /// accepted since some feed payloads omit the leading zero.
    pub fn parse(code: &str) -> Result<Self, PeriodParseError> {
        let trimmed = code.trim();
        let mut chars = trimmed.chars();
        let marker = chars.next().ok_or(PeriodParseError::Empty)?;
        let kind =
            PeriodKind::from_marker(marker).ok_or(PeriodParseError::UnknownMarker(marker))?;

        let digits = chars.as_str();
        let index: u8 = digits
            .parse()
            .map_err(|_| PeriodParseError::InvalidIndex(digits.to_owned()))?;
        if index == 0 || index > kind.max_index() {
            return Err(PeriodParseError::InvalidIndex(digits.to_owned()));
        }
        Ok(Self { kind, index })
    }

    /// Reporting cadence of this period.
    pub fn kind(self) -> PeriodKind {
        self.kind
    }

    /// 1-based index within the year.
    pub fn index(self) -> u8 {
        self.index
    }

    /// Canonical zero-padded code, e.g. `M02`.
    pub fn code(self) -> String {
        format!("{}{:02}", self.kind.marker(), self.index)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.kind.marker(), self.index)
    }
}

/// The `(year, period)` pair identifying which reporting interval a reading
/// belongs to.
///
/// ## Invariants
/// - Ordering is total and structural: year first, then period index. Two
///   tags compare equal only when year, index, and cadence all match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodTag {
    year: i32,
    period: Period,
}

impl PeriodTag {
    /// Build a tag from an already parsed period.
    pub fn new(year: i32, period: Period) -> Self {
        Self { year, period }
    }

    /// Build a tag from the feed's raw `(year, period)` strings.
    pub fn from_parts(year: i32, code: &str) -> Result<Self, PeriodParseError> {
        Ok(Self {
            year,
            period: Period::parse(code)?,
        })
    }

    /// Reporting year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Period within the year.
    pub fn period(self) -> Period {
        self.period
    }

    /// Whether this tag refers to a strictly newer interval than `other`.
    ///
    /// Equal tags are not newer; reconciliation uses this to skip readings
    /// for periods already stored.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::PeriodTag;
    ///
    /// let stored = PeriodTag::from_parts(2024, "M11").expect("valid tag");
    /// let fetched = PeriodTag::from_parts(2024, "M12").expect("valid tag");
    /// assert!(fetched.is_newer_than(stored));
    /// assert!(!stored.is_newer_than(stored));
    /// ```
    pub fn is_newer_than(self, other: Self) -> bool {
        self > other
    }
}

impl Ord for PeriodTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.period.index.cmp(&other.period.index))
            // Cadence only breaks ties so the order stays consistent with Eq;
            // a series never mixes cadences in practice.
            .then_with(|| {
                (self.period.kind as u8).cmp(&(other.period.kind as u8))
            })
    }
}

impl PartialOrd for PeriodTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PeriodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.period)
    }
}
