//! Alert threshold definitions and breach classification.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::indicator::Indicator;

/// A user-defined alert condition on one indicator.
///
/// ## Invariants
/// - `magnitude_percent` is an absolute-value bound: a movement breaches
///   when it reaches the bound in either direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdDefinition {
    /// Stable row identifier.
    pub id: Uuid,
    /// User who defined the threshold.
    pub owner_user_id: Uuid,
    /// Indicator the threshold watches.
    pub indicator_id: Uuid,
    /// Absolute percent-movement bound that triggers an alert.
    pub magnitude_percent: f64,
    /// Whether the owning user also receives a summary message.
    pub notify_owner: bool,
    /// When the definition was created.
    pub created_at: DateTime<Utc>,
}

impl ThresholdDefinition {
    /// Whether a signed percent movement breaches this definition.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ThresholdDefinition;
    /// use chrono::Utc;
    /// use uuid::Uuid;
    ///
    /// let definition = ThresholdDefinition {
    ///     id: Uuid::new_v4(),
    ///     owner_user_id: Uuid::new_v4(),
    ///     indicator_id: Uuid::new_v4(),
    ///     magnitude_percent: 10.0,
    ///     notify_owner: false,
    ///     created_at: Utc::now(),
    /// };
    /// assert!(definition.is_breached_by(11.0));
    /// assert!(definition.is_breached_by(-11.0));
    /// assert!(!definition.is_breached_by(5.0));
    /// ```
    pub fn is_breached_by(&self, movement_percent: f64) -> bool {
        movement_percent >= self.magnitude_percent || movement_percent <= -self.magnitude_percent
    }
}

/// Which template family a breach selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreachDirection {
    /// The movement crossed the bound on the unfavourable side (a price
    /// climbing past the configured magnitude).
    Adverse,
    /// Every other breaching movement, including drops past the bound.
    Favorable,
}

/// One threshold whose indicator has moved at least its configured
/// magnitude since the previous reconciled reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Breach {
    /// The definition that fired.
    pub definition: ThresholdDefinition,
    /// Snapshot of the indicator at evaluation time.
    pub indicator: Indicator,
    /// The signed movement that triggered the breach.
    pub percent_change: f64,
}

impl Breach {
    /// Direction of the breach, used for template selection.
    pub fn direction(&self) -> BreachDirection {
        if self.percent_change > self.definition.magnitude_percent {
            BreachDirection::Adverse
        } else {
            BreachDirection::Favorable
        }
    }
}
