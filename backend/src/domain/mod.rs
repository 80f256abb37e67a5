//! Domain layer: entities, pure calculators, ports, and the monitor
//! pipeline.
//!
//! Everything here is transport and storage agnostic. Adapters in
//! `crate::outbound` implement the ports; `crate::inbound` and the scheduler
//! drive [`MonitorService`].

pub mod indicator;
pub mod monitor;
pub mod notification;
pub mod percent_change;
pub mod period;
pub mod ports;
pub mod reconcile;
pub mod recipient;
pub mod series;
pub mod threshold;

pub use self::indicator::Indicator;
pub use self::monitor::{
    CycleError, CycleReport, MonitorPorts, MonitorService, RepeatNotificationPolicy,
    SenderIdentity,
};
pub use self::notification::{format_roster, render_template, NewNotificationRecord};
pub use self::percent_change::{percent_change, round2};
pub use self::period::{Period, PeriodKind, PeriodParseError, PeriodTag};
pub use self::reconcile::{reconcile_decision, ReconcileDecision, ReconciliationOutcome};
pub use self::recipient::Recipient;
pub use self::series::{
    CatalogEntry, IndicatorReading, SeriesCatalog, SeriesId, SeriesIdValidationError,
};
pub use self::threshold::{Breach, BreachDirection, ThresholdDefinition};
