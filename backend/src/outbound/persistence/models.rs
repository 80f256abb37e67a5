//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{indicator_history, indicators, notifications, recipients, thresholds};

/// Row struct for reading from the indicators table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = indicators)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IndicatorRow {
    pub id: Uuid,
    pub name: String,
    pub series_id: String,
    pub unit: String,
    pub previous_value: f64,
    pub latest_value: f64,
    pub year: i32,
    pub period: String,
    pub last_updated: DateTime<Utc>,
}

/// Insertable struct for first-seen series.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = indicators)]
pub(crate) struct NewIndicatorRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub series_id: &'a str,
    pub unit: &'a str,
    pub previous_value: f64,
    pub latest_value: f64,
    pub year: i32,
    pub period: String,
    pub last_updated: DateTime<Utc>,
}

/// Changeset applying one newer reading to an existing row.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = indicators)]
pub(crate) struct IndicatorUpdate {
    pub previous_value: f64,
    pub latest_value: f64,
    pub year: i32,
    pub period: String,
    pub last_updated: DateTime<Utc>,
}

/// Insertable struct for the append-only reading history.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = indicator_history)]
pub(crate) struct NewIndicatorHistoryRow {
    pub id: Uuid,
    pub indicator_id: Uuid,
    pub year: i32,
    pub period: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Row struct for reading from the thresholds table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = thresholds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ThresholdRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub indicator_id: Uuid,
    pub magnitude_percent: f64,
    pub notify_owner: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the recipients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipientRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub designation: String,
}

/// Insertable struct for notification audit rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub threshold_id: Uuid,
    pub sent_at: DateTime<Utc>,
    pub user_message: &'a str,
    pub recipient_message: &'a str,
}
