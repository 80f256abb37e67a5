//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Tracked indicators with their two most recent reconciled values.
    indicators (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name from the catalog.
        name -> Varchar,
        /// External series identifier; unique.
        series_id -> Varchar,
        /// Unit of measurement from the catalog.
        unit -> Varchar,
        /// Value reconciled before the latest one.
        previous_value -> Float8,
        /// Most recently reconciled value.
        latest_value -> Float8,
        /// Reporting year of the latest value.
        year -> Int4,
        /// Canonical period code of the latest value, e.g. `M12`.
        period -> Varchar,
        /// When reconciliation last touched the row.
        last_updated -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only log of applied readings, one row per insert or update.
    indicator_history (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Indicator the reading belonged to.
        indicator_id -> Uuid,
        /// Reporting year of the reading.
        year -> Int4,
        /// Canonical period code of the reading.
        period -> Varchar,
        /// Applied (rounded) value.
        value -> Float8,
        /// When the reading was applied.
        recorded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered users; read here only for owner summaries.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Contact address.
        email -> Varchar,
        /// Given name.
        first_name -> Varchar,
        /// Family name.
        last_name -> Varchar,
    }
}

diesel::table! {
    /// Third-party notification targets.
    recipients (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Delivery address.
        email -> Varchar,
        /// Given name.
        first_name -> Varchar,
        /// Family name.
        last_name -> Varchar,
        /// Role label, e.g. `Representative`.
        designation -> Varchar,
    }
}

diesel::table! {
    /// User-defined alert conditions.
    thresholds (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Watched indicator.
        indicator_id -> Uuid,
        /// Absolute percent-movement bound.
        magnitude_percent -> Float8,
        /// Whether the owner receives a summary message.
        notify_owner -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Fan-out join between thresholds and recipients; set semantics.
    threshold_recipients (threshold_id, recipient_id) {
        /// Threshold side of the join.
        threshold_id -> Uuid,
        /// Recipient side of the join.
        recipient_id -> Uuid,
    }
}

diesel::table! {
    /// Audit trail of send attempts; never updated or deleted.
    notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owner of the threshold that fired.
        user_id -> Uuid,
        /// Recipient the message went to; null for owner summaries.
        recipient_id -> Nullable<Uuid>,
        /// Threshold that fired.
        threshold_id -> Uuid,
        /// When the send was attempted.
        sent_at -> Timestamptz,
        /// Rendered owner-summary body, when applicable.
        user_message -> Text,
        /// Rendered recipient body, when applicable.
        recipient_message -> Text,
    }
}

diesel::joinable!(indicator_history -> indicators (indicator_id));
diesel::joinable!(thresholds -> indicators (indicator_id));
diesel::joinable!(thresholds -> users (user_id));
diesel::joinable!(threshold_recipients -> thresholds (threshold_id));
diesel::joinable!(threshold_recipients -> recipients (recipient_id));
diesel::joinable!(notifications -> thresholds (threshold_id));
diesel::joinable!(notifications -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    indicators,
    indicator_history,
    users,
    recipients,
    thresholds,
    threshold_recipients,
    notifications,
);
