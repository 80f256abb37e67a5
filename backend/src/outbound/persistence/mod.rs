//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` with `bb8` pooling. Adapters here only
//! translate between Diesel rows and domain types; the one piece of routing
//! logic they own is the reconcile transaction's commit-or-rollback
//! decision, which follows the pure planner's mutation count.

mod diesel_indicator_repository;
mod diesel_notification_repository;
mod diesel_recipient_repository;
mod diesel_support;
mod diesel_threshold_repository;
mod diesel_user_directory;
mod models;
mod pool;
mod schema;

pub use diesel_indicator_repository::DieselIndicatorRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_recipient_repository::DieselRecipientRepository;
pub use diesel_threshold_repository::DieselThresholdRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use pool::{DbPool, PoolConfig, PoolError};
