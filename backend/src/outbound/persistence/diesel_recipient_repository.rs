//! PostgreSQL-backed `RecipientRepository` implementation using Diesel ORM.
//!
//! Recipients are resolved through the `threshold_recipients` join table;
//! the join enforces the per-threshold fan-out set.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{RecipientRepository, RecipientRepositoryError};
use crate::domain::Recipient;

use super::diesel_support::{classify_diesel_error, pool_error_message, DbErrorClass};
use super::models::RecipientRow;
use super::pool::{DbPool, PoolError};
use super::schema::{recipients, threshold_recipients};

/// Diesel-backed implementation of the recipient repository port.
#[derive(Clone)]
pub struct DieselRecipientRepository {
    pool: DbPool,
}

impl DieselRecipientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipientRepositoryError {
    RecipientRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> RecipientRepositoryError {
    match classify_diesel_error(&error) {
        (DbErrorClass::Connection, message) => RecipientRepositoryError::connection(message),
        (DbErrorClass::Query, message) => RecipientRepositoryError::query(message),
    }
}

fn row_to_recipient(row: RecipientRow) -> Recipient {
    Recipient {
        id: row.id,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        designation: row.designation,
    }
}

#[async_trait]
impl RecipientRepository for DieselRecipientRepository {
    async fn list_for_threshold(
        &self,
        threshold_id: Uuid,
    ) -> Result<Vec<Recipient>, RecipientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RecipientRow> = threshold_recipients::table
            .inner_join(recipients::table)
            .filter(threshold_recipients::threshold_id.eq(threshold_id))
            .select(RecipientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_recipient).collect())
    }
}
