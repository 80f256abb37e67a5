//! PostgreSQL-backed `UserDirectory` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserDirectory, UserDirectoryError};

use super::diesel_support::{classify_diesel_error, pool_error_message, DbErrorClass};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user directory port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    UserDirectoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    match classify_diesel_error(&error) {
        (DbErrorClass::Connection, message) => UserDirectoryError::connection(message),
        (DbErrorClass::Query, message) => UserDirectoryError::query(message),
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn email_of(&self, user_id: Uuid) -> Result<Option<String>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .find(user_id)
            .select(users::email)
            .first::<String>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}
