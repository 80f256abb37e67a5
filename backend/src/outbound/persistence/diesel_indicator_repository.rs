//! PostgreSQL-backed `IndicatorRepository` implementation using Diesel ORM.
//!
//! Reconciliation runs the whole fetched batch inside one transaction: row
//! lookups, the pure per-row decision, and every applied write. A batch that
//! changes nothing is rolled back on purpose so an idempotent re-run leaves
//! no trace, and any statement failure rolls back every write before it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{IndicatorRepository, IndicatorRepositoryError};
use crate::domain::{
    reconcile_decision, Indicator, IndicatorReading, PeriodTag, ReconcileDecision,
    ReconciliationOutcome, SeriesCatalog, SeriesId,
};

use super::diesel_support::{classify_diesel_error, pool_error_message, DbErrorClass};
use super::models::{IndicatorRow, IndicatorUpdate, NewIndicatorHistoryRow, NewIndicatorRow};
use super::pool::{DbPool, PoolError};
use super::schema::{indicator_history, indicators};

/// Diesel-backed implementation of the indicator repository port.
#[derive(Clone)]
pub struct DieselIndicatorRepository {
    pool: DbPool,
    catalog: SeriesCatalog,
}

impl DieselIndicatorRepository {
    /// Create a repository over the given pool and tracked-series catalog.
    pub fn new(pool: DbPool, catalog: SeriesCatalog) -> Self {
        Self { pool, catalog }
    }
}

/// Why the reconcile transaction unwound.
enum ReconcileAbort {
    /// Zero mutations were applied; the rollback is deliberate.
    NothingToCommit { skipped: u32 },
    /// A statement failed; everything before it rolls back.
    Db(diesel::result::Error),
    /// A stored row failed domain validation.
    Corrupt { message: String },
}

impl From<diesel::result::Error> for ReconcileAbort {
    fn from(error: diesel::result::Error) -> Self {
        Self::Db(error)
    }
}

fn map_pool_error(error: PoolError) -> IndicatorRepositoryError {
    IndicatorRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> IndicatorRepositoryError {
    match classify_diesel_error(&error) {
        (DbErrorClass::Connection, message) => IndicatorRepositoryError::connection(message),
        (DbErrorClass::Query, message) => IndicatorRepositoryError::query(message),
    }
}

/// Convert a database row into a validated domain indicator.
fn row_to_indicator(row: IndicatorRow) -> Result<Indicator, IndicatorRepositoryError> {
    let IndicatorRow {
        id,
        name,
        series_id,
        unit,
        previous_value,
        latest_value,
        year,
        period,
        last_updated,
    } = row;

    let series_id = SeriesId::new(series_id)
        .map_err(|error| IndicatorRepositoryError::query(error.to_string()))?;
    let period = PeriodTag::from_parts(year, period.as_str())
        .map_err(|error| IndicatorRepositoryError::query(error.to_string()))?;

    Ok(Indicator {
        id,
        name,
        series_id,
        unit,
        previous_value,
        latest_value,
        period,
        last_updated,
    })
}

#[async_trait]
impl IndicatorRepository for DieselIndicatorRepository {
    async fn reconcile(
        &self,
        readings: &BTreeMap<SeriesId, IndicatorReading>,
    ) -> Result<ReconciliationOutcome, IndicatorRepositoryError> {
        use diesel_async::scoped_futures::ScopedFutureExt as _;
        use diesel_async::AsyncConnection as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let catalog = &self.catalog;
        let now = Utc::now();

        let result = conn
            .transaction::<ReconciliationOutcome, ReconcileAbort, _>(|conn| {
                async move {
                    let mut outcome = ReconciliationOutcome::default();

                    for reading in readings.values() {
                        let stored_row: Option<IndicatorRow> = indicators::table
                            .filter(indicators::series_id.eq(reading.series_id.as_str()))
                            .select(IndicatorRow::as_select())
                            .first(conn)
                            .await
                            .optional()?;
                        let stored = match stored_row {
                            Some(row) => Some(row_to_indicator(row).map_err(|error| {
                                ReconcileAbort::Corrupt {
                                    message: error.to_string(),
                                }
                            })?),
                            None => None,
                        };

                        match reconcile_decision(stored.as_ref(), reading, catalog) {
                            ReconcileDecision::Insert { name, unit, value } => {
                                let indicator_id = Uuid::new_v4();
                                diesel::insert_into(indicators::table)
                                    .values(NewIndicatorRow {
                                        id: indicator_id,
                                        name: &name,
                                        series_id: reading.series_id.as_str(),
                                        unit: &unit,
                                        previous_value: value,
                                        latest_value: value,
                                        year: reading.period.year(),
                                        period: reading.period.period().code(),
                                        last_updated: now,
                                    })
                                    .execute(conn)
                                    .await?;
                                diesel::insert_into(indicator_history::table)
                                    .values(NewIndicatorHistoryRow {
                                        id: Uuid::new_v4(),
                                        indicator_id,
                                        year: reading.period.year(),
                                        period: reading.period.period().code(),
                                        value,
                                        recorded_at: now,
                                    })
                                    .execute(conn)
                                    .await?;
                                outcome.inserted += 1;
                                info!(
                                    series = %reading.series_id,
                                    value,
                                    period = %reading.period,
                                    "inserted first reading for series"
                                );
                            }
                            ReconcileDecision::Update {
                                previous_value,
                                latest_value,
                            } => {
                                // The planner yields Update only for stored rows.
                                let Some(stored) = stored.as_ref() else {
                                    continue;
                                };
                                diesel::update(indicators::table.find(stored.id))
                                    .set(IndicatorUpdate {
                                        previous_value,
                                        latest_value,
                                        year: reading.period.year(),
                                        period: reading.period.period().code(),
                                        last_updated: now,
                                    })
                                    .execute(conn)
                                    .await?;
                                diesel::insert_into(indicator_history::table)
                                    .values(NewIndicatorHistoryRow {
                                        id: Uuid::new_v4(),
                                        indicator_id: stored.id,
                                        year: reading.period.year(),
                                        period: reading.period.period().code(),
                                        value: latest_value,
                                        recorded_at: now,
                                    })
                                    .execute(conn)
                                    .await?;
                                outcome.updated += 1;
                                info!(
                                    series = %reading.series_id,
                                    previous = previous_value,
                                    latest = latest_value,
                                    period = %reading.period,
                                    "applied newer reading"
                                );
                            }
                            ReconcileDecision::SkipUntracked => {
                                outcome.skipped += 1;
                                debug!(
                                    series = %reading.series_id,
                                    "series not in catalog; ignoring reading"
                                );
                            }
                            ReconcileDecision::SkipStale => {
                                outcome.skipped += 1;
                                debug!(
                                    series = %reading.series_id,
                                    period = %reading.period,
                                    "period already reconciled; ignoring reading"
                                );
                            }
                        }
                    }

                    if !outcome.changed() {
                        // A zero-write batch must not commit; the Err return
                        // unwinds the transaction.
                        return Err(ReconcileAbort::NothingToCommit {
                            skipped: outcome.skipped,
                        });
                    }
                    Ok(outcome)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(outcome) => Ok(outcome),
            Err(ReconcileAbort::NothingToCommit { skipped }) => {
                Ok(ReconciliationOutcome::unchanged(skipped))
            }
            Err(ReconcileAbort::Db(error)) => Err(map_diesel_error(error)),
            Err(ReconcileAbort::Corrupt { message }) => {
                Err(IndicatorRepositoryError::query(message))
            }
        }
    }

    async fn find_by_id(
        &self,
        indicator_id: Uuid,
    ) -> Result<Option<Indicator>, IndicatorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = indicators::table
            .find(indicator_id)
            .select(IndicatorRow::as_select())
            .first::<IndicatorRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_indicator).transpose()
    }
}
