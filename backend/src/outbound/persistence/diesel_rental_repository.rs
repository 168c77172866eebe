//! PostgreSQL-backed `RentalRepository`.
//!
//! Starting a rental runs one transaction: reject an open rental for the
//! user, flip the bike's availability with a conditional update, then insert
//! the rental row. The partial unique indexes on open rentals are the last
//! line: a concurrent winner surfaces here as a unique violation.
//!
//! Returning locks the rental and its bike with `SELECT ... FOR UPDATE`
//! before billing, so two concurrent returns serialise and the second sees
//! the rental already closed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::ports::{RentalRepository, RentalRepositoryError};
use crate::domain::{
    BikeId, PricePerHour, Rental, RentalDraft, RentalId, RentalSummary, UserId,
};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewRentalRow, RentalClosure, RentalRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bikes, rentals};

const ACTIVE_PER_USER_INDEX: &str = "rentals_one_active_per_user";
const ACTIVE_PER_BIKE_INDEX: &str = "rentals_one_active_per_bike";

#[derive(Clone)]
pub struct DieselRentalRepository {
    pool: DbPool,
}

impl DieselRentalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a lifecycle transaction. Either variant rolls back.
#[derive(Debug)]
enum LifecycleTxError {
    Diesel(diesel::result::Error),
    Rejected(RentalRepositoryError),
}

impl From<diesel::result::Error> for LifecycleTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<LifecycleTxError> for RentalRepositoryError {
    fn from(error: LifecycleTxError) -> Self {
        match error {
            LifecycleTxError::Diesel(error) => map_diesel_error(error),
            LifecycleTxError::Rejected(error) => error,
        }
    }
}

fn map_pool_error(error: PoolError) -> RentalRepositoryError {
    map_basic_pool_error(error, |message| RentalRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> RentalRepositoryError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::Unique(ACTIVE_PER_USER_INDEX)) => {
            debug!("open rental insert lost a race on the per-user index");
            return RentalRepositoryError::active_rental_exists();
        }
        Some(ConstraintViolation::Unique(ACTIVE_PER_BIKE_INDEX)) => {
            debug!("open rental insert lost a race on the per-bike index");
            return RentalRepositoryError::bike_unavailable();
        }
        _ => {}
    }
    map_basic_diesel_error(
        error,
        RentalRepositoryError::query,
        RentalRepositoryError::connection,
    )
}

fn rental_from_row(row: RentalRow) -> Result<Rental, RentalRepositoryError> {
    let RentalRow {
        id,
        user_id,
        bike_id,
        started_at,
        ended_at,
        total_cost,
    } = row;

    Rental::restore(RentalDraft {
        id: RentalId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        bike_id: BikeId::from_uuid(bike_id),
        started_at,
        ended_at,
        total_cost,
    })
    .map_err(|err| RentalRepositoryError::query(format!("invalid rental row {id}: {err}")))
}

#[async_trait]
impl RentalRepository for DieselRentalRepository {
    async fn open_rental(&self, rental: &Rental) -> Result<RentalSummary, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *rental.user_id().as_uuid();
        let bike_id = rental.bike_id();
        let bike_uuid = *bike_id.as_uuid();
        let new_row = NewRentalRow {
            id: *rental.id().as_uuid(),
            user_id: user_uuid,
            bike_id: bike_uuid,
            started_at: rental.started_at(),
        };

        let bike_name = conn
            .transaction::<_, LifecycleTxError, _>(|conn| {
                async move {
                    let open_for_user: i64 = rentals::table
                        .filter(rentals::user_id.eq(user_uuid))
                        .filter(rentals::ended_at.is_null())
                        .count()
                        .get_result(conn)
                        .await?;
                    if open_for_user > 0 {
                        return Err(LifecycleTxError::Rejected(
                            RentalRepositoryError::active_rental_exists(),
                        ));
                    }

                    let claimed: Option<String> = diesel::update(
                        bikes::table
                            .filter(bikes::id.eq(bike_uuid))
                            .filter(bikes::is_available.eq(true)),
                    )
                    .set(bikes::is_available.eq(false))
                    .returning(bikes::name)
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(bike_name) = claimed else {
                        let exists: bool = diesel::select(diesel::dsl::exists(
                            bikes::table.filter(bikes::id.eq(bike_uuid)),
                        ))
                        .get_result(conn)
                        .await?;
                        let rejection = if exists {
                            RentalRepositoryError::bike_unavailable()
                        } else {
                            RentalRepositoryError::bike_not_found(bike_id)
                        };
                        return Err(LifecycleTxError::Rejected(rejection));
                    };

                    diesel::insert_into(rentals::table)
                        .values(&new_row)
                        .execute(conn)
                        .await?;

                    Ok(bike_name)
                }
                .scope_boxed()
            })
            .await?;

        Ok(RentalSummary {
            rental: rental.clone(),
            bike_name,
        })
    }

    async fn close_rental(
        &self,
        user_id: &UserId,
        rental_id: &RentalId,
        ended_at: DateTime<Utc>,
    ) -> Result<RentalSummary, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user_id.as_uuid();
        let rental_id = *rental_id;
        let rental_uuid = *rental_id.as_uuid();

        let summary = conn
            .transaction::<_, LifecycleTxError, _>(|conn| {
                async move {
                    let locked: Option<(RentalRow, Decimal, String)> = rentals::table
                        .inner_join(bikes::table)
                        .filter(rentals::id.eq(rental_uuid))
                        .filter(rentals::user_id.eq(user_uuid))
                        .select((RentalRow::as_select(), bikes::price_per_hour, bikes::name))
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;

                    let Some((row, price, bike_name)) = locked else {
                        return Err(LifecycleTxError::Rejected(
                            RentalRepositoryError::rental_not_found(rental_id),
                        ));
                    };

                    let rental = rental_from_row(row).map_err(LifecycleTxError::Rejected)?;
                    let price = PricePerHour::new(price).map_err(|err| {
                        LifecycleTxError::Rejected(RentalRepositoryError::query(format!(
                            "invalid bike price: {err}"
                        )))
                    })?;
                    let closed = rental.close(ended_at, price).map_err(|err| {
                        LifecycleTxError::Rejected(RentalRepositoryError::from_domain(err))
                    })?;

                    let (Some(ended_at), Some(total_cost)) = (closed.ended_at(), closed.total_cost())
                    else {
                        return Err(LifecycleTxError::Rejected(RentalRepositoryError::query(
                            "closed rental is missing its end time or cost",
                        )));
                    };

                    diesel::update(rentals::table.find(rental_uuid))
                        .set(&RentalClosure {
                            ended_at,
                            total_cost,
                        })
                        .execute(conn)
                        .await?;
                    diesel::update(bikes::table.find(*closed.bike_id().as_uuid()))
                        .set(bikes::is_available.eq(true))
                        .execute(conn)
                        .await?;

                    Ok(RentalSummary {
                        rental: closed,
                        bike_name,
                    })
                }
                .scope_boxed()
            })
            .await?;

        Ok(summary)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RentalSummary>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(RentalRow, String)> = rentals::table
            .inner_join(bikes::table)
            .filter(rentals::user_id.eq(*user_id.as_uuid()))
            .select((RentalRow::as_select(), bikes::name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, bike_name)| {
                Ok(RentalSummary {
                    rental: rental_from_row(row)?,
                    bike_name,
                })
            })
            .collect()
    }
}
