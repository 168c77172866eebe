//! PostgreSQL-backed `BikeRepository`: bike rows plus review aggregates.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{BikeRepository, BikeRepositoryError};
use crate::domain::{Bike, BikeDraft, BikeId, BikeListing, RatingSummary};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::BikeRow;
use super::pool::{DbPool, PoolError};
use super::schema::{bikes, reviews};

#[derive(Clone)]
pub struct DieselBikeRepository {
    pool: DbPool,
}

impl DieselBikeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BikeRepositoryError {
    map_basic_pool_error(error, |message| BikeRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> BikeRepositoryError {
    map_basic_diesel_error(
        error,
        BikeRepositoryError::query,
        BikeRepositoryError::connection,
    )
}

/// Validate a bike row into the domain entity.
pub(crate) fn bike_from_row(row: BikeRow) -> Result<Bike, String> {
    let BikeRow {
        id,
        name,
        category,
        description,
        size,
        is_available,
        price_per_hour,
    } = row;

    Bike::new(BikeDraft {
        id: BikeId::from_uuid(id),
        name,
        category,
        description,
        size,
        price_per_hour,
        is_available,
    })
    .map_err(|err| format!("invalid bike row {id}: {err}"))
}

fn listing_from_row(
    row: BikeRow,
    totals: Option<(i64, i64)>,
) -> Result<BikeListing, BikeRepositoryError> {
    let bike = bike_from_row(row).map_err(BikeRepositoryError::query)?;
    let (total, review_count) = totals.unwrap_or_default();
    Ok(BikeListing {
        bike,
        rating: RatingSummary::from_totals(total, review_count),
    })
}

#[async_trait]
impl BikeRepository for DieselBikeRepository {
    async fn list_listings(
        &self,
        available_only: bool,
    ) -> Result<Vec<BikeListing>, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = bikes::table.select(BikeRow::as_select()).into_boxed();
        if available_only {
            query = query.filter(bikes::is_available.eq(true));
        }
        let rows: Vec<BikeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let totals: Vec<(Uuid, Option<i64>, i64)> = reviews::table
            .filter(reviews::bike_id.eq_any(ids))
            .group_by(reviews::bike_id)
            .select((
                reviews::bike_id,
                diesel::dsl::sum(reviews::rating),
                count(reviews::id),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let totals: HashMap<Uuid, (i64, i64)> = totals
            .into_iter()
            .map(|(bike_id, total, review_count)| (bike_id, (total.unwrap_or(0), review_count)))
            .collect();

        rows.into_iter()
            .map(|row| {
                let bike_totals = totals.get(&row.id).copied();
                listing_from_row(row, bike_totals)
            })
            .collect()
    }

    async fn find_listing(
        &self,
        bike_id: &BikeId,
    ) -> Result<Option<BikeListing>, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BikeRow> = bikes::table
            .find(*bike_id.as_uuid())
            .select(BikeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let (total, review_count): (Option<i64>, i64) = reviews::table
            .filter(reviews::bike_id.eq(*bike_id.as_uuid()))
            .select((diesel::dsl::sum(reviews::rating), count(reviews::id)))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        listing_from_row(row, Some((total.unwrap_or(0), review_count))).map(Some)
    }
}
