//! PostgreSQL-backed `FleetSeedRepository`.
//!
//! Inserts use `ON CONFLICT (id) DO NOTHING`, so reseeding never touches bikes
//! that already exist, including their availability.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::Bike;
use crate::domain::ports::{FleetSeedRepository, FleetSeedRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewBikeRow;
use super::pool::{DbPool, PoolError};
use super::schema::bikes;

#[derive(Clone)]
pub struct DieselFleetSeedRepository {
    pool: DbPool,
}

impl DieselFleetSeedRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FleetSeedRepositoryError {
    map_basic_pool_error(error, |message| FleetSeedRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> FleetSeedRepositoryError {
    map_basic_diesel_error(
        error,
        FleetSeedRepositoryError::query,
        FleetSeedRepositoryError::connection,
    )
}

fn seed_row(bike: &Bike) -> NewBikeRow<'_> {
    NewBikeRow {
        id: *bike.id().as_uuid(),
        name: bike.name(),
        category: bike.category(),
        description: bike.description(),
        size: bike.size(),
        is_available: bike.is_available(),
        price_per_hour: bike.price_per_hour().value(),
    }
}

#[async_trait]
impl FleetSeedRepository for DieselFleetSeedRepository {
    async fn seed_bikes(&self, fleet: &[Bike]) -> Result<usize, FleetSeedRepositoryError> {
        if fleet.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewBikeRow<'_>> = fleet.iter().map(seed_row).collect();
        diesel::insert_into(bikes::table)
            .values(&rows)
            .on_conflict(bikes::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
