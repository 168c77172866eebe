//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows and domain types and map
//! database failures into each port's error enum. Row structs (`models.rs`)
//! and the schema (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```no_run
//! use backend::outbound::persistence::{DbPool, DieselRentalRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bikes")).await?;
//! let rentals = DieselRentalRepository::new(pool);
//! # let _ = rentals;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_bike_repository;
mod diesel_fleet_seed_repository;
mod diesel_rental_repository;
mod diesel_review_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_bike_repository::DieselBikeRepository;
pub use diesel_fleet_seed_repository::DieselFleetSeedRepository;
pub use diesel_rental_repository::DieselRentalRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_async};
pub use pool::{DbPool, PoolConfig, PoolError};
