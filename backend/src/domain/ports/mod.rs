//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`) are implemented by the Diesel and in-memory
//! adapters. Driving ports (`*Command`, `*Query`, [`LoginService`]) are what
//! HTTP handlers call. Each driven port exposes its own error enum so adapters
//! map failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod bike_repository;
mod catalogue_query;
mod fleet_seed_repository;
mod login_service;
mod profile_query;
mod rental_command;
mod rental_repository;
mod review_command;
mod review_repository;

#[cfg(test)]
pub use bike_repository::MockBikeRepository;
pub use bike_repository::{BikeRepository, BikeRepositoryError};
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use fleet_seed_repository::MockFleetSeedRepository;
pub use fleet_seed_repository::{FleetSeedRepository, FleetSeedRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FIXTURE_RIDERS, FixtureLoginService, FixtureRider, LoginService};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{ProfileQuery, RiderProfile};
#[cfg(test)]
pub use rental_command::MockRentalCommand;
pub use rental_command::RentalCommand;
#[cfg(test)]
pub use rental_repository::MockRentalRepository;
pub use rental_repository::{RentalRepository, RentalRepositoryError};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::ReviewCommand;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
