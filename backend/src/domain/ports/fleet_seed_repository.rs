//! Port for seeding the demonstration fleet.

use async_trait::async_trait;

use crate::domain::Bike;

use super::define_port_error;

define_port_error! {
    /// Errors raised while inserting seed bikes.
    pub enum FleetSeedRepositoryError {
        Connection { message: String } =>
            "fleet seed connection failed: {message}",
        Query { message: String } =>
            "fleet seed query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FleetSeedRepository: Send + Sync {
    /// Insert bikes whose ids are not present yet. Returns the number
    /// inserted; existing rows are left untouched.
    async fn seed_bikes(&self, bikes: &[Bike]) -> Result<usize, FleetSeedRepositoryError>;
}
