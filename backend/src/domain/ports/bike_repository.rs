//! Port for catalogue reads: bikes joined with their rating aggregates.

use async_trait::async_trait;

use crate::domain::{BikeId, BikeListing};

use super::define_port_error;

define_port_error! {
    /// Errors raised by bike repository adapters.
    pub enum BikeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "bike repository connection failed: {message}",
        /// Query failed during execution or returned invalid rows.
        Query { message: String } =>
            "bike repository query failed: {message}",
    }
}

/// Read access to bikes and their review totals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BikeRepository: Send + Sync {
    /// All listings, optionally limited to bikes that are not rented.
    ///
    /// Order is unspecified; callers apply [`crate::domain::sort_listings`].
    async fn list_listings(&self, available_only: bool)
    -> Result<Vec<BikeListing>, BikeRepositoryError>;

    /// A single listing by id.
    async fn find_listing(
        &self,
        bike_id: &BikeId,
    ) -> Result<Option<BikeListing>, BikeRepositoryError>;
}
