//! Driving port for catalogue reads.

use async_trait::async_trait;

use crate::domain::{BikeDetail, BikeId, BikeListing, BikeListingFilter, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Listings matching `filter`, in the requested order.
    async fn list_bikes(&self, filter: BikeListingFilter) -> Result<Vec<BikeListing>, Error>;

    /// One bike with its reviews, newest first. `NotFound` when absent.
    async fn bike_detail(&self, bike_id: &BikeId) -> Result<BikeDetail, Error>;
}
