//! Catalogue query service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    BikeRepository, BikeRepositoryError, CatalogueQuery, ReviewRepository, ReviewRepositoryError,
};
use crate::domain::{
    BikeDetail, BikeId, BikeListing, BikeListingFilter, Error, sort_listings, sort_newest_first,
};

fn map_bike_error(error: BikeRepositoryError) -> Error {
    match error {
        BikeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bike repository unavailable: {message}"))
        }
        BikeRepositoryError::Query { message } => {
            Error::internal(format!("bike repository error: {message}"))
        }
    }
}

pub(crate) fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::BikeNotFound { bike_id } => {
            Error::not_found(format!("bike {bike_id} not found"))
        }
        ReviewRepositoryError::ReviewNotFound { review_id } => {
            Error::not_found(format!("review {review_id} not found"))
        }
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
    }
}

pub(crate) async fn require_listing<B>(bikes: &B, bike_id: &BikeId) -> Result<BikeListing, Error>
where
    B: BikeRepository + ?Sized,
{
    bikes
        .find_listing(bike_id)
        .await
        .map_err(map_bike_error)?
        .ok_or_else(|| Error::not_found(format!("bike {bike_id} not found")))
}

/// Catalogue reads over bike and review repositories.
#[derive(Clone)]
pub struct CatalogueQueryService<B, V> {
    bike_repo: Arc<B>,
    review_repo: Arc<V>,
}

impl<B, V> CatalogueQueryService<B, V> {
    pub fn new(bike_repo: Arc<B>, review_repo: Arc<V>) -> Self {
        Self {
            bike_repo,
            review_repo,
        }
    }
}

#[async_trait]
impl<B, V> CatalogueQuery for CatalogueQueryService<B, V>
where
    B: BikeRepository,
    V: ReviewRepository,
{
    async fn list_bikes(&self, filter: BikeListingFilter) -> Result<Vec<BikeListing>, Error> {
        let mut listings = self
            .bike_repo
            .list_listings(filter.available_only)
            .await
            .map_err(map_bike_error)?;
        sort_listings(&mut listings, filter.sort);
        Ok(listings)
    }

    async fn bike_detail(&self, bike_id: &BikeId) -> Result<BikeDetail, Error> {
        let listing = require_listing(self.bike_repo.as_ref(), bike_id).await?;
        let mut reviews = self
            .review_repo
            .list_for_bike(bike_id)
            .await
            .map_err(map_review_error)?;
        sort_newest_first(&mut reviews);
        Ok(BikeDetail { listing, reviews })
    }
}
