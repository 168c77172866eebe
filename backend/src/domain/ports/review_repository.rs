//! Port for review persistence.

use async_trait::async_trait;

use crate::domain::{BikeId, Review, ReviewId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// The referenced bike does not exist.
        BikeNotFound { bike_id: BikeId } => "bike {bike_id} not found",
        /// The review does not exist.
        ReviewNotFound { review_id: ReviewId } => "review {review_id} not found",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "review repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Reviews for a bike, newest first.
    async fn list_for_bike(&self, bike_id: &BikeId) -> Result<Vec<Review>, ReviewRepositoryError>;

    async fn find_by_id(&self, review_id: &ReviewId)
    -> Result<Option<Review>, ReviewRepositoryError>;

    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Replace rating and comment of an existing review.
    async fn update(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    async fn delete(&self, review_id: &ReviewId) -> Result<(), ReviewRepositoryError>;
}
