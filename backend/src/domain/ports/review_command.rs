//! Driving port for author-only review mutations.

use async_trait::async_trait;

use crate::domain::{BikeId, Error, Review, ReviewDraft, ReviewId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Review a bike. `NotFound` when the bike is absent.
    async fn create_review(
        &self,
        user_id: &UserId,
        bike_id: &BikeId,
        draft: ReviewDraft,
    ) -> Result<Review, Error>;

    /// Replace rating and comment. `Forbidden` unless `user_id` is the author.
    async fn update_review(
        &self,
        user_id: &UserId,
        review_id: &ReviewId,
        draft: ReviewDraft,
    ) -> Result<Review, Error>;

    /// Remove a review. `Forbidden` unless `user_id` is the author.
    async fn delete_review(&self, user_id: &UserId, review_id: &ReviewId) -> Result<(), Error>;
}
