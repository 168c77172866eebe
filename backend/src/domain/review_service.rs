//! Review command service: create, revise and delete reviews.
//!
//! Only the author may change a review. Bike existence is checked before a
//! review is written.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::catalogue_service::{map_review_error, require_listing};
use crate::domain::ports::{BikeRepository, ReviewCommand, ReviewRepository};
use crate::domain::{BikeId, Error, Review, ReviewDraft, ReviewId, UserId};

#[derive(Clone)]
pub struct ReviewCommandService<B, V> {
    bike_repo: Arc<B>,
    review_repo: Arc<V>,
    clock: Arc<dyn Clock>,
}

impl<B, V> ReviewCommandService<B, V> {
    pub fn new(bike_repo: Arc<B>, review_repo: Arc<V>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bike_repo,
            review_repo,
            clock,
        }
    }
}

impl<B, V> ReviewCommandService<B, V>
where
    V: ReviewRepository,
{
    async fn authored_review(&self, user_id: &UserId, review_id: &ReviewId) -> Result<Review, Error> {
        let review = self
            .review_repo
            .find_by_id(review_id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| Error::not_found(format!("review {review_id} not found")))?;

        if !review.is_authored_by(user_id) {
            debug!(%review_id, %user_id, "review change rejected for non-author");
            return Err(Error::forbidden("only the author may change this review"));
        }
        Ok(review)
    }
}

#[async_trait]
impl<B, V> ReviewCommand for ReviewCommandService<B, V>
where
    B: BikeRepository,
    V: ReviewRepository,
{
    async fn create_review(
        &self,
        user_id: &UserId,
        bike_id: &BikeId,
        draft: ReviewDraft,
    ) -> Result<Review, Error> {
        require_listing(self.bike_repo.as_ref(), bike_id).await?;

        let review = Review {
            id: ReviewId::random(),
            bike_id: *bike_id,
            author_id: user_id.clone(),
            rating: draft.rating,
            comment: draft.comment,
            created_at: self.clock.utc(),
        };
        self.review_repo
            .insert(&review)
            .await
            .map_err(map_review_error)?;

        info!(review_id = %review.id, %bike_id, %user_id, rating = review.rating.value(), "review created");
        Ok(review)
    }

    async fn update_review(
        &self,
        user_id: &UserId,
        review_id: &ReviewId,
        draft: ReviewDraft,
    ) -> Result<Review, Error> {
        let revised = self.authored_review(user_id, review_id).await?.revise(draft);
        self.review_repo
            .update(&revised)
            .await
            .map_err(map_review_error)?;

        info!(%review_id, %user_id, rating = revised.rating.value(), "review updated");
        Ok(revised)
    }

    async fn delete_review(&self, user_id: &UserId, review_id: &ReviewId) -> Result<(), Error> {
        self.authored_review(user_id, review_id).await?;
        self.review_repo
            .delete(review_id)
            .await
            .map_err(map_review_error)?;

        info!(%review_id, %user_id, "review deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
