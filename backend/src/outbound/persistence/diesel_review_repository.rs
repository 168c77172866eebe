//! PostgreSQL-backed `ReviewRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{BikeId, Rating, Review, ReviewComment, ReviewId, UserId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewReviewRow, ReviewRevision, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

const REVIEW_BIKE_FOREIGN_KEY: &str = "reviews_bike_id_fkey";

#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, |message| ReviewRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_basic_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error, bike_id: BikeId) -> ReviewRepositoryError {
    if constraint_violation(&error) == Some(ConstraintViolation::ForeignKey(REVIEW_BIKE_FOREIGN_KEY))
    {
        return ReviewRepositoryError::bike_not_found(bike_id);
    }
    map_diesel_error(error)
}

fn review_from_row(row: ReviewRow) -> Result<Review, ReviewRepositoryError> {
    let ReviewRow {
        id,
        bike_id,
        user_id,
        rating,
        comment,
        created_at,
    } = row;
    let invalid = |err: crate::domain::ReviewValidationError| {
        ReviewRepositoryError::query(format!("invalid review row {id}: {err}"))
    };

    Ok(Review {
        id: ReviewId::from_uuid(id),
        bike_id: BikeId::from_uuid(bike_id),
        author_id: UserId::from_uuid(user_id),
        rating: Rating::new(i64::from(rating)).map_err(invalid)?,
        comment: ReviewComment::new(comment).map_err(invalid)?,
        created_at,
    })
}

fn rating_column(review: &Review) -> i16 {
    i16::from(review.rating.value())
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn list_for_bike(&self, bike_id: &BikeId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::bike_id.eq(*bike_id.as_uuid()))
            .order((reviews::created_at.desc(), reviews::id.asc()))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(review_from_row).collect()
    }

    async fn find_by_id(
        &self,
        review_id: &ReviewId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReviewRow> = reviews::table
            .find(*review_id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(review_from_row).transpose()
    }

    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewReviewRow {
            id: *review.id.as_uuid(),
            bike_id: *review.bike_id.as_uuid(),
            user_id: *review.author_id.as_uuid(),
            rating: rating_column(review),
            comment: review.comment.as_str(),
            created_at: review.created_at,
        };
        diesel::insert_into(reviews::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, review.bike_id))?;
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changed = diesel::update(reviews::table.find(*review.id.as_uuid()))
            .set(&ReviewRevision {
                rating: rating_column(review),
                comment: review.comment.as_str(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if changed == 0 {
            return Err(ReviewRepositoryError::review_not_found(review.id));
        }
        Ok(())
    }

    async fn delete(&self, review_id: &ReviewId) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(reviews::table.find(*review_id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if removed == 0 {
            return Err(ReviewRepositoryError::review_not_found(*review_id));
        }
        Ok(())
    }
}
