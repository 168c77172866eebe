//! Review mutation endpoints. Only a review's author may change or remove it.
//!
//! ```text
//! POST   /api/v1/bikes/{bike_id}/reviews {"rating":5,"comment":"Great"}
//! PUT    /api/v1/reviews/{review_id}     {"rating":4,"comment":"Good"}
//! DELETE /api/v1/reviews/{review_id}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{BikeId, Error, Review, ReviewDraft, ReviewId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, review_validation_error};

/// Rating and comment submitted by a rider.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    /// Whole stars from 1 to 5.
    #[schema(example = 5)]
    pub rating: i64,
    #[schema(example = "Smooth gears and a comfy saddle.")]
    pub comment: String,
}

impl TryFrom<ReviewRequest> for ReviewDraft {
    type Error = Error;

    fn try_from(value: ReviewRequest) -> Result<Self, Self::Error> {
        ReviewDraft::parse(value.rating, &value.comment).map_err(review_validation_error)
    }
}

/// A stored review.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub bike_id: Uuid,
    pub author_id: Uuid,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: *review.id.as_uuid(),
            bike_id: *review.bike_id.as_uuid(),
            author_id: *review.author_id.as_uuid(),
            rating: review.rating.value(),
            comment: review.comment.as_str().to_owned(),
            created_at: review.created_at,
        }
    }
}

fn review_id_from_path(raw: &str) -> Result<ReviewId, Error> {
    parse_uuid(raw, FieldName::new("reviewId")).map(ReviewId::from_uuid)
}

/// Review a bike as the logged-in rider.
#[utoipa::path(
    post,
    path = "/api/v1/bikes/{bike_id}/reviews",
    params(("bike_id" = String, Path, description = "Bike identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Invalid rating or comment", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Bike not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview",
    security(("SessionCookie" = []))
)]
#[post("/bikes/{bike_id}/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let bike_id = BikeId::from_uuid(parse_uuid(&path, FieldName::new("bikeId"))?);
    let draft = ReviewDraft::try_from(payload.into_inner())?;

    let review = state
        .reviews
        .create_review(&user_id, &bike_id, draft)
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}

/// Replace the rating and comment of the rider's own review.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{review_id}",
    params(("review_id" = String, Path, description = "Review identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Invalid rating or comment", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Review not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "updateReview",
    security(("SessionCookie" = []))
)]
#[put("/reviews/{review_id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let review_id = review_id_from_path(&path)?;
    let draft = ReviewDraft::try_from(payload.into_inner())?;

    let review = state
        .reviews
        .update_review(&user_id, &review_id, draft)
        .await?;
    Ok(HttpResponse::Ok().json(ReviewResponse::from(review)))
}

/// Delete the rider's own review.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{review_id}",
    params(("review_id" = String, Path, description = "Review identifier")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 400, description = "Malformed review id", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Review not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("SessionCookie" = []))
)]
#[delete("/reviews/{review_id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let review_id = review_id_from_path(&path)?;

    state.reviews.delete_review(&user_id, &review_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
