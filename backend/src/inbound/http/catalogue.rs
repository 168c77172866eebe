//! Catalogue read endpoints.
//!
//! ```text
//! GET /api/v1/bikes?available=true&sort=price&order=desc
//! GET /api/v1/bikes/{bike_id}
//! ```

use actix_web::{HttpResponse, get, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{BikeDetail, BikeId, BikeListing, BikeListingFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::reviews::ReviewResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_catalogue_sort, parse_uuid};

/// Query parameters for the catalogue listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBikesQuery {
    /// Hide rented bikes. Defaults to `true`.
    pub available: Option<bool>,
    /// `name`, `category`, `price`, `size` or `rating`. Defaults to
    /// `category`.
    pub sort: Option<String>,
    /// `asc` or `desc`. Defaults to `asc`.
    pub order: Option<String>,
}

/// A bike with its rating aggregate.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BikeResponse {
    pub id: Uuid,
    #[schema(example = "Trailblazer")]
    pub name: String,
    #[schema(example = "Mountain")]
    pub category: String,
    pub description: String,
    #[schema(example = "L")]
    pub size: String,
    #[schema(value_type = String, example = "12.50")]
    pub price_per_hour: Decimal,
    pub is_available: bool,
    /// Mean review rating to two places; `0` when unreviewed.
    #[schema(value_type = String, example = "4.33")]
    pub average_rating: Decimal,
    pub review_count: u64,
}

impl From<BikeListing> for BikeResponse {
    fn from(listing: BikeListing) -> Self {
        let BikeListing { bike, rating } = listing;
        Self {
            id: *bike.id().as_uuid(),
            name: bike.name().to_owned(),
            category: bike.category().to_owned(),
            description: bike.description().to_owned(),
            size: bike.size().to_owned(),
            price_per_hour: bike.price_per_hour().value(),
            is_available: bike.is_available(),
            average_rating: rating.average(),
            review_count: rating.count(),
        }
    }
}

/// A bike with its reviews, newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BikeDetailResponse {
    #[serde(flatten)]
    pub bike: BikeResponse,
    pub reviews: Vec<ReviewResponse>,
}

impl From<BikeDetail> for BikeDetailResponse {
    fn from(detail: BikeDetail) -> Self {
        Self {
            bike: detail.listing.into(),
            reviews: detail.reviews.into_iter().map(ReviewResponse::from).collect(),
        }
    }
}

/// List bikes, optionally including rented ones, in the requested order.
#[utoipa::path(
    get,
    path = "/api/v1/bikes",
    params(ListBikesQuery),
    responses(
        (status = 200, description = "Bike listings", body = [BikeResponse]),
        (status = 400, description = "Unknown sort key or order", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listBikes",
    security([])
)]
#[get("/bikes")]
pub async fn list_bikes(
    state: web::Data<HttpState>,
    query: web::Query<ListBikesQuery>,
) -> ApiResult<HttpResponse> {
    let ListBikesQuery {
        available,
        sort,
        order,
    } = query.into_inner();
    let filter = BikeListingFilter {
        available_only: available.unwrap_or(true),
        sort: parse_catalogue_sort(sort.as_deref(), order.as_deref())?,
    };

    let listings = state.catalogue.list_bikes(filter).await?;
    let body: Vec<BikeResponse> = listings.into_iter().map(BikeResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Fetch one bike with its reviews.
#[utoipa::path(
    get,
    path = "/api/v1/bikes/{bike_id}",
    params(("bike_id" = String, Path, description = "Bike identifier")),
    responses(
        (status = 200, description = "Bike detail", body = BikeDetailResponse),
        (status = 400, description = "Malformed bike id", body = ErrorSchema),
        (status = 404, description = "Bike not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getBike",
    security([])
)]
#[get("/bikes/{bike_id}")]
pub async fn get_bike(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let bike_id = BikeId::from_uuid(parse_uuid(&path, FieldName::new("bikeId"))?);
    let detail = state.catalogue.bike_detail(&bike_id).await?;
    Ok(HttpResponse::Ok().json(BikeDetailResponse::from(detail)))
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;
