//! Rider profile: open and returned rentals plus pending flash messages.
//!
//! ```text
//! GET /api/v1/profile
//! ```

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::RentalSummary;
use crate::domain::ports::RiderProfile;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{FlashMessage, SessionContext};
use crate::inbound::http::state::HttpState;

/// One rental as shown on the profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponse {
    pub id: Uuid,
    pub bike_id: Uuid,
    #[schema(example = "Trailblazer")]
    pub bike_name: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "25.00")]
    pub total_cost: Option<Decimal>,
}

impl From<RentalSummary> for RentalResponse {
    fn from(summary: RentalSummary) -> Self {
        let RentalSummary { rental, bike_name } = summary;
        Self {
            id: *rental.id().as_uuid(),
            bike_id: *rental.bike_id().as_uuid(),
            bike_name,
            started_at: rental.started_at(),
            ended_at: rental.ended_at(),
            total_cost: rental.total_cost(),
        }
    }
}

/// Profile payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub active_rentals: Vec<RentalResponse>,
    /// Most recently returned first.
    pub past_rentals: Vec<RentalResponse>,
    /// Notices queued by rental actions since the last profile read.
    pub flashes: Vec<FlashMessage>,
}

impl ProfileResponse {
    fn new(profile: RiderProfile, flashes: Vec<FlashMessage>) -> Self {
        Self {
            active_rentals: profile
                .active_rentals
                .into_iter()
                .map(RentalResponse::from)
                .collect(),
            past_rentals: profile
                .past_rentals
                .into_iter()
                .map(RentalResponse::from)
                .collect(),
            flashes,
        }
    }
}

/// Show the logged-in rider's rentals and drain pending flash messages.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Rider profile", body = ProfileResponse,
            headers(("Cache-Control" = String, description = "private, no-cache, must-revalidate"))),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getProfile",
    security(("SessionCookie" = []))
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = state.profile.profile(&user_id).await?;
    // Flashes stay queued when the query fails.
    let flashes = session.take_flashes()?;

    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(ProfileResponse::new(profile, flashes)))
}

#[cfg(test)]
mod tests {
    //! Flash draining and rental partitioning are covered end to end in the
    //! rental action tests; these cover the remaining edges.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::http::header::CACHE_CONTROL;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};
    use serde_json::Value;

    use super::*;
    use crate::domain::Error;
    use crate::domain::ports::MockProfileQuery;
    use crate::inbound::http::test_utils::{login_cookie, memory_state, test_app};
    use crate::outbound::memory::InMemoryStore;
    use crate::test_support::{MutableClock, utc};

    #[fixture]
    fn state() -> HttpState {
        memory_state(
            InMemoryStore::new(),
            Arc::new(MutableClock::new(utc(2026, 4, 1, 10, 0))),
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_profile_is_private(state: HttpState) {
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, "rider").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("private, no-cache, must-revalidate")
        );
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({ "activeRentals": [], "pastRentals": [], "flashes": [] })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn profile_requires_login(state: HttpState) {
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profile")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn storage_outage_surfaces_as_unavailable(mut state: HttpState) {
        let mut profile = MockProfileQuery::new();
        profile
            .expect_profile()
            .times(1)
            .returning(|_| Err(Error::service_unavailable("database unavailable")));
        state.profile = Arc::new(profile);
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, "rider").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
