//! OpenAPI document for the REST API.
//!
//! Registers every `/api/v1` handler, the health probes, the request and
//! response bodies, the error envelope schemas, and the session cookie
//! security scheme. Served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::catalogue::{BikeDetailResponse, BikeResponse};
use crate::inbound::http::profile::{ProfileResponse, RentalResponse};
use crate::inbound::http::reviews::{ReviewRequest, ReviewResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session::{FlashLevel, FlashMessage};
use crate::inbound::http::users::LoginRequest;

/// Adds the `SessionCookie` security scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bike rental API",
        description = "Catalogue browsing, hourly bike rentals, reviews and rider profiles."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::catalogue::list_bikes,
        crate::inbound::http::catalogue::get_bike,
        crate::inbound::http::rentals::start_rental,
        crate::inbound::http::rentals::return_bike,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LoginRequest,
        BikeResponse,
        BikeDetailResponse,
        ReviewRequest,
        ReviewResponse,
        RentalResponse,
        ProfileResponse,
        FlashMessage,
        FlashLevel,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "users", description = "Login, logout and the rider profile"),
        (name = "catalogue", description = "Browse bikes and their reviews"),
        (name = "rentals", description = "Rent and return bikes"),
        (name = "reviews", description = "Author-only review mutations"),
        (name = "health", description = "Readiness and liveness probes")
    )
)]
pub struct ApiDoc;
