//! Rental form actions.
//!
//! Both actions answer with `303 See Other`. Outcomes reach the rider as
//! flash messages, read back through `GET /api/v1/profile`.
//!
//! ```text
//! POST /api/v1/rentals/bikes/{bike_id}
//! POST /api/v1/rentals/{rental_id}/return
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, post, web};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{BikeId, Error, RentalError, RentalId, RentalSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{FlashMessage, SessionContext};
use crate::inbound::http::state::HttpState;

pub(crate) const PROFILE_PATH: &str = "/api/v1/profile";
pub(crate) const CATALOGUE_PATH: &str = "/api/v1/bikes";

const ACTIVE_RENTAL_EXISTS: &str = "You already have an active rental.";
const BIKE_UNAVAILABLE: &str = "Sorry, this bike is no longer available.";
const RENTAL_ALREADY_CLOSED: &str = "This rental has already been completed.";
const RENTAL_NOT_FOUND: &str = "Rental not found.";

/// Where a rental action sends the rider, and what it tells them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outcome {
    flash: FlashMessage,
    location: &'static str,
}

impl Outcome {
    fn to_profile(flash: FlashMessage) -> Self {
        Self {
            flash,
            location: PROFILE_PATH,
        }
    }

    fn to_catalogue(flash: FlashMessage) -> Self {
        Self {
            flash,
            location: CATALOGUE_PATH,
        }
    }
}

fn started_message(summary: &RentalSummary) -> String {
    let started_at = summary.rental.started_at().format("%H:%M on %B %d");
    format!(
        "You have successfully rented '{}'. Your ride started at {started_at}. Enjoy!",
        summary.bike_name
    )
}

fn returned_message(summary: &RentalSummary) -> Result<String, Error> {
    let cost = summary.rental.total_cost().ok_or_else(|| {
        Error::internal(format!(
            "rental {} returned without a total cost",
            summary.rental.id()
        ))
    })?;
    Ok(format!(
        "Thank you for returning {}. Total cost: €{cost:.2}.",
        summary.bike_name
    ))
}

/// Translate an expected lifecycle failure into a redirect; storage
/// failures propagate as error responses.
fn failure_outcome(error: RentalError) -> Result<Outcome, Error> {
    let outcome = match error {
        RentalError::ActiveRentalExists => {
            Outcome::to_profile(FlashMessage::error(ACTIVE_RENTAL_EXISTS))
        }
        RentalError::BikeUnavailable | RentalError::BikeNotFound { .. } => {
            Outcome::to_catalogue(FlashMessage::error(BIKE_UNAVAILABLE))
        }
        RentalError::RentalAlreadyClosed => {
            Outcome::to_profile(FlashMessage::error(RENTAL_ALREADY_CLOSED))
        }
        RentalError::RentalNotFound { .. } => {
            Outcome::to_profile(FlashMessage::error(RENTAL_NOT_FOUND))
        }
        RentalError::Storage(error) => return Err(error),
    };
    Ok(outcome)
}

fn redirect(session: &SessionContext, outcome: Outcome) -> ApiResult<HttpResponse> {
    session.push_flash(outcome.flash)?;
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, outcome.location))
        .finish())
}

/// Rent a bike as the logged-in rider.
#[utoipa::path(
    post,
    path = "/api/v1/rentals/bikes/{bike_id}",
    params(("bike_id" = String, Path, description = "Bike identifier")),
    responses(
        (status = 303, description = "Redirect to the profile on success or an expected failure, to the catalogue when the bike cannot be rented",
            headers(("Location" = String, description = "Next page"))),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "startRental",
    security(("SessionCookie" = []))
)]
#[post("/rentals/bikes/{bike_id}")]
pub async fn start_rental(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let Ok(uuid) = Uuid::parse_str(&path) else {
        debug!(raw = %path, "malformed bike id in rental request");
        return redirect(
            &session,
            Outcome::to_catalogue(FlashMessage::error(BIKE_UNAVAILABLE)),
        );
    };
    let bike_id = BikeId::from_uuid(uuid);

    let outcome = match state.rentals.start_rental(&user_id, &bike_id).await {
        Ok(summary) => Outcome::to_profile(FlashMessage::success(started_message(&summary))),
        Err(error) => failure_outcome(error)?,
    };
    redirect(&session, outcome)
}

/// Return the logged-in rider's rental and bill it.
#[utoipa::path(
    post,
    path = "/api/v1/rentals/{rental_id}/return",
    params(("rental_id" = String, Path, description = "Rental identifier")),
    responses(
        (status = 303, description = "Redirect to the profile",
            headers(("Location" = String, description = "Next page"))),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "returnBike",
    security(("SessionCookie" = []))
)]
#[post("/rentals/{rental_id}/return")]
pub async fn return_bike(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let Ok(uuid) = Uuid::parse_str(&path) else {
        debug!(raw = %path, "malformed rental id in return request");
        return redirect(
            &session,
            Outcome::to_profile(FlashMessage::error(RENTAL_NOT_FOUND)),
        );
    };
    let rental_id = RentalId::from_uuid(uuid);

    let outcome = match state.rentals.end_rental(&user_id, &rental_id).await {
        Ok(summary) => Outcome::to_profile(FlashMessage::success(returned_message(&summary)?)),
        Err(error) => failure_outcome(error)?,
    };
    redirect(&session, outcome)
}

#[cfg(test)]
#[path = "rentals_tests.rs"]
mod tests;
