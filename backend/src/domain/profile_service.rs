//! Profile query service: a rider's open and returned rentals.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ProfileQuery, RentalRepository, RentalRepositoryError, RiderProfile};
use crate::domain::{Error, RentalSummary, UserId};

fn map_repository_error(error: RentalRepositoryError) -> Error {
    match error {
        RentalRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rental repository unavailable: {message}"))
        }
        other => Error::internal(format!("rental repository error: {other}")),
    }
}

/// Split rentals into open and returned, each in display order.
///
/// Open rentals are newest first. Returned rentals are ordered by end time
/// descending with ties broken by rental id.
pub fn partition_rentals(rentals: Vec<RentalSummary>) -> RiderProfile {
    let (mut active_rentals, mut past_rentals): (Vec<_>, Vec<_>) = rentals
        .into_iter()
        .partition(|summary| summary.rental.is_active());

    active_rentals.sort_by(|a, b| {
        b.rental
            .started_at()
            .cmp(&a.rental.started_at())
            .then(a.rental.id().cmp(&b.rental.id()))
    });
    past_rentals.sort_by(|a, b| {
        b.rental
            .ended_at()
            .cmp(&a.rental.ended_at())
            .then(a.rental.id().cmp(&b.rental.id()))
    });

    RiderProfile {
        active_rentals,
        past_rentals,
    }
}

#[derive(Clone)]
pub struct ProfileQueryService<R> {
    rental_repo: Arc<R>,
}

impl<R> ProfileQueryService<R> {
    pub fn new(rental_repo: Arc<R>) -> Self {
        Self { rental_repo }
    }
}

#[async_trait]
impl<R> ProfileQuery for ProfileQueryService<R>
where
    R: RentalRepository,
{
    async fn profile(&self, user_id: &UserId) -> Result<RiderProfile, Error> {
        let rentals = self
            .rental_repo
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(partition_rentals(rentals))
    }
}
