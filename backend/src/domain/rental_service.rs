//! Rental lifecycle service.
//!
//! Implements the [`RentalCommand`] driving port over a [`RentalRepository`].
//! The service stamps times from the injected clock; the repository owns the
//! transaction that keeps bike availability and rental rows in step.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{RentalCommand, RentalRepository, RentalRepositoryError};
use crate::domain::{
    BikeId, Error, Rental, RentalError, RentalId, RentalSummary, UserId, billable_hours,
};

fn map_repository_error(error: RentalRepositoryError) -> RentalError {
    match error {
        RentalRepositoryError::ActiveRentalExists => RentalError::ActiveRentalExists,
        RentalRepositoryError::BikeUnavailable => RentalError::BikeUnavailable,
        RentalRepositoryError::BikeNotFound { bike_id } => RentalError::BikeNotFound { bike_id },
        RentalRepositoryError::RentalNotFound { rental_id } => {
            RentalError::RentalNotFound { rental_id }
        }
        RentalRepositoryError::RentalAlreadyClosed => RentalError::RentalAlreadyClosed,
        RentalRepositoryError::Connection { message } => RentalError::Storage(
            Error::service_unavailable(format!("rental repository unavailable: {message}")),
        ),
        RentalRepositoryError::Query { message } => RentalError::Storage(Error::internal(
            format!("rental repository error: {message}"),
        )),
    }
}

fn log_rejection(operation: &'static str, user_id: &UserId, error: &RentalError) {
    match error {
        RentalError::Storage(err) => {
            error!(
                operation,
                %user_id,
                code = ?err.code(),
                error_message = err.message(),
                "rental storage failed"
            );
        }
        rejected => debug!(operation, %user_id, reason = %rejected, "rental request rejected"),
    }
}

/// Enforces the rental/return state machine.
#[derive(Clone)]
pub struct RentalLifecycleService<R> {
    rental_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> RentalLifecycleService<R> {
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use backend::domain::RentalLifecycleService;
    /// # use backend::outbound::memory::InMemoryStore;
    /// # use mockable::DefaultClock;
    /// let service = RentalLifecycleService::new(
    ///     Arc::new(InMemoryStore::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(rental_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { rental_repo, clock }
    }
}

#[async_trait]
impl<R> RentalCommand for RentalLifecycleService<R>
where
    R: RentalRepository,
{
    async fn start_rental(
        &self,
        user_id: &UserId,
        bike_id: &BikeId,
    ) -> Result<RentalSummary, RentalError> {
        let rental = Rental::start(RentalId::random(), user_id.clone(), *bike_id, self.clock.utc());

        let summary = self
            .rental_repo
            .open_rental(&rental)
            .await
            .map_err(map_repository_error)
            .inspect_err(|err| log_rejection("start_rental", user_id, err))?;

        info!(
            rental_id = %summary.rental.id(),
            %user_id,
            %bike_id,
            started_at = %summary.rental.started_at(),
            "rental started"
        );
        Ok(summary)
    }

    async fn end_rental(
        &self,
        user_id: &UserId,
        rental_id: &RentalId,
    ) -> Result<RentalSummary, RentalError> {
        let summary = self
            .rental_repo
            .close_rental(user_id, rental_id, self.clock.utc())
            .await
            .map_err(map_repository_error)
            .inspect_err(|err| log_rejection("end_rental", user_id, err))?;

        let rental = &summary.rental;
        let hours = rental
            .ended_at()
            .map(|ended_at| billable_hours(rental.started_at(), ended_at));
        info!(
            %rental_id,
            %user_id,
            bike_id = %rental.bike_id(),
            billable_hours = ?hours,
            total_cost = ?rental.total_cost(),
            "rental closed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "rental_service_tests.rs"]
mod tests;
