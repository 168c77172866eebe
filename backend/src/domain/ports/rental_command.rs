//! Driving port for starting and ending rentals.

use async_trait::async_trait;

use crate::domain::{BikeId, RentalError, RentalId, RentalSummary, UserId};

/// Rental lifecycle use-cases invoked by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalCommand: Send + Sync {
    /// Open a rental of `bike_id` for `user_id` at the current time.
    ///
    /// Fails with [`RentalError::ActiveRentalExists`],
    /// [`RentalError::BikeNotFound`] or [`RentalError::BikeUnavailable`],
    /// checked in that order.
    async fn start_rental(
        &self,
        user_id: &UserId,
        bike_id: &BikeId,
    ) -> Result<RentalSummary, RentalError>;

    /// Close the user's rental now and bill it.
    ///
    /// Fails with [`RentalError::RentalNotFound`] for unknown or foreign
    /// rentals and [`RentalError::RentalAlreadyClosed`] for returned ones.
    async fn end_rental(
        &self,
        user_id: &UserId,
        rental_id: &RentalId,
    ) -> Result<RentalSummary, RentalError>;
}
