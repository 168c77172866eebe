//! Port for the transactional rental lifecycle.
//!
//! Each mutating method is one atomic unit: the rental row and the bike's
//! availability flag change together or not at all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BikeId, Rental, RentalError, RentalId, RentalSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rental repository adapters.
    pub enum RentalRepositoryError {
        /// The user already has an open rental.
        ActiveRentalExists => "user already has an active rental",
        /// The bike is rented by someone else.
        BikeUnavailable => "bike is not available",
        /// The bike does not exist.
        BikeNotFound { bike_id: BikeId } => "bike {bike_id} not found",
        /// No rental with this id belongs to the user.
        RentalNotFound { rental_id: RentalId } => "rental {rental_id} not found",
        /// The rental was already returned.
        RentalAlreadyClosed => "rental has already been completed",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "rental repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "rental repository query failed: {message}",
    }
}

impl RentalRepositoryError {
    /// Translate a domain failure raised while closing inside an adapter.
    pub fn from_domain(error: RentalError) -> Self {
        match error {
            RentalError::ActiveRentalExists => Self::ActiveRentalExists,
            RentalError::BikeUnavailable => Self::BikeUnavailable,
            RentalError::BikeNotFound { bike_id } => Self::BikeNotFound { bike_id },
            RentalError::RentalNotFound { rental_id } => Self::RentalNotFound { rental_id },
            RentalError::RentalAlreadyClosed => Self::RentalAlreadyClosed,
            RentalError::Storage(err) => Self::query(err.message()),
        }
    }
}

/// Atomic rental mutations and per-user reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Persist a freshly started rental and mark its bike rented.
    ///
    /// Checks, in order: no open rental for the user, the bike exists, the
    /// bike is available.
    async fn open_rental(&self, rental: &Rental) -> Result<RentalSummary, RentalRepositoryError>;

    /// Close the user's rental at `ended_at`, bill it and release the bike.
    async fn close_rental(
        &self,
        user_id: &UserId,
        rental_id: &RentalId,
        ended_at: DateTime<Utc>,
    ) -> Result<RentalSummary, RentalRepositoryError>;

    /// Every rental of the user, in no particular order.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RentalSummary>, RentalRepositoryError>;
}
