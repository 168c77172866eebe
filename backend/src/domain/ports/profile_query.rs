//! Driving port for a rider's rental history.

use async_trait::async_trait;

use crate::domain::{Error, RentalSummary, UserId};

/// Open and returned rentals of one rider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RiderProfile {
    /// Open rentals; at most one.
    pub active_rentals: Vec<RentalSummary>,
    /// Returned rentals, most recently ended first.
    pub past_rentals: Vec<RentalSummary>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    async fn profile(&self, user_id: &UserId) -> Result<RiderProfile, Error>;
}
