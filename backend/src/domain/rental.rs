//! Rental entity, its state machine and the billing rule.
//!
//! A rental is `Active` while `ended_at` is empty and `Closed` once both the
//! end time and the total cost are recorded. Closing is the only transition.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BikeId, Error, PricePerHour, UserId};

const MICROS_PER_HOUR: u64 = 3_600_000_000;

/// Stable rental identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RentalId(Uuid);

impl RentalId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle failures surfaced by the rental service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RentalError {
    /// The user already holds an open rental.
    #[error("user already has an active rental")]
    ActiveRentalExists,
    /// The bike is currently rented by someone else.
    #[error("bike is not available")]
    BikeUnavailable,
    /// The bike does not exist.
    #[error("bike {bike_id} not found")]
    BikeNotFound { bike_id: BikeId },
    /// The rental does not exist or belongs to another user.
    #[error("rental {rental_id} not found")]
    RentalNotFound { rental_id: RentalId },
    /// The rental was already returned.
    #[error("rental has already been completed")]
    RentalAlreadyClosed,
    /// The backing store failed unexpectedly.
    #[error("rental storage failed: {0}")]
    Storage(#[from] Error),
}

/// Validation errors raised when restoring a rental from storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RentalValidationError {
    /// Exactly one of end time and total cost was recorded.
    #[error("end time and total cost must be set together")]
    PartialClosure,
    /// The recorded end time precedes the start time.
    #[error("rental ended at {ended_at} before it started at {started_at}")]
    EndsBeforeStart {
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    },
    /// The recorded cost was negative.
    #[error("total cost must not be negative, got {value}")]
    NegativeCost { value: Decimal },
}

/// Rental state derived from the recorded timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalStatus {
    /// Open; the bike is out.
    Active,
    /// Returned and billed.
    Closed {
        ended_at: DateTime<Utc>,
        total_cost: Decimal,
    },
}

/// Raw rental fields as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalDraft {
    pub id: RentalId,
    pub user_id: UserId,
    pub bike_id: BikeId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_cost: Option<Decimal>,
}

/// A rental of one bike by one user.
///
/// # Examples
/// ```
/// use backend::domain::{BikeId, PricePerHour, Rental, RentalId, UserId};
/// use chrono::{Duration, Utc};
/// use rust_decimal::Decimal;
///
/// let start = Utc::now();
/// let rental = Rental::start(RentalId::random(), UserId::random(), BikeId::random(), start);
/// let price = PricePerHour::new(Decimal::new(500, 2)).unwrap();
/// let closed = rental.close(start + Duration::minutes(90), price).unwrap();
/// assert_eq!(closed.total_cost(), Some(Decimal::new(1000, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    id: RentalId,
    user_id: UserId,
    bike_id: BikeId,
    started_at: DateTime<Utc>,
    status: RentalStatus,
}

impl Rental {
    /// Open a new rental starting at `started_at`.
    pub fn start(
        id: RentalId,
        user_id: UserId,
        bike_id: BikeId,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            bike_id,
            started_at,
            status: RentalStatus::Active,
        }
    }

    /// Rebuild a rental from stored fields, enforcing closure invariants.
    pub fn restore(draft: RentalDraft) -> Result<Self, RentalValidationError> {
        let RentalDraft {
            id,
            user_id,
            bike_id,
            started_at,
            ended_at,
            total_cost,
        } = draft;

        let status = match (ended_at, total_cost) {
            (None, None) => RentalStatus::Active,
            (Some(ended_at), Some(total_cost)) => {
                if ended_at < started_at {
                    return Err(RentalValidationError::EndsBeforeStart {
                        started_at,
                        ended_at,
                    });
                }
                if total_cost.is_sign_negative() {
                    return Err(RentalValidationError::NegativeCost { value: total_cost });
                }
                RentalStatus::Closed {
                    ended_at,
                    total_cost,
                }
            }
            _ => return Err(RentalValidationError::PartialClosure),
        };

        Ok(Self {
            id,
            user_id,
            bike_id,
            started_at,
            status,
        })
    }

    /// Return the closed form of this rental.
    ///
    /// `ended_at` earlier than the start (a clock step backwards) is clamped
    /// to the start time.
    pub fn close(&self, ended_at: DateTime<Utc>, price: PricePerHour) -> Result<Self, RentalError> {
        if !self.is_active() {
            return Err(RentalError::RentalAlreadyClosed);
        }
        let ended_at = ended_at.max(self.started_at);
        let hours = billable_hours(self.started_at, ended_at);
        let total_cost = rental_cost(hours, price)?;

        Ok(Self {
            status: RentalStatus::Closed {
                ended_at,
                total_cost,
            },
            user_id: self.user_id.clone(),
            ..*self
        })
    }

    pub fn id(&self) -> RentalId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn bike_id(&self) -> BikeId {
        self.bike_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn status(&self) -> RentalStatus {
        self.status
    }

    /// Whether the rental is still open.
    pub fn is_active(&self) -> bool {
        matches!(self.status, RentalStatus::Active)
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            RentalStatus::Active => None,
            RentalStatus::Closed { ended_at, .. } => Some(ended_at),
        }
    }

    pub fn total_cost(&self) -> Option<Decimal> {
        match self.status {
            RentalStatus::Active => None,
            RentalStatus::Closed { total_cost, .. } => Some(total_cost),
        }
    }
}

/// A rental paired with the name of the bike it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalSummary {
    pub rental: Rental,
    pub bike_name: String,
}

/// Whole hours billed for a rental.
///
/// Any started hour is billed in full, with a minimum of one hour. Elapsed
/// time is measured in microseconds, so exactly 3600 seconds bills one hour
/// and 3601 seconds bills two.
pub fn billable_hours(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> u64 {
    let elapsed = ended_at.signed_duration_since(started_at);
    let micros = elapsed
        .num_microseconds()
        .map_or(u64::MAX, |value| u64::try_from(value).unwrap_or(0));
    micros.div_ceil(MICROS_PER_HOUR).max(1)
}

/// Total cost for `hours` at `price`, rounded to cents.
pub fn rental_cost(hours: u64, price: PricePerHour) -> Result<Decimal, Error> {
    price
        .value()
        .checked_mul(Decimal::from(hours))
        .map(|cost| cost.round_dp(2))
        .ok_or_else(|| Error::internal(format!("rental cost overflow for {hours} hours")))
}
