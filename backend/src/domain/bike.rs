//! Bike catalogue entity and its value types.
//!
//! A bike carries a denormalised availability flag. The flag is only flipped
//! by the rental lifecycle, never by catalogue reads.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a bike name in characters.
pub const BIKE_NAME_MAX: usize = 100;
/// Maximum length of a bike category in characters.
pub const BIKE_CATEGORY_MAX: usize = 50;
/// Maximum length of a bike size label in characters.
pub const BIKE_SIZE_MAX: usize = 10;

/// Stable bike identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BikeId(Uuid);

impl BikeId {
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

impl fmt::Display for BikeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised while constructing bikes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BikeValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    /// A text field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    /// The hourly rate was zero or negative.
    #[error("price per hour must be positive, got {value}")]
    NonPositivePrice { value: Decimal },
    /// The hourly rate exceeded `numeric(6,2)`.
    #[error("price per hour must be at most {max}, got {value}")]
    PriceTooHigh { value: Decimal, max: Decimal },
    /// The hourly rate carried sub-cent precision.
    #[error("price per hour must have at most two decimal places, got {value}")]
    PriceTooPrecise { value: Decimal },
}

/// Hourly rental rate.
///
/// ## Invariants
/// - Strictly positive.
/// - At most two fractional digits and at most `9999.99`.
///
/// # Examples
/// ```
/// use backend::domain::PricePerHour;
/// use rust_decimal::Decimal;
///
/// let price = PricePerHour::new(Decimal::new(500, 2)).unwrap();
/// assert_eq!(price.value().to_string(), "5.00");
/// assert!(PricePerHour::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PricePerHour(Decimal);

impl PricePerHour {
    /// Largest representable hourly rate.
    pub const MAX: Decimal = Decimal::from_parts(999_999, 0, 0, false, 2);

    /// Validate and wrap an hourly rate.
    pub fn new(value: Decimal) -> Result<Self, BikeValidationError> {
        if value <= Decimal::ZERO {
            return Err(BikeValidationError::NonPositivePrice { value });
        }
        if value > Self::MAX {
            return Err(BikeValidationError::PriceTooHigh {
                value,
                max: Self::MAX,
            });
        }
        if value.normalize().scale() > 2 {
            return Err(BikeValidationError::PriceTooPrecise { value });
        }
        Ok(Self(value))
    }

    /// Rate as a decimal amount.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for PricePerHour {
    type Error = BikeValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PricePerHour> for Decimal {
    fn from(price: PricePerHour) -> Self {
        price.0
    }
}

/// Unvalidated bike fields, as read from storage or seed data.
#[derive(Debug, Clone, PartialEq)]
pub struct BikeDraft {
    pub id: BikeId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub size: String,
    pub price_per_hour: Decimal,
    pub is_available: bool,
}

/// A rentable bike.
///
/// ## Invariants
/// - `name`, `category` and `size` are non-blank and within their length
///   limits.
/// - `price_per_hour` satisfies [`PricePerHour`] invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bike {
    id: BikeId,
    name: String,
    category: String,
    description: String,
    size: String,
    price_per_hour: PricePerHour,
    is_available: bool,
}

fn require_text(
    value: String,
    field: &'static str,
    max: usize,
) -> Result<String, BikeValidationError> {
    if value.trim().is_empty() {
        return Err(BikeValidationError::EmptyField { field });
    }
    if value.chars().count() > max {
        return Err(BikeValidationError::FieldTooLong { field, max });
    }
    Ok(value)
}

impl Bike {
    /// Validate a draft into a bike.
    pub fn new(draft: BikeDraft) -> Result<Self, BikeValidationError> {
        let BikeDraft {
            id,
            name,
            category,
            description,
            size,
            price_per_hour,
            is_available,
        } = draft;

        Ok(Self {
            id,
            name: require_text(name, "name", BIKE_NAME_MAX)?,
            category: require_text(category, "category", BIKE_CATEGORY_MAX)?,
            description,
            size: require_text(size, "size", BIKE_SIZE_MAX)?,
            price_per_hour: PricePerHour::new(price_per_hour)?,
            is_available,
        })
    }

    pub fn id(&self) -> BikeId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Bike type, such as "Mountain" or "Road".
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn size(&self) -> &str {
        self.size.as_str()
    }

    pub fn price_per_hour(&self) -> PricePerHour {
        self.price_per_hour
    }

    /// Whether no open rental references this bike.
    pub fn is_available(&self) -> bool {
        self.is_available
    }

    /// Mark the bike as rented. Lifecycle adapters call this together with
    /// opening a rental.
    pub fn mark_rented(&mut self) {
        self.is_available = false;
    }

    /// Mark the bike as available. Lifecycle adapters call this together with
    /// closing a rental.
    pub fn mark_available(&mut self) {
        self.is_available = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn draft() -> BikeDraft {
        BikeDraft {
            id: BikeId::random(),
            name: "Trailblazer".to_owned(),
            category: "Mountain".to_owned(),
            description: String::new(),
            size: "M".to_owned(),
            price_per_hour: dec!(5.00),
            is_available: true,
        }
    }

    #[rstest]
    #[case(dec!(0.01))]
    #[case(dec!(5))]
    #[case(dec!(9999.99))]
    fn accepts_prices_within_bounds(#[case] value: Decimal) {
        assert_eq!(PricePerHour::new(value).expect("valid price").value(), value);
    }

    #[rstest]
    #[case(dec!(0), "positive")]
    #[case(dec!(-1.50), "positive")]
    #[case(dec!(10000.00), "at most")]
    #[case(dec!(1.005), "two decimal places")]
    fn rejects_prices_outside_bounds(#[case] value: Decimal, #[case] fragment: &str) {
        let err = PricePerHour::new(value).expect_err("invalid price");
        assert!(err.to_string().contains(fragment), "{err}");
    }

    #[rstest]
    fn trailing_zeros_do_not_count_as_precision() {
        assert!(PricePerHour::new(dec!(2.5000)).is_ok());
    }

    #[rstest]
    fn description_may_be_empty(draft: BikeDraft) {
        let bike = Bike::new(draft).expect("valid bike");
        assert_eq!(bike.description(), "");
    }

    #[rstest]
    fn rejects_blank_name(mut draft: BikeDraft) {
        draft.name = "   ".to_owned();
        assert_eq!(
            Bike::new(draft).expect_err("blank name"),
            BikeValidationError::EmptyField { field: "name" }
        );
    }

    #[rstest]
    fn rejects_oversized_size_label(mut draft: BikeDraft) {
        draft.size = "extra-extra-large".to_owned();
        assert_eq!(
            Bike::new(draft).expect_err("long size"),
            BikeValidationError::FieldTooLong {
                field: "size",
                max: BIKE_SIZE_MAX
            }
        );
    }

    #[rstest]
    fn availability_toggles(draft: BikeDraft) {
        let mut bike = Bike::new(draft).expect("valid bike");
        bike.mark_rented();
        assert!(!bike.is_available());
        bike.mark_available();
        assert!(bike.is_available());
    }
}
