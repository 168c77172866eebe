//! The demonstration fleet.
//!
//! Ids are fixed so reseeding recognises bikes that are already present.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Bike, BikeDraft, BikeId, BikeValidationError};

/// Seed row for one demonstration bike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoBike {
    pub id: Uuid,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub size: &'static str,
    /// Hourly price in cents.
    pub price_cents: i64,
}

pub const DEMO_BIKES: [DemoBike; 6] = [
    DemoBike {
        id: Uuid::from_u128(0x0b1c_e000_0000_4000_8000_0000_0000_0001),
        name: "Trailblazer",
        category: "Mountain",
        description: "Full-suspension trail bike with 29-inch wheels.",
        size: "L",
        price_cents: 1250,
    },
    DemoBike {
        id: Uuid::from_u128(0x0b1c_e000_0000_4000_8000_0000_0000_0002),
        name: "Ridgeline",
        category: "Mountain",
        description: "Hardtail for forest tracks and gravel climbs.",
        size: "M",
        price_cents: 1000,
    },
    DemoBike {
        id: Uuid::from_u128(0x0b1c_e000_0000_4000_8000_0000_0000_0003),
        name: "Tempo",
        category: "Road",
        description: "Carbon road bike with electronic shifting.",
        size: "56",
        price_cents: 1500,
    },
    DemoBike {
        id: Uuid::from_u128(0x0b1c_e000_0000_4000_8000_0000_0000_0004),
        name: "Cityhopper",
        category: "Urban",
        description: "Step-through commuter with rack and mudguards.",
        size: "M",
        price_cents: 700,
    },
    DemoBike {
        id: Uuid::from_u128(0x0b1c_e000_0000_4000_8000_0000_0000_0005),
        name: "Boulevard",
        category: "Hybrid",
        description: "Upright hybrid for towpaths and parks.",
        size: "S",
        price_cents: 850,
    },
    DemoBike {
        id: Uuid::from_u128(0x0b1c_e000_0000_4000_8000_0000_0000_0006),
        name: "Voltage",
        category: "Electric",
        description: "Pedal-assist e-bike with a 90 km range.",
        size: "L",
        price_cents: 1800,
    },
];

impl DemoBike {
    /// Validate into an available [`Bike`].
    pub fn to_bike(&self) -> Result<Bike, BikeValidationError> {
        Bike::new(BikeDraft {
            id: BikeId::from_uuid(self.id),
            name: self.name.to_owned(),
            category: self.category.to_owned(),
            description: self.description.to_owned(),
            size: self.size.to_owned(),
            price_per_hour: Decimal::new(self.price_cents, 2),
            is_available: true,
        })
    }
}

/// Every demonstration bike, available and validated.
///
/// # Examples
/// ```
/// use backend::demo_fleet::{DEMO_BIKES, demo_fleet};
///
/// let fleet = demo_fleet().expect("demo bikes are valid");
/// assert_eq!(fleet.len(), DEMO_BIKES.len());
/// assert!(fleet.iter().all(|bike| bike.is_available()));
/// ```
pub fn demo_fleet() -> Result<Vec<Bike>, BikeValidationError> {
    DEMO_BIKES.iter().map(DemoBike::to_bike).collect()
}
