//! Optional startup seeding of a demonstration fleet.

mod config;
mod fleet;
mod startup;

pub use config::DemoFleetSettings;
pub use fleet::{DEMO_BIKES, DemoBike, demo_fleet};
pub use startup::{DemoFleetError, seed_demo_fleet_on_startup};
