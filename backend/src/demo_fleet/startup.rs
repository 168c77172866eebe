//! Startup seeding orchestration.

use thiserror::Error;
use tracing::info;

use crate::demo_fleet::config::DemoFleetSettings;
use crate::demo_fleet::fleet::demo_fleet;
use crate::domain::BikeValidationError;
use crate::domain::ports::{FleetSeedRepository, FleetSeedRepositoryError};

/// Errors returned while seeding the demonstration fleet.
#[derive(Debug, Error)]
pub enum DemoFleetError {
    #[error("demo fleet contains an invalid bike: {0}")]
    InvalidBike(#[from] BikeValidationError),
    #[error("demo fleet seeding failed: {0}")]
    Seeding(#[from] FleetSeedRepositoryError),
}

/// Seed the demonstration fleet when enabled.
///
/// Returns `None` when seeding is disabled, otherwise the number of bikes
/// inserted; bikes already present are skipped.
///
/// # Examples
///
/// ```rust
/// use backend::demo_fleet::{DemoFleetSettings, seed_demo_fleet_on_startup};
/// use backend::outbound::memory::InMemoryStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryStore::new();
/// let settings = DemoFleetSettings { enabled: true };
///
/// let first = seed_demo_fleet_on_startup(&settings, &store).await.expect("seeded");
/// let again = seed_demo_fleet_on_startup(&settings, &store).await.expect("seeded");
/// assert_eq!(first, Some(6));
/// assert_eq!(again, Some(0));
/// # });
/// ```
pub async fn seed_demo_fleet_on_startup<R>(
    settings: &DemoFleetSettings,
    repository: &R,
) -> Result<Option<usize>, DemoFleetError>
where
    R: FleetSeedRepository + ?Sized,
{
    if !settings.enabled {
        info!(reason = "disabled", "demo fleet seeding skipped");
        return Ok(None);
    }

    let fleet = demo_fleet()?;
    let inserted = repository.seed_bikes(&fleet).await?;
    info!(
        inserted,
        already_present = fleet.len().saturating_sub(inserted),
        "demo fleet seeded"
    );
    Ok(Some(inserted))
}
