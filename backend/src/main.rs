//! Backend entry-point: loads configuration, prepares storage and serves the
//! rental API.

mod server;

use std::ffi::OsString;
use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::demo_fleet::{DemoFleetSettings, seed_demo_fleet_on_startup};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::persistence::{
    DbPool, DieselFleetSeedRepository, PoolConfig, run_pending_migrations_async,
};

use server::{ServerConfig, ServerSettings, Storage, create_server};

const BIN_NAME: &str = "bike-rental";
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load server settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let session =
        session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .wrap_err("invalid session configuration")?;
    let demo_fleet = DemoFleetSettings::load_from_iter([OsString::from(BIN_NAME)])
        .map_err(|err| eyre!("failed to load demo fleet settings: {err}"))?;

    let storage = prepare_storage(&settings).await?;
    seed_demo_fleet(&demo_fleet, &storage).await?;

    let config = ServerConfig::new(session, bind_addr).with_storage(storage);
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}

async fn prepare_storage(settings: &ServerSettings) -> Result<Storage> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database configured; rentals are kept in memory");
        return Ok(Storage::Memory(Default::default()));
    };

    if settings.run_migrations {
        let applied = run_pending_migrations_async(database_url.to_owned())
            .await
            .wrap_err("database migrations failed")?;
        info!(applied, "database migrations complete");
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(settings.pool_max_size())
            .with_min_idle(Some(settings.pool_min_idle()))
            .with_connection_timeout(POOL_CONNECTION_TIMEOUT),
    )
    .await
    .wrap_err("failed to build database pool")?;
    Ok(Storage::Database(pool))
}

async fn seed_demo_fleet(settings: &DemoFleetSettings, storage: &Storage) -> Result<()> {
    match storage {
        Storage::Database(pool) => {
            let repository = DieselFleetSeedRepository::new(pool.clone());
            seed_demo_fleet_on_startup(settings, &repository).await?;
        }
        Storage::Memory(store) => {
            seed_demo_fleet_on_startup(settings, store).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
