//! Per-test databases cloned from a migrated template.
//!
//! The template is migrated once per migrations hash with the crate's own
//! embedded migrations. Raw reads go through `postgres` so assertions see
//! committed rows without the repositories in between.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use backend::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "bike_rental_template";
const TEMPLATE_PROVISION_RETRIES: usize = 5;
const TEMPLATE_PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn template_database_name() -> Result<String, String> {
    let migrations_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations_dir).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Creates or reuses the template database with every migration applied.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        run_pending_migrations(&url).map_err(|err| format!("migrate template: {err}"))?;
    }

    Ok(template_name)
}

/// Provisions a fresh database cloned from the migration template.
pub fn provision_template_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("create database from template: exhausted retries");
    for attempt in 1..=TEMPLATE_PROVISION_RETRIES {
        let provisioned = ensure_template_database(cluster).and_then(|template_name| {
            let db_name = format!("test_{}", Uuid::new_v4());
            cluster
                .temporary_database_from_template(db_name.as_str(), template_name.as_str())
                .map_err(|err| format!("create database from template: {err:?}"))
        });
        match provisioned {
            Ok(database) => return Ok(database),
            Err(error) => {
                last_error = format!("attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error}");
            }
        }
        if attempt < TEMPLATE_PROVISION_RETRIES {
            std::thread::sleep(TEMPLATE_PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// Direct reads of the rental tables.
///
/// Uses the blocking `postgres` client, so call it outside any Tokio runtime.
pub struct RawRows {
    client: Client,
}

impl RawRows {
    pub fn connect(url: &str) -> Result<Self, String> {
        let client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
        Ok(Self { client })
    }

    /// Rental rows referencing the bike, open or closed.
    pub fn rentals_for_bike(&mut self, bike_id: Uuid) -> i64 {
        self.client
            .query_one("SELECT count(*) FROM rentals WHERE bike_id = $1", &[&bike_id])
            .map(|row| row.get(0))
            .unwrap_or_else(|err| panic!("count rentals: {}", format_postgres_error(&err)))
    }

    /// Every rental row in the database.
    pub fn rental_total(&mut self) -> i64 {
        self.client
            .query_one("SELECT count(*) FROM rentals", &[])
            .map(|row| row.get(0))
            .unwrap_or_else(|err| panic!("count rentals: {}", format_postgres_error(&err)))
    }

    /// The stored availability flag of the bike.
    pub fn bike_available(&mut self, bike_id: Uuid) -> bool {
        self.client
            .query_one("SELECT is_available FROM bikes WHERE id = $1", &[&bike_id])
            .map(|row| row.get(0))
            .unwrap_or_else(|err| panic!("read bike: {}", format_postgres_error(&err)))
    }
}
