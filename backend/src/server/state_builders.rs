//! Builders for HTTP state over the configured storage.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{FixtureLoginService, LoginService};
use backend::inbound::http::state::{HttpState, HttpStateRepositories};
use backend::outbound::persistence::{
    DieselBikeRepository, DieselRentalRepository, DieselReviewRepository,
};

use super::config::Storage;

/// Wire the driving ports over `storage` with the system clock.
pub(crate) fn build_http_state(storage: &Storage) -> web::Data<HttpState> {
    build_http_state_with_clock(storage, Arc::new(DefaultClock))
}

pub(crate) fn build_http_state_with_clock(
    storage: &Storage,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let login: Arc<dyn LoginService> = Arc::new(FixtureLoginService);
    let state = match storage {
        Storage::Database(pool) => HttpState::from_repositories(
            login,
            HttpStateRepositories {
                bikes: Arc::new(DieselBikeRepository::new(pool.clone())),
                rentals: Arc::new(DieselRentalRepository::new(pool.clone())),
                reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
            },
            clock,
        ),
        Storage::Memory(store) => {
            let store = Arc::new(store.clone());
            HttpState::from_repositories(
                login,
                HttpStateRepositories {
                    bikes: store.clone(),
                    rentals: store.clone(),
                    reviews: store,
                },
                clock,
            )
        }
    };
    web::Data::new(state)
}
