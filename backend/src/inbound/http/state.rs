//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with mocks or the in-memory store.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BikeRepository, CatalogueQuery, LoginService, ProfileQuery, RentalCommand, RentalRepository,
    ReviewCommand, ReviewRepository,
};
use crate::domain::{
    CatalogueQueryService, ProfileQueryService, RentalLifecycleService, ReviewCommandService,
};

/// Driving ports used by the handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub rentals: Arc<dyn RentalCommand>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub profile: Arc<dyn ProfileQuery>,
}

/// Driven ports the domain services are built over.
pub struct HttpStateRepositories<B, R, V> {
    pub bikes: Arc<B>,
    pub rentals: Arc<R>,
    pub reviews: Arc<V>,
}

impl HttpState {
    /// Wire the domain services over a set of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::FixtureLoginService;
    /// use backend::inbound::http::state::{HttpState, HttpStateRepositories};
    /// use backend::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_repositories(
    ///     Arc::new(FixtureLoginService),
    ///     HttpStateRepositories {
    ///         bikes: store.clone(),
    ///         rentals: store.clone(),
    ///         reviews: store,
    ///     },
    ///     Arc::new(DefaultClock),
    /// );
    /// let _rentals = state.rentals.clone();
    /// ```
    pub fn from_repositories<B, R, V>(
        login: Arc<dyn LoginService>,
        repositories: HttpStateRepositories<B, R, V>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        B: BikeRepository + 'static,
        R: RentalRepository + 'static,
        V: ReviewRepository + 'static,
    {
        let HttpStateRepositories {
            bikes,
            rentals,
            reviews,
        } = repositories;

        Self {
            login,
            catalogue: Arc::new(CatalogueQueryService::new(bikes.clone(), reviews.clone())),
            rentals: Arc::new(RentalLifecycleService::new(rentals.clone(), clock.clone())),
            reviews: Arc::new(ReviewCommandService::new(bikes, reviews, clock)),
            profile: Arc::new(ProfileQueryService::new(rentals)),
        }
    }
}
