//! In-memory implementation of the driven ports.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::ports::{
    BikeRepository, BikeRepositoryError, FleetSeedRepository, FleetSeedRepositoryError,
    RentalRepository, RentalRepositoryError, ReviewRepository, ReviewRepositoryError,
};
use crate::domain::{
    Bike, BikeId, BikeListing, RatingSummary, Rental, RentalId, RentalSummary, Review, ReviewId,
    UserId, sort_newest_first,
};

#[derive(Debug, Default)]
struct StoreState {
    bikes: BTreeMap<BikeId, Bike>,
    rentals: BTreeMap<RentalId, Rental>,
    reviews: BTreeMap<ReviewId, Review>,
}

impl StoreState {
    fn listing(&self, bike: &Bike) -> BikeListing {
        let rating = RatingSummary::from_reviews(
            self.reviews
                .values()
                .filter(|review| review.bike_id == bike.id()),
        );
        BikeListing {
            bike: bike.clone(),
            rating,
        }
    }

    fn summary(&self, rental: &Rental) -> Result<RentalSummary, RentalRepositoryError> {
        let bike = self.bikes.get(&rental.bike_id()).ok_or_else(|| {
            RentalRepositoryError::query(format!(
                "rental {} references missing bike {}",
                rental.id(),
                rental.bike_id()
            ))
        })?;
        Ok(RentalSummary {
            rental: rental.clone(),
            bike_name: bike.name().to_owned(),
        })
    }
}

/// Thread-safe store implementing every repository port.
///
/// Clones share state.
///
/// # Examples
///
/// ```
/// use backend::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// let shared = store.clone();
/// # let _ = shared;
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store preloaded with `fleet`.
    pub fn with_bikes(fleet: impl IntoIterator<Item = Bike>) -> Self {
        let state = StoreState {
            bikes: fleet.into_iter().map(|bike| (bike.id(), bike)).collect(),
            ..StoreState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Current state of one bike.
    pub async fn bike(&self, bike_id: &BikeId) -> Option<Bike> {
        self.state.lock().await.bikes.get(bike_id).cloned()
    }

    /// Number of rentals still open.
    pub async fn active_rental_count(&self) -> usize {
        self.state
            .lock()
            .await
            .rentals
            .values()
            .filter(|rental| rental.is_active())
            .count()
    }
}

#[async_trait]
impl BikeRepository for InMemoryStore {
    async fn list_listings(
        &self,
        available_only: bool,
    ) -> Result<Vec<BikeListing>, BikeRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .bikes
            .values()
            .filter(|bike| !available_only || bike.is_available())
            .map(|bike| state.listing(bike))
            .collect())
    }

    async fn find_listing(
        &self,
        bike_id: &BikeId,
    ) -> Result<Option<BikeListing>, BikeRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.bikes.get(bike_id).map(|bike| state.listing(bike)))
    }
}

#[async_trait]
impl RentalRepository for InMemoryStore {
    async fn open_rental(&self, rental: &Rental) -> Result<RentalSummary, RentalRepositoryError> {
        let mut state = self.state.lock().await;

        let user_busy = state
            .rentals
            .values()
            .any(|open| open.is_active() && open.user_id() == rental.user_id());
        if user_busy {
            return Err(RentalRepositoryError::active_rental_exists());
        }

        let bike_id = rental.bike_id();
        let bike = state
            .bikes
            .get_mut(&bike_id)
            .ok_or_else(|| RentalRepositoryError::bike_not_found(bike_id))?;
        if !bike.is_available() {
            return Err(RentalRepositoryError::bike_unavailable());
        }
        bike.mark_rented();
        let bike_name = bike.name().to_owned();

        state.rentals.insert(rental.id(), rental.clone());
        Ok(RentalSummary {
            rental: rental.clone(),
            bike_name,
        })
    }

    async fn close_rental(
        &self,
        user_id: &UserId,
        rental_id: &RentalId,
        ended_at: DateTime<Utc>,
    ) -> Result<RentalSummary, RentalRepositoryError> {
        let mut state = self.state.lock().await;

        let rental = state
            .rentals
            .get(rental_id)
            .filter(|rental| rental.user_id() == user_id)
            .cloned()
            .ok_or_else(|| RentalRepositoryError::rental_not_found(*rental_id))?;

        let bike = state
            .bikes
            .get_mut(&rental.bike_id())
            .ok_or_else(|| RentalRepositoryError::bike_not_found(rental.bike_id()))?;
        let closed = rental
            .close(ended_at, bike.price_per_hour())
            .map_err(RentalRepositoryError::from_domain)?;
        bike.mark_available();
        let bike_name = bike.name().to_owned();

        state.rentals.insert(closed.id(), closed.clone());
        Ok(RentalSummary {
            rental: closed,
            bike_name,
        })
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RentalSummary>, RentalRepositoryError> {
        let state = self.state.lock().await;
        state
            .rentals
            .values()
            .filter(|rental| rental.user_id() == user_id)
            .map(|rental| state.summary(rental))
            .collect()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn list_for_bike(&self, bike_id: &BikeId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let state = self.state.lock().await;
        let mut reviews: Vec<Review> = state
            .reviews
            .values()
            .filter(|review| review.bike_id == *bike_id)
            .cloned()
            .collect();
        sort_newest_first(&mut reviews);
        Ok(reviews)
    }

    async fn find_by_id(
        &self,
        review_id: &ReviewId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        Ok(self.state.lock().await.reviews.get(review_id).cloned())
    }

    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.bikes.contains_key(&review.bike_id) {
            return Err(ReviewRepositoryError::bike_not_found(review.bike_id));
        }
        state.reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut state = self.state.lock().await;
        let stored = state
            .reviews
            .get_mut(&review.id)
            .ok_or_else(|| ReviewRepositoryError::review_not_found(review.id))?;
        stored.rating = review.rating;
        stored.comment = review.comment.clone();
        Ok(())
    }

    async fn delete(&self, review_id: &ReviewId) -> Result<(), ReviewRepositoryError> {
        self.state
            .lock()
            .await
            .reviews
            .remove(review_id)
            .map(|_| ())
            .ok_or_else(|| ReviewRepositoryError::review_not_found(*review_id))
    }
}

#[async_trait]
impl FleetSeedRepository for InMemoryStore {
    async fn seed_bikes(&self, fleet: &[Bike]) -> Result<usize, FleetSeedRepositoryError> {
        let mut state = self.state.lock().await;
        let mut inserted = 0;
        for bike in fleet {
            if state.bikes.contains_key(&bike.id()) {
                continue;
            }
            state.bikes.insert(bike.id(), bike.clone());
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
