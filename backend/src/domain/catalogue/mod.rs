//! Catalogue read models: bike listings, rating aggregates and ordering.
//!
//! Listings are assembled from bike rows and their review totals. Ordering is
//! applied in the domain so every adapter yields the same sequence.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::{Bike, Review};


/// Attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    Name,
    #[default]
    Category,
    Price,
    Size,
    Rating,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Price => "price",
            Self::Size => "size",
            Self::Rating => "rating",
        }
    }
}

/// Ordering direction for the requested key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Rejected sort parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortParseError {
    #[error("unknown sort key `{0}`; expected name, category, price, size or rating")]
    UnknownKey(String),
    #[error("unknown sort order `{0}`; expected asc or desc")]
    UnknownDirection(String),
}

impl FromStr for SortKey {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "category" | "type" => Ok(Self::Category),
            "price" | "price_per_hour" => Ok(Self::Price),
            "size" => Ok(Self::Size),
            "rating" | "average_rating" => Ok(Self::Rating),
            _ => Err(SortParseError::UnknownKey(s.to_owned())),
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(SortParseError::UnknownDirection(s.to_owned())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key plus direction. The default is category ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CatalogueSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl CatalogueSort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Catalogue listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BikeListingFilter {
    /// Hide bikes that are currently rented.
    pub available_only: bool,
    pub sort: CatalogueSort,
}

impl Default for BikeListingFilter {
    fn default() -> Self {
        Self {
            available_only: true,
            sort: CatalogueSort::default(),
        }
    }
}

/// Average rating and review count for a bike.
///
/// # Examples
/// ```
/// use backend::domain::RatingSummary;
/// use rust_decimal::Decimal;
///
/// let summary = RatingSummary::from_totals(14, 3);
/// assert_eq!(summary.average(), Decimal::new(467, 2));
/// assert_eq!(RatingSummary::from_totals(0, 0).average(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RatingSummary {
    average: Decimal,
    count: u64,
}

impl RatingSummary {
    /// Build from the sum of ratings and the number of reviews.
    pub fn from_totals(sum: i64, count: i64) -> Self {
        let Ok(count) = u64::try_from(count) else {
            return Self::default();
        };
        if count == 0 {
            return Self::default();
        }
        let mut average = (Decimal::from(sum) / Decimal::from(count)).round_dp(2);
        average.rescale(2);
        Self { average, count }
    }

    /// Summarise a set of reviews.
    pub fn from_reviews<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Self {
        let (sum, count) = reviews
            .into_iter()
            .fold((0_i64, 0_i64), |(sum, count), review| {
                (sum + i64::from(review.rating.value()), count + 1)
            });
        Self::from_totals(sum, count)
    }

    /// Mean rating rounded to two places, zero when unreviewed.
    pub fn average(&self) -> Decimal {
        self.average
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// A bike with its rating aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BikeListing {
    pub bike: Bike,
    pub rating: RatingSummary,
}

/// A listing together with its reviews, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BikeDetail {
    pub listing: BikeListing,
    pub reviews: Vec<Review>,
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_by_key(key: SortKey, a: &BikeListing, b: &BikeListing) -> Ordering {
    match key {
        SortKey::Name => compare_text(a.bike.name(), b.bike.name()),
        SortKey::Category => compare_text(a.bike.category(), b.bike.category()),
        SortKey::Price => a.bike.price_per_hour().cmp(&b.bike.price_per_hour()),
        SortKey::Size => compare_text(a.bike.size(), b.bike.size()),
        SortKey::Rating => a.rating.average().cmp(&b.rating.average()),
    }
}

/// Order listings by `sort`, breaking ties by ascending bike id.
pub fn sort_listings(listings: &mut [BikeListing], sort: CatalogueSort) {
    listings.sort_by(|a, b| {
        let primary = compare_by_key(sort.key, a, b);
        let primary = match sort.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.bike.id().cmp(&b.bike.id()))
    });
}
