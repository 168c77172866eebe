//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; adapters convert them into
//! validated domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{bikes, rentals, reviews};

/// Row read from the bikes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bikes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BikeRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub size: String,
    pub is_available: bool,
    pub price_per_hour: Decimal,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bikes)]
pub(crate) struct NewBikeRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub category: &'a str,
    pub description: &'a str,
    pub size: &'a str,
    pub is_available: bool,
    pub price_per_hour: Decimal,
}

/// Row read from the rentals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rentals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RentalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bike_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_cost: Option<Decimal>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rentals)]
pub(crate) struct NewRentalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bike_id: Uuid,
    pub started_at: DateTime<Utc>,
}

/// Closing columns written when a rental is returned.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = rentals)]
pub(crate) struct RentalClosure {
    pub ended_at: DateTime<Utc>,
    pub total_cost: Decimal,
}

/// Row read from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub bike_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub bike_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewRevision<'a> {
    pub rating: i16,
    pub comment: &'a str,
}
