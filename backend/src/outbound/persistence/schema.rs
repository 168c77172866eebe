//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Riders known to the identity provider.
    users (id) {
        id -> Uuid,
        username -> Text,
        display_name -> Text,
        date_of_birth -> Nullable<Date>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rentable bikes with the denormalised availability flag.
    bikes (id) {
        id -> Uuid,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 50]
        category -> Varchar,
        description -> Text,
        #[max_length = 10]
        size -> Varchar,
        is_available -> Bool,
        price_per_hour -> Numeric,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rentals; `ended_at` and `total_cost` are null while open.
    rentals (id) {
        id -> Uuid,
        user_id -> Uuid,
        bike_id -> Uuid,
        started_at -> Timestamptz,
        ended_at -> Nullable<Timestamptz>,
        total_cost -> Nullable<Numeric>,
    }
}

diesel::table! {
    reviews (id) {
        id -> Uuid,
        bike_id -> Uuid,
        user_id -> Uuid,
        rating -> Int2,
        comment -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(rentals -> bikes (bike_id));
diesel::joinable!(rentals -> users (user_id));
diesel::joinable!(reviews -> bikes (bike_id));
diesel::joinable!(reviews -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(bikes, rentals, reviews, users);
