//! Domain entities, services and ports.
//!
//! Purpose: model bikes, rentals and reviews as validated types, and host the
//! services that implement the driving ports. Adapters depend on this module;
//! it depends on no adapter.
//!
//! Public surface:
//! - Error / ErrorCode: error payload shared by every layer.
//! - Bike, Rental, Review and their identifiers and value types.
//! - RentalLifecycleService, CatalogueQueryService, ReviewCommandService,
//!   ProfileQueryService.
//! - `ports`: driven and driving port traits.

pub mod auth;
pub mod bike;
pub mod catalogue;
pub mod catalogue_service;
pub mod error;
pub mod ports;
pub mod profile_service;
pub mod rental;
pub mod rental_service;
pub mod review;
pub mod review_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::bike::{
    BIKE_CATEGORY_MAX, BIKE_NAME_MAX, BIKE_SIZE_MAX, Bike, BikeDraft, BikeId, BikeValidationError,
    PricePerHour,
};
pub use self::catalogue::{
    BikeDetail, BikeListing, BikeListingFilter, CatalogueSort, RatingSummary, SortDirection,
    SortKey, SortParseError, sort_listings,
};
pub use self::catalogue_service::CatalogueQueryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::profile_service::{ProfileQueryService, partition_rentals};
pub use self::rental::{
    Rental, RentalDraft, RentalError, RentalId, RentalStatus, RentalSummary,
    RentalValidationError, billable_hours, rental_cost,
};
pub use self::rental_service::RentalLifecycleService;
pub use self::review::{
    REVIEW_COMMENT_MAX, Rating, Review, ReviewComment, ReviewDraft, ReviewId,
    ReviewValidationError, sort_newest_first,
};
pub use self::review_service::ReviewCommandService;
pub use self::trace_id::TraceId;
pub use self::user::{UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
