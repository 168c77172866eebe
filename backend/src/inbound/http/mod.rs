//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod cache_control;
pub mod catalogue;
pub mod error;
pub mod health;
pub mod profile;
pub mod rentals;
pub mod reviews;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler plus the JSON and query extractor
/// configuration. The caller supplies the scope and session middleware.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// # let _ = app;
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(users::login)
        .service(users::logout)
        .service(catalogue::list_bikes)
        .service(catalogue::get_bike)
        .service(rentals::start_rental)
        .service(rentals::return_bike)
        .service(profile::get_profile)
        .service(reviews::create_review)
        .service(reviews::update_review)
        .service(reviews::delete_review);
}
