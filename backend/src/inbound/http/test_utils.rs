//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::FixtureLoginService;
use crate::inbound::http::configure_api;
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::{HttpState, HttpStateRepositories};
use crate::outbound::memory::InMemoryStore;

/// Session middleware for tests: fresh key per call and no `Secure` flag so
/// plain HTTP test requests carry the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
    .middleware()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// App with the `/api/v1` scope, the session middleware and `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .configure(configure_api),
    )
}

/// State over `store` with the fixture rider roster.
pub fn memory_state(store: InMemoryStore, clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(store);
    HttpState::from_repositories(
        Arc::new(FixtureLoginService),
        HttpStateRepositories {
            bikes: store.clone(),
            rentals: store.clone(),
            reviews: store,
        },
        clock,
    )
}

/// Log in as a fixture rider and return the session cookie.
pub async fn login_cookie(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": "password" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed for {username}");
    session_cookie(&response)
}
