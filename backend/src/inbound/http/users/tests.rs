//! Tests for the login and logout handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockLoginService;
use crate::inbound::http::test_utils::{login_cookie, memory_state, session_cookie, test_app};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::MutableClock;

#[fixture]
fn state() -> HttpState {
    let clock = MutableClock::new(
        Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0)
            .single()
            .expect("valid fixture timestamp"),
    );
    memory_state(InMemoryStore::new(), Arc::new(clock))
}

#[rstest]
#[case("   ", "password", "username", "empty_username")]
#[case("rider", "", "password", "empty_password")]
#[actix_web::test]
async fn login_rejects_blank_fields(
    state: HttpState,
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(state)).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn login_rejects_wrong_password(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": "rider", "password": "hunter2" }))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "invalid credentials");
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn login_surfaces_identity_outage(mut state: HttpState) {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_authenticate()
        .times(1)
        .returning(|_| Err(Error::service_unavailable("identity provider unreachable")));
    state.login = Arc::new(login_service);
    let app = actix_test::init_service(test_app(state)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": "rider", "password": "password" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Error = actix_test::read_body_json(response).await;
    assert_eq!(body.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "rider").await;

    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&logout_res);
    assert_eq!(cleared.value(), "");

    let profile = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/profile")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(profile.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn logout_without_session_is_harmless(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
