//! Tests for the backend application bootstrap, covering readiness signalling
//! and the assembled middleware stack.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::http::{StatusCode, header};
use actix_web::{test as actix_test, web};
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use backend::domain::TRACE_ID_HEADER;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::SessionSettings;
use backend::outbound::memory::InMemoryStore;
use backend::test_support::{MutableClock, test_bike, utc};

use crate::server::{
    AppDependencies, ServerConfig, Storage, build_app, build_http_state_with_clock, create_server,
};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn session() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

fn session_cookie<B>(response: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>, session: SessionSettings) {
    assert!(!health_state.is_ready(), "state should start unready");
    let config = ServerConfig::new(session, "127.0.0.1:0".parse().expect("loopback address"));
    assert_eq!(config.bind_addr().port(), 0);

    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_rt::test]
async fn assembled_app_serves_probes_with_trace_ids(
    health_state: web::Data<HealthState>,
    session: SessionSettings,
) {
    health_state.mark_ready();
    let storage = Storage::Memory(InMemoryStore::new());
    let clock = Arc::new(MutableClock::new(utc(2026, 5, 2, 9, 0)));
    let app = actix_test::init_service(build_app(AppDependencies {
        health_state,
        http_state: build_http_state_with_clock(&storage, clock),
        session,
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/health/ready")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[actix_rt::test]
async fn assembled_app_runs_a_rental_end_to_end(
    health_state: web::Data<HealthState>,
    session: SessionSettings,
) {
    let bike = test_bike("Ridgeback", "Mountain", dec!(5.00), true);
    let storage = Storage::Memory(InMemoryStore::with_bikes([bike.clone()]));
    let clock = Arc::new(MutableClock::new(utc(2026, 5, 2, 9, 0)));
    let app = actix_test::init_service(build_app(AppDependencies {
        health_state,
        http_state: build_http_state_with_clock(&storage, clock.clone()),
        session,
    }))
    .await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": "rider", "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res);

    let rent = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/rentals/bikes/{}", bike.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(rent.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        rent.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/api/v1/profile")
    );
    let cookie = session_cookie(&rent);

    clock.advance_seconds(90 * 60);
    let profile = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(profile.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(profile).await;
    let active = body["activeRentals"].as_array().expect("active rentals");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["bikeName"], "Ridgeback");
    assert_eq!(body["flashes"].as_array().map(Vec::len), Some(1));
}

#[cfg(debug_assertions)]
#[rstest]
#[actix_rt::test]
async fn debug_builds_serve_the_openapi_document(
    health_state: web::Data<HealthState>,
    session: SessionSettings,
) {
    let storage = Storage::Memory(InMemoryStore::new());
    let app = actix_test::init_service(build_app(AppDependencies {
        health_state,
        http_state: build_http_state_with_clock(
            &storage,
            Arc::new(MutableClock::new(utc(2026, 5, 2, 9, 0))),
        ),
        session,
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api-docs/openapi.json")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert!(body["paths"]["/api/v1/bikes"].is_object());
}
