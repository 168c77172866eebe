//! End-to-end HTTP scenarios: a rider logs in, browses, rents, returns and
//! reviews through the `/api/v1` surface backed by the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use backend::Trace;
use backend::domain::Bike;
use backend::domain::ports::FixtureLoginService;
use backend::inbound::http::configure_api;
use backend::inbound::http::session_config::SessionSettings;
use backend::inbound::http::state::{HttpState, HttpStateRepositories};
use backend::outbound::memory::InMemoryStore;
use backend::test_support::{MutableClock, test_bike, utc};
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

struct Shop {
    state: HttpState,
    clock: Arc<MutableClock>,
    tandem: Bike,
    cruiser: Bike,
}

#[fixture]
fn shop() -> Shop {
    let tandem = test_bike("Tandem", "Touring", dec!(8.00), true);
    let cruiser = test_bike("Cruiser", "City", dec!(5.50), true);
    let store = Arc::new(InMemoryStore::with_bikes([tandem.clone(), cruiser.clone()]));
    let clock = Arc::new(MutableClock::new(utc(2026, 7, 14, 15, 30)));
    let state = HttpState::from_repositories(
        Arc::new(FixtureLoginService),
        HttpStateRepositories {
            bikes: store.clone(),
            rentals: store.clone(),
            reviews: store,
        },
        clock.clone(),
    );
    Shop {
        state,
        clock,
        tandem,
        cruiser,
    }
}

async fn start(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    };
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session.middleware())
                    .configure(configure_api),
            ),
    )
    .await
}

/// Cookie-carrying client that follows session refreshes.
struct Rider<'a, S> {
    app: &'a S,
    cookie: Option<Cookie<'static>>,
}

impl<'a, S> Rider<'a, S>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    fn anonymous(app: &'a S) -> Self {
        Self { app, cookie: None }
    }

    async fn send(&mut self, request: actix_test::TestRequest) -> ServiceResponse {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let response = actix_test::call_service(self.app, request.to_request()).await;
        if let Some(cookie) = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.cookie = (!cookie.value().is_empty()).then(|| cookie.into_owned());
        }
        response
    }

    async fn login(&mut self, username: &str, password: &str) -> StatusCode {
        self.send(
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "username": username, "password": password })),
        )
        .await
        .status()
    }

    async fn post(&mut self, uri: &str) -> Option<String> {
        let response = self.send(actix_test::TestRequest::post().uri(uri)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {uri}");
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    async fn get_json(&mut self, uri: &str) -> (StatusCode, Value) {
        let response = self.send(actix_test::TestRequest::get().uri(uri)).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }
}

fn messages(profile: &Value) -> Vec<&str> {
    profile["flashes"]
        .as_array()
        .expect("flashes array")
        .iter()
        .filter_map(|flash| flash["message"].as_str())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn wrong_password_does_not_open_a_session(shop: Shop) {
    let app = start(shop.state).await;
    let mut rider = Rider::anonymous(&app);

    assert_eq!(rider.login("rider", "hunter2").await, StatusCode::UNAUTHORIZED);
    let (status, body) = rider.get_json("/api/v1/profile").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn anonymous_riders_can_browse_the_catalogue(shop: Shop) {
    let app = start(shop.state).await;
    let mut rider = Rider::anonymous(&app);

    let (status, body) = rider.get_json("/api/v1/bikes?sort=price&order=desc").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .expect("listing array")
        .iter()
        .filter_map(|bike| bike["name"].as_str())
        .collect();
    assert_eq!(names, ["Tandem", "Cruiser"]);
}

#[rstest]
#[actix_web::test]
async fn a_full_ride_ends_with_a_bill(shop: Shop) {
    let app = start(shop.state).await;
    let mut rider = Rider::anonymous(&app);
    assert_eq!(rider.login("rider", "password").await, StatusCode::OK);

    let location = rider
        .post(&format!("/api/v1/rentals/bikes/{}", shop.tandem.id()))
        .await;
    assert_eq!(location.as_deref(), Some("/api/v1/profile"));

    let (_, profile) = rider.get_json("/api/v1/profile").await;
    assert_eq!(
        messages(&profile),
        ["You have successfully rented 'Tandem'. Your ride started at 15:30 on July 14. Enjoy!"]
    );
    let rental_id = profile["activeRentals"][0]["id"]
        .as_str()
        .expect("active rental id")
        .to_owned();

    let (_, listing) = rider.get_json("/api/v1/bikes").await;
    assert_eq!(listing.as_array().map(Vec::len), Some(1));

    shop.clock.advance_seconds(45 * 60);
    let location = rider
        .post(&format!("/api/v1/rentals/{rental_id}/return"))
        .await;
    assert_eq!(location.as_deref(), Some("/api/v1/profile"));

    let (_, profile) = rider.get_json("/api/v1/profile").await;
    assert_eq!(
        messages(&profile),
        ["Thank you for returning Tandem. Total cost: €8.00."]
    );
    assert_eq!(profile["pastRentals"][0]["totalCost"], "8.00");
    assert!(profile["activeRentals"].as_array().is_some_and(Vec::is_empty));

    let (_, profile) = rider.get_json("/api/v1/profile").await;
    assert!(messages(&profile).is_empty(), "flashes are shown once");
}

#[rstest]
#[actix_web::test]
async fn a_second_rider_is_sent_back_to_the_catalogue(shop: Shop) {
    let app = start(shop.state).await;
    let mut first = Rider::anonymous(&app);
    let mut second = Rider::anonymous(&app);
    first.login("admin", "password").await;
    second.login("rider", "password").await;
    let uri = format!("/api/v1/rentals/bikes/{}", shop.cruiser.id());

    first.post(&uri).await;
    let location = second.post(&uri).await;

    assert_eq!(location.as_deref(), Some("/api/v1/bikes"));
    let (_, profile) = second.get_json("/api/v1/profile").await;
    assert_eq!(
        messages(&profile),
        ["Sorry, this bike is no longer available."]
    );
    assert_eq!(profile["flashes"][0]["level"], "error");
}

#[rstest]
#[actix_web::test]
async fn reviews_show_up_on_the_bike_page(shop: Shop) {
    let app = start(shop.state).await;
    let mut rider = Rider::anonymous(&app);
    rider.login("rider", "password").await;

    let response = rider
        .send(
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/bikes/{}/reviews", shop.cruiser.id()))
                .set_json(json!({ "rating": 4, "comment": "Comfy saddle" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (status, detail) = rider
        .get_json(&format!("/api/v1/bikes/{}", shop.cruiser.id()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["averageRating"], "4.00");
    assert_eq!(detail["reviews"][0]["comment"], "Comfy saddle");
}

#[rstest]
#[actix_web::test]
async fn logging_out_ends_the_session(shop: Shop) {
    let app = start(shop.state).await;
    let mut rider = Rider::anonymous(&app);
    rider.login("rider", "password").await;

    let response = rider
        .send(actix_test::TestRequest::post().uri("/api/v1/logout"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = rider.get_json("/api/v1/profile").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
