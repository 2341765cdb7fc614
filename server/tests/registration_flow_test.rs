//! End-to-end registration flow tests against the full router.
//!
//! The router runs with in-memory storage, a recording notifier, and a fixed
//! clock, so every request exercises the real handlers, request schemas, and
//! error mapping without a database.

#![allow(clippy::unwrap_used)] // Integration tests use unwrap for setup

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use clubhub_core::repository::EventRepository;
use clubhub_server::notify::Dispatcher;
use clubhub_server::server::{AppState, build_router};
use clubhub_testing::builders::{priced_event, sample_event, with_sub_events};
use clubhub_testing::{
    InMemoryDirectoryRepository, InMemoryEventRepository, RecordingNotifier, test_clock,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN_KEY: &str = "test-admin-key";

struct TestApp {
    router: Router,
    events: InMemoryEventRepository,
    notifier: RecordingNotifier,
}

fn test_app() -> TestApp {
    let events = InMemoryEventRepository::new();
    let notifier = RecordingNotifier::new();
    let state = AppState::new(
        Arc::new(events.clone()),
        Arc::new(InMemoryDirectoryRepository::new()),
        Dispatcher::new(Arc::new(notifier.clone())),
        Arc::new(test_clock()),
        Some(ADMIN_KEY.to_string()),
    );
    TestApp {
        router: build_router(state),
        events,
        notifier,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_request(method: &str, path: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_KEY}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

async fn drain_notifications() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn create_event_requires_the_admin_key() {
    let app = test_app();
    let request = post_json(
        "/events",
        &json!({
            "title": "Robo Rally",
            "startsAt": "2026-03-14T09:00:00Z",
            "registrationType": "solo"
        }),
    );

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
    assert!(app.events.is_empty());
}

#[tokio::test]
async fn created_event_accepts_a_registration() {
    let app = test_app();

    let (status, created) = send(
        &app.router,
        admin_request(
            "POST",
            "/events",
            Some(&json!({
                "title": "Robo Rally",
                "venue": "Main Auditorium",
                "startsAt": "2026-03-14T09:00:00Z",
                "registrationType": "solo"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["version"], 1);
    let event_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{event_id}/register"),
            &json!({"members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert!(body["registrationId"].is_string());
    // Free event: settled immediately
    let registration = &body["event"]["registrations"][0];
    assert_eq!(registration["paymentStatus"], "verified");
    assert_eq!(registration["paid"], true);
    assert_eq!(registration["amountDue"], 0);

    drain_notifications().await;
    assert_eq!(app.notifier.kinds(), vec!["registration_confirmed"]);
}

#[tokio::test]
async fn paid_event_registration_is_pending_on_the_wire() {
    let app = test_app();
    let event = priced_event("Ideathon", 250);
    app.events.insert_event(&event).await.unwrap();

    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{}/register", event.id),
            &json!({"members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let registration = &body["event"]["registrations"][0];
    assert_eq!(registration["paymentStatus"], "pending");
    assert_eq!(registration["paid"], false);
    assert_eq!(registration["amountDue"], 250);
}

#[tokio::test]
async fn empty_member_list_is_a_400_with_json_body() {
    let app = test_app();
    let event = sample_event("Robo Rally");
    app.events.insert_event(&event).await.unwrap();

    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{}/register", event.id),
            &json!({"members": []}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("member"));
}

#[tokio::test]
async fn team_size_bounds_apply_on_the_wire() {
    let app = test_app();

    let (_, created) = send(
        &app.router,
        admin_request(
            "POST",
            "/events",
            Some(&json!({
                "title": "Hackathon",
                "startsAt": "2026-03-14T09:00:00Z",
                "registrationType": "team",
                "minTeamSize": 2,
                "maxTeamSize": 4
            })),
        ),
    )
    .await;
    let event_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{event_id}/register"),
            &json!({"members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn duplicate_email_is_a_409_conflict() {
    let app = test_app();
    let event = sample_event("Robo Rally");
    app.events.insert_event(&event).await.unwrap();
    let signup = json!({"members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]});
    let path = format!("/events/{}/register", event.id);

    let (status, _) = send(&app.router, post_json(&path, &signup)).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same email with different casing still collides
    let again = json!({"members": [{"name": "A. Iyer", "email": "Asha@Club.Dev"}]});
    let (status, body) = send(&app.router, post_json(&path, &again)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn unknown_event_is_a_404() {
    let app = test_app();
    let ghost = sample_event("Ghost");

    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{}/register", ghost.id),
            &json!({"members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn full_event_reports_waitlist_status() {
    let app = test_app();
    let mut event = sample_event("Workshop");
    event.capacity = 1;
    app.events.insert_event(&event).await.unwrap();
    let path = format!("/events/{}/register", event.id);

    let (_, _) = send(
        &app.router,
        post_json(
            &path,
            &json!({"members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]}),
        ),
    )
    .await;
    let (status, body) = send(
        &app.router,
        post_json(
            &path,
            &json!({"members": [{"name": "Ravi Menon", "email": "ravi@club.dev"}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "waitlist");
    assert_eq!(body["event"]["registrations"].as_array().unwrap().len(), 1);
    assert_eq!(body["event"]["waitlist"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn coupon_discounts_the_amount_due_and_burns_a_use() {
    let app = test_app();
    let mut event = priced_event("Ideathon", 200);
    event.coupons.push(clubhub_core::types::Coupon {
        code: "CLUB10".to_string(),
        discount: clubhub_core::types::CouponDiscount::Percent(10),
        valid_from: None,
        valid_until: None,
        max_uses: 5,
        used_count: 0,
    });
    app.events.insert_event(&event).await.unwrap();

    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{}/register", event.id),
            &json!({
                "members": [{"name": "Asha Iyer", "email": "asha@club.dev"}],
                "couponCode": "club10"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["registrations"][0]["amountDue"], 180);
    assert_eq!(body["event"]["coupons"][0]["usedCount"], 1);
}

#[tokio::test]
async fn register_multiple_prices_the_bundle() {
    let app = test_app();
    let mut event = sample_event("Tech Fest");
    let ids = with_sub_events(&mut event, &[100, 150, 200]);
    app.events.insert_event(&event).await.unwrap();

    let selected: Vec<String> = ids.iter().map(ToString::to_string).collect();
    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{}/register-multiple", event.id),
            &json!({
                "selectedSubEvents": selected,
                "members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert!(body["multiEventGroupId"].is_string());
    assert_eq!(body["pricing"]["subtotal"], 450);
    assert_eq!(body["pricing"]["multiEventDiscount"], 90);
    assert_eq!(body["pricing"]["couponDiscount"], 0);
    assert_eq!(body["pricing"]["total"], 360);
}

#[tokio::test]
async fn register_multiple_with_no_selection_is_a_400() {
    let app = test_app();
    let event = sample_event("Tech Fest");
    app.events.insert_event(&event).await.unwrap();

    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{}/register-multiple", event.id),
            &json!({
                "selectedSubEvents": [],
                "members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn cancellation_promotes_the_waitlist_head() {
    let app = test_app();
    let mut event = sample_event("Workshop");
    event.capacity = 1;
    app.events.insert_event(&event).await.unwrap();
    let path = format!("/events/{}/register", event.id);

    let (_, first) = send(
        &app.router,
        post_json(
            &path,
            &json!({"members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]}),
        ),
    )
    .await;
    let (_, second) = send(
        &app.router,
        post_json(
            &path,
            &json!({"members": [{"name": "Ravi Menon", "email": "ravi@club.dev"}]}),
        ),
    )
    .await;
    drain_notifications().await;
    app.notifier.clear();

    let first_id = first["registrationId"].as_str().unwrap();
    let cancel_path = format!("/events/{}/registrations/{first_id}", event.id);

    // No key, no cancellation
    let unauthorized = Request::builder()
        .method("DELETE")
        .uri(&cancel_path)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app.router, admin_request("DELETE", &cancel_path, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["promotedRegistrationId"], second["registrationId"]);

    let (_, stored) = send(&app.router, get(&format!("/events/{}", event.id))).await;
    assert_eq!(stored["registrations"].as_array().unwrap().len(), 1);
    assert_eq!(
        stored["registrations"][0]["id"],
        second["registrationId"]
    );
    assert!(stored["waitlist"].as_array().unwrap().is_empty());

    drain_notifications().await;
    assert_eq!(app.notifier.kinds(), vec!["waitlist_promoted"]);
}

#[tokio::test]
async fn stale_event_update_loses_with_a_409() {
    let app = test_app();
    let event = sample_event("Robo Rally");
    app.events.insert_event(&event).await.unwrap();
    let path = format!("/events/{}", event.id);

    let (status, updated) = send(
        &app.router,
        admin_request("PUT", &path, Some(&json!({"version": 1, "title": "Robo Rally 2026"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["version"], 2);
    assert_eq!(updated["title"], "Robo Rally 2026");

    // A second writer still holding version 1 must not clobber the edit
    let (status, body) = send(
        &app.router,
        admin_request("PUT", &path, Some(&json!({"version": 1, "title": "Stale"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (_, stored) = send(&app.router, get(&path)).await;
    assert_eq!(stored["title"], "Robo Rally 2026");
}

#[tokio::test]
async fn closed_registration_is_rejected() {
    let app = test_app();
    let mut event = sample_event("Robo Rally");
    event.registration_open = false;
    app.events.insert_event(&event).await.unwrap();

    let (status, body) = send(
        &app.router,
        post_json(
            &format!("/events/{}/register", event.id),
            &json!({"members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn event_listing_is_public() {
    let app = test_app();
    app.events
        .insert_event(&sample_event("Robo Rally"))
        .await
        .unwrap();
    app.events
        .insert_event(&sample_event("Ideathon"))
        .await
        .unwrap();

    let (status, body) = send(&app.router, get("/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app.router, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}
