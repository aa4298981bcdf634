use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::json;

use crate::common::{self, driver, scenario_drivers};
use crate::{ids, json_body};

#[actix_rt::test]
async fn put_location_then_nearby_finds_the_driver() {
    let app = init_app!(common::app_state(Vec::new()));

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/drivers/driver-42/location")
        .set_json(json!({ "latitude": 40.7128, "longitude": -74.006 }))
        .to_request();
    let (status, stored) = json_body(actix_test::call_service(&app, request).await).await;

    assert_eq!(status, 200);
    assert_eq!(stored["id"], "driver-42");
    assert_eq!(stored["latitude"], 40.7128);
    assert!(stored.get("lastUpdated").is_some());

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=40.7128&longitude=-74.006&radiusKm=1"
    );
    assert_eq!(status, 200);
    assert_eq!(ids(&json), vec!["driver-42"]);
}

#[actix_rt::test]
async fn newer_report_moves_the_driver() {
    let app = init_app!(common::app_state(Vec::new()));

    for (latitude, reported_at) in [
        (40.0, "2026-01-01T10:00:00Z"),
        (41.0, "2026-01-01T10:05:00Z"),
    ] {
        let request = actix_test::TestRequest::put()
            .uri("/api/v1/drivers/mover/location")
            .set_json(json!({
                "latitude": latitude,
                "longitude": -75.0,
                "reportedAt": reported_at,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let (_, json) = get_json!(app, "/api/v1/drivers/mover");
    assert_eq!(json["latitude"], 41.0);
}

#[actix_rt::test]
async fn stale_report_is_ignored() {
    let app = init_app!(common::app_state(Vec::new()));

    let fresh = actix_test::TestRequest::put()
        .uri("/api/v1/drivers/d1/location")
        .set_json(json!({
            "latitude": 40.0,
            "longitude": -75.0,
            "reportedAt": "2026-01-01T10:05:00Z",
        }))
        .to_request();
    actix_test::call_service(&app, fresh).await;

    let stale = actix_test::TestRequest::put()
        .uri("/api/v1/drivers/d1/location")
        .set_json(json!({
            "latitude": 10.0,
            "longitude": 10.0,
            "reportedAt": "2026-01-01T10:00:00Z",
        }))
        .to_request();
    let (status, json) = json_body(actix_test::call_service(&app, stale).await).await;

    assert_eq!(status, 200);
    assert_eq!(json["latitude"], 40.0);
    assert_eq!(json["lastUpdated"], "2026-01-01T10:05:00Z");
}

#[actix_rt::test]
async fn put_location_rejects_out_of_range_coordinates() {
    let app = init_app!(common::app_state(Vec::new()));

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/drivers/d1/location")
        .set_json(json!({ "latitude": 91.0, "longitude": 0.0 }))
        .to_request();
    let (status, json) = json_body(actix_test::call_service(&app, request).await).await;

    assert_eq!(status, 400);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "latitude must be between -90 and 90");
    assert_eq!(json["details"][0]["field"], "latitude");
}

#[actix_rt::test]
async fn put_location_rejects_malformed_body() {
    let app = init_app!(common::app_state(Vec::new()));

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/drivers/d1/location")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"latitude\": \"north\"}")
        .to_request();
    let (status, json) = json_body(actix_test::call_service(&app, request).await).await;

    assert_eq!(status, 400);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[actix_rt::test]
async fn put_location_rejects_overlong_driver_id() {
    let app = init_app!(common::app_state(Vec::new()));
    let uri = format!("/api/v1/drivers/{}/location", "x".repeat(65));

    let request = actix_test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "latitude": 0.0, "longitude": 0.0 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn get_driver_returns_last_known_position() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(app, "/api/v1/drivers/b");

    assert_eq!(status, 200);
    assert_eq!(json["id"], "b");
    assert_eq!(json["latitude"], 40.1);
    assert_eq!(json["longitude"], -75.0);
}

#[actix_rt::test]
async fn get_unknown_driver_is_not_found() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(app, "/api/v1/drivers/ghost");

    assert_eq!(status, 404);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "driver not found");
}

#[actix_rt::test]
async fn list_drivers_is_paginated_by_id() {
    let app = init_app!(common::app_state(vec![
        driver("c", 41.0, -75.0),
        driver("a", 40.0, -75.0),
        driver("b", 40.1, -75.0),
    ]));

    let (status, json) = get_json!(app, "/api/v1/drivers?page=2&limit=2");

    assert_eq!(status, 200);
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 2);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(ids(&json["items"]), vec!["c"]);
}

#[actix_rt::test]
async fn list_drivers_uses_default_page_size() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(app, "/api/v1/drivers");

    assert_eq!(status, 200);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 20);
    assert_eq!(ids(&json["items"]), vec!["a", "b", "c"]);
}

#[actix_rt::test]
async fn future_dated_report_does_not_pin_the_driver() {
    let app = init_app!(common::app_state(Vec::new()));

    let future = actix_test::TestRequest::put()
        .uri("/api/v1/drivers/d1/location")
        .set_json(json!({
            "latitude": 10.0,
            "longitude": 10.0,
            "reportedAt": "2126-01-01T00:00:00Z",
        }))
        .to_request();
    let (status, json) = json_body(actix_test::call_service(&app, future).await).await;
    assert_eq!(status, 400);
    assert_eq!(json["details"][0]["field"], "reportedAt");

    let current = actix_test::TestRequest::put()
        .uri("/api/v1/drivers/d1/location")
        .set_json(json!({ "latitude": 40.0, "longitude": -75.0 }))
        .to_request();
    actix_test::call_service(&app, current).await;

    let (_, json) = get_json!(app, "/api/v1/drivers/d1");
    assert_eq!(json["latitude"], 40.0);
}

#[actix_rt::test]
async fn nearby_cannot_be_used_as_a_driver_id() {
    let app = init_app!(common::app_state(Vec::new()));

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/drivers/nearby/location")
        .set_json(json!({ "latitude": 40.0, "longitude": -75.0 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
