use std::sync::Arc;

use ride_backend::infrastructure::repositories::InMemoryDriverLocationRepository;

use crate::common::{self, driver, scenario_drivers};
use crate::ids;

#[actix_rt::test]
async fn five_km_search_returns_only_the_driver_at_the_center() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=40.0&longitude=-75.0&radiusKm=5"
    );

    assert_eq!(status, 200);
    assert_eq!(ids(&json), vec!["a"]);
    assert_eq!(json[0]["distanceKm"], 0.0);
    assert_eq!(json[0]["latitude"], 40.0);
    assert_eq!(json[0]["longitude"], -75.0);
}

#[actix_rt::test]
async fn hundred_km_search_orders_matches_nearest_first() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=40.0&longitude=-75.0&radiusKm=100"
    );

    assert_eq!(status, 200);
    // c is ~111 km north, just past the maximum radius.
    assert_eq!(ids(&json), vec!["a", "b"]);
    assert_eq!(json[0]["distanceKm"], 0.0);
    let distance_b = json[1]["distanceKm"].as_f64().expect("distance");
    assert!((distance_b - 11.12).abs() < 0.01, "got {distance_b}");
}

#[actix_rt::test]
async fn missing_radius_defaults_to_five_km() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(app, "/api/v1/drivers/nearby?latitude=40.0&longitude=-75.0");

    assert_eq!(status, 200);
    assert_eq!(ids(&json), vec!["a"]);
}

#[actix_rt::test]
async fn snake_case_radius_is_accepted() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=40.0&longitude=-75.0&radius_km=20"
    );

    assert_eq!(status, 200);
    assert_eq!(ids(&json), vec!["a", "b"]);
}

#[actix_rt::test]
async fn radius_above_maximum_is_rejected() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=40.0&longitude=-75.0&radiusKm=150"
    );

    assert_eq!(status, 400);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "radiusKm must be at most 100");
    assert_eq!(json["details"][0]["field"], "radiusKm");
    assert_eq!(json["details"][0]["code"], "max");
}

#[actix_rt::test]
async fn radius_at_exclusive_minimum_is_rejected() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=40.0&longitude=-75.0&radiusKm=0.1"
    );

    assert_eq!(status, 400);
    assert_eq!(json["details"][0]["field"], "radiusKm");
    assert_eq!(json["details"][0]["code"], "min");
}

#[actix_rt::test]
async fn latitude_out_of_range_is_rejected() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=95&longitude=-75.0&radiusKm=5"
    );

    assert_eq!(status, 400);
    assert_eq!(json["details"][0]["field"], "latitude");
    assert_eq!(json["details"][0]["code"], "range");
}

#[actix_rt::test]
async fn longitude_out_of_range_is_rejected() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=40&longitude=-181&radiusKm=5"
    );

    assert_eq!(status, 400);
    assert_eq!(json["details"][0]["field"], "longitude");
}

#[actix_rt::test]
async fn non_numeric_coordinates_are_bad_requests() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, json) = get_json!(app, "/api/v1/drivers/nearby?latitude=north&longitude=-75");

    assert_eq!(status, 400);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[actix_rt::test]
async fn missing_coordinates_are_bad_requests() {
    let app = init_app!(common::app_state(scenario_drivers()));

    let (status, _) = get_json!(app, "/api/v1/drivers/nearby?radiusKm=5");

    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn empty_store_returns_empty_list() {
    let app = init_app!(common::app_state(Vec::new()));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=40.0&longitude=-75.0&radiusKm=100"
    );

    assert_eq!(status, 200);
    assert_eq!(json, serde_json::json!([]));
}

#[actix_rt::test]
async fn equal_distances_are_ordered_by_id() {
    let app = init_app!(common::app_state(vec![
        driver("zulu", 0.1, 0.0),
        driver("alpha", -0.1, 0.0),
        driver("mike", 0.0, 0.1),
    ]));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=0&longitude=0&radiusKm=50"
    );

    assert_eq!(status, 200);
    assert_eq!(ids(&json), vec!["alpha", "mike", "zulu"]);
}

#[actix_rt::test]
async fn search_across_antimeridian_finds_drivers_on_both_sides() {
    let app = init_app!(common::app_state(vec![
        driver("east", 0.0, 179.95),
        driver("west", 0.0, -179.95),
        driver("far", 0.0, 170.0),
    ]));

    let (status, json) = get_json!(
        app,
        "/api/v1/drivers/nearby?latitude=0&longitude=180&radiusKm=10"
    );

    assert_eq!(status, 200);
    let mut found = ids(&json);
    found.sort_unstable();
    assert_eq!(found, vec!["east", "west"]);
}

#[actix_rt::test]
async fn repeated_searches_return_identical_results() {
    let repo = Arc::new(InMemoryDriverLocationRepository::with_entities(
        scenario_drivers(),
    ));
    let app = init_app!(common::app_state_with_repo(repo));
    let uri = "/api/v1/drivers/nearby?latitude=40.05&longitude=-75.0&radiusKm=80";

    let (_, first) = get_json!(app, uri);
    let (_, second) = get_json!(app, uri);

    assert_eq!(first, second);
}
