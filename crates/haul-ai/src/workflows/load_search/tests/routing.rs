use super::common::*;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use crate::workflows::load_search::router::{
    configuration_handler, load_board_router, search_handler,
};

#[tokio::test]
async fn search_route_applies_configuration_and_overrides() {
    let (service, _) = build_service();
    let router = load_board_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/loads?configuration=premium-confirmed&maxDistance=300")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let loads = payload["loads"].as_array().expect("loads array");
    assert_eq!(payload["total"].as_u64(), Some(loads.len() as u64));
    assert!(!loads.is_empty());
    assert!(loads
        .iter()
        .all(|load| load["distanceNum"].as_f64().expect("distance") <= 300.0));
    assert_eq!(payload["appliedConfiguration"]["id"], PREMIUM_PRESET_ID);
    assert_eq!(payload["filters"]["maxDistance"], 300.0);
    assert_eq!(payload["filters"]["confirmedOnly"], true);
    assert!(payload.get("profitability").is_none());
}

#[tokio::test]
async fn search_route_echoes_open_ended_distance_as_null() {
    let (service, _) = build_service();
    let router = load_board_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/loads?maxDistance=1000%2B&origin=dallas")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 50);
    assert!(payload["filters"]["maxDistance"].is_null());
    assert!(payload["appliedConfiguration"].is_null());
}

#[tokio::test]
async fn unknown_configuration_returns_not_found() {
    let (service, _) = build_service();
    let router = load_board_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/loads?configuration=ghost-routes")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "configuration 'ghost-routes' not found");
}

#[tokio::test]
async fn cost_model_round_trip_feeds_ranked_search() {
    let (service, cost_models) = build_service();
    let router = load_board_router(Arc::new(service));

    let settings = json!({
        "mpg": 6.0,
        "fuelPrice": 4.2,
        "simpleMaintenance": { "dollars": 1500.0, "miles": 10000.0 },
        "simpleFixedMonthly": 4330.0,
        "marginCents": 10.0
    });
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/drivers/driver-7/cost-model")
                .header("content-type", "application/json")
                .body(Body::from(settings.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let summary = read_json_body(response).await;
    assert!((summary["rcpm"].as_f64().expect("rcpm") - 0.85).abs() < 1e-9);
    assert_eq!(summary["mode"], "simple");
    assert!(cost_models
        .records
        .lock()
        .expect("lock")
        .contains_key(&driver()));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/drivers/driver-7/cost-model/summary")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let summary = read_json_body(response).await;
    assert_eq!(summary["fixedCosts"]["monthly"], 4330.0);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/loads?configuration=premium-confirmed&driverId=driver-7")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let ranked = payload["profitability"]["ranked"]
        .as_array()
        .expect("ranked loads");
    assert_eq!(ranked.len() as u64, payload["total"].as_u64().expect("total"));
    assert_eq!(
        payload["profitability"]["portfolio"]["contributes"].as_u64(),
        Some(ranked.len() as u64)
    );
}

#[tokio::test]
async fn missing_cost_model_returns_not_found() {
    let (service, _) = build_service();
    let router = load_board_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/drivers/nobody/cost-model")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn configuration_listing_filters_by_keyword() {
    let (service, _) = build_service();
    let router = load_board_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/configurations?q=premium")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["configurations"][0]["id"], PREMIUM_PRESET_ID);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/configurations?q=flatbed")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 0);
}

#[tokio::test]
async fn configuration_handler_resolves_names() {
    let (service, _) = build_service();

    let response = configuration_handler(
        State(Arc::new(service)),
        Path("premium confirmed".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], PREMIUM_PRESET_ID);
    assert_eq!(payload["filters"]["serviceExclusions"], json!(["hazmat"]));
}

#[tokio::test]
async fn repeated_query_keys_become_lists() {
    let (service, _) = build_service();
    let handler_service = Arc::new(service);

    let response = search_handler(
        State(handler_service),
        Query(vec![
            ("loadType".to_string(), "Reefer".to_string()),
            ("loadType".to_string(), "Flatbed".to_string()),
            ("customer".to_string(), String::new()),
        ]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["filters"]["loadType"], json!(["Reefer", "Flatbed"]));
    assert_eq!(payload["filters"]["customer"], json!([]));
    assert_eq!(payload["total"], 34);
}
