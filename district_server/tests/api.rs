// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router tests against the fixture boundary layers.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use district_lookup::{BoundarySource, Chamber, DistrictLookup, FailurePolicy, StaticSource};
use district_server::{AppState, app};
use serde_json::{Value, json};
use tower::ServiceExt;

const HOUSE: &[u8] = include_bytes!("../../district_lookup/tests/fixtures/house.geojson");
const SENATE: &[u8] = include_bytes!("../../district_lookup/tests/fixtures/senate.geojson");
const SBOE: &[u8] = include_bytes!("../../district_lookup/tests/fixtures/sboe.geojson");

const DALLAS: &str = "/api/lookup?lat=32.7767&lng=-96.7970";

fn legislative() -> StaticSource {
    StaticSource::new()
        .with_layer(Chamber::House, HOUSE)
        .with_layer(Chamber::Senate, SENATE)
}

fn state(source: StaticSource, failure_policy: FailurePolicy) -> AppState {
    let source: Arc<dyn BoundarySource> = Arc::new(source);
    AppState::new(Arc::new(
        DistrictLookup::new(source).with_failure_policy(failure_policy),
    ))
}

fn server(source: StaticSource) -> Router {
    app(state(source, FailurePolicy::FailRequest), &[])
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn lookup_returns_configured_layers() {
    let (status, body) = get(server(legislative()), DALLAS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "house": 108, "senate": 16 }));

    let (status, body) = get(server(legislative().with_layer(Chamber::Sboe, SBOE)), DALLAS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "house": 108, "senate": 16, "sboe": 12 }));
}

#[tokio::test]
async fn points_outside_every_layer_are_null() {
    let (status, body) = get(server(legislative()), "/api/lookup?lat=0&lng=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "house": null, "senate": null }));
}

#[tokio::test]
async fn coordinates_are_trimmed() {
    let (status, body) = get(server(legislative()), "/api/lookup?lat=%2032.7767%20&lng=-96.7970").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["house"], json!(108));
}

#[tokio::test]
async fn bad_coordinates_are_rejected() {
    let expected = json!({
        "error": "Bad request",
        "message": "Provide numeric lat and lng query params, e.g. ?lat=32.7767&lng=-96.7970",
    });
    for uri in [
        "/api/lookup",
        "/api/lookup?lat=32.7767",
        "/api/lookup?lat=abc&lng=-96.7970",
        "/api/lookup?lat=32.7767&lng=",
        "/api/lookup?lat=NaN&lng=-96.7970",
        "/api/lookup?lat=32.7767&lng=inf",
        "/api/lookup?lat=32.7767abc&lng=-96.7970",
    ] {
        let (status, body) = get(server(legislative()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, expected, "{uri}");
    }
}

#[tokio::test]
async fn debug_payload() {
    let (status, body) = get(server(legislative()), &format!("{DALLAS}&debug=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["input"], json!({ "lat": 32.7767, "lng": -96.797 }));
    assert_eq!(body["bbox"]["senate"], json!([-97.0, 32.6, -96.2, 33.0]));
    assert_eq!(body["bbox"]["house"], json!([-96.95, 32.6, -96.75, 32.92]));
    assert_eq!(body["bboxCheck"], json!({ "houseInBox": true, "senateInBox": true }));
    assert_eq!(
        body["samplePropsKeys"]["house"],
        json!(["OBJECTID", "STATEFP", "SLDLST", "GEOID", "NAMELSAD"])
    );
    assert_eq!(
        body["matchedPropsKeys"]["senate"],
        json!(["OBJECTID", "DIST_NBR", "REP_NM"])
    );
    assert_eq!(body["outcome"], json!({ "house": "matched", "senate": "matched" }));
    assert_eq!(body["result"], json!({ "house": 108, "senate": 16 }));

    let (_, body) = get(server(legislative()), "/api/lookup?lat=0&lng=0&debug=true").await;
    assert_eq!(body["bboxCheck"], json!({ "houseInBox": false, "senateInBox": false }));
    assert_eq!(body["outcome"]["house"], json!("outside_bounds"));
    assert_eq!(body["matchedPropsKeys"]["house"], json!([]));
}

#[tokio::test]
async fn debug_other_values_return_plain_result() {
    let (_, body) = get(server(legislative()), &format!("{DALLAS}&debug=yes")).await;
    assert_eq!(body, json!({ "house": 108, "senate": 16 }));
}

#[tokio::test]
async fn load_failure_is_a_server_error() {
    let broken = legislative().with_layer(Chamber::Sboe, &b"{\"type\":\"Topology\"}"[..]);
    let (status, body) = get(server(broken), DALLAS).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Server error"));
    assert_eq!(
        body["message"],
        json!("sboe boundaries are not a GeoJSON FeatureCollection")
    );
}

#[tokio::test]
async fn partial_results_tolerate_load_failure() {
    let broken = legislative().with_layer(Chamber::Sboe, &b"not json"[..]);
    let app = app(state(broken, FailurePolicy::Partial), &[]);
    let (status, body) = get(app.clone(), DALLAS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "house": 108, "senate": 16, "sboe": null }));

    let (_, body) = get(app, &format!("{DALLAS}&debug=1")).await;
    assert_eq!(body["outcome"]["sboe"], json!("load_failed"));
    assert_eq!(body["bbox"]["sboe"], Value::Null);
}

#[tokio::test]
async fn only_get_is_routed() {
    let request = Request::post(DALLAS).body(Body::empty()).unwrap();
    let (status, _) = send(server(legislative()), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health() {
    let response = server(StaticSource::new())
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn cors_headers_follow_the_allow_list() {
    let origins = vec!["https://districts.example".to_owned()];
    let allowed = app(state(legislative(), FailurePolicy::FailRequest), &origins);

    let request = Request::get(DALLAS)
        .header(header::ORIGIN, "https://districts.example")
        .body(Body::empty())
        .unwrap();
    let response = allowed.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://districts.example"
    );

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/lookup")
        .header(header::ORIGIN, "https://districts.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = allowed.clone().oneshot(preflight).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));

    let request = Request::get(DALLAS)
        .header(header::ORIGIN, "https://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = allowed.oneshot(request).await.unwrap();
    assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let request = Request::get(DALLAS)
        .header(header::ORIGIN, "https://districts.example")
        .body(Body::empty())
        .unwrap();
    let response = server(legislative()).oneshot(request).await.unwrap();
    assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn wildcard_origin_allows_any() {
    let origins = vec!["*".to_owned()];
    let request = Request::get(DALLAS)
        .header(header::ORIGIN, "https://anywhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app(state(legislative(), FailurePolicy::FailRequest), &origins)
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
