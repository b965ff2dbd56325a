// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HTTP routes.

use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use district_lookup::{BoundarySource, DistrictLookup, DistrictResult, QueryPoint, Resolution};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::ApiError;

/// The lookup engine shared by all handlers.
pub type SharedLookup = DistrictLookup<Arc<dyn BoundarySource>>;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    lookup: Arc<SharedLookup>,
}

impl AppState {
    /// Wrap a lookup engine.
    pub fn new(lookup: Arc<SharedLookup>) -> Self {
        Self { lookup }
    }

    /// The lookup engine.
    pub fn lookup(&self) -> &Arc<SharedLookup> {
        &self.lookup
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("chambers", &self.lookup.chambers())
            .finish_non_exhaustive()
    }
}

/// Routes without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/lookup", get(lookup))
        .route("/healthz", get(health))
        .with_state(state)
}

/// Raw query parameters; validated by [`LookupParams::point`].
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    lat: Option<String>,
    lng: Option<String>,
    debug: Option<String>,
}

impl LookupParams {
    /// The query point, if both coordinates are present and finite.
    pub fn point(&self) -> Option<QueryPoint> {
        let lat = parse_coordinate(self.lat.as_deref()?)?;
        let lng = parse_coordinate(self.lng.as_deref()?)?;
        Some(QueryPoint::from_lat_lng(lat, lng))
    }

    /// Whether the diagnostic payload was requested (`debug=1` or `debug=true`).
    pub fn debug(&self) -> bool {
        matches!(self.debug.as_deref(), Some("1" | "true"))
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

async fn health() -> &'static str {
    "ok"
}

#[tracing::instrument(skip_all)]
async fn lookup(
    State(state): State<AppState>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| {
        tracing::debug!(error = %e, "rejected query string");
        ApiError::BadRequest
    })?;
    let point = params.point().ok_or(ApiError::BadRequest)?;
    let lookup = Arc::clone(&state.lookup);

    if params.debug() {
        let resolution = tokio::task::spawn_blocking(move || lookup.resolve_detailed(point)).await??;
        Ok(Json(DebugPayload::new(&resolution)).into_response())
    } else {
        let result: DistrictResult =
            tokio::task::spawn_blocking(move || lookup.resolve(point)).await??;
        Ok(Json(result).into_response())
    }
}

#[derive(Serialize)]
struct Input {
    lat: f64,
    lng: f64,
}

/// Diagnostic response for `debug=1`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugPayload {
    ok: bool,
    input: Input,
    bbox: Map<String, Value>,
    bbox_check: Map<String, Value>,
    sample_props_keys: Map<String, Value>,
    matched_props_keys: Map<String, Value>,
    outcome: Map<String, Value>,
    result: DistrictResult,
}

impl DebugPayload {
    fn new(resolution: &Resolution) -> Self {
        let mut payload = Self {
            ok: true,
            input: Input {
                lat: resolution.point.lat,
                lng: resolution.point.lon,
            },
            bbox: Map::new(),
            bbox_check: Map::new(),
            sample_props_keys: Map::new(),
            matched_props_keys: Map::new(),
            outcome: Map::new(),
            result: resolution.result(),
        };
        for report in &resolution.layers {
            let name = report.chamber.as_str();
            payload
                .bbox
                .insert(name.into(), json!(report.bbox.map(|b| b.to_array())));
            payload
                .bbox_check
                .insert(format!("{name}InBox"), json!(report.in_bbox));
            payload
                .sample_props_keys
                .insert(name.into(), json!(report.sample_keys));
            payload
                .matched_props_keys
                .insert(name.into(), json!(report.matched_keys));
            payload
                .outcome
                .insert(name.into(), json!(report.outcome.label()));
        }
        payload
    }
}
