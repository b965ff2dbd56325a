// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HTTP front end for `district_lookup`.
//!
//! Routes:
//!
//! - `GET /api/lookup?lat=<f64>&lng=<f64>[&debug=1]` answers
//!   `{"house": .., "senate": .., "sboe": ..}` for the configured layers, or a
//!   diagnostic payload when `debug` is `1` or `true`.
//! - `GET /healthz` answers `ok`.
//!
//! Lookups run on tokio's blocking pool, since the first request for a layer
//! reads and parses its boundary file.

pub mod api;
pub mod config;
mod cors;
mod error;
pub mod telemetry;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use api::{AppState, LookupParams, SharedLookup, router};
pub use config::{Config, LogFormat};
pub use error::ApiError;

/// The routes with CORS for `allowed_origins` and request tracing.
pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    let mut app = router(state);
    if let Some(cors) = cors::cors_layer(allowed_origins) {
        app = app.layer(cors);
    }
    app.layer(TraceLayer::new_for_http())
}
