// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-origin policy for the lookup API.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// CORS for the configured origins, or `None` when there are none.
///
/// `*` anywhere in the list allows every origin. Origins that are not valid
/// header values are skipped with a warning.
pub(crate) fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<&str> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect();
    if origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);
    if origins.contains(&"*") {
        return Some(layer.allow_origin(Any));
    }

    let allowed: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(origin, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    Some(layer.allow_origin(AllowOrigin::list(allowed)))
}
