// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler errors and their HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use district_lookup::LoadError;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

/// Errors a request handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `lat` or `lng` is missing or not a finite number.
    #[error("Provide numeric lat and lng query params, e.g. ?lat=32.7767&lng=-96.7970")]
    BadRequest,
    /// A boundary layer could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The blocking lookup task panicked or was cancelled.
    #[error("lookup task failed: {0}")]
    Task(#[from] JoinError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::BadRequest => (StatusCode::BAD_REQUEST, "Bad request"),
            Self::Load(_) | Self::Task(_) => {
                tracing::error!(error = %self, "lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        };
        let body = ErrorBody {
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
