// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query coordinates.

use kurbo::Point;
use serde::Serialize;

/// A WGS84 coordinate to resolve.
///
/// Both components are assumed finite; validation belongs to whoever builds
/// the point from user input.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct QueryPoint {
    /// Longitude in degrees (east positive).
    pub lon: f64,
    /// Latitude in degrees (north positive).
    pub lat: f64,
}

impl QueryPoint {
    /// Create a point from longitude and latitude.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Create a point from the `lat`/`lng` pair web clients send.
    pub const fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self { lon: lng, lat }
    }
}

impl From<QueryPoint> for Point {
    fn from(p: QueryPoint) -> Self {
        Self::new(p.lon, p.lat)
    }
}
