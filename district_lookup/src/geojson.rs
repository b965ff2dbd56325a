// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GeoJSON `FeatureCollection` parsing into [`BoundaryLayer`]s.
//!
//! Only the parts of RFC 7946 that boundary files use are understood:
//! `Polygon` and `MultiPolygon` geometries, the `properties` bag, and an
//! optional collection-level `bbox`. Other geometry types are kept as
//! [`BoundaryGeometry::Unsupported`] so feature indices stay aligned with the
//! source.

use district_geometry::{BoundingBox, MultiPolygon, Polygon, Ring, RingError};
use kurbo::Point;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::chamber::Chamber;
use crate::error::LoadError;
use crate::layer::{Attributes, BoundaryFeature, BoundaryGeometry, BoundaryLayer};

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Option<Vec<RawFeature>>,
    #[serde(default)]
    bbox: Option<Value>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

type RawRing = Vec<Vec<f64>>;

impl BoundaryLayer {
    /// Parse a GeoJSON `FeatureCollection`.
    ///
    /// Entries whose `type` is not `Feature` are dropped. A malformed
    /// `Polygon`/`MultiPolygon` fails the whole layer, since a partially
    /// loaded layer would silently answer "no district" for some points.
    pub fn from_geojson(chamber: Chamber, bytes: &[u8]) -> Result<Self, LoadError> {
        let raw: RawCollection = serde_json::from_slice(bytes)
            .map_err(|source| LoadError::Json { chamber, source })?;
        if raw.kind != "FeatureCollection" {
            return Err(LoadError::NotFeatureCollection { chamber });
        }
        let Some(raw_features) = raw.features else {
            return Err(LoadError::NotFeatureCollection { chamber });
        };

        let mut features = Vec::with_capacity(raw_features.len());
        for (index, feature) in raw_features.into_iter().enumerate() {
            if feature.kind.as_deref() != Some("Feature") {
                tracing::trace!(%chamber, index, "skipping non-feature entry");
                continue;
            }
            let geometry = match feature.geometry {
                Some(geometry) => parse_geometry(geometry, chamber, index).map_err(|reason| LoadError::Geometry {
                    chamber,
                    feature: index,
                    reason,
                })?,
                None => BoundaryGeometry::Unsupported("null".to_owned()),
            };
            let attributes = feature.properties.map(Attributes::from).unwrap_or_default();
            features.push(BoundaryFeature::new(geometry, attributes));
        }

        let embedded = raw.bbox.as_ref().and_then(embedded_bbox);
        Ok(Self::new(chamber, features, embedded))
    }
}

fn embedded_bbox(value: &Value) -> Option<BoundingBox> {
    let values = value
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<_>>>()?;
    BoundingBox::from_geojson(&values)
}

fn parse_geometry(
    raw: RawGeometry,
    chamber: Chamber,
    feature: usize,
) -> Result<BoundaryGeometry, String> {
    match raw.kind.as_str() {
        "Polygon" => {
            let rings: Vec<RawRing> = serde_json::from_value(raw.coordinates)
                .map_err(|e| format!("Polygon coordinates: {e}"))?;
            Ok(BoundaryGeometry::Polygon(build_polygon(rings, chamber, feature)?))
        }
        "MultiPolygon" => {
            let parts: Vec<Vec<RawRing>> = serde_json::from_value(raw.coordinates)
                .map_err(|e| format!("MultiPolygon coordinates: {e}"))?;
            let parts = parts
                .into_iter()
                .enumerate()
                .map(|(i, rings)| {
                    build_polygon(rings, chamber, feature).map_err(|e| format!("part {i}: {e}"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BoundaryGeometry::MultiPolygon(MultiPolygon::new(parts)))
        }
        other => Ok(BoundaryGeometry::Unsupported(other.to_owned())),
    }
}

/// Holes too small to enclose anything are dropped; a degenerate exterior
/// is an error.
fn build_polygon(rings: Vec<RawRing>, chamber: Chamber, feature: usize) -> Result<Polygon, String> {
    let mut rings = rings.into_iter();
    let exterior = rings.next().ok_or_else(|| "polygon has no rings".to_owned())?;
    let exterior = Ring::new(positions(exterior).map_err(|e| format!("ring 0: {e}"))?)
        .map_err(|e| format!("ring 0: {e}"))?;

    let mut holes = Vec::new();
    for (i, ring) in rings.enumerate().map(|(i, r)| (i + 1, r)) {
        let points = positions(ring).map_err(|e| format!("ring {i}: {e}"))?;
        match Ring::new(points) {
            Ok(hole) => holes.push(hole),
            Err(RingError::TooFewPositions(n)) => {
                tracing::warn!(%chamber, feature, ring = i, positions = n, "dropping degenerate hole");
            }
            Err(e) => return Err(format!("ring {i}: {e}")),
        }
    }
    Ok(Polygon::new(exterior, holes))
}

fn positions(ring: RawRing) -> Result<Vec<Point>, String> {
    ring.into_iter()
        .map(|pos| match pos.as_slice() {
            [lon, lat, ..] => Ok(Point::new(*lon, *lat)),
            _ => Err(format!("position has {} coordinates, expected at least 2", pos.len())),
        })
        .collect()
}
