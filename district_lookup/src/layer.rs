// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory boundary layers.

use core::fmt;

use district_geometry::{BoundingBox, Containment, MultiPolygon, Polygon};
use serde_json::{Map, Value};

use crate::chamber::Chamber;

/// Free-form attribute bag of a boundary feature.
///
/// Keys keep the order they had in the source file; the key heuristic of the
/// attribute resolver scans them in that order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    /// An empty attribute bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key` (exact, case-sensitive match).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate `(key, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Geometry of one boundary feature.
#[derive(Clone, Debug)]
pub enum BoundaryGeometry {
    /// A single polygon, possibly with holes.
    Polygon(Polygon),
    /// Several polygons forming one district.
    MultiPolygon(MultiPolygon),
    /// Anything else (points, lines, collections, or a `null` geometry).
    ///
    /// Kept so feature indices match the source file; never matched.
    Unsupported(String),
}

impl BoundaryGeometry {
    /// GeoJSON type name (`"null"` for a missing geometry).
    pub fn kind(&self) -> &str {
        match self {
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::Unsupported(kind) => kind,
        }
    }

    /// The shape as a containment test, or `None` for unsupported geometry.
    pub fn shape(&self) -> Option<&dyn Containment> {
        match self {
            Self::Polygon(p) => Some(p),
            Self::MultiPolygon(m) => Some(m),
            Self::Unsupported(_) => None,
        }
    }
}

/// One labeled polygon of a layer.
#[derive(Clone, Debug)]
pub struct BoundaryFeature {
    /// The feature's geometry.
    pub geometry: BoundaryGeometry,
    /// The feature's properties.
    pub attributes: Attributes,
}

impl BoundaryFeature {
    /// Create a feature.
    pub fn new(geometry: BoundaryGeometry, attributes: Attributes) -> Self {
        Self {
            geometry,
            attributes,
        }
    }

    /// Whether the geometry is a polygon or multi-polygon.
    pub fn is_polygonal(&self) -> bool {
        self.geometry.shape().is_some()
    }
}

/// An immutable, ordered collection of district polygons for one chamber.
///
/// Feature order is the source order and decides ties between overlapping
/// polygons.
pub struct BoundaryLayer {
    chamber: Chamber,
    features: Vec<BoundaryFeature>,
    bbox: Option<BoundingBox>,
}

impl BoundaryLayer {
    /// Build a layer.
    ///
    /// When `bbox` is `None` it is computed from the polygonal features; a
    /// layer with no polygonal features has no bounding box.
    pub fn new(chamber: Chamber, features: Vec<BoundaryFeature>, bbox: Option<BoundingBox>) -> Self {
        let bbox = bbox.or_else(|| {
            features
                .iter()
                .filter_map(|f| f.geometry.shape()?.bounds())
                .reduce(|a, b| a.union(b))
        });
        Self {
            chamber,
            features,
            bbox,
        }
    }

    /// The chamber this layer describes.
    pub fn chamber(&self) -> Chamber {
        self.chamber
    }

    /// All features in source order.
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// Layer-wide bounding box used for the prefilter.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    /// Number of polygonal features.
    pub fn polygon_count(&self) -> usize {
        self.features.iter().filter(|f| f.is_polygonal()).count()
    }
}

impl fmt::Debug for BoundaryLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryLayer")
            .field("chamber", &self.chamber)
            .field("features", &self.features.len())
            .field("polygons", &self.polygon_count())
            .field("bbox", &self.bbox)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use district_geometry::Ring;
    use kurbo::Point;
    use serde_json::json;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> BoundaryGeometry {
        let ring = Ring::new([
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
        .expect("valid ring");
        BoundaryGeometry::Polygon(Polygon::new(ring, Vec::new()))
    }

    #[test]
    fn bbox_is_computed_from_polygons_only() {
        let layer = BoundaryLayer::new(
            Chamber::House,
            vec![
                BoundaryFeature::new(square(0.0, 0.0, 1.0, 1.0), Attributes::new()),
                BoundaryFeature::new(BoundaryGeometry::Unsupported("Point".into()), Attributes::new()),
                BoundaryFeature::new(square(2.0, -1.0, 3.0, 0.5), Attributes::new()),
            ],
            None,
        );
        assert_eq!(layer.bbox(), Some(BoundingBox::new(0.0, -1.0, 3.0, 1.0)));
        assert_eq!(layer.features().len(), 3);
        assert_eq!(layer.polygon_count(), 2);
    }

    #[test]
    fn embedded_bbox_wins() {
        let embedded = BoundingBox::new(-10.0, -10.0, 10.0, 10.0);
        let layer = BoundaryLayer::new(
            Chamber::Senate,
            vec![BoundaryFeature::new(square(0.0, 0.0, 1.0, 1.0), Attributes::new())],
            Some(embedded),
        );
        assert_eq!(layer.bbox(), Some(embedded));
    }

    #[test]
    fn empty_layer_has_no_bbox() {
        let layer = BoundaryLayer::new(Chamber::Sboe, Vec::new(), None);
        assert_eq!(layer.bbox(), None);
    }

    #[test]
    fn attributes_keep_source_order() {
        let attrs: Attributes = [("Zeta", json!(1)), ("alpha", json!("x")), ("Mid", json!(null))]
            .into_iter()
            .collect();
        assert_eq!(attrs.keys().collect::<Vec<_>>(), ["Zeta", "alpha", "Mid"]);
        assert_eq!(attrs.get("alpha"), Some(&json!("x")));
        assert_eq!(attrs.len(), 3);
    }
}
