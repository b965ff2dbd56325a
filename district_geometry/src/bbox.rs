// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned lon/lat bounding boxes.

use kurbo::{Point, Rect};

/// Axis-aligned bounding box in longitude/latitude degrees.
///
/// Edges are inclusive: a point lying exactly on an edge is contained.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Western edge (minimum longitude).
    pub min_lon: f64,
    /// Southern edge (minimum latitude).
    pub min_lat: f64,
    /// Eastern edge (maximum longitude).
    pub max_lon: f64,
    /// Northern edge (maximum latitude).
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new box from its corners.
    #[inline(always)]
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Build a box from a GeoJSON `bbox` member.
    ///
    /// Accepts the 2D form `[west, south, east, north]` and the 3D form
    /// `[west, south, low, east, north, high]` (elevation is dropped).
    /// Returns `None` for any other length or for non-finite values.
    pub fn from_geojson(values: &[f64]) -> Option<Self> {
        let bbox = match *values {
            [w, s, e, n] => Self::new(w, s, e, n),
            [w, s, _, e, n, _] => Self::new(w, s, e, n),
            _ => return None,
        };
        bbox.is_finite().then_some(bbox)
    }

    /// The smallest box enclosing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first.x, first.y, first.x, first.y);
        for pt in iter {
            bbox.min_lon = bbox.min_lon.min(pt.x);
            bbox.min_lat = bbox.min_lat.min(pt.y);
            bbox.max_lon = bbox.max_lon.max(pt.x);
            bbox.max_lat = bbox.max_lat.max(pt.y);
        }
        Some(bbox)
    }

    /// Whether the point (x = longitude, y = latitude) lies inside or on the box.
    #[inline]
    pub fn contains(&self, pt: Point) -> bool {
        self.min_lon <= pt.x && self.min_lat <= pt.y && pt.x <= self.max_lon && pt.y <= self.max_lat
    }

    /// The smallest box enclosing both boxes.
    #[inline]
    pub fn union(&self, other: Self) -> Self {
        Self {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// The box as a GeoJSON-ordered array `[min_lon, min_lat, max_lon, max_lat]`.
    #[inline]
    pub const fn to_array(self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    fn is_finite(&self) -> bool {
        self.min_lon.is_finite()
            && self.min_lat.is_finite()
            && self.max_lon.is_finite()
            && self.max_lat.is_finite()
    }
}

impl From<Rect> for BoundingBox {
    fn from(r: Rect) -> Self {
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;
    use kurbo::Point;

    #[test]
    fn edges_are_inclusive() {
        let bbox = BoundingBox::new(-106.6, 25.8, -93.5, 36.5);
        assert!(bbox.contains(Point::new(-96.797, 32.7767)));
        assert!(bbox.contains(Point::new(-106.6, 25.8)));
        assert!(bbox.contains(Point::new(-93.5, 36.5)));
        assert!(!bbox.contains(Point::new(0.0, 0.0)));
        assert!(!bbox.contains(Point::new(-93.49, 30.0)));
    }

    #[test]
    fn geojson_forms() {
        assert_eq!(
            BoundingBox::from_geojson(&[1.0, 2.0, 3.0, 4.0]),
            Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(
            BoundingBox::from_geojson(&[1.0, 2.0, -5.0, 3.0, 4.0, 100.0]),
            Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(BoundingBox::from_geojson(&[1.0, 2.0, 3.0]), None);
        assert_eq!(BoundingBox::from_geojson(&[f64::NAN, 2.0, 3.0, 4.0]), None);
    }

    #[test]
    fn from_points_and_union() {
        assert_eq!(BoundingBox::from_points(core::iter::empty()), None);
        let a = BoundingBox::from_points([
            Point::new(2.0, -1.0),
            Point::new(-3.0, 5.0),
            Point::new(0.0, 0.0),
        ])
        .expect("non-empty");
        assert_eq!(a, BoundingBox::new(-3.0, -1.0, 2.0, 5.0));

        let b = BoundingBox::new(1.0, 1.0, 10.0, 2.0);
        assert_eq!(a.union(b), BoundingBox::new(-3.0, -1.0, 10.0, 5.0));
        assert_eq!(a.union(b).to_array(), [-3.0, -1.0, 10.0, 5.0]);
    }
}
