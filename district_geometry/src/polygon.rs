// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rings, polygons with holes, and multi-polygons.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{BezPath, Point, Shape};

use crate::Containment;
use crate::bbox::BoundingBox;

/// Reasons a ring cannot be built from a list of positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingError {
    /// Fewer than three positions once the closing position is dropped.
    TooFewPositions(usize),
    /// A position had a NaN or infinite coordinate.
    NonFinite,
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPositions(n) => {
                write!(f, "ring needs at least 3 distinct positions, got {n}")
            }
            Self::NonFinite => f.write_str("ring contains a non-finite coordinate"),
        }
    }
}

impl core::error::Error for RingError {}

/// A closed linear ring.
///
/// The closing position may be given explicitly (as GeoJSON does) or left
/// implicit. Containment uses the non-zero winding rule, so clockwise and
/// counter-clockwise rings answer the same way.
#[derive(Clone, Debug)]
pub struct Ring {
    path: BezPath,
    bounds: BoundingBox,
    vertices: usize,
}

impl Ring {
    /// Build a ring from `(lon, lat)` positions.
    pub fn new<I: IntoIterator<Item = Point>>(positions: I) -> Result<Self, RingError> {
        let mut points: Vec<Point> = positions.into_iter().collect();
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(RingError::NonFinite);
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(RingError::TooFewPositions(points.len()));
        }

        let mut path = BezPath::new();
        path.move_to(points[0]);
        for &pt in &points[1..] {
            path.line_to(pt);
        }
        path.close_path();

        let bounds = BoundingBox::from(path.bounding_box());
        Ok(Self {
            path,
            bounds,
            vertices: points.len(),
        })
    }

    /// Number of distinct vertices (closing position excluded).
    pub fn vertex_count(&self) -> usize {
        self.vertices
    }
}

impl Containment for Ring {
    fn bounds(&self) -> Option<BoundingBox> {
        Some(self.bounds)
    }

    fn contains_point(&self, pt: Point) -> bool {
        self.bounds.contains(pt) && self.path.contains(pt)
    }
}

/// A polygon: one exterior ring and zero or more holes.
#[derive(Clone, Debug)]
pub struct Polygon {
    /// Outer boundary.
    pub exterior: Ring,
    /// Interior rings cut out of the exterior.
    pub holes: Vec<Ring>,
}

impl Polygon {
    /// Create a polygon from its exterior and holes.
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Iterate every ring, exterior first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        core::iter::once(&self.exterior).chain(self.holes.iter())
    }
}

impl Containment for Polygon {
    fn bounds(&self) -> Option<BoundingBox> {
        self.exterior.bounds()
    }

    fn contains_point(&self, pt: Point) -> bool {
        self.exterior.contains_point(pt) && !self.holes.iter().any(|h| h.contains_point(pt))
    }
}

/// A set of polygons treated as one shape.
#[derive(Clone, Debug, Default)]
pub struct MultiPolygon {
    /// The member polygons.
    pub parts: Vec<Polygon>,
}

impl MultiPolygon {
    /// Create a multi-polygon from its parts.
    pub fn new(parts: Vec<Polygon>) -> Self {
        Self { parts }
    }
}

impl Containment for MultiPolygon {
    /// Union of the parts' bounds; `None` when there are no parts.
    fn bounds(&self) -> Option<BoundingBox> {
        self.parts
            .iter()
            .filter_map(Containment::bounds)
            .reduce(|a, b| a.union(b))
    }

    fn contains_point(&self, pt: Point) -> bool {
        self.parts.iter().any(|p| p.contains_point(pt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::new([
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
            Point::new(x0, y0),
        ])
        .expect("valid square")
    }

    #[test]
    fn ring_drops_closing_position() {
        let ring = square(0.0, 0.0, 1.0, 1.0);
        assert_eq!(ring.vertex_count(), 4);
        assert_eq!(ring.bounds(), Some(BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn ring_rejects_degenerate_input() {
        let two = Ring::new([Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 0.0)]);
        assert_eq!(two.unwrap_err(), RingError::TooFewPositions(2));

        let nan = Ring::new([
            Point::new(0.0, 0.0),
            Point::new(f64::NAN, 1.0),
            Point::new(1.0, 0.0),
        ]);
        assert_eq!(nan.unwrap_err(), RingError::NonFinite);
    }

    #[test]
    fn orientation_does_not_matter() {
        let ccw = square(0.0, 0.0, 2.0, 2.0);
        let cw = Ring::new([
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
        ])
        .expect("valid square");
        let inside = Point::new(1.0, 1.0);
        assert!(ccw.contains_point(inside));
        assert!(cw.contains_point(inside));
        assert!(!cw.contains_point(Point::new(3.0, 1.0)));
    }

    #[test]
    fn concave_ring() {
        // A "U" shape: the notch between the arms is outside.
        let u = Ring::new([
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(2.0, 3.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 3.0),
            Point::new(0.0, 3.0),
        ])
        .expect("valid ring");
        assert!(u.contains_point(Point::new(0.5, 2.5)));
        assert!(u.contains_point(Point::new(2.5, 2.5)));
        assert!(!u.contains_point(Point::new(1.5, 2.0)));
    }

    #[test]
    fn holes_are_excluded() {
        let poly = Polygon::new(square(0.0, 0.0, 10.0, 10.0), vec![square(4.0, 4.0, 6.0, 6.0)]);
        assert!(poly.contains_point(Point::new(1.0, 1.0)));
        assert!(!poly.contains_point(Point::new(5.0, 5.0)));
        assert!(!poly.contains_point(Point::new(11.0, 5.0)));
        assert_eq!(poly.rings().count(), 2);
    }

    #[test]
    fn multipolygon_any_part() {
        let multi = MultiPolygon::new(vec![
            Polygon::new(square(0.0, 0.0, 1.0, 1.0), vec![]),
            Polygon::new(square(5.0, 5.0, 6.0, 6.0), vec![]),
        ]);
        assert!(multi.contains_point(Point::new(0.5, 0.5)));
        assert!(multi.contains_point(Point::new(5.5, 5.5)));
        assert!(!multi.contains_point(Point::new(3.0, 3.0)));
        assert_eq!(multi.bounds(), Some(BoundingBox::new(0.0, 0.0, 6.0, 6.0)));
        assert_eq!(MultiPolygon::default().bounds(), None);
        assert!(!MultiPolygon::default().contains_point(Point::new(0.0, 0.0)));
    }
}
