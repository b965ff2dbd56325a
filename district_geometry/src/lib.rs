// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lon/lat geometry primitives for district boundary lookup.
//!
//! This crate provides the narrow-phase building blocks used by
//! `district_lookup`: an inclusive [`BoundingBox`] for cheap rejection, and
//! polygon shapes ([`Ring`], [`Polygon`], [`MultiPolygon`]) that answer
//! point-containment queries through the [`Containment`] trait.
//!
//! Coordinates are plain [`kurbo::Point`]s with `x` as longitude and `y` as
//! latitude, in degrees. No projection is applied: containment is evaluated
//! in the planar lon/lat space the boundary files are published in.
//!
//! # Containment rules
//!
//! - A ring contains a point when the non-zero winding number of the ring
//!   around the point is non-zero (see [`kurbo::Shape::contains`]). Ring
//!   orientation is therefore irrelevant, which matters for boundary files
//!   that do not follow the RFC 7946 right-hand rule.
//! - A polygon contains a point inside its exterior ring and outside all of
//!   its holes.
//! - A multi-polygon contains a point when any part does.
//!
//! Points exactly on an edge are not classified in any documented way; the
//! answer is deterministic for a given shape and point, which is all callers
//! rely on.
//!
//! # Example
//!
//! ```rust
//! use district_geometry::{Containment, Polygon, Ring};
//! use kurbo::Point;
//!
//! let exterior = Ring::new([
//!     Point::new(-97.0, 32.0),
//!     Point::new(-96.0, 32.0),
//!     Point::new(-96.0, 33.0),
//!     Point::new(-97.0, 33.0),
//!     Point::new(-97.0, 32.0),
//! ])
//! .unwrap();
//! let district = Polygon::new(exterior, Vec::new());
//!
//! assert!(district.contains_point(Point::new(-96.797, 32.7767)));
//! assert!(!district.contains_point(Point::new(0.0, 0.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bbox;
mod polygon;

use kurbo::Point;

pub use bbox::BoundingBox;
pub use polygon::{MultiPolygon, Polygon, Ring, RingError};

/// Point-containment test in lon/lat space.
///
/// Implementations should reject points outside [`Containment::bounds`]
/// before doing any per-edge work.
pub trait Containment {
    /// Bounding box of the shape, or `None` when the shape is empty.
    fn bounds(&self) -> Option<BoundingBox>;

    /// Whether `pt` (x = longitude, y = latitude) lies inside the shape.
    fn contains_point(&self, pt: Point) -> bool;
}
