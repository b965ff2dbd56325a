// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point location within a single layer.

use kurbo::Point;

use crate::layer::{BoundaryFeature, BoundaryLayer};
use crate::point::QueryPoint;

/// Where a point landed in a layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// Rejected by the layer bounding box; no polygon was tested.
    OutsideBounds,
    /// Every polygon was tested and none contains the point.
    Miss {
        /// Number of polygonal features tested.
        scanned: usize,
    },
    /// The feature at `index` is the first, in source order, containing the point.
    Hit {
        /// Index into [`BoundaryLayer::features`].
        index: usize,
        /// Number of polygonal features tested, including the hit.
        scanned: usize,
    },
}

impl Location {
    /// Index of the matched feature, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Hit { index, .. } => Some(index),
            Self::OutsideBounds | Self::Miss { .. } => None,
        }
    }
}

/// The first feature of `layer` containing `point`, or `None`.
///
/// See [`locate_detailed`] for the algorithm.
pub fn locate(layer: &BoundaryLayer, point: QueryPoint) -> Option<&BoundaryFeature> {
    locate_detailed(layer, point)
        .index()
        .map(|i| &layer.features()[i])
}

/// Locate `point` in `layer`, reporting how the answer was reached.
///
/// 1. If the layer has a bounding box and the point is outside it, the
///    answer is [`Location::OutsideBounds`] without testing any polygon. A
///    layer without a bounding box cannot reject anything.
/// 2. Otherwise features are tested in source order, skipping non-polygonal
///    geometry, and the first one containing the point wins. Overlaps are
///    resolved by that order only.
pub fn locate_detailed(layer: &BoundaryLayer, point: QueryPoint) -> Location {
    let pt = Point::from(point);
    if let Some(bbox) = layer.bbox()
        && !bbox.contains(pt)
    {
        tracing::trace!(chamber = %layer.chamber(), ?point, "outside layer bounds");
        return Location::OutsideBounds;
    }

    let mut scanned = 0;
    for (index, feature) in layer.features().iter().enumerate() {
        let Some(shape) = feature.geometry.shape() else {
            continue;
        };
        scanned += 1;
        if shape.contains_point(pt) {
            tracing::trace!(chamber = %layer.chamber(), index, scanned, "point located");
            return Location::Hit { index, scanned };
        }
    }
    Location::Miss { scanned }
}
