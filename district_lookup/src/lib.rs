// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolve a lon/lat point to the districts that contain it.
//!
//! The engine answers one question: given a [`QueryPoint`], which state house,
//! state senate, and state board of education district is it in? Each
//! chamber has its own boundary layer, a GeoJSON `FeatureCollection` of
//! district polygons whose attributes carry the district identifier under a
//! provider-specific key.
//!
//! # Pieces
//!
//! - [`BoundarySource`] supplies raw layer bytes ([`FileSource`],
//!   [`StaticSource`]).
//! - [`LayerStore`] parses each layer into a [`BoundaryLayer`] on first use
//!   and caches it for the life of the process.
//! - [`locate`] finds the first feature containing the point, after a
//!   bounding-box prefilter.
//! - [`ResolutionPolicy`] extracts a [`DistrictId`] from the matched
//!   feature's attributes using an ordered list of [`Rule`]s.
//! - [`DistrictLookup`] ties these together for every configured chamber.
//!
//! # Example
//!
//! ```rust
//! use district_lookup::{Chamber, DistrictId, DistrictLookup, QueryPoint, StaticSource};
//!
//! let house = br#"{"type":"FeatureCollection","features":[{
//!     "type":"Feature",
//!     "properties":{"NAMELSAD":"State House District 108"},
//!     "geometry":{"type":"Polygon","coordinates":[
//!         [[-97.0,32.0],[-96.0,32.0],[-96.0,33.0],[-97.0,33.0],[-97.0,32.0]]
//!     ]}
//! }]}"#;
//!
//! let lookup = DistrictLookup::new(StaticSource::new().with_layer(Chamber::House, &house[..]));
//! let result = lookup.resolve(QueryPoint::from_lat_lng(32.7767, -96.7970)).unwrap();
//! assert_eq!(result.house(), Some(&DistrictId::Number(108)));
//! assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"house":108}"#);
//! ```

mod chamber;
mod district;
mod error;
mod geojson;
mod layer;
mod locate;
mod lookup;
mod point;
mod policy;
mod source;
mod store;

pub use chamber::Chamber;
pub use district::{DistrictId, resolve_district_id};
pub use error::{LoadError, PolicyError, UnknownChamber};
pub use layer::{Attributes, BoundaryFeature, BoundaryGeometry, BoundaryLayer};
pub use locate::{Location, locate, locate_detailed};
pub use lookup::{
    DistrictLookup, DistrictResult, FailurePolicy, LayerOutcome, LayerReport, Resolution,
    resolve_in_layer,
};
pub use point::QueryPoint;
pub use policy::{PolicyOverrides, PolicySet, ResolutionPolicy, Rule};
pub use source::{BoundarySource, FileSource, StaticSource};
pub use store::LayerStore;

pub use district_geometry::BoundingBox;
