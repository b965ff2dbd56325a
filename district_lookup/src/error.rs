// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::chamber::Chamber;

/// A boundary layer could not be loaded.
///
/// Load errors are scoped to one layer: they are never cached, so the next
/// request for the same layer retries the load, and other layers are
/// unaffected.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source has nothing configured for this chamber.
    #[error("no boundary source configured for the {chamber} layer")]
    MissingSource {
        /// Layer that was requested.
        chamber: Chamber,
    },
    /// The boundary file could not be read.
    #[error("failed to read {chamber} boundaries from {}", path.display())]
    Io {
        /// Layer being loaded.
        chamber: Chamber,
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The content is not valid JSON, or its shape does not match GeoJSON.
    #[error("{chamber} boundaries are not valid GeoJSON")]
    Json {
        /// Layer being loaded.
        chamber: Chamber,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },
    /// The top-level object is not a `FeatureCollection` with a `features` array.
    #[error("{chamber} boundaries are not a GeoJSON FeatureCollection")]
    NotFeatureCollection {
        /// Layer being loaded.
        chamber: Chamber,
    },
    /// A polygonal feature has unusable coordinates.
    #[error("{chamber} feature {feature} has malformed geometry: {reason}")]
    Geometry {
        /// Layer being loaded.
        chamber: Chamber,
        /// Zero-based index of the feature in the source collection.
        feature: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl LoadError {
    /// The layer this error belongs to.
    pub fn chamber(&self) -> Chamber {
        match self {
            Self::MissingSource { chamber }
            | Self::Io { chamber, .. }
            | Self::Json { chamber, .. }
            | Self::NotFeatureCollection { chamber }
            | Self::Geometry { chamber, .. } => *chamber,
        }
    }
}

/// A resolution-policy override file could not be used.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The file could not be read.
    #[error("failed to read resolution policy {}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid policy document.
    #[error("invalid resolution policy")]
    Toml(#[from] toml::de::Error),
}

/// A string did not name a known chamber.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown chamber `{0}` (expected house, senate, or sboe)")]
pub struct UnknownChamber(pub String);
