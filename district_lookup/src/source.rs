// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where boundary bytes come from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::chamber::Chamber;
use crate::error::LoadError;

/// Supplies the raw GeoJSON bytes of each layer.
///
/// Implementations only fetch bytes; parsing and caching are done by
/// [`LayerStore`](crate::LayerStore).
pub trait BoundarySource: Send + Sync {
    /// Read the full content of the layer for `chamber`.
    fn read(&self, chamber: Chamber) -> Result<Vec<u8>, LoadError>;

    /// Whether this source has anything configured for `chamber`.
    ///
    /// Unconfigured chambers are left out of lookup results entirely.
    fn provides(&self, chamber: Chamber) -> bool;
}

impl<S: BoundarySource + ?Sized> BoundarySource for Arc<S> {
    fn read(&self, chamber: Chamber) -> Result<Vec<u8>, LoadError> {
        (**self).read(chamber)
    }

    fn provides(&self, chamber: Chamber) -> bool {
        (**self).provides(chamber)
    }
}

/// Boundary files on the local filesystem, one path per chamber.
#[derive(Clone, Debug, Default)]
pub struct FileSource {
    paths: BTreeMap<Chamber, PathBuf>,
}

impl FileSource {
    /// A source with no layers configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the file for `chamber`, replacing any previous path.
    pub fn with_path(mut self, chamber: Chamber, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(chamber, path.into());
        self
    }

    /// The configured path for `chamber`.
    pub fn path(&self, chamber: Chamber) -> Option<&Path> {
        self.paths.get(&chamber).map(PathBuf::as_path)
    }
}

impl BoundarySource for FileSource {
    fn read(&self, chamber: Chamber) -> Result<Vec<u8>, LoadError> {
        let path = self.path(chamber).ok_or(LoadError::MissingSource { chamber })?;
        std::fs::read(path).map_err(|source| LoadError::Io {
            chamber,
            path: path.to_owned(),
            source,
        })
    }

    fn provides(&self, chamber: Chamber) -> bool {
        self.paths.contains_key(&chamber)
    }
}

/// In-memory layers, for embedding boundary data in a binary and for tests.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    layers: BTreeMap<Chamber, Arc<[u8]>>,
}

impl StaticSource {
    /// A source with no layers configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the GeoJSON content for `chamber`.
    pub fn with_layer(mut self, chamber: Chamber, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.layers.insert(chamber, bytes.into());
        self
    }
}

impl BoundarySource for StaticSource {
    fn read(&self, chamber: Chamber) -> Result<Vec<u8>, LoadError> {
        self.layers
            .get(&chamber)
            .map(|bytes| bytes.to_vec())
            .ok_or(LoadError::MissingSource { chamber })
    }

    fn provides(&self, chamber: Chamber) -> bool {
        self.layers.contains_key(&chamber)
    }
}
