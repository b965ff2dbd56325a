// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily loaded, process-lifetime cache of boundary layers.

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;

use crate::chamber::Chamber;
use crate::error::LoadError;
use crate::layer::BoundaryLayer;
use crate::source::BoundarySource;

/// Loads each layer from a [`BoundarySource`] at most once and shares it.
///
/// Concurrent first access to a layer is serialized: one caller loads while
/// the others wait and then reuse the result. A failed load is not cached,
/// so the next call retries. Layers never leave the cache.
#[derive(Debug)]
pub struct LayerStore<S> {
    source: S,
    cells: [OnceCell<Arc<BoundaryLayer>>; 3],
}

impl<S: BoundarySource> LayerStore<S> {
    /// Create an empty store over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cells: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The layer for `chamber`, loading it on first use.
    pub fn get_layer(&self, chamber: Chamber) -> Result<Arc<BoundaryLayer>, LoadError> {
        self.cells[chamber.index()]
            .get_or_try_init(|| self.load(chamber))
            .cloned()
    }

    /// The layer for `chamber` if it has already been loaded.
    pub fn loaded(&self, chamber: Chamber) -> Option<Arc<BoundaryLayer>> {
        self.cells[chamber.index()].get().cloned()
    }

    /// Load every listed layer now, stopping at the first failure.
    pub fn preload<I: IntoIterator<Item = Chamber>>(&self, chambers: I) -> Result<(), LoadError> {
        for chamber in chambers {
            self.get_layer(chamber)?;
        }
        Ok(())
    }

    fn load(&self, chamber: Chamber) -> Result<Arc<BoundaryLayer>, LoadError> {
        let start = Instant::now();
        let layer = self
            .source
            .read(chamber)
            .and_then(|bytes| BoundaryLayer::from_geojson(chamber, &bytes))
            .inspect_err(|e| tracing::warn!(%chamber, error = %e, "failed to load boundary layer"))?;

        tracing::info!(
            %chamber,
            features = layer.features().len(),
            polygons = layer.polygon_count(),
            unsupported = layer.features().len() - layer.polygon_count(),
            bbox = ?layer.bbox().map(|b| b.to_array()),
            elapsed = ?start.elapsed(),
            "loaded boundary layer"
        );
        Ok(Arc::new(layer))
    }
}
