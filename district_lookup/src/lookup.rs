// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution across every configured layer.

use serde::ser::{Serialize, SerializeMap, Serializer};

use district_geometry::BoundingBox;

use crate::chamber::Chamber;
use crate::district::DistrictId;
use crate::error::LoadError;
use crate::layer::BoundaryLayer;
use crate::locate::{Location, locate_detailed};
use crate::point::QueryPoint;
use crate::policy::{PolicySet, ResolutionPolicy, Rule};
use crate::source::BoundarySource;
use crate::store::LayerStore;

/// What to do when a layer cannot be loaded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Fail the whole query with the [`LoadError`].
    #[default]
    FailRequest,
    /// Report `null` for the failed layer and resolve the others.
    Partial,
}

/// The district of each configured layer.
///
/// Serializes as a JSON object with one key per configured chamber, in
/// chamber order; unconfigured chambers are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistrictResult {
    entries: Vec<(Chamber, Option<DistrictId>)>,
}

impl DistrictResult {
    /// The entry for `chamber`: `None` if the chamber is not configured,
    /// `Some(None)` if it is but no district was found.
    pub fn get(&self, chamber: Chamber) -> Option<Option<&DistrictId>> {
        self.entries
            .iter()
            .find(|(c, _)| *c == chamber)
            .map(|(_, id)| id.as_ref())
    }

    /// The house district, if found.
    pub fn house(&self) -> Option<&DistrictId> {
        self.get(Chamber::House).flatten()
    }

    /// The senate district, if found.
    pub fn senate(&self) -> Option<&DistrictId> {
        self.get(Chamber::Senate).flatten()
    }

    /// The board-of-education district, if found.
    pub fn sboe(&self) -> Option<&DistrictId> {
        self.get(Chamber::Sboe).flatten()
    }

    /// Configured chambers with their districts, in chamber order.
    pub fn iter(&self) -> impl Iterator<Item = (Chamber, Option<&DistrictId>)> + '_ {
        self.entries.iter().map(|(c, id)| (*c, id.as_ref()))
    }
}

impl Serialize for DistrictResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (chamber, id) in &self.entries {
            map.serialize_entry(chamber.as_str(), id)?;
        }
        map.end()
    }
}

/// How a single layer answered a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerOutcome {
    /// The point is outside the layer bounding box.
    OutsideBounds,
    /// No polygon contains the point.
    NoMatch,
    /// A feature contains the point.
    Matched {
        /// Index of the feature in the layer.
        feature_index: usize,
        /// Its identifier, or `None` if no rule could produce one.
        district: Option<DistrictId>,
        /// The rule that produced `district`.
        rule: Option<Rule>,
    },
    /// The layer could not be loaded; only seen with [`FailurePolicy::Partial`].
    LoadFailed {
        /// Display text of the load error.
        reason: String,
    },
}

impl LayerOutcome {
    /// The resolved identifier, if any.
    pub fn district(&self) -> Option<&DistrictId> {
        match self {
            Self::Matched { district, .. } => district.as_ref(),
            Self::OutsideBounds | Self::NoMatch | Self::LoadFailed { .. } => None,
        }
    }

    /// Short `snake_case` name for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OutsideBounds => "outside_bounds",
            Self::NoMatch => "no_match",
            Self::Matched { district: Some(_), .. } => "matched",
            Self::Matched { district: None, .. } => "matched_unresolved",
            Self::LoadFailed { .. } => "load_failed",
        }
    }
}

/// Per-layer diagnostics from [`DistrictLookup::resolve_detailed`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayerReport {
    /// Layer the report is about.
    pub chamber: Chamber,
    /// How the layer answered.
    pub outcome: LayerOutcome,
    /// The layer bounding box, if known.
    pub bbox: Option<BoundingBox>,
    /// Whether the point passed the bounding-box check.
    ///
    /// A layer without a bounding box never rejects, so this is `true` for
    /// it; a layer that failed to load reports `false`.
    pub in_bbox: bool,
    /// Attribute keys of the first feature in the layer.
    pub sample_keys: Vec<String>,
    /// Attribute keys of the matched feature.
    pub matched_keys: Vec<String>,
}

impl LayerReport {
    fn load_failed(chamber: Chamber, error: &LoadError) -> Self {
        Self {
            chamber,
            outcome: LayerOutcome::LoadFailed {
                reason: error.to_string(),
            },
            bbox: None,
            in_bbox: false,
            sample_keys: Vec::new(),
            matched_keys: Vec::new(),
        }
    }
}

/// Detailed answer for one query.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// The query point.
    pub point: QueryPoint,
    /// One report per configured layer, in chamber order.
    pub layers: Vec<LayerReport>,
}

impl Resolution {
    /// Collapse the reports into a [`DistrictResult`].
    pub fn result(&self) -> DistrictResult {
        DistrictResult {
            entries: self
                .layers
                .iter()
                .map(|r| (r.chamber, r.outcome.district().cloned()))
                .collect(),
        }
    }

    /// The report for `chamber`, if it is configured.
    pub fn layer(&self, chamber: Chamber) -> Option<&LayerReport> {
        self.layers.iter().find(|r| r.chamber == chamber)
    }
}

/// Locate `point` in `layer` and resolve the matched feature with `policy`.
pub fn resolve_in_layer(
    layer: &BoundaryLayer,
    point: QueryPoint,
    policy: &ResolutionPolicy,
) -> LayerOutcome {
    match locate_detailed(layer, point) {
        Location::OutsideBounds => LayerOutcome::OutsideBounds,
        Location::Miss { .. } => LayerOutcome::NoMatch,
        Location::Hit { index, .. } => {
            let attributes = &layer.features()[index].attributes;
            let (district, rule) = match policy.resolve_with_rule(attributes) {
                Some((id, rule)) => (Some(id), Some(rule.clone())),
                None => {
                    tracing::debug!(
                        chamber = %layer.chamber(),
                        index,
                        keys = ?attributes.keys().collect::<Vec<_>>(),
                        "matched feature has no resolvable district"
                    );
                    (None, None)
                }
            };
            LayerOutcome::Matched {
                feature_index: index,
                district,
                rule,
            }
        }
    }
}

/// Resolves points against the house, senate, and board-of-education layers.
///
/// Layers load lazily through a shared [`LayerStore`]; a `DistrictLookup` is
/// meant to live for the whole process and be queried from many threads.
#[derive(Debug)]
pub struct DistrictLookup<S> {
    store: LayerStore<S>,
    chambers: Vec<Chamber>,
    policies: PolicySet,
    failure_policy: FailurePolicy,
}

impl<S: BoundarySource> DistrictLookup<S> {
    /// Resolve against every chamber `source` provides, with built-in policies.
    pub fn new(source: S) -> Self {
        let chambers = Chamber::ALL
            .into_iter()
            .filter(|c| source.provides(*c))
            .collect();
        Self {
            store: LayerStore::new(source),
            chambers,
            policies: PolicySet::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Restrict or extend the configured chambers.
    ///
    /// Results are always reported in chamber order; duplicates are ignored.
    pub fn with_chambers<I: IntoIterator<Item = Chamber>>(mut self, chambers: I) -> Self {
        let wanted: Vec<Chamber> = chambers.into_iter().collect();
        self.chambers = Chamber::ALL
            .into_iter()
            .filter(|c| wanted.contains(c))
            .collect();
        self
    }

    /// Replace the resolution policies.
    pub fn with_policies(mut self, policies: PolicySet) -> Self {
        self.policies = policies;
        self
    }

    /// Set what happens when a layer fails to load.
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// The layer cache.
    pub fn store(&self) -> &LayerStore<S> {
        &self.store
    }

    /// The configured chambers, in chamber order.
    pub fn chambers(&self) -> &[Chamber] {
        &self.chambers
    }

    /// The active resolution policies.
    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    /// Load every configured layer now.
    pub fn preload(&self) -> Result<(), LoadError> {
        self.store.preload(self.chambers.iter().copied())
    }

    /// The district of `point` in every configured layer.
    pub fn resolve(&self, point: QueryPoint) -> Result<DistrictResult, LoadError> {
        let mut entries = Vec::with_capacity(self.chambers.len());
        for &chamber in &self.chambers {
            let district = match self.store.get_layer(chamber) {
                Ok(layer) => {
                    resolve_in_layer(&layer, point, self.policies.get(chamber))
                        .district()
                        .cloned()
                }
                Err(e) => {
                    self.tolerate(chamber, e)?;
                    None
                }
            };
            entries.push((chamber, district));
        }
        Ok(DistrictResult { entries })
    }

    /// Like [`resolve`](Self::resolve), with per-layer diagnostics.
    pub fn resolve_detailed(&self, point: QueryPoint) -> Result<Resolution, LoadError> {
        let mut layers = Vec::with_capacity(self.chambers.len());
        for &chamber in &self.chambers {
            let report = match self.store.get_layer(chamber) {
                Ok(layer) => self.report(&layer, point),
                Err(e) => {
                    let report = LayerReport::load_failed(chamber, &e);
                    self.tolerate(chamber, e)?;
                    report
                }
            };
            layers.push(report);
        }
        Ok(Resolution { point, layers })
    }

    fn report(&self, layer: &BoundaryLayer, point: QueryPoint) -> LayerReport {
        let chamber = layer.chamber();
        let outcome = resolve_in_layer(layer, point, self.policies.get(chamber));
        let keys_of = |index: usize| -> Vec<String> {
            layer
                .features()
                .get(index)
                .map(|f| f.attributes.keys().map(str::to_owned).collect())
                .unwrap_or_default()
        };
        let matched_keys = match &outcome {
            LayerOutcome::Matched { feature_index, .. } => keys_of(*feature_index),
            _ => Vec::new(),
        };
        LayerReport {
            chamber,
            bbox: layer.bbox(),
            in_bbox: layer.bbox().is_none_or(|b| b.contains(point.into())),
            sample_keys: keys_of(0),
            matched_keys,
            outcome,
        }
    }

    fn tolerate(&self, chamber: Chamber, error: LoadError) -> Result<(), LoadError> {
        match self.failure_policy {
            FailurePolicy::FailRequest => Err(error),
            FailurePolicy::Partial => {
                tracing::warn!(%chamber, error = %error, "layer unavailable, reporting null");
                Ok(())
            }
        }
    }
}
