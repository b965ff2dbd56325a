// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered precedence policies for extracting district identifiers.
//!
//! Boundary files come from several providers and schema vintages, so the
//! district identifier is not under a single fixed key. A
//! [`ResolutionPolicy`] is an ordered list of [`Rule`]s; the first rule that
//! produces a value wins.
//!
//! The built-in policy for each chamber is:
//!
//! 1. [`Rule::Numeric`] on the chamber's standard field (`SLDLST`, `SLDUST`,
//!    `SBOE`), then on `DIST_NBR`, `DISTRICT`, `district`, `District`.
//! 2. [`Rule::NamePattern`] on `NAMELSAD`, `NAME`, `name`.
//! 3. [`Rule::KeyContains`] with `district`, `dist`, and the chamber's key
//!    code (`sldl`, `sldu`, `sboe`).
//!
//! `OBJECTID` is a row identifier and is never used as a district number,
//! even when a policy names it.
//!
//! Operators can replace a chamber's policy with a TOML document:
//!
//! ```toml
//! [[sboe]]
//! rule = "numeric"
//! field = "SBOE_DIST"
//!
//! [[sboe]]
//! rule = "label"
//! field = "DIST_NAME"
//! ```

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chamber::Chamber;
use crate::district::DistrictId;
use crate::error::PolicyError;
use crate::layer::Attributes;

const OBJECT_ID: &str = "OBJECTID";
const GENERIC_FIELDS: [&str; 4] = ["DIST_NBR", "DISTRICT", "district", "District"];
const NAME_FIELDS: [&str; 3] = ["NAMELSAD", "NAME", "name"];

static DISTRICT_IN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)district\s+([0-9]+)").expect("static pattern is valid"));

static BUILTIN: Lazy<PolicySet> = Lazy::new(|| PolicySet {
    policies: Chamber::ALL.map(ResolutionPolicy::builtin),
});

/// One step of a resolution policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// `field` holds a number, or a string that parses as one.
    ///
    /// Fractional values are truncated toward zero.
    Numeric {
        /// Attribute key (exact match).
        field: String,
    },
    /// `field` is a string like `"State House District 114"`, or a string
    /// that is itself a number.
    NamePattern {
        /// Attribute key (exact match).
        field: String,
    },
    /// The first key, in source order, whose lowercase form contains one of
    /// `patterns` and whose value is an integer.
    KeyContains {
        /// Lowercase substrings to look for in keys.
        patterns: Vec<String>,
    },
    /// `field` holds a non-empty string used verbatim as a district label.
    Label {
        /// Attribute key (exact match).
        field: String,
    },
}

impl Rule {
    /// Shorthand for [`Rule::Numeric`].
    pub fn numeric(field: impl Into<String>) -> Self {
        Self::Numeric {
            field: field.into(),
        }
    }

    /// Shorthand for [`Rule::NamePattern`].
    pub fn name_pattern(field: impl Into<String>) -> Self {
        Self::NamePattern {
            field: field.into(),
        }
    }

    /// Shorthand for [`Rule::KeyContains`].
    pub fn key_contains<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self::KeyContains {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Shorthand for [`Rule::Label`].
    pub fn label(field: impl Into<String>) -> Self {
        Self::Label {
            field: field.into(),
        }
    }

    /// Apply this rule alone to `attributes`.
    pub fn apply(&self, attributes: &Attributes) -> Option<DistrictId> {
        match self {
            Self::Numeric { field } => {
                if is_object_id(field) {
                    return None;
                }
                finite_number(attributes.get(field)?).map(truncate)
            }
            Self::NamePattern { field } => {
                let value = attributes.get(field)?;
                let Some(text) = value.as_str() else {
                    return finite_number(value).map(truncate);
                };
                if let Some(caps) = DISTRICT_IN_NAME.captures(text)
                    && let Ok(n) = caps[1].parse::<i64>()
                {
                    return Some(DistrictId::Number(n));
                }
                parse_number(text).map(truncate)
            }
            Self::KeyContains { patterns } => attributes.iter().find_map(|(key, value)| {
                if is_object_id(key) {
                    return None;
                }
                let key = key.to_ascii_lowercase();
                if !patterns.iter().any(|p| key.contains(&p.to_ascii_lowercase())) {
                    return None;
                }
                finite_number(value)
                    .filter(|n| n.fract() == 0.0)
                    .map(truncate)
            }),
            Self::Label { field } => {
                let text = attributes.get(field)?.as_str()?.trim();
                (!text.is_empty()).then(|| DistrictId::Label(text.to_owned()))
            }
        }
    }
}

fn is_object_id(key: &str) -> bool {
    key.eq_ignore_ascii_case(OBJECT_ID)
}

fn finite_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "District numbers are small; out-of-range values saturate, which is harmless."
)]
fn truncate(n: f64) -> DistrictId {
    DistrictId::Number(n.trunc() as i64)
}

/// An ordered list of rules; the first rule producing a value wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolutionPolicy {
    rules: Vec<Rule>,
}

impl ResolutionPolicy {
    /// A policy with the given rules, in priority order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in policy for `chamber` (see the module docs).
    pub fn builtin(chamber: Chamber) -> Self {
        let mut rules = vec![Rule::numeric(chamber.district_field())];
        rules.extend(GENERIC_FIELDS.map(Rule::numeric));
        rules.extend(NAME_FIELDS.map(Rule::name_pattern));
        rules.push(Rule::key_contains(["district", "dist", chamber.key_code()]));
        Self { rules }
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The identifier produced by the first matching rule.
    pub fn resolve(&self, attributes: &Attributes) -> Option<DistrictId> {
        self.resolve_with_rule(attributes).map(|(id, _)| id)
    }

    /// Like [`resolve`](Self::resolve), also returning the rule that matched.
    pub fn resolve_with_rule(&self, attributes: &Attributes) -> Option<(DistrictId, &Rule)> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(attributes).map(|id| (id, rule)))
    }
}

/// Per-chamber policy replacements, typically read from a TOML file.
///
/// Chambers left out keep their current policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyOverrides {
    /// Replacement for the house policy.
    #[serde(default)]
    pub house: Option<ResolutionPolicy>,
    /// Replacement for the senate policy.
    #[serde(default)]
    pub senate: Option<ResolutionPolicy>,
    /// Replacement for the board-of-education policy.
    #[serde(default)]
    pub sboe: Option<ResolutionPolicy>,
}

impl PolicyOverrides {
    /// Parse overrides from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, PolicyError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse overrides from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, PolicyError> {
        let text = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// The active policy of every chamber.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicySet {
    policies: [ResolutionPolicy; 3],
}

impl PolicySet {
    /// Shared instance holding the built-in policies.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// The policy for `chamber`.
    pub fn get(&self, chamber: Chamber) -> &ResolutionPolicy {
        &self.policies[chamber.index()]
    }

    /// Replace the policy for `chamber`.
    pub fn set(&mut self, chamber: Chamber, policy: ResolutionPolicy) {
        self.policies[chamber.index()] = policy;
    }

    /// Apply every override present in `overrides`.
    pub fn with_overrides(mut self, overrides: PolicyOverrides) -> Self {
        let PolicyOverrides {
            house,
            senate,
            sboe,
        } = overrides;
        for (chamber, policy) in [(Chamber::House, house), (Chamber::Senate, senate), (Chamber::Sboe, sboe)] {
            if let Some(policy) = policy {
                tracing::info!(%chamber, rules = policy.rules().len(), "overriding resolution policy");
                self.set(chamber, policy);
            }
        }
        self
    }
}

impl Default for PolicySet {
    fn default() -> Self {
        BUILTIN.clone()
    }
}
