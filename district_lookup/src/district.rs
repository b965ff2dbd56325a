// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::chamber::Chamber;
use crate::layer::Attributes;
use crate::policy::PolicySet;

/// A resolved district identifier.
///
/// Serializes as a bare JSON number or string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistrictId {
    /// A district number.
    Number(i64),
    /// A district label that is not a number.
    Label(String),
}

impl DistrictId {
    /// The district number, if this is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Label(_) => None,
        }
    }
}

impl fmt::Display for DistrictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DistrictId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Resolve the district identifier of a matched feature with the built-in
/// policy for `chamber`.
///
/// `None` means the feature matched but none of the policy's rules could
/// produce an identifier.
pub fn resolve_district_id(attributes: &Attributes, chamber: Chamber) -> Option<DistrictId> {
    PolicySet::builtin().get(chamber).resolve(attributes)
}
