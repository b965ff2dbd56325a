// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chamber identifiers.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownChamber;

/// The body a boundary layer belongs to.
///
/// The chamber names the layer and selects the attribute-resolution policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    /// State house of representatives (lower chamber).
    House,
    /// State senate (upper chamber).
    Senate,
    /// State board of education.
    Sboe,
}

impl Chamber {
    /// Every chamber, in the order results are reported.
    pub const ALL: [Self; 3] = [Self::House, Self::Senate, Self::Sboe];

    /// Lowercase name used in configuration and JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Senate => "senate",
            Self::Sboe => "sboe",
        }
    }

    /// The chamber's standard district-code attribute.
    ///
    /// Census TIGER state legislative files use `SLDLST` (lower) and
    /// `SLDUST` (upper).
    pub const fn district_field(self) -> &'static str {
        match self {
            Self::House => "SLDLST",
            Self::Senate => "SLDUST",
            Self::Sboe => "SBOE",
        }
    }

    /// Lowercase abbreviation that tends to appear inside district-code keys.
    pub const fn key_code(self) -> &'static str {
        match self {
            Self::House => "sldl",
            Self::Senate => "sldu",
            Self::Sboe => "sboe",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::House => 0,
            Self::Senate => 1,
            Self::Sboe => 2,
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chamber {
    type Err = UnknownChamber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChamber(s.to_owned()))
    }
}
