//! # Mix Ratios
//!
//! Two-component resins are mixed by weight in a `p:q` ratio of component A
//! to component B. [`MixRatio`] holds the two parts and splits a total weight
//! proportionally; [`RatioPreset`] is the global selector offered to users.
//!
//! A ratio that cannot be parsed, or whose parts sum to zero, is
//! *degenerate*: it splits every total into `(0, 0)` instead of dividing by
//! zero.
//!
//! ```rust
//! use calc_core::ratio::MixRatio;
//!
//! let ratio: MixRatio = "2:1".parse().unwrap();
//! assert_eq!(ratio.split(12000.0), (8000.0, 4000.0));
//!
//! let broken = MixRatio::parse_lenient("two to one");
//! assert_eq!(broken.split(12000.0), (0.0, 0.0));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Component A : component B mixing ratio by weight.
///
/// Serializes as the `"p:q"` string. Deserializing unparsable text yields
/// the degenerate `0:0` ratio rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MixRatio {
    pub part_a: u32,
    pub part_b: u32,
}

impl MixRatio {
    /// The degenerate ratio that splits everything to zero
    pub const DEGENERATE: MixRatio = MixRatio { part_a: 0, part_b: 0 };

    pub const fn new(part_a: u32, part_b: u32) -> Self {
        MixRatio { part_a, part_b }
    }

    /// Parse `"p:q"`, falling back to [`MixRatio::DEGENERATE`] on any error.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Self::DEGENERATE)
    }

    /// Sum of both parts
    pub fn total_parts(self) -> u32 {
        self.part_a.saturating_add(self.part_b)
    }

    /// True when the parts sum to zero
    pub fn is_degenerate(self) -> bool {
        self.total_parts() == 0
    }

    /// Split `total` into `(component_a, component_b)`.
    pub fn split(self, total: f64) -> (f64, f64) {
        let parts = self.total_parts();
        if parts == 0 {
            return (0.0, 0.0);
        }
        let parts = f64::from(parts);
        (
            total * f64::from(self.part_a) / parts,
            total * f64::from(self.part_b) / parts,
        )
    }
}

impl Default for MixRatio {
    fn default() -> Self {
        RatioPreset::default().ratio()
    }
}

impl fmt::Display for MixRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.part_a, self.part_b)
    }
}

impl FromStr for MixRatio {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalcError::invalid_input("ratio", s, "Expected two whole numbers as 'p:q'");
        let (a, b) = s.trim().split_once(':').ok_or_else(invalid)?;
        let part_a = a.trim().parse().map_err(|_| invalid())?;
        let part_b = b.trim().parse().map_err(|_| invalid())?;
        Ok(MixRatio { part_a, part_b })
    }
}

impl From<String> for MixRatio {
    fn from(s: String) -> Self {
        MixRatio::parse_lenient(&s)
    }
}

impl From<MixRatio> for String {
    fn from(ratio: MixRatio) -> Self {
        ratio.to_string()
    }
}

impl From<RatioPreset> for MixRatio {
    fn from(preset: RatioPreset) -> Self {
        preset.ratio()
    }
}

/// The ratios offered by the global ratio selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RatioPreset {
    #[default]
    #[serde(rename = "2:1")]
    TwoToOne,
    #[serde(rename = "1:1")]
    OneToOne,
    #[serde(rename = "3:1")]
    ThreeToOne,
}

impl RatioPreset {
    pub const ALL: [RatioPreset; 3] = [RatioPreset::TwoToOne, RatioPreset::OneToOne, RatioPreset::ThreeToOne];

    pub fn ratio(self) -> MixRatio {
        match self {
            RatioPreset::TwoToOne => MixRatio::new(2, 1),
            RatioPreset::OneToOne => MixRatio::new(1, 1),
            RatioPreset::ThreeToOne => MixRatio::new(3, 1),
        }
    }
}

impl fmt::Display for RatioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ratio().fmt(f)
    }
}

impl FromStr for RatioPreset {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ratio: MixRatio = s.parse()?;
        RatioPreset::ALL
            .into_iter()
            .find(|preset| preset.ratio() == ratio)
            .ok_or_else(|| CalcError::invalid_input("ratio", s, "Expected one of 2:1, 1:1, 3:1"))
    }
}
