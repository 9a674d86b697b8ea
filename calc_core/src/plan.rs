//! # Plan Files
//!
//! A plan is a complete calculator input - dimensions plus a layer stack -
//! as human-readable JSON. The CLI reads plans to compute or export a stack
//! other than the built-in tiers, and can print a tier as a plan to start
//! from. Plans are input only; nothing writes session state back to disk.
//!
//! ## Structure
//!
//! ```text
//! Plan
//! ├── meta: PlanMetadata (format version, optional title, timestamp)
//! ├── dimensions: Dimensions (length, width, unit, ratio)
//! └── layers: Vec<Layer> (ordered stack)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::plan::Plan;
//! use calc_core::presets::Tier;
//!
//! let plan = Plan::from_tier(Tier::Economy);
//! let json = plan.to_json().unwrap();
//! let parsed = Plan::from_json(&json).unwrap();
//! assert_eq!(parsed.layers.len(), 3);
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dimensions::Dimensions;
use crate::errors::{CalcError, CalcResult};
use crate::layers::Layer;
use crate::presets::Tier;

/// Current plan format version
pub const PLAN_VERSION: &str = "0.1.0";

/// Calculator input as a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub meta: PlanMetadata,

    #[serde(default)]
    pub dimensions: Dimensions,

    pub layers: Vec<Layer>,
}

/// Plan header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMetadata {
    /// Format version (for compatibility checks)
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Default for PlanMetadata {
    fn default() -> Self {
        PlanMetadata {
            version: PLAN_VERSION.to_string(),
            title: None,
            created: None,
        }
    }
}

impl Plan {
    pub fn new(dimensions: Dimensions, layers: Vec<Layer>) -> Self {
        Plan {
            meta: PlanMetadata {
                created: Some(Utc::now()),
                ..PlanMetadata::default()
            },
            dimensions,
            layers,
        }
    }

    /// A plan seeded from a preset tier with empty dimensions.
    pub fn from_tier(tier: Tier) -> Self {
        let mut plan = Plan::new(Dimensions::default(), tier.seed_layers());
        plan.meta.title = Some(tier.display_name().to_string());
        plan
    }

    pub fn from_json(json: &str) -> CalcResult<Self> {
        let plan: Plan = serde_json::from_str(json).map_err(CalcError::serialization)?;
        if plan.meta.version != PLAN_VERSION {
            warn!(
                file_version = %plan.meta.version,
                expected = PLAN_VERSION,
                "plan version differs, reading anyway"
            );
        }
        Ok(plan.normalized())
    }

    pub fn to_json(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(self).map_err(CalcError::serialization)
    }

    /// Read a plan from a JSON file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read plan", path.display().to_string(), e.to_string()))?;
        let plan = Self::from_json(&json)?;
        debug!(path = %path.display(), layers = plan.layers.len(), "loaded plan");
        Ok(plan)
    }

    /// Clamp hand-edited values back into range.
    fn normalized(mut self) -> Self {
        self.dimensions.set_length(self.dimensions.length);
        self.dimensions.set_width(self.dimensions.width);
        for layer in &mut self.layers {
            layer.thickness = layer.thickness.max(0.0);
        }
        self
    }
}
