//! # Calculation Settings
//!
//! Constants the formulas depend on but which a shop may want to tune: unit
//! prices for the cost estimate, the varnish coverage yield, and the values
//! given to a freshly added layer.
//!
//! Every section has a built-in default, so an empty TOML file (or no file at
//! all) reproduces the stock behavior:
//!
//! ```toml
//! [pricing]
//! resin_per_kg = 45.0
//! varnish_per_liter = 80.0
//! currency = "$"
//!
//! [varnish]
//! ml_per_m2 = 94.625   # 3785 mL per gallon / 40 m² per coat
//!
//! [defaults]
//! thickness = 1.0
//! consumption_rate = 1000.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};

/// Milliliters in one US gallon
pub const GALLON_ML: f64 = 3785.0;

/// Square meters one gallon of varnish covers per coat
pub const GALLON_COVERAGE_M2: f64 = 40.0;

/// Root settings object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcSettings {
    pub pricing: Pricing,
    pub varnish: VarnishYield,
    pub defaults: LayerDefaults,
}

/// Unit prices used by the cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    /// Price of one kilogram of mixed resin
    pub resin_per_kg: f64,

    /// Price of one liter of varnish
    pub varnish_per_liter: f64,

    /// Currency symbol for display only
    pub currency: String,
}

impl Default for Pricing {
    fn default() -> Self {
        Pricing {
            resin_per_kg: 45.0,
            varnish_per_liter: 80.0,
            currency: "$".to_string(),
        }
    }
}

/// Varnish coverage: milliliters needed per square meter per coat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarnishYield {
    pub ml_per_m2: f64,
}

impl Default for VarnishYield {
    fn default() -> Self {
        VarnishYield {
            ml_per_m2: GALLON_ML / GALLON_COVERAGE_M2,
        }
    }
}

/// Field values for a layer created by "add layer".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerDefaults {
    /// Thickness in mm
    pub thickness: f64,

    /// Resin consumption in g per m² per mm
    pub consumption_rate: f64,
}

impl Default for LayerDefaults {
    fn default() -> Self {
        LayerDefaults {
            thickness: 1.0,
            consumption_rate: 1000.0,
        }
    }
}

impl CalcSettings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> CalcResult<Self> {
        let settings: CalcSettings = toml::from_str(raw).map_err(CalcError::serialization)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read settings", path.display().to_string(), e.to_string()))?;
        let settings = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> CalcResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Replace negative or non-finite numbers with their defaults.
    fn sanitized(mut self) -> Self {
        let stock = CalcSettings::default();
        fix_value(&mut self.pricing.resin_per_kg, stock.pricing.resin_per_kg, "pricing.resin_per_kg");
        fix_value(
            &mut self.pricing.varnish_per_liter,
            stock.pricing.varnish_per_liter,
            "pricing.varnish_per_liter",
        );
        fix_value(&mut self.varnish.ml_per_m2, stock.varnish.ml_per_m2, "varnish.ml_per_m2");
        fix_value(&mut self.defaults.thickness, stock.defaults.thickness, "defaults.thickness");
        fix_value(
            &mut self.defaults.consumption_rate,
            stock.defaults.consumption_rate,
            "defaults.consumption_rate",
        );
        self
    }
}

fn fix_value(value: &mut f64, fallback: f64, key: &str) {
    if !value.is_finite() || *value < 0.0 {
        warn!(key, value = *value, fallback, "ignoring out-of-range setting");
        *value = fallback;
    }
}
