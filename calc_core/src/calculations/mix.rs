//! # Mix Calculator
//!
//! Derives the material quantities for a single layer.
//!
//! ## Resin
//!
//! ```text
//! total     = area_m2 × thickness_mm × consumption_rate       [g]
//! A, B      = total × p/(p+q), total × q/(p+q)                 (0, 0 if p+q = 0)
//! quartz    = total × quartz% / 100                            (0 if unset)
//! color_i   = total × color_i% / 100, split A/B by the same ratio
//! ```
//!
//! ## Varnish
//!
//! ```text
//! volume    = area_m2 × coats × ml_per_m2                      [mL]
//! ```
//!
//! with `ml_per_m2` defaulting to 3785 / 40 (one gallon covers 40 m² per
//! coat).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layers::{Layer, LayerKind, ResinSpec};
use crate::settings::VarnishYield;
use crate::units::{format_volume, format_weight, Grams, Milliliters, SqMeters};

/// Derived quantities for one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerMix {
    Resin(ResinMix),
    Varnish(VarnishMix),
}

/// Resin layer quantities, all in grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResinMix {
    pub total_weight: Grams,
    pub component_a: Grams,
    pub component_b: Grams,
    pub quartz_weight: Grams,
    /// Ratio parts used for the split
    pub part_a: u32,
    pub part_b: u32,
    pub colors: Vec<ColorMix>,
}

/// One color's share of a resin layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorMix {
    pub color_id: Uuid,
    pub name: String,
    pub percentage: f64,
    pub total: Grams,
    pub component_a: Grams,
    pub component_b: Grams,
}

/// Varnish layer quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarnishMix {
    pub total_volume: Milliliters,
}

impl LayerMix {
    pub fn resin(&self) -> Option<&ResinMix> {
        match self {
            LayerMix::Resin(mix) => Some(mix),
            LayerMix::Varnish(_) => None,
        }
    }

    pub fn varnish(&self) -> Option<&VarnishMix> {
        match self {
            LayerMix::Resin(_) => None,
            LayerMix::Varnish(mix) => Some(mix),
        }
    }

    /// Total as a display string: weight for resin, volume for varnish.
    pub fn total_label(&self) -> String {
        match self {
            LayerMix::Resin(mix) => format_weight(mix.total_weight.value()),
            LayerMix::Varnish(mix) => format_volume(mix.total_volume.value()),
        }
    }
}

impl ResinMix {
    /// Sum of all color allocations
    pub fn colors_total(&self) -> Grams {
        self.colors.iter().map(|c| c.total).sum()
    }
}

/// Calculate the quantities for `layer` over `area`.
pub fn calculate(layer: &Layer, area: SqMeters, varnish: &VarnishYield) -> LayerMix {
    match &layer.kind {
        LayerKind::Resin(spec) => LayerMix::Resin(calculate_resin(spec, layer.thickness, area)),
        LayerKind::Varnish(_) => LayerMix::Varnish(calculate_varnish(layer.thickness, area, varnish)),
    }
}

/// Resin weight, A/B split, quartz and color allocations.
pub fn calculate_resin(spec: &ResinSpec, thickness_mm: f64, area: SqMeters) -> ResinMix {
    let total = area.value() * thickness_mm * spec.consumption_rate;
    let (a, b) = spec.ratio.split(total);
    let quartz = spec.quartz_percentage.map_or(0.0, |pct| total * pct / 100.0);

    let colors = spec
        .colors
        .iter()
        .map(|color| {
            let color_total = total * color.percentage / 100.0;
            let (ca, cb) = spec.ratio.split(color_total);
            ColorMix {
                color_id: color.id,
                name: color.name.clone(),
                percentage: color.percentage,
                total: Grams(color_total),
                component_a: Grams(ca),
                component_b: Grams(cb),
            }
        })
        .collect();

    ResinMix {
        total_weight: Grams(total),
        component_a: Grams(a),
        component_b: Grams(b),
        quartz_weight: Grams(quartz),
        part_a: spec.ratio.part_a,
        part_b: spec.ratio.part_b,
        colors,
    }
}

/// Varnish volume by coverage.
pub fn calculate_varnish(coats: f64, area: SqMeters, varnish: &VarnishYield) -> VarnishMix {
    VarnishMix {
        total_volume: Milliliters(area.value() * coats * varnish.ml_per_m2),
    }
}
