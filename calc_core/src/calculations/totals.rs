//! # Aggregator
//!
//! Sums per-layer results into project totals. Every call recomputes from
//! the full layer list, so removing a layer that was just added restores
//! the previous totals exactly.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::mix::{self, LayerMix};
use crate::layers::Layer;
use crate::settings::CalcSettings;
use crate::units::{Grams, Kilograms, Liters, Milliliters, SqMeters};

/// Project-wide totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectTotals {
    /// Area the totals were computed for
    pub area_m2: SqMeters,

    /// Σ resin layer weights
    pub total_resin_mass: Grams,

    /// Σ component A over resin layers
    pub component_a: Grams,

    /// Σ component B over resin layers
    pub component_b: Grams,

    /// Σ quartz filler over resin layers
    pub total_quartz_mass: Grams,

    /// Σ varnish layer volumes
    pub total_varnish_volume: Milliliters,

    /// Σ (kg or L) × unit price
    pub estimated_cost: f64,
}

impl ProjectTotals {
    pub fn resin_kg(&self) -> Kilograms {
        self.total_resin_mass.into()
    }

    pub fn varnish_liters(&self) -> Liters {
        self.total_varnish_volume.into()
    }
}

/// A layer paired with its computed mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerBreakdown {
    pub layer_id: Uuid,
    pub name: String,
    pub mix: LayerMix,
}

/// Per-layer mixes plus totals, computed in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub layers: Vec<LayerBreakdown>,
    pub totals: ProjectTotals,
}

/// Compute project totals for `layers` over `area`.
pub fn aggregate(layers: &[Layer], area: SqMeters, settings: &CalcSettings) -> ProjectTotals {
    breakdown(layers, area, settings).totals
}

/// Compute every layer's mix and the project totals.
pub fn breakdown(layers: &[Layer], area: SqMeters, settings: &CalcSettings) -> Breakdown {
    debug!(layers = layers.len(), area_m2 = area.value(), "recomputing totals");

    let mut totals = ProjectTotals {
        area_m2: area,
        ..ProjectTotals::default()
    };
    let pricing = &settings.pricing;

    let layers = layers
        .iter()
        .map(|layer| {
            let mix = mix::calculate(layer, area, &settings.varnish);
            match &mix {
                LayerMix::Resin(resin) => {
                    totals.total_resin_mass = totals.total_resin_mass + resin.total_weight;
                    totals.component_a = totals.component_a + resin.component_a;
                    totals.component_b = totals.component_b + resin.component_b;
                    totals.total_quartz_mass = totals.total_quartz_mass + resin.quartz_weight;
                    totals.estimated_cost += resin.total_weight.value() / 1000.0 * pricing.resin_per_kg;
                }
                LayerMix::Varnish(varnish) => {
                    totals.total_varnish_volume = totals.total_varnish_volume + varnish.total_volume;
                    totals.estimated_cost += varnish.total_volume.value() / 1000.0 * pricing.varnish_per_liter;
                }
            }
            LayerBreakdown {
                layer_id: layer.id,
                name: layer.name.clone(),
                mix,
            }
        })
        .collect();

    Breakdown { layers, totals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::Dimensions;
    use crate::ratio::MixRatio;
    use crate::units::LengthUnit;
    use approx::assert_relative_eq;

    fn stack() -> Vec<Layer> {
        vec![
            Layer::resin("Base coat", 1.0, 1000.0, MixRatio::new(2, 1)).with_quartz(20.0),
            Layer::resin("Color", 2.0, 1000.0, MixRatio::new(2, 1)),
            Layer::varnish("Sealer", 1.0, 150.0, MixRatio::new(1, 1)),
        ]
    }

    #[test]
    fn test_aggregate_mixed_stack() {
        let settings = CalcSettings::default();
        let totals = aggregate(&stack(), SqMeters(40.0), &settings);

        assert_eq!(totals.total_resin_mass, Grams(120_000.0));
        assert_relative_eq!(totals.component_a.value(), 80_000.0, max_relative = 1e-12);
        assert_relative_eq!(totals.component_b.value(), 40_000.0, max_relative = 1e-12);
        assert_eq!(totals.total_quartz_mass, Grams(8_000.0));
        assert_relative_eq!(totals.total_varnish_volume.value(), 3785.0);
        // 120 kg × 45 + 3.785 L × 80
        assert_relative_eq!(totals.estimated_cost, 5400.0 + 302.8, max_relative = 1e-12);
        assert_eq!(totals.resin_kg(), Kilograms(120.0));
    }

    #[test]
    fn test_meter_and_centimeter_equivalence() {
        let settings = CalcSettings::default();
        let layers = vec![Layer::resin("Base", 1.0, 1000.0, MixRatio::new(2, 1))];

        let m = Dimensions::new(4.0, 3.0, LengthUnit::Meter);
        let cm = Dimensions::new(400.0, 300.0, LengthUnit::Centimeter);

        let by_m = aggregate(&layers, m.area_m2(), &settings);
        let by_cm = aggregate(&layers, cm.area_m2(), &settings);
        assert_eq!(by_m, by_cm);
        assert_eq!(by_m.total_resin_mass, Grams(12000.0));
        assert_eq!(by_m.component_a, Grams(8000.0));
        assert_eq!(by_m.component_b, Grams(4000.0));
    }

    #[test]
    fn test_add_then_remove_restores_totals() {
        let settings = CalcSettings::default();
        let mut layers = stack();
        let before = aggregate(&layers, SqMeters(13.7), &settings);

        layers.push(Layer::resin("Extra", 0.3, 1000.0, MixRatio::new(3, 1)).with_quartz(15.0));
        let during = aggregate(&layers, SqMeters(13.7), &settings);
        assert_ne!(before, during);

        layers.pop();
        assert_eq!(aggregate(&layers, SqMeters(13.7), &settings), before);
    }

    #[test]
    fn test_custom_prices() {
        let mut settings = CalcSettings::default();
        settings.pricing.resin_per_kg = 10.0;
        let layers = vec![Layer::resin("Base", 1.0, 1000.0, MixRatio::new(1, 1))];
        let totals = aggregate(&layers, SqMeters(2.0), &settings);
        assert_eq!(totals.estimated_cost, 20.0);
    }

    #[test]
    fn test_breakdown_preserves_order() {
        let settings = CalcSettings::default();
        let layers = stack();
        let result = breakdown(&layers, SqMeters(1.0), &settings);
        let names: Vec<_> = result.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Base coat", "Color", "Sealer"]);
        assert_eq!(result.layers[0].layer_id, layers[0].id);
    }

    #[test]
    fn test_empty_stack() {
        let totals = aggregate(&[], SqMeters(12.0), &CalcSettings::default());
        assert_eq!(totals.total_resin_mass, Grams(0.0));
        assert_eq!(totals.estimated_cost, 0.0);
    }
}
