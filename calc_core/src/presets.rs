//! # Preset Tiers
//!
//! Three named starting points for a coating stack. Each tier is static seed
//! data; [`Tier::seed_layers`] instantiates it with fresh layer ids every
//! time, so two views seeded from the same tier never share an id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::layers::Layer;
use crate::ratio::MixRatio;

/// Consumption rate shared by every seeded resin layer, g/m²/mm
const RESIN_RATE: f64 = 1000.0;

/// Consumption rate carried by seeded varnish layers
const VARNISH_RATE: f64 = 150.0;

/// A named preset configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Economy,
    Mid,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Economy, Tier::Mid, Tier::Premium];

    pub fn display_name(self) -> &'static str {
        match self {
            Tier::Economy => "Economy",
            Tier::Mid => "Mid",
            Tier::Premium => "Premium",
        }
    }

    /// The tier's initial layer stack.
    pub fn seed_layers(self) -> Vec<Layer> {
        let two_to_one = MixRatio::new(2, 1);
        let one_to_one = MixRatio::new(1, 1);

        match self {
            Tier::Economy => vec![
                Layer::resin("Base coat", 0.5, RESIN_RATE, two_to_one).with_quartz(0.0),
                Layer::resin("Color", 2.0, RESIN_RATE, two_to_one).with_quartz(0.0),
                Layer::resin("Resin sealer", 1.0, RESIN_RATE, two_to_one),
            ],
            Tier::Mid => vec![
                Layer::resin("Base coat", 1.0, RESIN_RATE, two_to_one).with_quartz(20.0),
                Layer::resin("Color", 2.0, RESIN_RATE, two_to_one).with_quartz(20.0),
                Layer::resin("Protector (clear)", 1.0, RESIN_RATE, two_to_one).with_quartz(0.0),
                Layer::varnish("Varnish sealer", 0.5, VARNISH_RATE, one_to_one),
            ],
            Tier::Premium => vec![
                Layer::resin("Base coat", 1.0, RESIN_RATE, two_to_one).with_quartz(40.0),
                Layer::resin("Color", 3.0, RESIN_RATE, two_to_one).with_quartz(40.0),
                Layer::resin("Protector (clear)", 2.0, RESIN_RATE, two_to_one).with_quartz(0.0),
                Layer::varnish("Sealer (first coat)", 0.5, VARNISH_RATE, one_to_one),
                Layer::varnish("Sealer (second coat)", 0.5, VARNISH_RATE, one_to_one),
            ],
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Tier {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(Tier::Economy),
            "mid" => Ok(Tier::Mid),
            "premium" => Ok(Tier::Premium),
            other => Err(CalcError::invalid_input("tier", other, "Expected economy, mid or premium")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerKindTag;
    use std::collections::HashSet;

    #[test]
    fn test_layer_counts() {
        assert_eq!(Tier::Economy.seed_layers().len(), 3);
        assert_eq!(Tier::Mid.seed_layers().len(), 4);
        assert_eq!(Tier::Premium.seed_layers().len(), 5);
    }

    #[test]
    fn test_varnish_layers() {
        let varnish = |tier: Tier| {
            tier.seed_layers()
                .iter()
                .filter(|l| l.kind_tag() == LayerKindTag::Varnish)
                .count()
        };
        assert_eq!(varnish(Tier::Economy), 0);
        assert_eq!(varnish(Tier::Mid), 1);
        assert_eq!(varnish(Tier::Premium), 2);
    }

    #[test]
    fn test_ids_are_unique_and_fresh() {
        let first = Tier::Premium.seed_layers();
        let second = Tier::Premium.seed_layers();
        let ids: HashSet<_> = first.iter().chain(second.iter()).map(|l| l.id).collect();
        assert_eq!(ids.len(), first.len() + second.len());
    }

    #[test]
    fn test_economy_sealer_has_no_quartz() {
        let layers = Tier::Economy.seed_layers();
        assert_eq!(layers[2].resin_spec().unwrap().quartz_percentage, None);
        assert_eq!(layers[0].thickness, 0.5);
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("Premium".parse::<Tier>().unwrap(), Tier::Premium);
        assert!("gold".parse::<Tier>().is_err());
    }
}
