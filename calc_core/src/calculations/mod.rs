//! # Mix Calculations
//!
//! Pure functions over a snapshot of the layer stack and the surface area.
//! Nothing here holds state or caches: callers recompute on every change,
//! which is cheap at the scale of a coating stack (tens of layers at most).
//!
//! - [`mix`] - per-layer quantities (resin weights, varnish volume)
//! - [`totals`] - project totals and cost estimate
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::{mix, totals};
//! use calc_core::layers::Layer;
//! use calc_core::ratio::MixRatio;
//! use calc_core::settings::CalcSettings;
//! use calc_core::units::SqMeters;
//!
//! let settings = CalcSettings::default();
//! let layers = vec![Layer::resin("Base coat", 1.0, 1000.0, MixRatio::new(2, 1))];
//!
//! let result = mix::calculate(&layers[0], SqMeters(12.0), &settings.varnish);
//! assert_eq!(result.resin().unwrap().component_a.value(), 8000.0);
//!
//! let summary = totals::aggregate(&layers, SqMeters(12.0), &settings);
//! assert_eq!(summary.total_resin_mass.value(), 12000.0);
//! ```

pub mod mix;
pub mod totals;

pub use mix::{ColorMix, LayerMix, ResinMix, VarnishMix};
pub use totals::{Breakdown, LayerBreakdown, ProjectTotals};
