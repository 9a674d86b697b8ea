//! # calc_core - Resin Mix Calculation Engine
//!
//! `calc_core` computes material quantities for layered resin floor coatings:
//! per-layer resin mass, its A/B component split, quartz filler and color
//! allocations, varnish volume, project totals, and a printable report.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Recompute, don't cache**: totals are derived from the current inputs on every read
//! - **Lenient input**: numeric text is coerced, never rejected
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::session::Workbench;
//! use calc_core::settings::CalcSettings;
//!
//! let mut bench = Workbench::new(CalcSettings::default());
//! bench.set_length_text("4");
//! bench.set_width_text("3");
//!
//! let totals = bench.totals();
//! assert_eq!(totals.resin_kg().value(), 42.0);
//! ```
//!
//! ## Modules
//!
//! - [`session`] - Shared dimensions, per-tier layer stacks, export guard
//! - [`layers`] - Layer model and the ordered layer store
//! - [`calculations`] - Per-layer mix and project totals
//! - [`report`] / [`pdf`] - Report building and PDF rendering
//! - [`presets`] - Economy / Mid / Premium seed stacks
//! - [`plan`] - JSON plan input
//! - [`settings`] - Prices and yields from TOML
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod dimensions;
pub mod errors;
pub mod input;
pub mod layers;
pub mod pdf;
pub mod plan;
pub mod presets;
pub mod ratio;
pub mod report;
pub mod session;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{Breakdown, LayerMix, ProjectTotals};
pub use dimensions::Dimensions;
pub use errors::{CalcError, CalcResult};
pub use layers::{ColorEdit, Layer, LayerEdit, LayerKindTag, LayerStore};
pub use plan::Plan;
pub use presets::Tier;
pub use ratio::{MixRatio, RatioPreset};
pub use report::Report;
pub use session::{ViewKey, Workbench};
pub use settings::CalcSettings;
pub use units::LengthUnit;
