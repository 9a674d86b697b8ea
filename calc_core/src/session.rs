//! # Workbench
//!
//! The state a calculator front end works against: one [`Dimensions`]
//! record shared by every view, one layer stack per view (each preset tier,
//! plus an optional loaded plan), the active view, and the export guard.
//!
//! The workbench is a plain value. Front ends own it and mutate it only
//! through the methods below; every read of totals recomputes from the
//! current snapshot.
//!
//! ## Export idempotency
//!
//! Exports are requested and handled in two steps. [`Workbench::request_export`]
//! issues a fresh request id; [`Workbench::export`] produces the report the
//! first time it sees an id and returns `None` when called again with the id
//! it last handled, so a redraw that replays the same request never exports
//! twice.
//!
//! ```rust
//! use calc_core::session::Workbench;
//! use calc_core::settings::CalcSettings;
//! use chrono::NaiveDate;
//!
//! let mut bench = Workbench::new(CalcSettings::default());
//! bench.set_length_text("4");
//! bench.set_width_text("3");
//!
//! let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
//! let request = bench.request_export();
//! assert!(bench.export(request, date).is_some());
//! assert!(bench.export(request, date).is_none());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculations::totals::{self, Breakdown, ProjectTotals};
use crate::dimensions::Dimensions;
use crate::errors::{CalcError, CalcResult};
use crate::layers::{ColorEdit, ColorShare, Layer, LayerEdit, LayerStore};
use crate::plan::Plan;
use crate::presets::Tier;
use crate::ratio::RatioPreset;
use crate::report::{build_report, Report};
use crate::settings::CalcSettings;
use crate::units::LengthUnit;

/// Identifies a layer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKey {
    Tier(Tier),
    Plan,
}

impl ViewKey {
    pub fn label(self) -> &'static str {
        match self {
            ViewKey::Tier(tier) => tier.display_name(),
            ViewKey::Plan => "Plan",
        }
    }
}

/// A layer stack plus the seed it resets to.
#[derive(Debug, Clone)]
pub struct LayerView {
    key: ViewKey,
    seed: Vec<Layer>,
    store: LayerStore,
}

impl LayerView {
    pub fn new(key: ViewKey, seed: Vec<Layer>) -> Self {
        LayerView {
            key,
            store: LayerStore::new(seed.clone()),
            seed,
        }
    }

    pub fn key(&self) -> ViewKey {
        self.key
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Restore the seed layers.
    pub fn reset(&mut self) {
        self.store.replace_all(self.seed.clone());
    }
}

/// Remembers the last export request handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportGuard {
    last_handled: Option<u64>,
}

impl ExportGuard {
    /// True if `request_id` should be handled; records it as handled.
    pub fn accept(&mut self, request_id: u64) -> bool {
        if self.last_handled == Some(request_id) {
            return false;
        }
        self.last_handled = Some(request_id);
        true
    }

    pub fn last_handled(&self) -> Option<u64> {
        self.last_handled
    }
}

/// Shared calculator state for one session.
#[derive(Debug, Clone)]
pub struct Workbench {
    dimensions: Dimensions,
    settings: CalcSettings,
    views: Vec<LayerView>,
    active: usize,
    next_export_request: u64,
    export_guard: ExportGuard,
}

impl Workbench {
    /// A workbench with one view per preset tier, Economy active.
    pub fn new(settings: CalcSettings) -> Self {
        let views = Tier::ALL
            .into_iter()
            .map(|tier| LayerView::new(ViewKey::Tier(tier), tier.seed_layers()))
            .collect();
        Workbench {
            dimensions: Dimensions::default(),
            settings,
            views,
            active: 0,
            next_export_request: 0,
            export_guard: ExportGuard::default(),
        }
    }

    /// A workbench whose active view is the given plan.
    pub fn with_plan(settings: CalcSettings, plan: Plan) -> Self {
        let mut bench = Workbench::new(settings);
        bench.dimensions = plan.dimensions;
        bench.views.push(LayerView::new(ViewKey::Plan, plan.layers));
        bench.active = bench.views.len() - 1;
        bench
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn settings(&self) -> &CalcSettings {
        &self.settings
    }

    pub fn active_view(&self) -> ViewKey {
        self.views[self.active].key
    }

    pub fn view_keys(&self) -> Vec<ViewKey> {
        self.views.iter().map(|v| v.key).collect()
    }

    pub fn layers(&self) -> &LayerStore {
        &self.views[self.active].store
    }

    fn layers_mut(&mut self) -> &mut LayerStore {
        &mut self.views[self.active].store
    }

    /// Switch the active view. Returns false if no such view exists.
    pub fn select(&mut self, key: ViewKey) -> bool {
        match self.views.iter().position(|v| v.key == key) {
            Some(index) => {
                self.active = index;
                debug!(view = key.label(), "switched view");
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Dimensions
    // ------------------------------------------------------------------

    pub fn set_length_text(&mut self, raw: &str) {
        self.dimensions.set_length_text(raw);
    }

    pub fn set_width_text(&mut self, raw: &str) {
        self.dimensions.set_width_text(raw);
    }

    pub fn set_unit(&mut self, unit: LengthUnit) {
        self.dimensions.set_unit(unit);
    }

    pub fn set_ratio(&mut self, ratio: RatioPreset) {
        self.dimensions.set_ratio(ratio);
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    /// Append a default resin layer using the global ratio.
    pub fn add_layer(&mut self) -> Uuid {
        let defaults = self.settings.defaults.clone();
        let ratio = self.dimensions.ratio.ratio();
        self.layers_mut().add_default(&defaults, ratio)
    }

    pub fn remove_layer(&mut self, id: Uuid) -> CalcResult<Layer> {
        self.layers_mut().remove(id).ok_or_else(|| CalcError::layer_not_found(id))
    }

    pub fn update_layer(&mut self, id: Uuid, edit: LayerEdit) -> CalcResult<()> {
        self.layers_mut().update(id, edit)
    }

    pub fn add_color(&mut self, layer_id: Uuid, name: impl Into<String>, percentage: f64) -> CalcResult<Uuid> {
        self.layers_mut().add_color(layer_id, name, percentage)
    }

    pub fn update_color(&mut self, layer_id: Uuid, color_id: Uuid, edit: ColorEdit) -> CalcResult<()> {
        self.layers_mut().update_color(layer_id, color_id, edit)
    }

    pub fn remove_color(&mut self, layer_id: Uuid, color_id: Uuid) -> CalcResult<ColorShare> {
        self.layers_mut().remove_color(layer_id, color_id)
    }

    /// Reset the dimensions and every view back to its seed.
    pub fn reset_all(&mut self) {
        self.dimensions.reset();
        for view in &mut self.views {
            view.reset();
        }
        info!("reset dimensions and layers");
    }

    // ------------------------------------------------------------------
    // Calculations
    // ------------------------------------------------------------------

    /// Per-layer mixes and totals for the active view.
    pub fn breakdown(&self) -> Breakdown {
        totals::breakdown(self.layers().layers(), self.dimensions.area_m2(), &self.settings)
    }

    pub fn totals(&self) -> ProjectTotals {
        self.breakdown().totals
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Issue a new export request id.
    pub fn request_export(&mut self) -> u64 {
        self.next_export_request += 1;
        self.next_export_request
    }

    /// Build the report for `request_id`, once.
    ///
    /// Returns `None` when `request_id` is the request last handled.
    pub fn export(&mut self, request_id: u64, date: NaiveDate) -> Option<Report> {
        if !self.export_guard.accept(request_id) {
            debug!(request_id, "export request already handled");
            return None;
        }
        let totals = self.totals();
        let report = build_report(self.layers().layers(), &self.dimensions, &totals, &self.settings, date);
        info!(request_id, view = self.active_view().label(), rows = report.rows.len(), "built report");
        Some(report)
    }

    /// The current inputs as a plan document.
    pub fn to_plan(&self) -> Plan {
        let mut plan = Plan::new(self.dimensions, self.layers().layers().to_vec());
        plan.meta.title = Some(self.active_view().label().to_string());
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Grams;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn bench_4x3() -> Workbench {
        let mut bench = Workbench::new(CalcSettings::default());
        bench.set_length_text("4");
        bench.set_width_text("3");
        bench
    }

    #[test]
    fn test_starts_on_economy() {
        let bench = Workbench::new(CalcSettings::default());
        assert_eq!(bench.active_view(), ViewKey::Tier(Tier::Economy));
        assert_eq!(bench.layers().len(), 3);
        assert_eq!(bench.view_keys().len(), 3);
    }

    #[test]
    fn test_economy_totals() {
        let bench = bench_4x3();
        // 12 m² × (0.5 + 2 + 1) mm × 1000 g
        assert_eq!(bench.totals().total_resin_mass, Grams(42_000.0));
    }

    #[test]
    fn test_views_share_dimensions() {
        let mut bench = bench_4x3();
        assert!(bench.select(ViewKey::Tier(Tier::Premium)));
        assert_eq!(bench.dimensions().area_m2().value(), 12.0);
        // 12 × (1 + 3 + 2) × 1000
        assert_eq!(bench.totals().total_resin_mass, Grams(72_000.0));
        assert!(!bench.select(ViewKey::Plan));
    }

    #[test]
    fn test_views_keep_their_own_layers() {
        let mut bench = bench_4x3();
        bench.add_layer();
        assert_eq!(bench.layers().len(), 4);

        bench.select(ViewKey::Tier(Tier::Premium));
        assert_eq!(bench.layers().len(), 5);
        bench.select(ViewKey::Tier(Tier::Economy));
        assert_eq!(bench.layers().len(), 4);
        assert_eq!(bench.layers().layers()[3].name, "Layer 4");
    }

    #[test]
    fn test_add_layer_uses_global_ratio() {
        let mut bench = bench_4x3();
        bench.set_ratio(RatioPreset::ThreeToOne);
        let id = bench.add_layer();
        assert_eq!(bench.layers().get(id).unwrap().ratio(), RatioPreset::ThreeToOne.ratio());
    }

    #[test]
    fn test_add_then_remove_restores_totals() {
        let mut bench = bench_4x3();
        let before = bench.totals();

        let id = bench.add_layer();
        assert_ne!(bench.totals(), before);

        bench.remove_layer(id).unwrap();
        assert_eq!(bench.totals(), before);
        assert!(bench.remove_layer(id).is_err());
    }

    #[test]
    fn test_unit_switch_changes_area() {
        let mut bench = bench_4x3();
        bench.set_unit(LengthUnit::Centimeter);
        assert_eq!(bench.dimensions().area_m2().value(), 12.0 / 10_000.0);
    }

    #[test]
    fn test_reset_all() {
        let mut bench = bench_4x3();
        let first = bench.layers().id_at(0).unwrap();
        bench.update_layer(first, LayerEdit::Thickness(9.0)).unwrap();
        bench.add_layer();
        bench.set_unit(LengthUnit::Centimeter);

        bench.reset_all();
        assert_eq!(*bench.dimensions(), Dimensions::default());
        assert_eq!(bench.layers().len(), 3);
        assert_eq!(bench.layers().layers()[0].thickness, 0.5);
        assert_eq!(bench.layers().id_at(0), Some(first));
    }

    #[test]
    fn test_export_fires_once_per_request() {
        let mut bench = bench_4x3();

        let first = bench.request_export();
        assert!(bench.export(first, date()).is_some());
        assert!(bench.export(first, date()).is_none());

        let second = bench.request_export();
        assert_ne!(first, second);
        let report = bench.export(second, date()).unwrap();
        assert_eq!(report.rows.len(), 3);
        assert!(bench.export(second, date()).is_none());
    }

    #[test]
    fn test_export_guard_unaffected_by_view_switch() {
        let mut bench = bench_4x3();
        let request = bench.request_export();
        assert!(bench.export(request, date()).is_some());

        bench.select(ViewKey::Tier(Tier::Premium));
        bench.select(ViewKey::Tier(Tier::Economy));
        assert!(bench.export(request, date()).is_none());
    }

    #[test]
    fn test_with_plan() {
        let plan = Plan::from_tier(Tier::Mid);
        let bench = Workbench::with_plan(CalcSettings::default(), plan);
        assert_eq!(bench.active_view(), ViewKey::Plan);
        assert_eq!(bench.layers().len(), 4);
        assert_eq!(bench.view_keys().len(), 4);
    }

    #[test]
    fn test_to_plan() {
        let bench = bench_4x3();
        let plan = bench.to_plan();
        assert_eq!(plan.dimensions.length, 4.0);
        assert_eq!(plan.layers.len(), 3);
        assert_eq!(plan.meta.title.as_deref(), Some("Economy"));
    }

    #[test]
    fn test_color_passthrough() {
        let mut bench = bench_4x3();
        let layer = bench.layers().id_at(1).unwrap();
        let color = bench.add_color(layer, "Grey", 50.0).unwrap();

        let breakdown = bench.breakdown();
        let mix = breakdown.layers[1].mix.resin().unwrap();
        assert_eq!(mix.colors[0].total, Grams(12_000.0));

        bench.update_color(layer, color, ColorEdit::Percentage(25.0)).unwrap();
        assert_eq!(bench.breakdown().layers[1].mix.resin().unwrap().colors[0].total, Grams(6_000.0));

        bench.remove_color(layer, color).unwrap();
        assert!(bench.breakdown().layers[1].mix.resin().unwrap().colors.is_empty());
    }
}
