//! # Layers and the Layer Store
//!
//! A coating is built from an ordered stack of layers. Each layer is either
//! a two-component **resin** (weighed in grams, split into components A and
//! B, optionally loaded with quartz and pigmented with colors) or a
//! **varnish** top coat (measured in milliliters by coverage).
//!
//! The kind-specific fields live inside [`LayerKind`], so a varnish layer
//! cannot carry quartz or colors.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "id": "6f1c...",
//!   "name": "Base coat",
//!   "thickness": 1.0,
//!   "kind": "resin",
//!   "consumption_rate": 1000.0,
//!   "ratio": "2:1",
//!   "quartz_percentage": 20.0,
//!   "colors": [{ "id": "9a0e...", "name": "Grey", "percentage": 5.0 }]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::layers::{Layer, LayerEdit, LayerStore};
//! use calc_core::ratio::MixRatio;
//!
//! let mut store = LayerStore::default();
//! let id = store.add(Layer::resin("Base coat", 1.0, 1000.0, MixRatio::new(2, 1)));
//! store.update(id, LayerEdit::Thickness(2.0)).unwrap();
//! assert_eq!(store.get(id).unwrap().thickness, 2.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::input::{coerce_integer, coerce_non_negative, coerce_number};
use crate::ratio::MixRatio;
use crate::settings::LayerDefaults;

/// One layer of the coating stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique id (generated when missing from a plan file)
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// User label (e.g., "Base coat")
    pub name: String,

    /// Millimeters for resin; number of coats for varnish. Never negative.
    pub thickness: f64,

    /// Kind discriminant plus kind-specific fields
    #[serde(flatten)]
    pub kind: LayerKind,
}

/// Kind-specific layer data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerKind {
    Resin(ResinSpec),
    Varnish(VarnishSpec),
}

/// Fields of a resin layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResinSpec {
    /// Grams of mixed resin per m² per mm of thickness
    pub consumption_rate: f64,

    /// This layer's A:B mixing ratio
    #[serde(default)]
    pub ratio: MixRatio,

    /// Quartz filler as a percentage of the layer weight (unset = none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quartz_percentage: Option<f64>,

    /// Pigment allocations as percentages of the layer weight
    #[serde(default)]
    pub colors: Vec<ColorShare>,
}

/// Fields of a varnish layer.
///
/// The consumption rate and ratio ride along so switching a layer between
/// kinds keeps them; the coverage formula uses neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarnishSpec {
    pub consumption_rate: f64,
    pub ratio: MixRatio,
}

impl Default for VarnishSpec {
    fn default() -> Self {
        VarnishSpec {
            consumption_rate: 150.0,
            ratio: MixRatio::new(1, 1),
        }
    }
}

/// A pigment's share of a resin layer's weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorShare {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// 0-100 by convention; values above 100 over-allocate and are allowed
    pub percentage: f64,
}

impl ColorShare {
    pub fn new(name: impl Into<String>, percentage: f64) -> Self {
        ColorShare {
            id: Uuid::new_v4(),
            name: name.into(),
            percentage,
        }
    }
}

/// Bare layer kind, used by the kind selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKindTag {
    Resin,
    Varnish,
}

impl LayerKindTag {
    pub fn label(self) -> &'static str {
        match self {
            LayerKindTag::Resin => "Resin",
            LayerKindTag::Varnish => "Varnish",
        }
    }
}

impl fmt::Display for LayerKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LayerKindTag {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resin" => Ok(LayerKindTag::Resin),
            "varnish" | "topcoat" | "top-coat" => Ok(LayerKindTag::Varnish),
            other => Err(CalcError::invalid_input("kind", other, "Expected 'resin' or 'varnish'")),
        }
    }
}

impl Layer {
    /// Create a resin layer with no quartz and no colors.
    pub fn resin(name: impl Into<String>, thickness_mm: f64, consumption_rate: f64, ratio: MixRatio) -> Self {
        Layer {
            id: Uuid::new_v4(),
            name: name.into(),
            thickness: thickness_mm.max(0.0),
            kind: LayerKind::Resin(ResinSpec {
                consumption_rate,
                ratio,
                quartz_percentage: None,
                colors: Vec::new(),
            }),
        }
    }

    /// Create a varnish layer of `coats` coats.
    pub fn varnish(name: impl Into<String>, coats: f64, consumption_rate: f64, ratio: MixRatio) -> Self {
        Layer {
            id: Uuid::new_v4(),
            name: name.into(),
            thickness: coats.max(0.0),
            kind: LayerKind::Varnish(VarnishSpec { consumption_rate, ratio }),
        }
    }

    /// Set the quartz percentage (resin layers only; ignored on varnish).
    pub fn with_quartz(mut self, percentage: f64) -> Self {
        if let LayerKind::Resin(spec) = &mut self.kind {
            spec.quartz_percentage = Some(percentage);
        }
        self
    }

    /// Add a color allocation (resin layers only; ignored on varnish).
    pub fn with_color(mut self, name: impl Into<String>, percentage: f64) -> Self {
        if let LayerKind::Resin(spec) = &mut self.kind {
            spec.colors.push(ColorShare::new(name, percentage));
        }
        self
    }

    pub fn kind_tag(&self) -> LayerKindTag {
        match self.kind {
            LayerKind::Resin(_) => LayerKindTag::Resin,
            LayerKind::Varnish(_) => LayerKindTag::Varnish,
        }
    }

    pub fn resin_spec(&self) -> Option<&ResinSpec> {
        match &self.kind {
            LayerKind::Resin(spec) => Some(spec),
            LayerKind::Varnish(_) => None,
        }
    }

    fn resin_mut(&mut self) -> CalcResult<&mut ResinSpec> {
        let id = self.id;
        match &mut self.kind {
            LayerKind::Resin(spec) => Ok(spec),
            LayerKind::Varnish(_) => Err(CalcError::invalid_input(
                "kind",
                id.to_string(),
                "Only resin layers carry quartz and colors",
            )),
        }
    }

    /// Consumption rate regardless of kind
    pub fn consumption_rate(&self) -> f64 {
        match &self.kind {
            LayerKind::Resin(spec) => spec.consumption_rate,
            LayerKind::Varnish(spec) => spec.consumption_rate,
        }
    }

    /// Mix ratio regardless of kind
    pub fn ratio(&self) -> MixRatio {
        match &self.kind {
            LayerKind::Resin(spec) => spec.ratio,
            LayerKind::Varnish(spec) => spec.ratio,
        }
    }

    /// Thickness label as shown in tables: `"2 mm"` or `"0.5 coats"`.
    pub fn thickness_label(&self) -> String {
        match self.kind {
            LayerKind::Resin(_) => format!("{} mm", self.thickness),
            LayerKind::Varnish(_) => format!("{} coats", self.thickness),
        }
    }

    /// Switch the layer kind, keeping the consumption rate and ratio.
    ///
    /// Quartz and colors are dropped when a resin layer becomes varnish.
    pub fn set_kind(&mut self, tag: LayerKindTag) {
        if self.kind_tag() == tag {
            return;
        }
        let consumption_rate = self.consumption_rate();
        let ratio = self.ratio();
        self.kind = match tag {
            LayerKindTag::Resin => LayerKind::Resin(ResinSpec {
                consumption_rate,
                ratio,
                quartz_percentage: None,
                colors: Vec::new(),
            }),
            LayerKindTag::Varnish => LayerKind::Varnish(VarnishSpec { consumption_rate, ratio }),
        };
    }

    /// Apply a single field edit.
    pub fn apply(&mut self, edit: LayerEdit) -> CalcResult<()> {
        match edit {
            LayerEdit::Name(name) => self.name = name,
            LayerEdit::Thickness(t) => self.thickness = t.max(0.0),
            LayerEdit::ConsumptionRate(rate) => match &mut self.kind {
                LayerKind::Resin(spec) => spec.consumption_rate = rate,
                LayerKind::Varnish(spec) => spec.consumption_rate = rate,
            },
            LayerEdit::Ratio(ratio) => match &mut self.kind {
                LayerKind::Resin(spec) => spec.ratio = ratio,
                LayerKind::Varnish(spec) => spec.ratio = ratio,
            },
            LayerEdit::QuartzPercentage(pct) => self.resin_mut()?.quartz_percentage = Some(pct),
            LayerEdit::Kind(tag) => self.set_kind(tag),
        }
        Ok(())
    }
}

/// A single field edit on a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEdit {
    Name(String),
    Thickness(f64),
    ConsumptionRate(f64),
    Ratio(MixRatio),
    QuartzPercentage(f64),
    Kind(LayerKindTag),
}

impl LayerEdit {
    /// Build an edit from a field name and the raw text typed into it.
    ///
    /// Numeric text is coerced (garbage becomes 0); only an unknown field
    /// name or kind is an error.
    pub fn from_field(field: &str, raw: &str) -> CalcResult<Self> {
        let edit = match field.trim().to_ascii_lowercase().as_str() {
            "name" => LayerEdit::Name(raw.trim().to_string()),
            "thickness" | "coats" => LayerEdit::Thickness(coerce_non_negative(raw)),
            "consumption" | "consumption_rate" | "rate" => LayerEdit::ConsumptionRate(coerce_number(raw)),
            "ratio" => LayerEdit::Ratio(MixRatio::parse_lenient(raw)),
            "quartz" | "quartz_percentage" => LayerEdit::QuartzPercentage(coerce_integer(raw)),
            "kind" | "type" => LayerEdit::Kind(raw.parse()?),
            other => {
                return Err(CalcError::invalid_input(
                    "field",
                    other,
                    "Expected one of name, thickness, consumption, ratio, quartz, kind",
                ))
            }
        };
        Ok(edit)
    }
}

/// A single field edit on a color allocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorEdit {
    Name(String),
    Percentage(f64),
}

impl ColorEdit {
    pub fn from_field(field: &str, raw: &str) -> CalcResult<Self> {
        match field.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(ColorEdit::Name(raw.trim().to_string())),
            "percentage" | "pct" | "%" => Ok(ColorEdit::Percentage(coerce_number(raw))),
            other => Err(CalcError::invalid_input("field", other, "Expected 'name' or 'percentage'")),
        }
    }
}

/// Ordered, mutable sequence of layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerStore {
    layers: Vec<Layer>,
}

impl LayerStore {
    pub fn new(layers: Vec<Layer>) -> Self {
        LayerStore { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Replace the whole stack (used when a tier view is reset).
    pub fn replace_all(&mut self, layers: Vec<Layer>) {
        self.layers = layers;
    }

    /// Append a layer, returning its id.
    pub fn add(&mut self, layer: Layer) -> Uuid {
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// Append a resin layer named "Layer N" with default values.
    pub fn add_default(&mut self, defaults: &LayerDefaults, ratio: MixRatio) -> Uuid {
        let name = format!("Layer {}", self.layers.len() + 1);
        self.add(Layer::resin(name, defaults.thickness, defaults.consumption_rate, ratio).with_quartz(0.0))
    }

    /// Remove a layer by id, returning it if it existed.
    pub fn remove(&mut self, id: Uuid) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Id of the layer at a zero-based position.
    pub fn id_at(&self, index: usize) -> Option<Uuid> {
        self.layers.get(index).map(|l| l.id)
    }

    fn require_mut(&mut self, id: Uuid) -> CalcResult<&mut Layer> {
        self.get_mut(id).ok_or_else(|| CalcError::layer_not_found(id))
    }

    /// Apply a field edit to the layer with `id`.
    pub fn update(&mut self, id: Uuid, edit: LayerEdit) -> CalcResult<()> {
        self.require_mut(id)?.apply(edit)
    }

    /// Add a color to a resin layer, returning the color's id.
    pub fn add_color(&mut self, layer_id: Uuid, name: impl Into<String>, percentage: f64) -> CalcResult<Uuid> {
        let color = ColorShare::new(name, percentage);
        let color_id = color.id;
        self.require_mut(layer_id)?.resin_mut()?.colors.push(color);
        Ok(color_id)
    }

    /// Edit a color on a resin layer.
    pub fn update_color(&mut self, layer_id: Uuid, color_id: Uuid, edit: ColorEdit) -> CalcResult<()> {
        let spec = self.require_mut(layer_id)?.resin_mut()?;
        let color = spec
            .colors
            .iter_mut()
            .find(|c| c.id == color_id)
            .ok_or_else(|| CalcError::color_not_found(layer_id, color_id))?;
        match edit {
            ColorEdit::Name(name) => color.name = name,
            ColorEdit::Percentage(pct) => color.percentage = pct,
        }
        Ok(())
    }

    /// Remove a color from a resin layer.
    pub fn remove_color(&mut self, layer_id: Uuid, color_id: Uuid) -> CalcResult<ColorShare> {
        let spec = self.require_mut(layer_id)?.resin_mut()?;
        let index = spec
            .colors
            .iter()
            .position(|c| c.id == color_id)
            .ok_or_else(|| CalcError::color_not_found(layer_id, color_id))?;
        Ok(spec.colors.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_coat() -> Layer {
        Layer::resin("Base coat", 1.0, 1000.0, MixRatio::new(2, 1)).with_quartz(20.0)
    }

    #[test]
    fn test_add_default_layer() {
        let mut store = LayerStore::new(vec![base_coat()]);
        let id = store.add_default(&LayerDefaults::default(), MixRatio::new(3, 1));

        let layer = store.get(id).unwrap();
        assert_eq!(layer.name, "Layer 2");
        assert_eq!(layer.thickness, 1.0);
        assert_eq!(layer.kind_tag(), LayerKindTag::Resin);
        assert_eq!(layer.consumption_rate(), 1000.0);
        assert_eq!(layer.ratio(), MixRatio::new(3, 1));
        assert_eq!(layer.resin_spec().unwrap().quartz_percentage, Some(0.0));
    }

    #[test]
    fn test_remove_layer() {
        let mut store = LayerStore::default();
        let id = store.add(base_coat());
        assert_eq!(store.len(), 1);

        let removed = store.remove(id);
        assert!(removed.is_some());
        assert!(store.is_empty());
        assert!(store.remove(id).is_none());
    }

    #[test]
    fn test_update_unknown_layer() {
        let mut store = LayerStore::default();
        let err = store.update(Uuid::new_v4(), LayerEdit::Thickness(1.0)).unwrap_err();
        assert_eq!(err.error_code(), "LAYER_NOT_FOUND");
    }

    #[test]
    fn test_field_edits_coerce() {
        let mut store = LayerStore::default();
        let id = store.add(base_coat());

        store.update(id, LayerEdit::from_field("thickness", "abc").unwrap()).unwrap();
        assert_eq!(store.get(id).unwrap().thickness, 0.0);

        store.update(id, LayerEdit::from_field("thickness", "-3").unwrap()).unwrap();
        assert_eq!(store.get(id).unwrap().thickness, 0.0);

        store.update(id, LayerEdit::from_field("quartz", "35.7").unwrap()).unwrap();
        assert_eq!(store.get(id).unwrap().resin_spec().unwrap().quartz_percentage, Some(35.0));

        store.update(id, LayerEdit::from_field("quartz", "1e3").unwrap()).unwrap();
        assert_eq!(store.get(id).unwrap().resin_spec().unwrap().quartz_percentage, Some(1.0));

        store.update(id, LayerEdit::from_field("ratio", "nonsense").unwrap()).unwrap();
        assert!(store.get(id).unwrap().ratio().is_degenerate());

        assert!(LayerEdit::from_field("density", "1").is_err());
    }

    #[test]
    fn test_quartz_rejected_on_varnish() {
        let mut store = LayerStore::default();
        let id = store.add(Layer::varnish("Sealer", 1.0, 150.0, MixRatio::new(1, 1)));

        let err = store.update(id, LayerEdit::QuartzPercentage(10.0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(store.add_color(id, "Red", 5.0).is_err());
    }

    #[test]
    fn test_kind_switch_keeps_shared_fields() {
        let mut layer = base_coat().with_color("Grey", 10.0);
        layer.set_kind(LayerKindTag::Varnish);
        assert_eq!(layer.kind_tag(), LayerKindTag::Varnish);
        assert_eq!(layer.consumption_rate(), 1000.0);
        assert_eq!(layer.ratio(), MixRatio::new(2, 1));

        layer.set_kind(LayerKindTag::Resin);
        let spec = layer.resin_spec().unwrap();
        assert!(spec.colors.is_empty());
        assert_eq!(spec.quartz_percentage, None);
    }

    #[test]
    fn test_color_lifecycle() {
        let mut store = LayerStore::default();
        let layer_id = store.add(base_coat());

        let color_id = store.add_color(layer_id, "Grey", 10.0).unwrap();
        store.update_color(layer_id, color_id, ColorEdit::from_field("pct", "25").unwrap()).unwrap();
        store.update_color(layer_id, color_id, ColorEdit::Name("Slate".into())).unwrap();

        let color = &store.get(layer_id).unwrap().resin_spec().unwrap().colors[0];
        assert_eq!(color.name, "Slate");
        assert_eq!(color.percentage, 25.0);

        let removed = store.remove_color(layer_id, color_id).unwrap();
        assert_eq!(removed.id, color_id);
        let err = store.remove_color(layer_id, color_id).unwrap_err();
        assert_eq!(err.error_code(), "COLOR_NOT_FOUND");
    }

    #[test]
    fn test_thickness_labels() {
        assert_eq!(base_coat().thickness_label(), "1 mm");
        let sealer = Layer::varnish("Sealer", 0.5, 150.0, MixRatio::new(1, 1));
        assert_eq!(sealer.thickness_label(), "0.5 coats");
    }

    #[test]
    fn test_layer_json_shape() {
        let layer = base_coat();
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["kind"], "resin");
        assert_eq!(json["ratio"], "2:1");
        assert_eq!(json["quartz_percentage"], 20.0);

        let roundtrip: Layer = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip, layer);
    }

    #[test]
    fn test_layer_json_without_id() {
        let json = r#"{"name":"Sealer","thickness":0.5,"kind":"varnish"}"#;
        let layer: Layer = serde_json::from_str(json).unwrap();
        assert_eq!(layer.kind_tag(), LayerKindTag::Varnish);
        assert_eq!(layer.consumption_rate(), 150.0);
        assert!(!layer.id.is_nil());
    }
}
