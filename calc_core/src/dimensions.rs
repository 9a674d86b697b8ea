//! # Surface Dimensions
//!
//! The dimension record is the one piece of state every tier view reads: the
//! surface length and width, the unit they were entered in, and the global
//! mix ratio. It is an ordinary value owned by the caller and passed by
//! reference into calculations, so each test can build its own.
//!
//! ```rust
//! use calc_core::dimensions::Dimensions;
//! use calc_core::units::LengthUnit;
//!
//! let dims = Dimensions::new(400.0, 300.0, LengthUnit::Centimeter);
//! assert_eq!(dims.area_m2().value(), 12.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::input::coerce_non_negative;
use crate::ratio::RatioPreset;
use crate::units::{LengthUnit, SqMeters};

/// Surface dimensions plus the global mix ratio.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Length in `unit` (never negative)
    pub length: f64,

    /// Width in `unit` (never negative)
    pub width: f64,

    /// Unit length and width are expressed in
    pub unit: LengthUnit,

    /// Global ratio, applied to newly added resin layers
    pub ratio: RatioPreset,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, unit: LengthUnit) -> Self {
        Dimensions {
            length: length.max(0.0),
            width: width.max(0.0),
            unit,
            ratio: RatioPreset::default(),
        }
    }

    pub fn with_ratio(mut self, ratio: RatioPreset) -> Self {
        self.ratio = ratio;
        self
    }

    /// `length × width` in the entered unit (m² or cm²)
    pub fn raw_area(&self) -> f64 {
        self.length * self.width
    }

    /// Surface area in square meters
    pub fn area_m2(&self) -> SqMeters {
        self.unit.to_square_meters(self.raw_area())
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length.max(0.0);
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width.max(0.0);
    }

    /// Set the length from raw form text (unparsable text becomes 0)
    pub fn set_length_text(&mut self, raw: &str) {
        self.length = coerce_non_negative(raw);
    }

    /// Set the width from raw form text (unparsable text becomes 0)
    pub fn set_width_text(&mut self, raw: &str) {
        self.width = coerce_non_negative(raw);
    }

    /// Switch units without converting the entered numbers.
    pub fn set_unit(&mut self, unit: LengthUnit) {
        self.unit = unit;
    }

    pub fn set_ratio(&mut self, ratio: RatioPreset) {
        self.ratio = ratio;
    }

    /// Restore the initial empty state.
    pub fn reset(&mut self) {
        *self = Dimensions::default();
    }

    /// Human-readable area in the entered unit, e.g. `"12.00 m²"`.
    pub fn raw_area_label(&self) -> String {
        format!("{:.2} {}²", self.raw_area(), self.unit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_area() {
        let dims = Dimensions::new(4.0, 3.0, LengthUnit::Meter);
        assert_eq!(dims.area_m2(), SqMeters(12.0));
    }

    #[test]
    fn test_centimeter_area_matches_meters() {
        let m = Dimensions::new(4.0, 3.0, LengthUnit::Meter);
        let cm = Dimensions::new(400.0, 300.0, LengthUnit::Centimeter);
        assert_eq!(m.area_m2(), cm.area_m2());
        assert_eq!(cm.raw_area_label(), "120000.00 cm²");
    }

    #[test]
    fn test_text_setters_coerce() {
        let mut dims = Dimensions::default();
        dims.set_length_text("4.5");
        dims.set_width_text("oops");
        assert_eq!(dims.length, 4.5);
        assert_eq!(dims.width, 0.0);

        dims.set_width_text("-2");
        assert_eq!(dims.width, 0.0);
    }

    #[test]
    fn test_reset() {
        let mut dims = Dimensions::new(4.0, 3.0, LengthUnit::Centimeter).with_ratio(RatioPreset::ThreeToOne);
        dims.reset();
        assert_eq!(dims, Dimensions::default());
        assert_eq!(dims.unit, LengthUnit::Meter);
        assert_eq!(dims.ratio, RatioPreset::TwoToOne);
    }

    #[test]
    fn test_negative_lengths_clamped() {
        let mut dims = Dimensions::new(-1.0, 2.0, LengthUnit::Meter);
        assert_eq!(dims.length, 0.0);
        dims.set_length(-5.0);
        assert_eq!(dims.length, 0.0);
    }
}
