//! # Unit Types
//!
//! Type-safe wrappers for the quantities the mix calculator works with. These
//! provide compile-time safety against unit confusion (grams of resin vs.
//! milliliters of varnish) while remaining lightweight (just f64 wrappers).
//!
//! ## Units
//!
//! - Area: square meters (m²) - all calculations run on m²
//! - Thickness: millimeters (mm) for resin; varnish thickness is a coat count
//! - Mass: grams (g), kilograms (kg = 1000 g)
//! - Volume: milliliters (mL), liters (L = 1000 mL)
//!
//! ## Display Rollover
//!
//! [`format_weight`] and [`format_volume`] switch to the larger unit at
//! exactly 1000 of the smaller one:
//!
//! ```rust
//! use calc_core::units::{format_volume, format_weight};
//!
//! assert_eq!(format_weight(999.0), "999 g");
//! assert_eq!(format_weight(1000.0), "1.00 kg");
//! assert_eq!(format_volume(2500.0), "2.50 L");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Threshold at which display switches from g/mL to kg/L
pub const ROLLOVER_THRESHOLD: f64 = 1000.0;

/// Square centimeters per square meter
const CM2_PER_M2: f64 = 10_000.0;

// ============================================================================
// Length Unit Selector
// ============================================================================

/// Unit the surface dimensions are entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Meters
    #[default]
    #[serde(rename = "m")]
    Meter,
    /// Centimeters
    #[serde(rename = "cm")]
    Centimeter,
}

impl LengthUnit {
    /// Short symbol ("m" / "cm")
    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::Centimeter => "cm",
        }
    }

    /// Convert a raw `length × width` product in this unit to square meters.
    pub fn to_square_meters(self, raw_area: f64) -> SqMeters {
        match self {
            LengthUnit::Meter => SqMeters(raw_area),
            LengthUnit::Centimeter => SqMeters(raw_area / CM2_PER_M2),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(LengthUnit::Meter),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeter),
            other => Err(CalcError::invalid_input("unit", other, "Expected 'm' or 'cm'")),
        }
    }
}

// ============================================================================
// Quantities
// ============================================================================

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMeters(pub f64);

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

/// Mass in kilograms (1 kg = 1000 g)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Volume in milliliters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliliters(pub f64);

/// Volume in liters (1 L = 1000 mL)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

impl From<Grams> for Kilograms {
    fn from(g: Grams) -> Self {
        Kilograms(g.0 / 1000.0)
    }
}

impl From<Kilograms> for Grams {
    fn from(kg: Kilograms) -> Self {
        Grams(kg.0 * 1000.0)
    }
}

impl From<Milliliters> for Liters {
    fn from(ml: Milliliters) -> Self {
        Liters(ml.0 / 1000.0)
    }
}

impl From<Liters> for Milliliters {
    fn from(l: Liters) -> Self {
        Milliliters(l.0 * 1000.0)
    }
}

impl fmt::Display for Grams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_weight(self.0))
    }
}

impl fmt::Display for Milliliters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_volume(self.0))
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |acc, x| acc + x)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(SqMeters);
impl_arithmetic!(Grams);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Milliliters);
impl_arithmetic!(Liters);

// ============================================================================
// Display Formatting
// ============================================================================

/// Format a mass in grams, rolling over to kilograms at 1000 g.
///
/// Below the threshold the value is rounded to whole grams; at or above it
/// the value is shown in kilograms with two decimals.
pub fn format_weight(grams: f64) -> String {
    rollover(grams, "g", "kg")
}

/// Format a volume in milliliters, rolling over to liters at 1000 mL.
pub fn format_volume(milliliters: f64) -> String {
    rollover(milliliters, "ml", "L")
}

fn rollover(value: f64, small: &str, large: &str) -> String {
    // Collapse -0.0 so it never prints as "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    if value >= ROLLOVER_THRESHOLD {
        format!("{:.2} {}", value / ROLLOVER_THRESHOLD, large)
    } else {
        format!("{:.0} {}", value, small)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_rollover_boundary() {
        assert_eq!(format_weight(999.0), "999 g");
        assert_eq!(format_weight(1000.0), "1.00 kg");
        assert_eq!(format_weight(12000.0), "12.00 kg");
        assert_eq!(format_weight(0.0), "0 g");
        assert_eq!(format_weight(-0.0), "0 g");
    }

    #[test]
    fn test_volume_rollover_boundary() {
        assert_eq!(format_volume(999.0), "999 ml");
        assert_eq!(format_volume(1000.0), "1.00 L");
        assert_eq!(format_volume(1250.0), "1.25 L");
    }

    #[test]
    fn test_centimeter_area_conversion() {
        let area = LengthUnit::Centimeter.to_square_meters(400.0 * 300.0);
        assert_eq!(area, SqMeters(12.0));
        let area = LengthUnit::Meter.to_square_meters(4.0 * 3.0);
        assert_eq!(area, SqMeters(12.0));
    }

    #[test]
    fn test_grams_to_kilograms() {
        let kg: Kilograms = Grams(8000.0).into();
        assert_eq!(kg.0, 8.0);
        let l: Liters = Milliliters(500.0).into();
        assert_eq!(l.0, 0.5);
    }

    #[test]
    fn test_sum() {
        let total: Grams = [Grams(1.0), Grams(2.5), Grams(3.5)].into_iter().sum();
        assert_eq!(total, Grams(7.0));
    }

    #[test]
    fn test_unit_parsing_and_serialization() {
        assert_eq!("cm".parse::<LengthUnit>().unwrap(), LengthUnit::Centimeter);
        assert_eq!(" M ".parse::<LengthUnit>().unwrap(), LengthUnit::Meter);
        assert!("ft".parse::<LengthUnit>().is_err());

        let json = serde_json::to_string(&LengthUnit::Centimeter).unwrap();
        assert_eq!(json, "\"cm\"");
    }
}
