//! # Unit Types
//!
//! Type-safe wrappers for electrical engineering units. These provide
//! compile-time safety against unit confusion while remaining lightweight
//! (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Power distribution sizing uses a small, consistent set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## SI Units (Primary)
//!
//! The engine works in SI internally, matching IEC and IS practice:
//! - Power: kilowatts (kW); horsepower (hp) accepted at the edges
//! - Length: metres (m); feet (ft) accepted at the edges
//! - Conductor area: square millimetres (mm²); kcmil for NEC labels
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Feet, Meters, Horsepower, Kilowatts};
//!
//! let run: Meters = Feet(328.084).into();
//! assert!((run.0 - 100.0).abs() < 1e-3);
//!
//! let motor: Kilowatts = Horsepower(100.0).into();
//! assert!((motor.0 - 74.57).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Watts per mechanical horsepower
const WATTS_PER_HP: f64 = 745.699_872;

/// Square millimetres per kcmil (thousand circular mils)
const MM2_PER_KCMIL: f64 = 0.506_707_479;

/// Metres per foot
const METERS_PER_FOOT: f64 = 0.3048;

// ============================================================================
// Power Units
// ============================================================================

/// Power in kilowatts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

/// Mechanical power in horsepower
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Horsepower(pub f64);

impl From<Horsepower> for Kilowatts {
    fn from(hp: Horsepower) -> Self {
        Kilowatts(hp.0 * WATTS_PER_HP / 1000.0)
    }
}

impl From<Kilowatts> for Horsepower {
    fn from(kw: Kilowatts) -> Self {
        Horsepower(kw.0 * 1000.0 / WATTS_PER_HP)
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 * METERS_PER_FOOT)
    }
}

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 / METERS_PER_FOOT)
    }
}

// ============================================================================
// Conductor Area Units
// ============================================================================

/// Conductor cross-section in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMillimeters(pub f64);

/// Conductor cross-section in kcmil (thousand circular mils)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kcmil(pub f64);

impl From<Kcmil> for SquareMillimeters {
    fn from(k: Kcmil) -> Self {
        SquareMillimeters(k.0 * MM2_PER_KCMIL)
    }
}

impl From<SquareMillimeters> for Kcmil {
    fn from(mm2: SquareMillimeters) -> Self {
        Kcmil(mm2.0 / MM2_PER_KCMIL)
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

impl_arithmetic!(Kilowatts);
impl_arithmetic!(Horsepower);
impl_arithmetic!(Meters);
impl_arithmetic!(Feet);
impl_arithmetic!(SquareMillimeters);
impl_arithmetic!(Kcmil);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_meters() {
        let m: Meters = Feet(100.0).into();
        assert!((m.0 - 30.48).abs() < 1e-9);
    }

    #[test]
    fn test_kcmil_to_mm2() {
        // 250 kcmil ≈ 126.7 mm²
        let mm2: SquareMillimeters = Kcmil(250.0).into();
        assert!((mm2.0 - 126.68).abs() < 0.01);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let kw = Kilowatts(75.0);
        let json = serde_json::to_string(&kw).unwrap();
        assert_eq!(json, "75.0");

        let roundtrip: Kilowatts = serde_json::from_str(&json).unwrap();
        assert_eq!(kw, roundtrip);
    }
}
