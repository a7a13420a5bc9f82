//! # Voltage Drop
//!
//! Absolute and percentage voltage drop along a cable run.
//!
//! Resistance comes from the conductor's resistivity corrected to the
//! insulation's rated operating temperature; reactance comes from the
//! standard's size-keyed table, falling back to
//! [`DEFAULT_REACTANCE_OHM_PER_KM`](crate::standards::DEFAULT_REACTANCE_OHM_PER_KM).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::voltage_drop::{drop, VoltageDropInput};
//! use calc_core::materials::Conductor;
//! use calc_core::standards::{Standard, StandardsProvider};
//!
//! let iec = StandardsProvider::new(Standard::Iec);
//! let input = VoltageDropInput {
//!     current_a: 134.0,
//!     size_mm2: 70.0,
//!     length_m: 120.0,
//!     phases: 3,
//!     power_factor: 0.85,
//!     voltage_v: 415.0,
//!     conductor: Conductor::default(),
//! };
//! let vd = drop(&input, &iec);
//! assert!(vd.percent < 5.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{resistance_per_km, voltage_drop_percent, voltage_drop_single_phase, voltage_drop_three_phase};
use crate::materials::Conductor;
use crate::standards::StandardsProvider;

/// Everything the drop formula needs for one size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropInput {
    pub current_a: f64,
    pub size_mm2: f64,
    /// One-way route length (m)
    pub length_m: f64,
    pub phases: u8,
    pub power_factor: f64,
    /// System voltage the percentage refers to (V)
    pub voltage_v: f64,
    pub conductor: Conductor,
}

/// Voltage drop at one conductor size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageDrop {
    /// Conductor size the drop was evaluated at (mm²)
    pub size_mm2: f64,
    pub resistance_ohm_per_km: f64,
    pub reactance_ohm_per_km: f64,
    pub volts: f64,
    pub percent: f64,
}

/// Resistance per km at the insulation's rated operating temperature
pub fn resistance_ohm_per_km(conductor: Conductor, size_mm2: f64) -> f64 {
    resistance_per_km(conductor.operating_resistivity(), size_mm2)
}

/// Voltage drop for the given run
pub fn drop(input: &VoltageDropInput, provider: &StandardsProvider) -> VoltageDrop {
    let r = resistance_ohm_per_km(input.conductor, input.size_mm2);
    let x = provider.reactance(input.size_mm2);
    let volts = if input.phases == 3 {
        voltage_drop_three_phase(input.current_a, input.length_m, r, x, input.power_factor)
    } else {
        voltage_drop_single_phase(input.current_a, input.length_m, r, x, input.power_factor)
    };
    VoltageDrop {
        size_mm2: input.size_mm2,
        resistance_ohm_per_km: r,
        reactance_ohm_per_km: x,
        volts,
        percent: voltage_drop_percent(volts, input.voltage_v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConductorMaterial, Insulation};
    use crate::standards::{Standard, DEFAULT_REACTANCE_OHM_PER_KM};

    fn scenario_c(size_mm2: f64) -> VoltageDropInput {
        VoltageDropInput {
            current_a: 134.0,
            size_mm2,
            length_m: 120.0,
            phases: 3,
            power_factor: 0.85,
            voltage_v: 415.0,
            conductor: Conductor::new(ConductorMaterial::Copper, Insulation::Xlpe),
        }
    }

    #[test]
    fn test_resistance_at_operating_temperature() {
        let r = resistance_ohm_per_km(Conductor::default(), 70.0);
        assert!((r - 0.3141).abs() < 1e-3);
    }

    #[test]
    fn test_scenario_c_70mm2() {
        let iec = StandardsProvider::new(Standard::Iec);
        let vd = drop(&scenario_c(70.0), &iec);
        // Limit at 415 V and 5 % is 20.75 V
        assert!((vd.volts - 8.4).abs() < 0.2, "got {} V", vd.volts);
        assert!((vd.percent - 2.02).abs() < 0.05, "got {} %", vd.percent);
        assert!(vd.percent <= 5.0);
        assert_eq!(vd.reactance_ohm_per_km, 0.069);
    }

    #[test]
    fn test_drop_decreases_with_size() {
        let iec = StandardsProvider::new(Standard::Iec);
        let drops: Vec<f64> = iec
            .conductor_sizes()
            .iter()
            .map(|row| drop(&scenario_c(row.size_mm2), &iec).percent)
            .collect();
        assert!(drops.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_untabulated_reactance_uses_default() {
        let iec = StandardsProvider::new(Standard::Iec);
        let vd = drop(&scenario_c(630.0), &iec);
        assert_eq!(vd.reactance_ohm_per_km, DEFAULT_REACTANCE_OHM_PER_KM);
    }

    #[test]
    fn test_single_phase_uses_return_conductor() {
        let iec = StandardsProvider::new(Standard::Iec);
        let mut input = scenario_c(10.0);
        input.phases = 1;
        input.voltage_v = 230.0;
        input.current_a = 20.0;
        input.length_m = 30.0;
        let vd = drop(&input, &iec);
        let r = resistance_ohm_per_km(input.conductor, 10.0);
        let sin = (1.0f64 - 0.85 * 0.85).sqrt();
        let expected = 2.0 * 20.0 * 30.0 * (r * 0.85 + 0.094 * sin) / 1000.0;
        assert!((vd.volts - expected).abs() < 1e-9);
    }
}
