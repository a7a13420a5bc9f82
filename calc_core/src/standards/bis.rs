//! Indian Standards (BIS) reference data
//!
//! Ampacities follow IS 7098 (XLPE) / IS 3961 style tables for copper
//! multicore cables at 40 °C air and 30 °C ground. Conductor series, type
//! thresholds and adiabatic constants are shared with IEC.

use crate::loads::CircuitType;

use super::iec::{adiabatic_constants, curve_rules, installation_factors, metric_conductors, metric_ladders, type_rules};
use super::profile::{pt, BreakingCapacity, CircuitDefaults, GroupingEntry, StandardProfile, VoltageDropLimit};
use super::{BreakerType, Standard, TripCurve};

/// Tray, conduit, air, buried, duct (A)
const AMPACITY: [[f64; 5]; 19] = [
    [20.0, 17.0, 21.0, 25.0, 21.0],
    [27.0, 23.0, 28.0, 33.0, 28.0],
    [36.0, 31.0, 38.0, 43.0, 36.0],
    [46.0, 39.0, 48.0, 54.0, 46.0],
    [63.0, 54.0, 66.0, 72.0, 61.0],
    [84.0, 71.0, 88.0, 93.0, 79.0],
    [107.0, 91.0, 112.0, 120.0, 101.0],
    [131.0, 111.0, 138.0, 144.0, 122.0],
    [157.0, 133.0, 165.0, 170.0, 144.0],
    [196.0, 167.0, 206.0, 209.0, 177.0],
    [236.0, 200.0, 248.0, 250.0, 212.0],
    [273.0, 232.0, 287.0, 284.0, 241.0],
    [313.0, 266.0, 329.0, 319.0, 271.0],
    [356.0, 303.0, 374.0, 360.0, 306.0],
    [418.0, 355.0, 439.0, 416.0, 353.0],
    [478.0, 406.0, 502.0, 466.0, 396.0],
    [551.0, 468.0, 579.0, 530.0, 450.0],
    [627.0, 533.0, 658.0, 594.0, 505.0],
    [710.0, 603.0, 746.0, 668.0, 568.0],
];

/// IS 732 / IS 7098 profile
pub fn profile() -> StandardProfile {
    StandardProfile {
        standard: Standard::Is,
        reference: "IS 732:2019 / IS 7098 (Part 1) / IS 13947-2".to_string(),
        reference_ambient_c: 40.0,
        recognized_voltages: vec![
            230.0, 240.0, 415.0, 433.0, 690.0, 3300.0, 6600.0, 11_000.0, 22_000.0, 33_000.0, 66_000.0, 110_000.0,
        ],
        temperature_derating: vec![
            pt(20.0, 1.16),
            pt(25.0, 1.12),
            pt(30.0, 1.08),
            pt(35.0, 1.04),
            pt(40.0, 1.00),
            pt(45.0, 0.95),
            pt(50.0, 0.90),
            pt(55.0, 0.85),
            pt(60.0, 0.80),
        ],
        grouping_derating: [(1, 1.00), (2, 0.84), (3, 0.80), (4, 0.78), (6, 0.75), (8, 0.74), (9, 0.73)]
            .into_iter()
            .map(|(cables, factor)| GroupingEntry { cables, factor })
            .collect(),
        installation_factors: installation_factors(0.90, 0.92),
        conductors: metric_conductors(&AMPACITY),
        voltage_drop_limits: vec![
            VoltageDropLimit { circuit: CircuitType::Lighting, percent: 3.0 },
            VoltageDropLimit { circuit: CircuitType::Power, percent: 5.0 },
        ],
        circuit_defaults: CircuitDefaults {
            lighting: CircuitType::Lighting,
            power: CircuitType::Power,
            feeder: CircuitType::Power,
        },
        breaker_ladders: metric_ladders(),
        breaker_type_rules: type_rules(),
        breaking_capacities: vec![
            BreakingCapacity { breaker_type: BreakerType::Mcb, max_rating_a: None, capacity_ka: 10.0 },
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: Some(250.0), capacity_ka: 25.0 },
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: Some(630.0), capacity_ka: 36.0 },
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: None, capacity_ka: 50.0 },
            BreakingCapacity { breaker_type: BreakerType::Acb, max_rating_a: None, capacity_ka: 65.0 },
            BreakingCapacity { breaker_type: BreakerType::Vcb, max_rating_a: None, capacity_ka: 26.3 },
            BreakingCapacity { breaker_type: BreakerType::Sf6, max_rating_a: None, capacity_ka: 40.0 },
        ],
        curve_rules: curve_rules(),
        default_curve: TripCurve::C,
        short_circuit_constants: adiabatic_constants(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::InstallationMethod;

    #[test]
    fn test_profile_is_valid() {
        profile().validate().unwrap();
    }

    #[test]
    fn test_reference_ambient_is_40c() {
        let p = profile();
        let at_ref = p.temperature_factor(40.0).unwrap();
        assert_eq!(at_ref.value, 1.0);
        assert!(at_ref.notice.is_none());
    }

    #[test]
    fn test_ampacity_columns_ascending() {
        let p = profile();
        for method in InstallationMethod::ALL {
            let column: Vec<f64> = p.conductors.iter().map(|r| r.ampacity.get(method).unwrap()).collect();
            assert!(column.windows(2).all(|w| w[1] > w[0]), "{} column not ascending", method);
        }
    }
}
