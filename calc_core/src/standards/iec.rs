//! IEC 60364 reference data
//!
//! Ampacities follow the IEC 60364-5-52 layout for multicore copper XLPE
//! cables (three loaded conductors) at 30 °C air / 20 °C ground, one column
//! per installation method. Breaker ladders follow IEC 60898 / IEC 60947-2
//! preferred ratings.

use crate::loads::{CircuitType, InstallationMethod, LoadType};
use crate::materials::{ConductorMaterial, Insulation};

use super::profile::{
    pt, BreakerLadder, BreakerTypeRule, BreakingCapacity, CircuitDefaults, ConductorRow, CurveRule,
    GroupingEntry, InstallationFactor, MaterialConstant, MethodAmpacity, StandardProfile, VoltageDropLimit,
};
use super::{BreakerType, Standard, TripCurve, VoltageTier};

/// Metric conductor series shared by IEC and IS: (mm², reactance Ω/km).
///
/// Sizes above 300 mm² carry no tabulated reactance and use the default.
pub(crate) const METRIC_SERIES: [(f64, Option<f64>); 19] = [
    (1.5, Some(0.115)),
    (2.5, Some(0.110)),
    (4.0, Some(0.107)),
    (6.0, Some(0.100)),
    (10.0, Some(0.094)),
    (16.0, Some(0.090)),
    (25.0, Some(0.086)),
    (35.0, Some(0.083)),
    (50.0, Some(0.072)),
    (70.0, Some(0.069)),
    (95.0, Some(0.068)),
    (120.0, Some(0.067)),
    (150.0, Some(0.067)),
    (185.0, Some(0.067)),
    (240.0, Some(0.066)),
    (300.0, Some(0.066)),
    (400.0, None),
    (500.0, None),
    (630.0, None),
];

/// Tray, conduit, air, buried, duct (A)
const AMPACITY: [[f64; 5]; 19] = [
    [22.0, 17.5, 24.0, 27.0, 23.0],
    [30.0, 24.0, 33.0, 35.0, 30.0],
    [40.0, 32.0, 45.0, 46.0, 39.0],
    [51.0, 41.0, 58.0, 58.0, 49.0],
    [70.0, 57.0, 80.0, 77.0, 65.0],
    [94.0, 76.0, 107.0, 100.0, 84.0],
    [119.0, 96.0, 138.0, 129.0, 107.0],
    [147.0, 119.0, 171.0, 155.0, 129.0],
    [168.0, 144.0, 209.0, 183.0, 153.0],
    [213.0, 184.0, 269.0, 225.0, 188.0],
    [258.0, 223.0, 328.0, 270.0, 226.0],
    [299.0, 259.0, 382.0, 306.0, 257.0],
    [344.0, 299.0, 441.0, 343.0, 287.0],
    [392.0, 341.0, 506.0, 387.0, 324.0],
    [461.0, 403.0, 599.0, 448.0, 375.0],
    [530.0, 464.0, 693.0, 502.0, 420.0],
    [615.0, 545.0, 800.0, 570.0, 480.0],
    [700.0, 620.0, 910.0, 640.0, 540.0],
    [800.0, 710.0, 1050.0, 720.0, 600.0],
];

/// Build metric conductor rows from an ampacity table
pub(crate) fn metric_conductors(ampacity: &[[f64; 5]; 19]) -> Vec<ConductorRow> {
    METRIC_SERIES
        .iter()
        .zip(ampacity.iter())
        .map(|(&(size_mm2, reactance), amps)| ConductorRow {
            size_mm2,
            label: format!("{} mm²", size_mm2),
            reactance_ohm_per_km: reactance,
            ampacity: MethodAmpacity::all(*amps),
        })
        .collect()
}

/// IEC 60947-2 / IEC 62271-100 rating ladders
pub(crate) fn metric_ladders() -> Vec<BreakerLadder> {
    vec![
        BreakerLadder {
            tier: VoltageTier::Low,
            ratings: vec![
                6.0, 10.0, 16.0, 20.0, 25.0, 32.0, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0,
                315.0, 400.0, 500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3200.0, 4000.0,
                5000.0, 6300.0,
            ],
        },
        BreakerLadder {
            tier: VoltageTier::Medium,
            ratings: vec![400.0, 630.0, 800.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0],
        },
        BreakerLadder {
            tier: VoltageTier::High,
            ratings: vec![1250.0, 2000.0, 3150.0, 4000.0],
        },
    ]
}

/// Type thresholds: MCB ≤ 125 A, MCCB ≤ 1600 A, ACB above, all ≤ 1 kV;
/// VCB to 36 kV; SF6 above.
pub(crate) fn type_rules() -> Vec<BreakerTypeRule> {
    vec![
        BreakerTypeRule {
            breaker_type: BreakerType::Mcb,
            max_rating_a: Some(125.0),
            max_voltage_v: Some(1000.0),
        },
        BreakerTypeRule {
            breaker_type: BreakerType::Mccb,
            max_rating_a: Some(1600.0),
            max_voltage_v: Some(1000.0),
        },
        BreakerTypeRule {
            breaker_type: BreakerType::Acb,
            max_rating_a: None,
            max_voltage_v: Some(1000.0),
        },
        BreakerTypeRule {
            breaker_type: BreakerType::Vcb,
            max_rating_a: None,
            max_voltage_v: Some(36_000.0),
        },
        BreakerTypeRule {
            breaker_type: BreakerType::Sf6,
            max_rating_a: None,
            max_voltage_v: None,
        },
    ]
}

/// MCB curves: resistive loads B, mixed C, high-inrush D
pub(crate) fn curve_rules() -> Vec<CurveRule> {
    use LoadType::*;
    [
        (Lighting, TripCurve::B),
        (Heating, TripCurve::B),
        (Socket, TripCurve::C),
        (Hvac, TripCurve::C),
        (Ups, TripCurve::C),
        (Feeder, TripCurve::C),
        (General, TripCurve::C),
        (Motor, TripCurve::D),
        (Pump, TripCurve::D),
        (Transformer, TripCurve::D),
        (Welding, TripCurve::D),
    ]
    .into_iter()
    .map(|(load_type, curve)| CurveRule { load_type, curve })
    .collect()
}

/// IEC 60364-4-43 Table 43A
pub(crate) fn adiabatic_constants() -> Vec<MaterialConstant> {
    vec![
        MaterialConstant { material: ConductorMaterial::Copper, insulation: Insulation::Pvc, k: 115.0 },
        MaterialConstant { material: ConductorMaterial::Copper, insulation: Insulation::Xlpe, k: 143.0 },
        MaterialConstant { material: ConductorMaterial::Aluminium, insulation: Insulation::Pvc, k: 76.0 },
        MaterialConstant { material: ConductorMaterial::Aluminium, insulation: Insulation::Xlpe, k: 94.0 },
    ]
}

pub(crate) fn installation_factors(buried: f64, duct: f64) -> Vec<InstallationFactor> {
    vec![
        InstallationFactor { method: InstallationMethod::Tray, factor: 1.0 },
        InstallationFactor { method: InstallationMethod::Conduit, factor: 1.0 },
        InstallationFactor { method: InstallationMethod::Air, factor: 1.0 },
        InstallationFactor { method: InstallationMethod::Buried, factor: buried },
        InstallationFactor { method: InstallationMethod::Duct, factor: duct },
    ]
}

/// IEC 60364 profile
pub fn profile() -> StandardProfile {
    StandardProfile {
        standard: Standard::Iec,
        reference: "IEC 60364-5-52:2009 / IEC 60364-4-43 / IEC 60947-2".to_string(),
        reference_ambient_c: 30.0,
        recognized_voltages: vec![
            230.0, 400.0, 415.0, 690.0, 3300.0, 6600.0, 11_000.0, 22_000.0, 33_000.0, 66_000.0,
        ],
        // Table B.52.14, XLPE
        temperature_derating: vec![
            pt(10.0, 1.15),
            pt(15.0, 1.12),
            pt(20.0, 1.08),
            pt(25.0, 1.04),
            pt(30.0, 1.00),
            pt(35.0, 0.96),
            pt(40.0, 0.91),
            pt(45.0, 0.87),
            pt(50.0, 0.82),
            pt(55.0, 0.76),
            pt(60.0, 0.71),
            pt(65.0, 0.65),
            pt(70.0, 0.58),
        ],
        // Table B.52.17, touching on perforated tray
        grouping_derating: [
            (1, 1.00),
            (2, 0.80),
            (3, 0.70),
            (4, 0.65),
            (5, 0.60),
            (6, 0.57),
            (7, 0.54),
            (8, 0.52),
            (9, 0.50),
            (12, 0.45),
            (16, 0.41),
            (20, 0.38),
        ]
        .into_iter()
        .map(|(cables, factor)| GroupingEntry { cables, factor })
        .collect(),
        // Soil thermal resistivity 2.5 K·m/W
        installation_factors: installation_factors(0.89, 0.92),
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
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: Some(250.0), capacity_ka: 36.0 },
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: Some(630.0), capacity_ka: 50.0 },
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: None, capacity_ka: 70.0 },
            BreakingCapacity { breaker_type: BreakerType::Acb, max_rating_a: Some(3200.0), capacity_ka: 85.0 },
            BreakingCapacity { breaker_type: BreakerType::Acb, max_rating_a: None, capacity_ka: 100.0 },
            BreakingCapacity { breaker_type: BreakerType::Vcb, max_rating_a: Some(1250.0), capacity_ka: 25.0 },
            BreakingCapacity { breaker_type: BreakerType::Vcb, max_rating_a: None, capacity_ka: 40.0 },
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

    #[test]
    fn test_profile_is_valid() {
        profile().validate().unwrap();
    }

    #[test]
    fn test_ampacity_columns_ascending() {
        let p = profile();
        for method in InstallationMethod::ALL {
            let column: Vec<f64> = p.conductors.iter().map(|r| r.ampacity.get(method).unwrap()).collect();
            assert!(column.windows(2).all(|w| w[1] > w[0]), "{} column not ascending", method);
        }
    }

    #[test]
    fn test_tray_values_used_in_worked_example() {
        let p = profile();
        assert_eq!(p.conductor(50.0).unwrap().ampacity.tray, Some(168.0));
        assert_eq!(p.conductor(70.0).unwrap().ampacity.tray, Some(213.0));
    }

    #[test]
    fn test_large_sizes_have_no_reactance() {
        let p = profile();
        assert!(p.conductor(630.0).unwrap().reactance_ohm_per_km.is_none());
        assert!(p.conductor(300.0).unwrap().reactance_ohm_per_km.is_some());
    }
}
