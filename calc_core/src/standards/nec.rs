//! NEC (NFPA 70) reference data
//!
//! Conductors are the AWG/kcmil series, stored in mm² so every engine works
//! in one unit; labels keep the trade size. Ampacities are the 75 °C
//! copper columns of Table 310.16 (raceway, cable, earth) and Table 310.17
//! (free air), 30 °C ambient. Ratings follow 240.6(A).

use crate::loads::{CircuitType, InstallationMethod};
use crate::units::{Kcmil, SquareMillimeters};

use super::iec::{adiabatic_constants, curve_rules, type_rules};
use super::profile::{
    pt, BreakerLadder, BreakingCapacity, CircuitDefaults, ConductorRow, GroupingEntry, InstallationFactor,
    MethodAmpacity, StandardProfile, VoltageDropLimit,
};
use super::{BreakerType, Standard, TripCurve, VoltageTier};

/// (label, kcmil, reactance Ω/km, Table 310.16 A, Table 310.17 A)
const AWG_SERIES: [(&str, f64, f64, f64, f64); 21] = [
    ("14 AWG", 4.107, 0.190, 20.0, 30.0),
    ("12 AWG", 6.530, 0.177, 25.0, 35.0),
    ("10 AWG", 10.38, 0.164, 35.0, 50.0),
    ("8 AWG", 16.51, 0.171, 50.0, 70.0),
    ("6 AWG", 26.24, 0.167, 65.0, 95.0),
    ("4 AWG", 41.74, 0.157, 85.0, 125.0),
    ("3 AWG", 52.62, 0.154, 100.0, 145.0),
    ("2 AWG", 66.36, 0.148, 115.0, 170.0),
    ("1 AWG", 83.69, 0.151, 130.0, 195.0),
    ("1/0 AWG", 105.6, 0.144, 150.0, 230.0),
    ("2/0 AWG", 133.1, 0.141, 175.0, 265.0),
    ("3/0 AWG", 167.8, 0.138, 200.0, 310.0),
    ("4/0 AWG", 211.6, 0.135, 230.0, 360.0),
    ("250 kcmil", 250.0, 0.135, 255.0, 405.0),
    ("300 kcmil", 300.0, 0.135, 285.0, 445.0),
    ("350 kcmil", 350.0, 0.131, 310.0, 505.0),
    ("400 kcmil", 400.0, 0.131, 335.0, 545.0),
    ("500 kcmil", 500.0, 0.128, 380.0, 620.0),
    ("600 kcmil", 600.0, 0.128, 420.0, 690.0),
    ("750 kcmil", 750.0, 0.125, 475.0, 785.0),
    ("1000 kcmil", 1000.0, 0.121, 545.0, 935.0),
];

fn conductors() -> Vec<ConductorRow> {
    AWG_SERIES
        .iter()
        .map(|&(label, kcmil, reactance, raceway, free_air)| {
            let area: SquareMillimeters = Kcmil(kcmil).into();
            ConductorRow {
                // Two decimals keeps sizes readable in schedules
                size_mm2: (area.value() * 100.0).round() / 100.0,
                label: label.to_string(),
                reactance_ohm_per_km: Some(reactance),
                ampacity: MethodAmpacity {
                    tray: Some(raceway),
                    conduit: Some(raceway),
                    air: Some(free_air),
                    buried: Some(raceway),
                    duct: Some(raceway),
                },
            }
        })
        .collect()
}

/// NEC profile
pub fn profile() -> StandardProfile {
    StandardProfile {
        standard: Standard::Nec,
        reference: "NFPA 70 (NEC) 2023: 310.15, 310.16, 310.17, 240.6".to_string(),
        reference_ambient_c: 30.0,
        recognized_voltages: vec![
            120.0, 208.0, 240.0, 277.0, 480.0, 600.0, 2400.0, 4160.0, 12_470.0, 13_200.0, 13_800.0, 34_500.0,
            69_000.0,
        ],
        // 310.15(B)(1), 75 °C column
        temperature_derating: vec![
            pt(10.0, 1.20),
            pt(15.0, 1.15),
            pt(20.0, 1.11),
            pt(25.0, 1.05),
            pt(30.0, 1.00),
            pt(35.0, 0.94),
            pt(40.0, 0.88),
            pt(45.0, 0.82),
            pt(50.0, 0.75),
            pt(55.0, 0.67),
            pt(60.0, 0.58),
            pt(70.0, 0.33),
        ],
        // 310.15(C)(1) with three current-carrying conductors per cable
        grouping_derating: [(1, 1.00), (2, 0.80), (3, 0.70), (6, 0.50), (13, 0.45), (20, 0.40)]
            .into_iter()
            .map(|(cables, factor)| GroupingEntry { cables, factor })
            .collect(),
        installation_factors: InstallationMethod::ALL
            .into_iter()
            .map(|method| InstallationFactor { method, factor: 1.0 })
            .collect(),
        conductors: conductors(),
        voltage_drop_limits: vec![
            VoltageDropLimit { circuit: CircuitType::Branch, percent: 3.0 },
            VoltageDropLimit { circuit: CircuitType::Feeder, percent: 2.0 },
            VoltageDropLimit { circuit: CircuitType::Combined, percent: 5.0 },
        ],
        circuit_defaults: CircuitDefaults {
            lighting: CircuitType::Branch,
            power: CircuitType::Branch,
            feeder: CircuitType::Feeder,
        },
        breaker_ladders: vec![
            BreakerLadder {
                tier: VoltageTier::Low,
                ratings: vec![
                    15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 125.0,
                    150.0, 175.0, 200.0, 225.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 600.0, 700.0, 800.0,
                    1000.0, 1200.0, 1600.0, 2000.0, 2500.0, 3000.0, 4000.0, 5000.0, 6000.0,
                ],
            },
            BreakerLadder {
                tier: VoltageTier::Medium,
                ratings: vec![600.0, 1200.0, 2000.0, 3000.0],
            },
            BreakerLadder {
                tier: VoltageTier::High,
                ratings: vec![1200.0, 2000.0, 3000.0],
            },
        ],
        breaker_type_rules: type_rules(),
        breaking_capacities: vec![
            BreakingCapacity { breaker_type: BreakerType::Mcb, max_rating_a: None, capacity_ka: 10.0 },
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: Some(250.0), capacity_ka: 25.0 },
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: Some(600.0), capacity_ka: 35.0 },
            BreakingCapacity { breaker_type: BreakerType::Mccb, max_rating_a: None, capacity_ka: 65.0 },
            BreakingCapacity { breaker_type: BreakerType::Acb, max_rating_a: None, capacity_ka: 100.0 },
            BreakingCapacity { breaker_type: BreakerType::Vcb, max_rating_a: Some(1200.0), capacity_ka: 25.0 },
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
    fn test_awg_areas() {
        let p = profile();
        let first = &p.conductors[0];
        assert_eq!(first.label, "14 AWG");
        assert!((first.size_mm2 - 2.08).abs() < 0.01);
        let kcmil_250 = p.conductors.iter().find(|r| r.label == "250 kcmil").unwrap();
        assert!((kcmil_250.size_mm2 - 126.68).abs() < 0.01);
    }

    #[test]
    fn test_feeder_limit_is_two_percent() {
        assert_eq!(profile().voltage_drop_limit(CircuitType::Feeder).unwrap(), 2.0);
    }

    #[test]
    fn test_no_lighting_limit() {
        assert!(profile().voltage_drop_limit(CircuitType::Lighting).is_err());
    }
}
