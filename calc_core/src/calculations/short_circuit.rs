//! # Short Circuit
//!
//! Prospective fault current and the adiabatic minimum conductor size.
//!
//! A load's fault data comes from its own `fault_level_ka` when given,
//! otherwise from the project's [`FaultSource`]. With neither, the
//! short-circuit criterion and the breaking-capacity check are skipped.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::short_circuit::{min_withstand_size_mm2, system_fault_current_ka};
//!
//! let isc = system_fault_current_ka(415.0, 0.012).unwrap();
//! assert!((isc - 19.97).abs() < 0.01);
//!
//! // Copper/XLPE, k = 143
//! let s = min_withstand_size_mm2(isc, 0.1, 143.0).unwrap();
//! assert!(s > 35.0 && s < 50.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{adiabatic_min_size, source_impedance, symmetrical_fault_current};
use crate::errors::{CalcError, CalcResult};
use crate::loads::Load;

/// Factor applied to the nominal fault current for the conservative minimum
pub const MINIMUM_FAULT_FACTOR: f64 = 0.8;

/// How the upstream network is described
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultSource {
    /// Prospective fault level at the origin of every circuit (kA)
    FaultLevel { fault_level_ka: f64 },
    /// Source impedance to the point of supply (Ω)
    SourceImpedance { impedance_ohm: f64 },
}

/// Fault current and clearing time for one circuit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultData {
    pub fault_current_ka: f64,
    pub clearing_time_s: f64,
}

/// Short-circuit results attached to an enriched load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShortCircuit {
    /// Prospective fault current (kA)
    pub fault_current_ka: f64,
    /// 0.8 × prospective, for coordination checks (kA)
    pub minimum_fault_current_ka: f64,
    pub clearing_time_s: f64,
    /// Adiabatic k used
    pub k: f64,
    /// Continuous adiabatic minimum before rounding to a standard size (mm²)
    pub min_withstand_mm2: f64,
}

/// Symmetrical fault current `V / (√3·Z)` in kA
pub fn system_fault_current_ka(voltage_v: f64, impedance_ohm: f64) -> CalcResult<f64> {
    if !(impedance_ohm.is_finite() && impedance_ohm > 0.0) {
        return Err(CalcError::input_validation(
            "impedance_ohm",
            impedance_ohm.to_string(),
            "Source impedance must be positive",
        ));
    }
    Ok(symmetrical_fault_current(voltage_v, impedance_ohm) / 1000.0)
}

/// Conservative minimum fault current (kA)
pub fn minimum_fault_current_ka(nominal_ka: f64) -> f64 {
    MINIMUM_FAULT_FACTOR * nominal_ka
}

/// Source impedance that yields the given fault level (Ω)
pub fn source_impedance_for_fault_level(voltage_v: f64, fault_level_ka: f64) -> CalcResult<f64> {
    if !(fault_level_ka.is_finite() && fault_level_ka > 0.0) {
        return Err(CalcError::input_validation(
            "fault_level_ka",
            fault_level_ka.to_string(),
            "Fault level must be positive",
        ));
    }
    Ok(source_impedance(voltage_v, fault_level_ka * 1000.0))
}

/// Adiabatic minimum cross-section `√(I²t) / k` (mm²), I in kA
pub fn min_withstand_size_mm2(fault_current_ka: f64, clearing_time_s: f64, k: f64) -> CalcResult<f64> {
    if !(clearing_time_s.is_finite() && clearing_time_s > 0.0) {
        return Err(CalcError::input_validation(
            "fault_clearing_time_s",
            clearing_time_s.to_string(),
            "Clearing time must be positive",
        ));
    }
    if k <= 0.0 {
        return Err(CalcError::Internal {
            message: format!("non-positive adiabatic constant {}", k),
        });
    }
    Ok(adiabatic_min_size(fault_current_ka * 1000.0, clearing_time_s, k))
}

/// Fault data for a load: its own fault level first, then the project source
pub fn resolve_fault(
    load: &Load,
    source: Option<FaultSource>,
    default_clearing_time_s: f64,
) -> CalcResult<Option<FaultData>> {
    let clearing_time_s = load.fault_clearing_time_s.unwrap_or(default_clearing_time_s);
    let fault_current_ka = match (load.fault_level_ka, source) {
        (Some(ka), _) => ka,
        (None, Some(FaultSource::FaultLevel { fault_level_ka })) => fault_level_ka,
        (None, Some(FaultSource::SourceImpedance { impedance_ohm })) => {
            system_fault_current_ka(load.voltage_v, impedance_ohm)?
        }
        (None, None) => return Ok(None),
    };
    if !(fault_current_ka.is_finite() && fault_current_ka > 0.0) {
        return Err(CalcError::input_validation(
            "fault_level_ka",
            fault_current_ka.to_string(),
            "Fault level must be positive",
        ));
    }
    Ok(Some(FaultData {
        fault_current_ka,
        clearing_time_s,
    }))
}

/// Short-circuit figures for one fault and conductor constant
pub fn analyze(fault: FaultData, k: f64) -> CalcResult<ShortCircuit> {
    Ok(ShortCircuit {
        fault_current_ka: fault.fault_current_ka,
        minimum_fault_current_ka: minimum_fault_current_ka(fault.fault_current_ka),
        clearing_time_s: fault.clearing_time_s,
        k,
        min_withstand_mm2: min_withstand_size_mm2(fault.fault_current_ka, fault.clearing_time_s, k)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadType;

    #[test]
    fn test_fault_current_from_impedance() {
        let isc = system_fault_current_ka(415.0, 0.012).unwrap();
        assert!((isc - 415.0 / (3f64.sqrt() * 0.012) / 1000.0).abs() < 1e-12);
        assert!(system_fault_current_ka(415.0, 0.0).is_err());
    }

    #[test]
    fn test_minimum_is_eighty_percent() {
        assert!((minimum_fault_current_ka(25.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_impedance_roundtrip() {
        let z = source_impedance_for_fault_level(415.0, 36.0).unwrap();
        let isc = system_fault_current_ka(415.0, z).unwrap();
        assert!((isc - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_adiabatic_scenario_f_exceeds_largest_size() {
        // 100 kA for 5 s on copper/PVC
        let s = min_withstand_size_mm2(100.0, 5.0, 115.0).unwrap();
        assert!((s - 1944.4).abs() < 0.5, "got {}", s);
        assert!(s > 630.0);
    }

    #[test]
    fn test_adiabatic_grows_with_current_and_time() {
        let base = min_withstand_size_mm2(10.0, 0.1, 143.0).unwrap();
        assert!(min_withstand_size_mm2(20.0, 0.1, 143.0).unwrap() > base);
        assert!(min_withstand_size_mm2(10.0, 0.4, 143.0).unwrap() > base);
        assert!(min_withstand_size_mm2(10.0, 0.0, 143.0).is_err());
    }

    #[test]
    fn test_resolve_fault_precedence() {
        let load = Load::new("F-1", LoadType::Feeder, 100.0, 415.0, 3, 50.0);
        assert_eq!(resolve_fault(&load, None, 0.1).unwrap(), None);

        let project = Some(FaultSource::FaultLevel { fault_level_ka: 25.0 });
        let from_project = resolve_fault(&load, project, 0.1).unwrap().unwrap();
        assert_eq!(from_project.fault_current_ka, 25.0);
        assert_eq!(from_project.clearing_time_s, 0.1);

        let own = load.clone().with_fault(40.0, 0.2);
        let from_load = resolve_fault(&own, project, 0.1).unwrap().unwrap();
        assert_eq!(from_load.fault_current_ka, 40.0);
        assert_eq!(from_load.clearing_time_s, 0.2);

        let impedance = Some(FaultSource::SourceImpedance { impedance_ohm: 0.012 });
        let from_z = resolve_fault(&load, impedance, 0.1).unwrap().unwrap();
        assert!((from_z.fault_current_ka - 19.966).abs() < 0.01);
    }

    #[test]
    fn test_fault_source_serialization() {
        let source = FaultSource::FaultLevel { fault_level_ka: 50.0 };
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, r#"{"kind":"fault_level","fault_level_ka":50.0}"#);
    }
}
