//! # Cable Sizing
//!
//! Selects one standard conductor size from three independent minimum
//! requirements:
//!
//! 1. **Ampacity**: smallest size whose tabulated ampacity covers
//!    `design_current / derating`
//! 2. **Voltage drop**: smallest size whose drop is within the circuit's limit
//! 3. **Short-circuit withstand**: smallest size at or above `√(I²t) / k`
//!    (only when fault data is available)
//!
//! The selected size is the **largest** of the three minimums, and the
//! criterion that produced it is reported as the limiting factor. On a tie
//! the earlier criterion in the list above is reported.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::cable::{size_cable, CableSizingInput};
//! use calc_core::errors::Criterion;
//! use calc_core::loads::{CircuitType, InstallationMethod, LoadType};
//! use calc_core::materials::Conductor;
//! use calc_core::standards::{Standard, StandardsProvider};
//!
//! let iec = StandardsProvider::new(Standard::Iec);
//! let input = CableSizingInput {
//!     design_current_a: 166.8,
//!     operating_current_a: 133.4,
//!     voltage_v: 415.0,
//!     phases: 3,
//!     power_factor: 0.85,
//!     length_m: 120.0,
//!     installation_method: InstallationMethod::Tray,
//!     ambient_temp_c: 45.0,
//!     grouping_factor: 1.0,
//!     circuit_type: CircuitType::Power,
//!     load_type: LoadType::Motor,
//!     conductor: Conductor::default(),
//!     fault: None,
//! };
//!
//! let cable = size_cable(&input, &iec).unwrap();
//! assert_eq!(cable.size_mm2, 70.0);
//! assert_eq!(cable.limiting_factor, Criterion::Ampacity);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::short_circuit::{analyze, FaultData, ShortCircuit};
use crate::calculations::voltage_drop::{drop, VoltageDrop, VoltageDropInput};
use crate::errors::{CalcError, CalcResult, Criterion};
use crate::loads::{CircuitType, InstallationMethod, LoadType};
use crate::materials::Conductor;
use crate::standards::{ConductorRow, Derating, StandardsProvider, VoltageTier};

/// Tolerance when comparing a requirement against a tabulated value
const SIZE_TOLERANCE: f64 = 1e-9;

/// Inputs to the cable sizing engine for one circuit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableSizingInput {
    pub design_current_a: f64,
    /// Current used for the voltage-drop criterion (A)
    pub operating_current_a: f64,
    pub voltage_v: f64,
    pub phases: u8,
    pub power_factor: f64,
    pub length_m: f64,
    pub installation_method: InstallationMethod,
    pub ambient_temp_c: f64,
    pub grouping_factor: f64,
    pub circuit_type: CircuitType,
    pub load_type: LoadType,
    pub conductor: Conductor,
    /// Fault data; `None` skips the short-circuit criterion
    pub fault: Option<FaultData>,
}

/// One criterion's minimum requirement and the smallest size meeting it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRequirement {
    pub criterion: Criterion,
    /// What the criterion demands: tabulated amps, permitted drop %, or mm²
    pub required: f64,
    /// What the minimum size provides in the same unit
    pub achieved: f64,
    pub unit: String,
    /// Smallest standard size meeting the criterion (mm²)
    pub min_size_mm2: f64,
}

/// Selected cable and the evidence behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSelection {
    /// Selected cross-section (mm²)
    pub size_mm2: f64,
    /// Trade size label ("70 mm²", "4/0 AWG")
    pub size_label: String,
    pub cores: u8,
    pub armoured: bool,
    pub conductor: Conductor,
    /// e.g. "4C x 70 mm² Cu/XLPE/SWA"
    pub designation: String,
    pub tabulated_ampacity_a: f64,
    pub derating: Derating,
    /// Tabulated ampacity × derating (A)
    pub derated_ampacity_a: f64,
    /// Voltage drop at the selected size
    pub voltage_drop: VoltageDrop,
    /// Permitted drop for the circuit class (%)
    pub voltage_drop_limit_percent: f64,
    pub short_circuit: Option<ShortCircuit>,
    /// Ampacity, voltage drop, and (when fault data exists) short circuit
    pub requirements: Vec<SizeRequirement>,
    /// Criterion that set the final size
    pub limiting_factor: Criterion,
}

/// Number of cores for a circuit
pub fn cores_for(phases: u8, voltage_v: f64, load_type: LoadType) -> u8 {
    if phases == 1 {
        2
    } else if VoltageTier::from_voltage(voltage_v) != VoltageTier::Low {
        3
    } else if load_type.needs_neutral() {
        4
    } else {
        3
    }
}

/// Armour is required underground and above 1 kV
pub fn is_armoured(method: InstallationMethod, voltage_v: f64) -> bool {
    method.is_underground() || VoltageTier::from_voltage(voltage_v) != VoltageTier::Low
}

/// Cable designation string
pub fn designation(cores: u8, size_label: &str, conductor: Conductor, armoured: bool) -> String {
    let armour = if armoured { "/SWA" } else { "" };
    format!("{}C x {} {}{}", cores, size_label, conductor.designation(), armour)
}

/// Ampacity criterion: smallest size with tabulated ampacity ≥ Ib / derating
pub fn ampacity_requirement(
    input: &CableSizingInput,
    derating: &Derating,
    provider: &StandardsProvider,
) -> CalcResult<SizeRequirement> {
    let required = input.design_current_a / derating.factor;
    let mut largest = 0.0;
    for row in provider.conductor_sizes() {
        let ampacity = provider.ampacity(row.size_mm2, input.installation_method)?;
        if ampacity + SIZE_TOLERANCE >= required {
            return Ok(SizeRequirement {
                criterion: Criterion::Ampacity,
                required,
                achieved: ampacity,
                unit: "A".to_string(),
                min_size_mm2: row.size_mm2,
            });
        }
        largest = ampacity;
    }
    Err(CalcError::capacity_exceeded(Criterion::Ampacity, required, largest, "A"))
}

/// Voltage-drop criterion: first size whose percent drop is within the limit
pub fn voltage_drop_requirement(
    input: &CableSizingInput,
    limit_percent: f64,
    provider: &StandardsProvider,
) -> CalcResult<SizeRequirement> {
    let mut worst_at_largest = f64::INFINITY;
    for row in provider.conductor_sizes() {
        let vd = drop(&drop_input(input, row.size_mm2), provider);
        if vd.percent <= limit_percent {
            return Ok(SizeRequirement {
                criterion: Criterion::VoltageDrop,
                required: limit_percent,
                achieved: vd.percent,
                unit: "%".to_string(),
                min_size_mm2: row.size_mm2,
            });
        }
        worst_at_largest = vd.percent;
    }
    Err(CalcError::capacity_exceeded(
        Criterion::VoltageDrop,
        worst_at_largest,
        limit_percent,
        "%",
    ))
}

/// Short-circuit criterion: smallest size at or above the adiabatic minimum
pub fn short_circuit_requirement(
    short_circuit: &ShortCircuit,
    provider: &StandardsProvider,
) -> CalcResult<SizeRequirement> {
    let required = short_circuit.min_withstand_mm2;
    let sizes = provider.conductor_sizes();
    match sizes.iter().find(|row| row.size_mm2 + SIZE_TOLERANCE >= required) {
        Some(row) => Ok(SizeRequirement {
            criterion: Criterion::ShortCircuitWithstand,
            required,
            achieved: row.size_mm2,
            unit: "mm²".to_string(),
            min_size_mm2: row.size_mm2,
        }),
        None => {
            let largest = sizes.last().map_or(0.0, |row| row.size_mm2);
            Err(CalcError::capacity_exceeded(
                Criterion::ShortCircuitWithstand,
                required,
                largest,
                "mm²",
            ))
        }
    }
}

/// The binding requirement: largest minimum size, earliest criterion on ties
pub fn governing_requirement(requirements: &[SizeRequirement]) -> Option<&SizeRequirement> {
    let mut governing: Option<&SizeRequirement> = None;
    for req in requirements {
        match governing {
            Some(current) if req.min_size_mm2 <= current.min_size_mm2 => {}
            _ => governing = Some(req),
        }
    }
    governing
}

fn drop_input(input: &CableSizingInput, size_mm2: f64) -> VoltageDropInput {
    VoltageDropInput {
        current_a: input.operating_current_a,
        size_mm2,
        length_m: input.length_m,
        phases: input.phases,
        power_factor: input.power_factor,
        voltage_v: input.voltage_v,
        conductor: input.conductor,
    }
}

/// Size a cable for one circuit.
///
/// # Errors
///
/// - `CapacityExceeded` naming the first criterion no standard size satisfies
/// - `StandardsDataMissing` when the profile lacks an ampacity, limit or k entry
pub fn size_cable(input: &CableSizingInput, provider: &StandardsProvider) -> CalcResult<CableSelection> {
    let derating = provider.derating(input.installation_method, input.ambient_temp_c, input.grouping_factor)?;
    let limit_percent = provider.voltage_drop_limit(input.circuit_type)?;

    let mut requirements = vec![
        ampacity_requirement(input, &derating, provider)?,
        voltage_drop_requirement(input, limit_percent, provider)?,
    ];

    let short_circuit = match input.fault {
        Some(fault) => {
            let k = provider.short_circuit_material_constant(input.conductor)?;
            let sc = analyze(fault, k)?;
            requirements.push(short_circuit_requirement(&sc, provider)?);
            Some(sc)
        }
        None => None,
    };

    let governing = governing_requirement(&requirements)
        .ok_or_else(|| CalcError::Internal {
            message: "no sizing requirement evaluated".to_string(),
        })?;
    let limiting_factor = governing.criterion;
    let row: &ConductorRow = provider.conductor(governing.min_size_mm2)?;

    let tabulated_ampacity_a = provider.ampacity(row.size_mm2, input.installation_method)?;
    let derated_ampacity_a = tabulated_ampacity_a * derating.factor;
    let voltage_drop = drop(&drop_input(input, row.size_mm2), provider);

    let cores = cores_for(input.phases, input.voltage_v, input.load_type);
    let armoured = is_armoured(input.installation_method, input.voltage_v);

    debug!(
        size_mm2 = row.size_mm2,
        limiting = %limiting_factor,
        derating = derating.factor,
        derated_ampacity_a,
        voltage_drop_pct = voltage_drop.percent,
        "cable selected"
    );

    Ok(CableSelection {
        size_mm2: row.size_mm2,
        size_label: row.label.clone(),
        cores,
        armoured,
        conductor: input.conductor,
        designation: designation(cores, &row.label, input.conductor, armoured),
        tabulated_ampacity_a,
        derating,
        derated_ampacity_a,
        voltage_drop,
        voltage_drop_limit_percent: limit_percent,
        short_circuit,
        requirements,
        limiting_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConductorMaterial, Insulation};
    use crate::standards::Standard;

    fn motor_input() -> CableSizingInput {
        CableSizingInput {
            design_current_a: 166.8,
            operating_current_a: 133.4,
            voltage_v: 415.0,
            phases: 3,
            power_factor: 0.85,
            length_m: 120.0,
            installation_method: InstallationMethod::Tray,
            ambient_temp_c: 45.0,
            grouping_factor: 1.0,
            circuit_type: CircuitType::Power,
            load_type: LoadType::Motor,
            conductor: Conductor::new(ConductorMaterial::Copper, Insulation::Xlpe),
            fault: None,
        }
    }

    fn iec() -> StandardsProvider {
        StandardsProvider::new(Standard::Iec)
    }

    #[test]
    fn test_scenario_b_ampacity_selects_70() {
        let p = iec();
        let input = motor_input();
        let derating = p.derating(input.installation_method, 45.0, 1.0).unwrap();
        let req = ampacity_requirement(&input, &derating, &p).unwrap();
        // 166.8 / 0.87 = 191.7 A required: 50 mm² (168 A) fails, 70 mm² (213 A) passes
        assert!((req.required - 191.7).abs() < 0.1);
        assert_eq!(req.min_size_mm2, 70.0);
        assert_eq!(req.achieved, 213.0);
    }

    #[test]
    fn test_scenario_c_voltage_drop_not_binding() {
        let p = iec();
        let req = voltage_drop_requirement(&motor_input(), 5.0, &p).unwrap();
        // 25 mm² drops ~5.3 %, 35 mm² is the first compliant size
        assert_eq!(req.min_size_mm2, 35.0);
        let cable = size_cable(&motor_input(), &p).unwrap();
        assert_eq!(cable.size_mm2, 70.0);
        assert_eq!(cable.limiting_factor, Criterion::Ampacity);
        assert!((cable.voltage_drop.percent - 2.03).abs() < 0.05);
    }

    #[test]
    fn test_selection_invariants() {
        let p = iec();
        let cable = size_cable(&motor_input(), &p).unwrap();
        assert!(cable.derated_ampacity_a >= 166.8 - 1e-9);
        assert!(cable.voltage_drop.percent <= cable.voltage_drop_limit_percent);
        assert_eq!(cable.designation, "3C x 70 mm² Cu/XLPE");
        assert!(!cable.armoured);
        assert!(cable.short_circuit.is_none());
        assert_eq!(cable.requirements.len(), 2);
    }

    #[test]
    fn test_long_run_voltage_drop_binds() {
        let p = iec();
        let mut input = motor_input();
        input.length_m = 400.0;
        let cable = size_cable(&input, &p).unwrap();
        assert_eq!(cable.limiting_factor, Criterion::VoltageDrop);
        assert!(cable.size_mm2 > 70.0);
        assert!(cable.voltage_drop.percent <= 5.0);
    }

    #[test]
    fn test_fault_binds_and_reports_short_circuit() {
        let p = iec();
        let mut input = motor_input();
        input.fault = Some(FaultData { fault_current_ka: 50.0, clearing_time_s: 0.5 });
        let cable = size_cable(&input, &p).unwrap();
        // √(50000² × 0.5) / 143 = 247 mm² -> 300 mm²
        assert_eq!(cable.limiting_factor, Criterion::ShortCircuitWithstand);
        assert_eq!(cable.size_mm2, 300.0);
        let sc = cable.short_circuit.unwrap();
        assert!((sc.min_withstand_mm2 - 247.2).abs() < 0.1);
        assert_eq!(sc.k, 143.0);
    }

    #[test]
    fn test_scenario_f_short_circuit_capacity_exceeded() {
        let p = iec();
        let mut input = motor_input();
        input.fault = Some(FaultData { fault_current_ka: 100.0, clearing_time_s: 5.0 });
        let err = size_cable(&input, &p).unwrap_err();
        assert_eq!(err.criterion(), Some(Criterion::ShortCircuitWithstand));
        match err {
            CalcError::CapacityExceeded { available, shortfall, .. } => {
                assert_eq!(available, 630.0);
                assert!(shortfall > 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ampacity_capacity_exceeded() {
        let p = iec();
        let mut input = motor_input();
        input.design_current_a = 2000.0;
        let err = size_cable(&input, &p).unwrap_err();
        assert_eq!(err.criterion(), Some(Criterion::Ampacity));
    }

    #[test]
    fn test_voltage_drop_capacity_exceeded() {
        let p = iec();
        let mut input = motor_input();
        input.length_m = 5000.0;
        let err = size_cable(&input, &p).unwrap_err();
        assert_eq!(err.criterion(), Some(Criterion::VoltageDrop));
    }

    #[test]
    fn test_monotonic_in_design_current() {
        let p = iec();
        let mut last = 0.0;
        for step in 1..=40 {
            let mut input = motor_input();
            input.design_current_a = step as f64 * 15.0;
            input.operating_current_a = input.design_current_a / 1.25;
            let size = size_cable(&input, &p).unwrap().size_mm2;
            assert!(size >= last, "size decreased at {} A", input.design_current_a);
            last = size;
        }
    }

    #[test]
    fn test_governing_tie_prefers_earlier_criterion() {
        let req = |criterion, size| SizeRequirement {
            criterion,
            required: 0.0,
            achieved: 0.0,
            unit: String::new(),
            min_size_mm2: size,
        };
        let reqs = vec![
            req(Criterion::Ampacity, 70.0),
            req(Criterion::VoltageDrop, 70.0),
            req(Criterion::ShortCircuitWithstand, 50.0),
        ];
        assert_eq!(governing_requirement(&reqs).unwrap().criterion, Criterion::Ampacity);
        assert!(governing_requirement(&[]).is_none());
    }

    #[test]
    fn test_cores_and_armour() {
        assert_eq!(cores_for(1, 230.0, LoadType::Lighting), 2);
        assert_eq!(cores_for(3, 415.0, LoadType::Motor), 3);
        assert_eq!(cores_for(3, 415.0, LoadType::Feeder), 4);
        assert_eq!(cores_for(3, 11_000.0, LoadType::Feeder), 3);
        assert!(is_armoured(InstallationMethod::Buried, 415.0));
        assert!(is_armoured(InstallationMethod::Tray, 11_000.0));
        assert!(!is_armoured(InstallationMethod::Conduit, 415.0));
    }

    #[test]
    fn test_nec_label_in_designation() {
        let nec = StandardsProvider::new(Standard::Nec);
        let mut input = motor_input();
        input.voltage_v = 480.0;
        input.ambient_temp_c = 30.0;
        input.circuit_type = CircuitType::Branch;
        input.length_m = 30.0;
        input.installation_method = InstallationMethod::Buried;
        let cable = size_cable(&input, &nec).unwrap();
        // 166.8 A at 30 °C: 1/0 AWG (150 A) fails, 2/0 AWG (175 A) passes
        assert_eq!(cable.size_label, "2/0 AWG");
        assert_eq!(cable.designation, "3C x 2/0 AWG Cu/XLPE/SWA");
    }
}
