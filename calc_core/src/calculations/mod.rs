//! # Sizing Calculations
//!
//! The per-load pipeline and the engines it is built from. Each engine
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - result struct - Calculation results (JSON-serializable)
//! - a pure function `(input, provider) -> CalcResult<result>`
//!
//! ## Pipeline
//!
//! ```text
//! Load ─► validate ─► current ─► cable (ampacity | voltage drop | short circuit) ─► breaker ─► EnrichedLoad
//!                                    ▲                                               ▲
//!                                    └──────────── StandardsProvider ────────────────┘
//! ```
//!
//! ## Available Engines
//!
//! - [`current`] - Operating, design and starting current
//! - [`voltage_drop`] - Absolute and percentage drop at one size
//! - [`short_circuit`] - Fault current and adiabatic withstand
//! - [`cable`] - Three-criterion conductor selection
//! - [`breaker`] - Rating, type, curve and breaking capacity
//! - [`batch`] - Parallel batch runs with fail-fast / best-effort policies
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::calculate;
//! use calc_core::loads::{Load, LoadType};
//! use calc_core::project::GlobalSettings;
//! use calc_core::standards::{Standard, StandardsProvider};
//!
//! let pump = Load::new("P-101", LoadType::Pump, 75.0, 415.0, 3, 120.0)
//!     .with_efficiency(0.92)
//!     .with_ambient(45.0);
//!
//! let iec = StandardsProvider::new(Standard::Iec);
//! let enriched = calculate(&pump, &iec, &GlobalSettings::default()).unwrap();
//! assert_eq!(enriched.cable.size_mm2, 70.0);
//! assert_eq!(enriched.breaker.rating_a, 200.0);
//! ```

pub mod batch;
pub mod breaker;
pub mod cable;
pub mod current;
pub mod short_circuit;
pub mod voltage_drop;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equations::{Equation, EquationTracker, EquationUsage};
use crate::errors::{CalcResult, Criterion, Notice};
use crate::loads::{CircuitType, Load};
use crate::project::GlobalSettings;
use crate::standards::{Standard, StandardsProvider};

// Re-export commonly used types
pub use batch::{calculate_batch, calculate_batch_with, BatchOptions, BatchReport, FailurePolicy, LoadOutcome};
pub use breaker::{Breaker, BreakerSelectionInput};
pub use cable::{CableSelection, CableSizingInput, SizeRequirement};
pub use current::LoadCurrents;
pub use short_circuit::{FaultData, FaultSource, ShortCircuit};
pub use voltage_drop::{VoltageDrop, VoltageDropInput};

/// A load with every derived quantity filled in.
///
/// Produced only by [`calculate`]; either every field is populated or the
/// load failed with a [`CalcError`](crate::errors::CalcError).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedLoad {
    /// The input record, unchanged
    pub load: Load,
    /// Standard the load was sized against
    pub standard: Standard,
    /// Circuit class the voltage-drop limit came from
    pub circuit_type: CircuitType,
    /// Ambient temperature used for derating (°C)
    pub ambient_temp_c: f64,
    pub currents: LoadCurrents,
    pub cable: CableSelection,
    pub breaker: Breaker,
    /// Non-fatal conditions met along the way
    pub notices: Vec<Notice>,
    /// Equations applied, in pipeline order
    pub equations: Vec<EquationUsage>,
}

impl EnrichedLoad {
    /// Operating current (A)
    pub fn current_a(&self) -> f64 {
        self.currents.current_a
    }

    /// Design current (A)
    pub fn design_current_a(&self) -> f64 {
        self.currents.design_current_a
    }

    /// Voltage drop at the selected size
    pub fn voltage_drop(&self) -> &VoltageDrop {
        &self.cable.voltage_drop
    }

    /// Short-circuit figures; `None` when no fault data was available
    pub fn short_circuit(&self) -> Option<&ShortCircuit> {
        self.cable.short_circuit.as_ref()
    }

    /// Criterion that determined the cable size
    pub fn limiting_factor(&self) -> Criterion {
        self.cable.limiting_factor
    }
}

/// Run the full pipeline for one load.
///
/// Validation (including the standard's voltage set) runs before any
/// arithmetic; the first failing stage's error is returned.
pub fn calculate(load: &Load, provider: &StandardsProvider, settings: &GlobalSettings) -> CalcResult<EnrichedLoad> {
    settings.validate()?;
    load.validate()?;
    provider.check_load(load)?;

    let mut tracker = EquationTracker::new();

    let currents = current::calculate(load)?;
    let phase_equation = if load.is_three_phase() {
        Equation::ThreePhaseCurrent
    } else {
        Equation::SinglePhaseCurrent
    };
    tracker.record(phase_equation, "Operating current");
    tracker.record(Equation::DesignCurrent, "Design current");
    if currents.starting_current_a.is_some() {
        tracker.record(Equation::StartingCurrent, "Motor starting current");
    }

    debug!(
        load = %load.id,
        current_a = currents.current_a,
        design_current_a = currents.design_current_a,
        "currents computed"
    );

    let ambient_temp_c = load.ambient_temp_c.unwrap_or(settings.ambient_temp_c);
    let circuit_type = provider.circuit_type_for(load);
    let fault = short_circuit::resolve_fault(load, settings.fault_source, settings.fault_clearing_time_s)?;
    if fault.is_some() && load.fault_level_ka.is_none() {
        if let Some(FaultSource::SourceImpedance { .. }) = settings.fault_source {
            tracker.record(Equation::SystemFaultCurrent, "Fault current from source impedance");
        }
    }

    let cable_input = CableSizingInput {
        design_current_a: currents.design_current_a,
        operating_current_a: currents.current_a,
        voltage_v: load.voltage_v,
        phases: load.phases,
        power_factor: load.power_factor,
        length_m: load.cable_length_m,
        installation_method: load.installation_method,
        ambient_temp_c,
        grouping_factor: load.grouping_factor,
        circuit_type,
        load_type: load.load_type,
        conductor: settings.conductor,
        fault,
    };
    let cable = cable::size_cable(&cable_input, provider)?;

    tracker.record(Equation::TemperatureDerating, format!("Ambient {} °C", ambient_temp_c));
    tracker.record(Equation::CombinedDerating, load.installation_method.to_string());
    tracker.record(Equation::RequiredAmpacity, "Ampacity criterion");
    tracker.record(Equation::ConductorResistance, cable.size_label.clone());
    let drop_equation = if load.is_three_phase() {
        Equation::VoltageDropThreePhase
    } else {
        Equation::VoltageDropSinglePhase
    };
    tracker.record(drop_equation, format!("Voltage drop at {}", cable.size_label));
    tracker.record(Equation::VoltageDropPercent, format!("Limit {}% ({})", cable.voltage_drop_limit_percent, circuit_type));
    if cable.short_circuit.is_some() {
        tracker.record(Equation::MinimumFaultCurrent, "Coordination minimum");
        tracker.record(Equation::AdiabaticWithstand, "Short-circuit criterion");
    }
    tracker.record(Equation::GoverningSize, format!("Limiting factor: {}", cable.limiting_factor));

    let breaker = breaker::select(
        &BreakerSelectionInput {
            design_current_a: currents.design_current_a,
            load_type: load.load_type,
            voltage_v: load.voltage_v,
            phases: load.phases,
            fault_current_ka: fault.map(|f| f.fault_current_ka),
        },
        provider,
    )?;
    tracker.record(Equation::BreakerRating, format!("{} A {}", breaker.rating_a, breaker.breaker_type));
    if fault.is_some() {
        tracker.record(Equation::BreakingCapacityCheck, format!("{} kA", breaker.breaking_capacity_ka));
    }

    let mut notices = Vec::new();
    if let Some(notice) = &cable.derating.notice {
        notices.push(notice.clone());
    }
    if breaker.rating_a > cable.derated_ampacity_a {
        notices.push(Notice::BreakerExceedsCableAmpacity {
            breaker_rating_a: breaker.rating_a,
            derated_ampacity_a: cable.derated_ampacity_a,
        });
    }

    debug!(
        load = %load.id,
        cable = %cable.designation,
        breaker_a = breaker.rating_a,
        breaker_type = %breaker.breaker_type,
        notices = notices.len(),
        "load sized"
    );

    Ok(EnrichedLoad {
        load: load.clone(),
        standard: provider.standard(),
        circuit_type,
        ambient_temp_c,
        currents,
        cable,
        breaker,
        notices,
        equations: tracker.into_usages(),
    })
}

/// Convenience: size one load against a built-in standard with default settings
pub fn calculate_with_standard(load: &Load, standard: Standard) -> CalcResult<EnrichedLoad> {
    let settings = GlobalSettings {
        standard,
        ..GlobalSettings::default()
    };
    calculate(load, &StandardsProvider::new(standard), &settings)
}
