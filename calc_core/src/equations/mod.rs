//! # Electrical Equations
//!
//! This module holds every closed-form equation the sizing engines use.
//! Having equations in one place enables:
//! - Easy verification against the code clauses (IEC 60364, IEC 60909, NEC)
//! - Documentation of assumptions
//! - Consistent implementation across engines
//!
//! ## Modules
//!
//! - [`electrical`] - Current, impedance, voltage drop and fault formulas
//! - [`registry`] - Equation metadata and per-load audit trail
//!
//! ## Conventions
//!
//! - **Voltage**: line-to-line for three-phase, phase voltage for single-phase
//! - **Length**: one-way route length in metres
//! - **Impedance per length**: Ω/km
//! - **Fault current**: kA at API boundaries, A inside the formulas

pub mod electrical;
pub mod registry;

pub use electrical::{
    adiabatic_min_size,
    resistance_per_km,
    sin_phi,
    single_phase_current,
    source_impedance,
    symmetrical_fault_current,
    three_phase_current,
    voltage_drop_percent,
    voltage_drop_single_phase,
    voltage_drop_three_phase,
    SQRT_3,
};

pub use registry::{
    generate_equations_markdown,
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
};
