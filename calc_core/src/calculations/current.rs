//! # Load Current
//!
//! Operating, design and starting current of a load.
//!
//! ## Formulas
//!
//! | Quantity  | Three-phase                 | Single-phase            |
//! |-----------|-----------------------------|-------------------------|
//! | I         | 1000·P / (√3·V·PF·η)        | 1000·P / (V·PF·η)       |
//! | Ib        | 1.25·I if continuous or motor, else I                 |
//! | Ist       | m·I for motors with a starting method                 |
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::current::{current, design_current};
//! use calc_core::loads::{Load, LoadType};
//!
//! let motor = Load::new("M-1", LoadType::Motor, 75.0, 415.0, 3, 120.0)
//!     .with_power_factor(0.85)
//!     .with_efficiency(0.92);
//!
//! let i = current(&motor).unwrap();
//! let ib = design_current(&motor, i);
//! assert!((i - 133.43).abs() < 0.01);
//! assert!((ib - 166.79).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{single_phase_current, three_phase_current};
use crate::errors::CalcResult;
use crate::loads::Load;

/// Margin applied to continuous-duty and motor loads
pub const DESIGN_MARGIN: f64 = 1.25;

/// Currents derived from one load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadCurrents {
    /// Full-load operating current (A)
    pub current_a: f64,
    /// Operating current with the design margin (A)
    pub design_current_a: f64,
    /// Starting current for motors with a starting method (A)
    pub starting_current_a: Option<f64>,
}

/// Operating current of a load.
///
/// The rating fields are validated first, so no arithmetic runs on a power
/// factor, efficiency or voltage outside its invariant.
pub fn current(load: &Load) -> CalcResult<f64> {
    load.validate_rating()?;
    let i = if load.is_three_phase() {
        three_phase_current(load.power_kw, load.voltage_v, load.power_factor, load.efficiency)
    } else {
        single_phase_current(load.power_kw, load.voltage_v, load.power_factor, load.efficiency)
    };
    Ok(i)
}

/// Design current: `1.25 × current` for continuous or motor loads, else `current`
pub fn design_current(load: &Load, current_a: f64) -> f64 {
    if load.requires_design_margin() {
        current_a * DESIGN_MARGIN
    } else {
        current_a
    }
}

/// Starting current, when the load has a starting method
pub fn starting_current(load: &Load, current_a: f64) -> Option<f64> {
    load.starting_method
        .map(|method| current_a * method.starting_current_multiplier())
}

/// All three currents for a load
pub fn calculate(load: &Load) -> CalcResult<LoadCurrents> {
    let current_a = current(load)?;
    Ok(LoadCurrents {
        current_a,
        design_current_a: design_current(load, current_a),
        starting_current_a: starting_current(load, current_a),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{DutyCycle, LoadType, StartingMethod};

    fn scenario_a() -> Load {
        Load::new("M-1", LoadType::Motor, 75.0, 415.0, 3, 120.0)
            .with_power_factor(0.85)
            .with_efficiency(0.92)
    }

    #[test]
    fn test_scenario_a_currents() {
        let load = scenario_a();
        let i = current(&load).unwrap();
        // 75000 / (√3 × 415 × 0.85 × 0.92)
        let expected = 75_000.0 / (3f64.sqrt() * 415.0 * 0.85 * 0.92);
        assert!((i - expected).abs() < 1e-9);
        assert!((i - 133.5).abs() < 0.1);

        let ib = design_current(&load, i);
        assert!((ib - 1.25 * i).abs() < 1e-12);
        assert!((ib - 166.9).abs() < 0.15);
    }

    #[test]
    fn test_single_phase_formula() {
        let load = Load::new("L-1", LoadType::Lighting, 2.0, 230.0, 1, 30.0)
            .with_power_factor(0.9)
            .with_efficiency(1.0);
        let i = current(&load).unwrap();
        assert!((i - 2000.0 / (230.0 * 0.9)).abs() < 1e-9);
    }

    #[test]
    fn test_design_margin_by_duty_cycle() {
        let base = Load::new("H-1", LoadType::Heating, 10.0, 415.0, 3, 20.0);
        let i = current(&base).unwrap();

        assert_eq!(design_current(&base, i), i * DESIGN_MARGIN);

        for duty in [DutyCycle::Intermittent, DutyCycle::ShortTime] {
            let load = base.clone().with_duty_cycle(duty);
            assert_eq!(design_current(&load, i), i);
        }
    }

    #[test]
    fn test_motor_always_gets_margin() {
        let motor = scenario_a().with_duty_cycle(DutyCycle::Intermittent);
        let i = current(&motor).unwrap();
        assert_eq!(design_current(&motor, i), i * DESIGN_MARGIN);
    }

    #[test]
    fn test_starting_current() {
        let motor = scenario_a().with_starting_method(StartingMethod::DirectOnLine);
        let currents = calculate(&motor).unwrap();
        assert!((currents.starting_current_a.unwrap() - 6.0 * currents.current_a).abs() < 1e-9);

        let heater = Load::new("H-1", LoadType::Heating, 10.0, 415.0, 3, 20.0);
        assert!(calculate(&heater).unwrap().starting_current_a.is_none());
    }

    #[test]
    fn test_invalid_rating_rejected_before_arithmetic() {
        let zero_pf = scenario_a().with_power_factor(0.0);
        let err = current(&zero_pf).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_VALIDATION");

        let mut two_phase = scenario_a();
        two_phase.phases = 2;
        assert!(current(&two_phase).is_err());

        let mut negative = scenario_a();
        negative.power_kw = -1.0;
        assert!(current(&negative).is_err());
    }
}
