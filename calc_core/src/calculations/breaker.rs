//! # Breaker Selection
//!
//! Picks the protective device for a circuit:
//!
//! 1. Smallest rating in the voltage tier's ladder at or above the design current
//! 2. Type from the standard's threshold rules (MCB / MCCB / ACB / VCB / SF6)
//! 3. Trip curve for MCBs only
//! 4. Breaking capacity ≥ prospective fault current, escalating up the
//!    ladder (and so possibly to a larger type) until satisfied
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::breaker::{select, BreakerSelectionInput};
//! use calc_core::loads::LoadType;
//! use calc_core::standards::{BreakerType, Standard, StandardsProvider};
//!
//! let iec = StandardsProvider::new(Standard::Iec);
//! let input = BreakerSelectionInput {
//!     design_current_a: 166.9,
//!     load_type: LoadType::Motor,
//!     voltage_v: 415.0,
//!     phases: 3,
//!     fault_current_ka: None,
//! };
//! let breaker = select(&input, &iec).unwrap();
//! assert_eq!(breaker.rating_a, 200.0);
//! assert_eq!(breaker.breaker_type, BreakerType::Mccb);
//! assert!(breaker.curve.is_none());
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult, Criterion};
use crate::loads::LoadType;
use crate::standards::{BreakerType, StandardsProvider, TripCurve, VoltageTier};

/// Inputs to breaker selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakerSelectionInput {
    pub design_current_a: f64,
    pub load_type: LoadType,
    pub voltage_v: f64,
    pub phases: u8,
    /// Prospective fault current (kA); `None` skips the breaking-capacity check
    pub fault_current_ka: Option<f64>,
}

/// Selected protective device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breaker {
    /// Rated current In (A)
    pub rating_a: f64,
    pub breaker_type: BreakerType,
    /// MCB trip curve; `None` for every other type
    pub curve: Option<TripCurve>,
    pub poles: u8,
    pub voltage_tier: VoltageTier,
    /// Tabulated breaking capacity of the selected type and rating (kA)
    pub breaking_capacity_ka: f64,
    /// Smallest ladder rating ≥ design current, before any escalation (A)
    pub minimum_rating_a: f64,
    /// True when breaking capacity forced a larger rating
    pub escalated: bool,
}

/// Number of poles: 4P where a three-phase LV circuit carries a neutral
pub fn poles_for(phases: u8, voltage_v: f64, load_type: LoadType) -> u8 {
    if phases == 1 {
        1
    } else if VoltageTier::from_voltage(voltage_v) == VoltageTier::Low && load_type.needs_neutral() {
        4
    } else {
        3
    }
}

/// Select a breaker for the circuit.
///
/// # Errors
///
/// - `CapacityExceeded` (criterion `breaker_rating`) when the ladder tops out
///   below the design current
/// - `InsufficientBreakingCapacity` when no rating from the minimum upward
///   can interrupt the fault current
pub fn select(input: &BreakerSelectionInput, provider: &StandardsProvider) -> CalcResult<Breaker> {
    let tier = VoltageTier::from_voltage(input.voltage_v);
    let ladder = provider.breaker_rating_ladder(tier)?;

    let start = ladder
        .iter()
        .position(|&rating| rating >= input.design_current_a)
        .ok_or_else(|| {
            let largest = ladder.last().copied().unwrap_or(0.0);
            CalcError::capacity_exceeded(Criterion::BreakerRating, input.design_current_a, largest, "A")
        })?;
    let minimum_rating_a = ladder[start];

    let mut best_available_ka: f64 = 0.0;
    for &rating_a in &ladder[start..] {
        let breaker_type = provider.breaker_type(rating_a, input.voltage_v)?;
        let capacity_ka = provider.breaking_capacity_ka(breaker_type, rating_a)?;
        best_available_ka = best_available_ka.max(capacity_ka);

        let adequate = input.fault_current_ka.map_or(true, |fault| capacity_ka >= fault);
        if !adequate {
            debug!(rating_a, %breaker_type, capacity_ka, "breaking capacity insufficient, escalating");
            continue;
        }

        let curve = if breaker_type.has_trip_curve() {
            Some(provider.curve_for(input.load_type))
        } else {
            None
        };
        return Ok(Breaker {
            rating_a,
            breaker_type,
            curve,
            poles: poles_for(input.phases, input.voltage_v, input.load_type),
            voltage_tier: tier,
            breaking_capacity_ka: capacity_ka,
            minimum_rating_a,
            escalated: rating_a > minimum_rating_a,
        });
    }

    Err(CalcError::insufficient_breaking_capacity(
        input.fault_current_ka.unwrap_or(0.0),
        best_available_ka,
        input.design_current_a,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::Standard;

    fn input(design_current_a: f64) -> BreakerSelectionInput {
        BreakerSelectionInput {
            design_current_a,
            load_type: LoadType::Motor,
            voltage_v: 415.0,
            phases: 3,
            fault_current_ka: None,
        }
    }

    fn iec() -> StandardsProvider {
        StandardsProvider::new(Standard::Iec)
    }

    #[test]
    fn test_scenario_d() {
        let b = select(&input(166.9), &iec()).unwrap();
        assert_eq!(b.rating_a, 200.0);
        assert_eq!(b.breaker_type, BreakerType::Mccb);
        assert_eq!(b.curve, None);
        assert_eq!(b.poles, 3);
        assert!(!b.escalated);
    }

    #[test]
    fn test_exact_ladder_value_selected() {
        assert_eq!(select(&input(125.0), &iec()).unwrap().rating_a, 125.0);
    }

    #[test]
    fn test_mcb_gets_curve() {
        let mut lighting = input(12.0);
        lighting.load_type = LoadType::Lighting;
        lighting.phases = 1;
        lighting.voltage_v = 230.0;
        let b = select(&lighting, &iec()).unwrap();
        assert_eq!(b.rating_a, 16.0);
        assert_eq!(b.breaker_type, BreakerType::Mcb);
        assert_eq!(b.curve, Some(TripCurve::B));
        assert_eq!(b.poles, 1);

        let motor = select(&input(40.0), &iec()).unwrap();
        assert_eq!(motor.curve, Some(TripCurve::D));
    }

    #[test]
    fn test_rating_is_minimal_ladder_entry() {
        let p = iec();
        let ladder = p.breaker_rating_ladder(VoltageTier::Low).unwrap().to_vec();
        for ib in [5.0, 17.0, 99.9, 166.9, 700.0, 3300.0] {
            let b = select(&input(ib), &p).unwrap();
            assert!(b.rating_a >= ib);
            let smaller = ladder.iter().filter(|&&r| r < b.rating_a).last();
            if let Some(&prev) = smaller {
                assert!(prev < ib);
            }
        }
    }

    #[test]
    fn test_ladder_exhausted() {
        let err = select(&input(7000.0), &iec()).unwrap_err();
        assert_eq!(err.criterion(), Some(Criterion::BreakerRating));
    }

    #[test]
    fn test_breaking_capacity_escalation() {
        let mut faulted = input(100.0);
        // MCB 125 A breaks 10 kA; MCCB 160 A breaks 36 kA
        faulted.fault_current_ka = Some(20.0);
        let b = select(&faulted, &iec()).unwrap();
        assert_eq!(b.minimum_rating_a, 100.0);
        assert_eq!(b.rating_a, 160.0);
        assert_eq!(b.breaker_type, BreakerType::Mccb);
        assert!(b.escalated);
        assert!(b.breaking_capacity_ka >= 20.0);
    }

    #[test]
    fn test_insufficient_breaking_capacity() {
        let mut faulted = input(100.0);
        faulted.fault_current_ka = Some(150.0);
        match select(&faulted, &iec()).unwrap_err() {
            CalcError::InsufficientBreakingCapacity { fault_current_ka, best_available_ka, .. } => {
                assert_eq!(fault_current_ka, 150.0);
                assert_eq!(best_available_ka, 100.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_medium_voltage_uses_vcb() {
        let mut mv = input(300.0);
        mv.voltage_v = 11_000.0;
        let b = select(&mv, &iec()).unwrap();
        assert_eq!(b.rating_a, 400.0);
        assert_eq!(b.breaker_type, BreakerType::Vcb);
        assert_eq!(b.voltage_tier, VoltageTier::Medium);
        assert_eq!(b.poles, 3);
    }

    #[test]
    fn test_four_pole_for_neutral_loads() {
        let mut feeder = input(80.0);
        feeder.load_type = LoadType::Feeder;
        assert_eq!(select(&feeder, &iec()).unwrap().poles, 4);
    }

    #[test]
    fn test_monotonic_rating() {
        let p = iec();
        let mut last = 0.0;
        for step in 1..=60 {
            let rating = select(&input(step as f64 * 50.0), &p).unwrap().rating_a;
            assert!(rating >= last);
            last = rating;
        }
    }
}
