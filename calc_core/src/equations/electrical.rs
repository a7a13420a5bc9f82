//! # Electrical Formulas
//!
//! Closed-form equations behind the sizing engines. Every function here is
//! pure arithmetic on SI quantities; validation happens in the callers.
//!
//! ## Notation
//!
//! - `P` = Active power output (kW)
//! - `V` = Line voltage for three-phase, phase voltage for single-phase (V)
//! - `PF` = Power factor (cos φ)
//! - `η` = Efficiency
//! - `I` = Current (A)
//! - `L` = One-way cable length (m)
//! - `R`, `X` = Resistance and reactance per length (Ω/km)
//! - `ρ` = Resistivity (Ω·mm²/m)
//! - `S` = Conductor cross-section (mm²)
//! - `t` = Fault clearing time (s)
//! - `k` = Adiabatic material constant (A·√s/mm²)
//!
//! ## References
//!
//! - IEC 60364-5-52 Annex G (voltage drop)
//! - IEC 60364-4-43 clause 434.5.2 (adiabatic withstand)
//! - IEC 60909-0 (symmetrical short-circuit current)

/// √3
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

// =============================================================================
// LOAD CURRENT
// =============================================================================

/// Three-phase line current
///
/// # Formula
/// I = 1000·P / (√3·V·PF·η)
#[inline]
pub fn three_phase_current(power_kw: f64, voltage_v: f64, power_factor: f64, efficiency: f64) -> f64 {
    1000.0 * power_kw / (SQRT_3 * voltage_v * power_factor * efficiency)
}

/// Single-phase current
///
/// # Formula
/// I = 1000·P / (V·PF·η)
#[inline]
pub fn single_phase_current(power_kw: f64, voltage_v: f64, power_factor: f64, efficiency: f64) -> f64 {
    1000.0 * power_kw / (voltage_v * power_factor * efficiency)
}

// =============================================================================
// CONDUCTOR IMPEDANCE & VOLTAGE DROP
// =============================================================================

/// AC resistance per kilometre of a conductor
///
/// # Formula
/// R = 1000·ρ / S
#[inline]
pub fn resistance_per_km(resistivity_ohm_mm2_per_m: f64, size_mm2: f64) -> f64 {
    1000.0 * resistivity_ohm_mm2_per_m / size_mm2
}

/// sin φ from the power factor
#[inline]
pub fn sin_phi(power_factor: f64) -> f64 {
    (1.0 - power_factor * power_factor).max(0.0).sqrt()
}

/// Three-phase voltage drop in volts
///
/// # Formula
/// Vd = √3·I·L·(R·cos φ + X·sin φ) / 1000
#[inline]
pub fn voltage_drop_three_phase(current_a: f64, length_m: f64, r_ohm_per_km: f64, x_ohm_per_km: f64, power_factor: f64) -> f64 {
    SQRT_3 * current_a * length_m * (r_ohm_per_km * power_factor + x_ohm_per_km * sin_phi(power_factor)) / 1000.0
}

/// Single-phase voltage drop in volts (go and return conductors)
///
/// # Formula
/// Vd = 2·I·L·(R·cos φ + X·sin φ) / 1000
#[inline]
pub fn voltage_drop_single_phase(current_a: f64, length_m: f64, r_ohm_per_km: f64, x_ohm_per_km: f64, power_factor: f64) -> f64 {
    2.0 * current_a * length_m * (r_ohm_per_km * power_factor + x_ohm_per_km * sin_phi(power_factor)) / 1000.0
}

/// Voltage drop as a percentage of the system voltage
#[inline]
pub fn voltage_drop_percent(drop_v: f64, voltage_v: f64) -> f64 {
    drop_v / voltage_v * 100.0
}

// =============================================================================
// SHORT CIRCUIT
// =============================================================================

/// Symmetrical three-phase fault current in amperes
///
/// # Formula
/// Isc = V / (√3·Z)
#[inline]
pub fn symmetrical_fault_current(voltage_v: f64, impedance_ohm: f64) -> f64 {
    voltage_v / (SQRT_3 * impedance_ohm)
}

/// Source impedance that produces a given fault current (inverse of
/// [`symmetrical_fault_current`])
#[inline]
pub fn source_impedance(voltage_v: f64, fault_current_a: f64) -> f64 {
    voltage_v / (SQRT_3 * fault_current_a)
}

/// Minimum cross-section surviving a fault without exceeding the
/// insulation's short-circuit temperature
///
/// This is the IEC 60364-4-43 form. The IS and NEC profiles apply it
/// as-is with the IEC `k` values; the NEC's own withstand guidance uses a
/// different equation that is not modelled here.
///
/// # Formula (IEC 60364-4-43, 434.5.2)
/// S = √(I²·t) / k
#[inline]
pub fn adiabatic_min_size(fault_current_a: f64, clearing_time_s: f64, k: f64) -> f64 {
    (fault_current_a * fault_current_a * clearing_time_s).sqrt() / k
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_three_phase_current() {
        // 75 kW motor at 415 V, PF 0.85, η 0.92
        let i = three_phase_current(75.0, 415.0, 0.85, 0.92);
        assert!((i - 133.43).abs() < 0.01, "got {}", i);
    }

    #[test]
    fn test_single_phase_current() {
        let i = single_phase_current(2.3, 230.0, 1.0, 1.0);
        assert!((i - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_resistance_per_km() {
        // ρ = 0.021984 at 70 mm² -> 0.31406 Ω/km
        let r = resistance_per_km(0.021_984, 70.0);
        assert!((r - 0.314_06).abs() < 1e-5);
    }

    #[test]
    fn test_sin_phi_unity_pf() {
        assert_eq!(sin_phi(1.0), 0.0);
        assert!((sin_phi(0.8) - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_single_phase_drop_is_two_over_root_three_of_three_phase() {
        let three = voltage_drop_three_phase(50.0, 40.0, 1.83, 0.09, 0.9);
        let single = voltage_drop_single_phase(50.0, 40.0, 1.83, 0.09, 0.9);
        assert!((single / three - 2.0 / SQRT_3).abs() < EPSILON);
    }

    #[test]
    fn test_voltage_drop_percent() {
        assert!((voltage_drop_percent(20.75, 415.0) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_fault_current_impedance_inverse() {
        let isc = symmetrical_fault_current(415.0, 0.01);
        assert!((isc - 23_960.0).abs() < 1.0);
        assert!((source_impedance(415.0, isc) - 0.01).abs() < EPSILON);
    }

    #[test]
    fn test_adiabatic_min_size() {
        // 10 kA for 0.1 s, k = 143 -> 22.1 mm²
        let s = adiabatic_min_size(10_000.0, 0.1, 143.0);
        assert!((s - 22.11).abs() < 0.01);

        // PVC copper, k = 115
        let s = adiabatic_min_size(10_000.0, 0.1, 115.0);
        assert!((s - 27.50).abs() < 0.01);
    }
}
