//! # Standards Provider
//!
//! Read-only reference data for the sizing engines, keyed by regulatory
//! standard.
//!
//! ## Overview
//!
//! Each standard is a data-valued [`StandardProfile`]; the
//! [`StandardsProvider`] wraps one profile behind a common lookup contract.
//! There is no per-standard branching in the engines: IEC, IS and NEC
//! differ only in their tables.
//!
//! | Lookup                    | Policy                                   |
//! |---------------------------|------------------------------------------|
//! | Temperature derating      | Linear interpolation, clamp + notice     |
//! | Grouping derating         | Next larger count, clamp + notice        |
//! | Ampacity (size × method)  | Exact, miss = `StandardsDataMissing`     |
//! | Reactance (size)          | Exact, miss = default 0.08 Ω/km          |
//! | Voltage drop limit        | Exact by circuit class                   |
//! | Breaker ladder            | By voltage tier                          |
//! | Breaker type              | First matching threshold rule            |
//!
//! ## Example
//!
//! ```rust
//! use calc_core::standards::{Standard, StandardsProvider, BreakerType};
//! use calc_core::loads::InstallationMethod;
//!
//! let iec = StandardsProvider::new(Standard::Iec);
//! let derating = iec.derating(InstallationMethod::Tray, 45.0, 1.0).unwrap();
//! assert!((derating.factor - 0.87).abs() < 1e-9);
//! assert_eq!(iec.breaker_type(200.0, 415.0).unwrap(), BreakerType::Mccb);
//! ```

pub mod bis;
pub mod iec;
pub mod nec;
pub mod profile;

pub use profile::{ConductorRow, Interpolated, StandardProfile};

use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CalcError, CalcResult, Notice};
use crate::loads::{CircuitType, InstallationMethod, Load, LoadType};
use crate::materials::Conductor;

/// Reactance used for sizes the profile does not tabulate (Ω/km)
pub const DEFAULT_REACTANCE_OHM_PER_KM: f64 = 0.08;

/// Tolerance when matching a load voltage against the recognized set (V)
const VOLTAGE_MATCH_TOLERANCE_V: f64 = 1e-6;

static IEC_PROFILE: Lazy<Arc<StandardProfile>> = Lazy::new(|| Arc::new(iec::profile()));
static IS_PROFILE: Lazy<Arc<StandardProfile>> = Lazy::new(|| Arc::new(bis::profile()));
static NEC_PROFILE: Lazy<Arc<StandardProfile>> = Lazy::new(|| Arc::new(nec::profile()));

/// Regulatory standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Standard {
    /// IEC 60364
    #[default]
    #[serde(rename = "IEC")]
    Iec,
    /// Indian Standards (IS 732 et al.)
    #[serde(rename = "IS")]
    Is,
    /// US National Electrical Code
    #[serde(rename = "NEC")]
    Nec,
}

impl Standard {
    /// All supported standards
    pub const ALL: [Standard; 3] = [Standard::Iec, Standard::Is, Standard::Nec];

    /// Short code
    pub fn code(&self) -> &'static str {
        match self {
            Standard::Iec => "IEC",
            Standard::Is => "IS",
            Standard::Nec => "NEC",
        }
    }
}

impl std::fmt::Display for Standard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Standard {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IEC" => Ok(Standard::Iec),
            "IS" | "BIS" => Ok(Standard::Is),
            "NEC" | "NFPA70" | "NFPA 70" => Ok(Standard::Nec),
            _ => Err(CalcError::standards_data_missing(s.trim(), "profile", "unsupported standard")),
        }
    }
}

/// System voltage band used to pick a breaker ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoltageTier {
    /// Up to 1 kV
    Low,
    /// Above 1 kV up to 36 kV
    Medium,
    /// Above 36 kV
    High,
}

impl VoltageTier {
    /// Tier for a system voltage in volts
    pub fn from_voltage(voltage_v: f64) -> Self {
        if voltage_v <= 1000.0 {
            VoltageTier::Low
        } else if voltage_v <= 36_000.0 {
            VoltageTier::Medium
        } else {
            VoltageTier::High
        }
    }
}

/// Protective device family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakerType {
    /// Miniature circuit breaker
    #[serde(rename = "MCB")]
    Mcb,
    /// Moulded-case circuit breaker
    #[serde(rename = "MCCB")]
    Mccb,
    /// Air circuit breaker
    #[serde(rename = "ACB")]
    Acb,
    /// Vacuum circuit breaker
    #[serde(rename = "VCB")]
    Vcb,
    /// SF6 gas circuit breaker
    #[serde(rename = "SF6")]
    Sf6,
}

impl BreakerType {
    /// Only miniature breakers have a selectable trip curve
    pub fn has_trip_curve(&self) -> bool {
        matches!(self, BreakerType::Mcb)
    }
}

impl std::fmt::Display for BreakerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BreakerType::Mcb => "MCB",
            BreakerType::Mccb => "MCCB",
            BreakerType::Acb => "ACB",
            BreakerType::Vcb => "VCB",
            BreakerType::Sf6 => "SF6",
        };
        f.write_str(name)
    }
}

/// MCB instantaneous trip curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripCurve {
    /// 3-5 × In
    B,
    /// 5-10 × In
    C,
    /// 10-20 × In
    D,
}

impl std::fmt::Display for TripCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TripCurve::B => "B",
            TripCurve::C => "C",
            TripCurve::D => "D",
        };
        f.write_str(name)
    }
}

/// Combined ampacity derating and its components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derating {
    /// temperature × installation × grouping
    pub factor: f64,
    pub temperature_factor: f64,
    pub installation_factor: f64,
    pub grouping_factor: f64,
    /// Set when the ambient temperature was outside the table
    pub notice: Option<Notice>,
}

/// Read-only lookups over one standard's profile.
///
/// Cloning is cheap (the profile is shared) and the provider is safe to
/// use from any number of threads.
#[derive(Debug, Clone)]
pub struct StandardsProvider {
    profile: Arc<StandardProfile>,
}

impl StandardsProvider {
    /// Provider for a built-in standard; profiles are built once per process
    pub fn new(standard: Standard) -> Self {
        let profile = match standard {
            Standard::Iec => Arc::clone(&IEC_PROFILE),
            Standard::Is => Arc::clone(&IS_PROFILE),
            Standard::Nec => Arc::clone(&NEC_PROFILE),
        };
        StandardsProvider { profile }
    }

    /// Provider by standard name (e.g. "IEC", "nec")
    pub fn for_name(name: &str) -> CalcResult<Self> {
        Ok(StandardsProvider::new(name.parse()?))
    }

    /// Provider over a custom profile, validated first
    pub fn from_profile(profile: StandardProfile) -> CalcResult<Self> {
        profile.validate()?;
        Ok(StandardsProvider { profile: Arc::new(profile) })
    }

    /// The standard this provider serves
    pub fn standard(&self) -> Standard {
        self.profile.standard
    }

    /// The underlying reference data
    pub fn profile(&self) -> &StandardProfile {
        &self.profile
    }

    /// Whether a system voltage is part of the standard's recognized set
    pub fn is_recognized_voltage(&self, voltage_v: f64) -> bool {
        self.profile
            .recognized_voltages
            .iter()
            .any(|v| (v - voltage_v).abs() < VOLTAGE_MATCH_TOLERANCE_V)
    }

    /// Standard-dependent load invariants: recognized voltage and matching standard
    pub fn check_load(&self, load: &Load) -> CalcResult<()> {
        if let Some(standard) = load.standard {
            if standard != self.standard() {
                return Err(CalcError::input_validation(
                    "standard",
                    standard.to_string(),
                    format!("Load is scheduled against {} but the calculation uses {}", standard, self.standard()),
                ));
            }
        }
        if !self.is_recognized_voltage(load.voltage_v) {
            return Err(CalcError::input_validation(
                "voltage_v",
                load.voltage_v.to_string(),
                format!("{} V is not a recognized {} system voltage", load.voltage_v, self.standard()),
            ));
        }
        Ok(())
    }

    /// Ambient temperature factor (interpolated, clamped with notice)
    pub fn temperature_factor(&self, ambient_c: f64) -> CalcResult<Interpolated> {
        let result = self.profile.temperature_factor(ambient_c)?;
        if let Some(notice) = &result.notice {
            warn!(standard = %self.standard(), %notice, "temperature derating clamped");
        }
        Ok(result)
    }

    /// Installation method correction factor
    pub fn installation_factor(&self, method: InstallationMethod) -> CalcResult<f64> {
        self.profile.installation_factor(method)
    }

    /// Grouping factor for a count of circuits laid together
    pub fn grouping_factor(&self, cables: u32) -> CalcResult<Interpolated> {
        self.profile.grouping_factor(cables)
    }

    /// Combined derating = temperature × installation × grouping
    pub fn derating(&self, method: InstallationMethod, ambient_c: f64, grouping_factor: f64) -> CalcResult<Derating> {
        let temperature = self.temperature_factor(ambient_c)?;
        let installation_factor = self.installation_factor(method)?;
        Ok(Derating {
            factor: temperature.value * installation_factor * grouping_factor,
            temperature_factor: temperature.value,
            installation_factor,
            grouping_factor,
            notice: temperature.notice,
        })
    }

    /// Standard conductor sizes, ascending
    pub fn conductor_sizes(&self) -> &[ConductorRow] {
        &self.profile.conductors
    }

    /// Conductor row by size
    pub fn conductor(&self, size_mm2: f64) -> CalcResult<&ConductorRow> {
        self.profile.conductor(size_mm2)
    }

    /// Tabulated ampacity for (size, method)
    pub fn ampacity(&self, size_mm2: f64, method: InstallationMethod) -> CalcResult<f64> {
        self.profile.conductor(size_mm2)?.ampacity.get(method).ok_or_else(|| {
            CalcError::standards_data_missing(
                self.standard().to_string(),
                "ampacity",
                format!("{} mm² / {}", size_mm2, method),
            )
        })
    }

    /// Reactance for a size, falling back to [`DEFAULT_REACTANCE_OHM_PER_KM`]
    pub fn reactance(&self, size_mm2: f64) -> f64 {
        self.profile
            .conductor(size_mm2)
            .ok()
            .and_then(|row| row.reactance_ohm_per_km)
            .unwrap_or(DEFAULT_REACTANCE_OHM_PER_KM)
    }

    /// Permitted voltage drop for a circuit class (%)
    pub fn voltage_drop_limit(&self, circuit: CircuitType) -> CalcResult<f64> {
        self.profile.voltage_drop_limit(circuit)
    }

    /// Circuit class for a load: its override, else the profile default
    pub fn circuit_type_for(&self, load: &Load) -> CircuitType {
        if let Some(circuit) = load.circuit_type {
            return circuit;
        }
        let defaults = &self.profile.circuit_defaults;
        match load.load_type {
            LoadType::Lighting => defaults.lighting,
            LoadType::Feeder => defaults.feeder,
            _ => defaults.power,
        }
    }

    /// Ascending standard breaker ratings for a voltage tier
    pub fn breaker_rating_ladder(&self, tier: VoltageTier) -> CalcResult<&[f64]> {
        self.profile.breaker_ladder(tier)
    }

    /// Breaker type for a rating at a system voltage
    pub fn breaker_type(&self, rating_a: f64, voltage_v: f64) -> CalcResult<BreakerType> {
        self.profile.breaker_type(rating_a, voltage_v)
    }

    /// Tabulated breaking capacity (kA)
    pub fn breaking_capacity_ka(&self, breaker_type: BreakerType, rating_a: f64) -> CalcResult<f64> {
        self.profile.breaking_capacity_ka(breaker_type, rating_a)
    }

    /// MCB trip curve for a load type
    pub fn curve_for(&self, load_type: LoadType) -> TripCurve {
        self.profile.curve_for(load_type)
    }

    /// Adiabatic k constant for a conductor
    pub fn short_circuit_material_constant(&self, conductor: Conductor) -> CalcResult<f64> {
        self.profile.material_constant(conductor.material, conductor.insulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConductorMaterial, Insulation};

    fn iec() -> StandardsProvider {
        StandardsProvider::new(Standard::Iec)
    }

    #[test]
    fn test_standard_parsing() {
        assert_eq!("iec".parse::<Standard>().unwrap(), Standard::Iec);
        assert_eq!(" NEC ".parse::<Standard>().unwrap(), Standard::Nec);
        assert_eq!("BIS".parse::<Standard>().unwrap(), Standard::Is);
        let err = "BS7671".parse::<Standard>().unwrap_err();
        assert_eq!(err.error_code(), "STANDARDS_DATA_MISSING");
    }

    #[test]
    fn test_standard_serialization() {
        assert_eq!(serde_json::to_string(&Standard::Is).unwrap(), "\"IS\"");
        assert_eq!(serde_json::to_string(&BreakerType::Sf6).unwrap(), "\"SF6\"");
    }

    #[test]
    fn test_builtin_profiles_shared() {
        let a = StandardsProvider::new(Standard::Nec);
        let b = StandardsProvider::new(Standard::Nec);
        assert!(Arc::ptr_eq(&a.profile, &b.profile));
    }

    #[test]
    fn test_derating_at_45c_tray() {
        let d = iec().derating(InstallationMethod::Tray, 45.0, 1.0).unwrap();
        assert!((d.factor - 0.87).abs() < 1e-9);
        assert!(d.notice.is_none());
    }

    #[test]
    fn test_derating_multiplies_components() {
        let d = iec().derating(InstallationMethod::Buried, 35.0, 0.8).unwrap();
        assert!((d.factor - 0.96 * 0.89 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_interpolates_between_points() {
        let t = iec().temperature_factor(42.5).unwrap();
        assert!((t.value - 0.89).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_clamps_with_notice() {
        let hot = iec().temperature_factor(80.0).unwrap();
        assert_eq!(hot.value, 0.58);
        assert!(matches!(
            hot.notice,
            Some(Notice::OutOfRangeInterpolation { clamped_to, .. }) if clamped_to == 70.0
        ));

        let cold = iec().temperature_factor(-5.0).unwrap();
        assert_eq!(cold.value, 1.15);
        assert!(cold.notice.is_some());
    }

    #[test]
    fn test_grouping_lookup() {
        let p = iec();
        assert_eq!(p.grouping_factor(1).unwrap().value, 1.0);
        // 10 circuits use the 12-circuit factor
        assert_eq!(p.grouping_factor(10).unwrap().value, 0.45);
        let many = p.grouping_factor(40).unwrap();
        assert_eq!(many.value, 0.38);
        assert!(many.notice.is_some());
        assert!(p.grouping_factor(0).is_err());
    }

    #[test]
    fn test_ampacity_lookup_and_missing() {
        let p = iec();
        assert_eq!(p.ampacity(70.0, InstallationMethod::Tray).unwrap(), 213.0);
        let err = p.ampacity(75.0, InstallationMethod::Tray).unwrap_err();
        assert_eq!(err.error_code(), "STANDARDS_DATA_MISSING");
    }

    #[test]
    fn test_reactance_default_fallback() {
        let p = iec();
        assert_eq!(p.reactance(70.0), 0.069);
        assert_eq!(p.reactance(630.0), DEFAULT_REACTANCE_OHM_PER_KM);
    }

    #[test]
    fn test_voltage_drop_limits() {
        let p = iec();
        assert_eq!(p.voltage_drop_limit(CircuitType::Lighting).unwrap(), 3.0);
        assert_eq!(p.voltage_drop_limit(CircuitType::Power).unwrap(), 5.0);
        let nec = StandardsProvider::new(Standard::Nec);
        assert_eq!(nec.voltage_drop_limit(CircuitType::Branch).unwrap(), 3.0);
        assert_eq!(nec.voltage_drop_limit(CircuitType::Combined).unwrap(), 5.0);
    }

    #[test]
    fn test_breaker_type_thresholds() {
        let p = iec();
        assert_eq!(p.breaker_type(125.0, 415.0).unwrap(), BreakerType::Mcb);
        assert_eq!(p.breaker_type(160.0, 415.0).unwrap(), BreakerType::Mccb);
        assert_eq!(p.breaker_type(1600.0, 415.0).unwrap(), BreakerType::Mccb);
        assert_eq!(p.breaker_type(2000.0, 415.0).unwrap(), BreakerType::Acb);
        assert_eq!(p.breaker_type(630.0, 11_000.0).unwrap(), BreakerType::Vcb);
        assert_eq!(p.breaker_type(1250.0, 66_000.0).unwrap(), BreakerType::Sf6);
    }

    #[test]
    fn test_ladders_ascending() {
        for standard in Standard::ALL {
            let p = StandardsProvider::new(standard);
            for tier in [VoltageTier::Low, VoltageTier::Medium, VoltageTier::High] {
                let ladder = p.breaker_rating_ladder(tier).unwrap();
                assert!(ladder.windows(2).all(|w| w[1] > w[0]));
            }
        }
    }

    #[test]
    fn test_voltage_tier() {
        assert_eq!(VoltageTier::from_voltage(415.0), VoltageTier::Low);
        assert_eq!(VoltageTier::from_voltage(1000.0), VoltageTier::Low);
        assert_eq!(VoltageTier::from_voltage(11_000.0), VoltageTier::Medium);
        assert_eq!(VoltageTier::from_voltage(66_000.0), VoltageTier::High);
    }

    #[test]
    fn test_curves() {
        let p = iec();
        assert_eq!(p.curve_for(LoadType::Lighting), TripCurve::B);
        assert_eq!(p.curve_for(LoadType::Socket), TripCurve::C);
        assert_eq!(p.curve_for(LoadType::Motor), TripCurve::D);
    }

    #[test]
    fn test_material_constant() {
        let p = iec();
        let cu_pvc = Conductor::new(ConductorMaterial::Copper, Insulation::Pvc);
        assert_eq!(p.short_circuit_material_constant(cu_pvc).unwrap(), 115.0);
    }

    #[test]
    fn test_recognized_voltage_and_standard_check() {
        let p = iec();
        assert!(p.is_recognized_voltage(415.0));
        assert!(!p.is_recognized_voltage(480.0));

        let load = Load::new("X", LoadType::General, 5.0, 480.0, 3, 10.0);
        assert!(matches!(p.check_load(&load), Err(CalcError::InputValidation { ref field, .. }) if field == "voltage_v"));

        let pinned = Load::new("Y", LoadType::General, 5.0, 415.0, 3, 10.0).with_standard(Standard::Nec);
        assert!(matches!(p.check_load(&pinned), Err(CalcError::InputValidation { ref field, .. }) if field == "standard"));
    }

    #[test]
    fn test_circuit_type_defaults() {
        let iec = iec();
        let nec = StandardsProvider::new(Standard::Nec);
        let lamp = Load::new("L", LoadType::Lighting, 1.0, 230.0, 1, 10.0);
        let feeder = Load::new("F", LoadType::Feeder, 100.0, 480.0, 3, 10.0);
        assert_eq!(iec.circuit_type_for(&lamp), CircuitType::Lighting);
        assert_eq!(nec.circuit_type_for(&feeder), CircuitType::Feeder);
        let overridden = lamp.with_circuit_type(CircuitType::Power);
        assert_eq!(iec.circuit_type_for(&overridden), CircuitType::Power);
    }

    #[test]
    fn test_custom_profile_json_roundtrip() {
        let json = serde_json::to_string(&iec::profile()).unwrap();
        let parsed = StandardProfile::from_json(&json).unwrap();
        let provider = StandardsProvider::from_profile(parsed).unwrap();
        assert_eq!(provider.ampacity(50.0, InstallationMethod::Tray).unwrap(), 168.0);
    }

    #[test]
    fn test_invalid_custom_profile_rejected() {
        let mut broken = iec::profile();
        broken.breaker_ladders[0].ratings = vec![100.0, 63.0];
        let err = StandardsProvider::from_profile(broken).unwrap_err();
        assert_eq!(err.error_code(), "STANDARDS_DATA_MISSING");

        let mut empty = iec::profile();
        empty.conductors.clear();
        assert!(StandardsProvider::from_profile(empty).is_err());
    }
}
