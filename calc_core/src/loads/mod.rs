//! Electrical load records
//!
//! A [`Load`] is the engine's input: one piece of equipment (or one feeder)
//! described by its electrical rating and how its cable is run. Records are
//! produced by an upstream normalizer that has already applied defaults; the
//! engine only checks invariants.
//!
//! # Overview
//!
//! - [`Load`] - The input record and its invariant checks
//! - [`LoadType`] - Equipment category (motor, lighting, ...)
//! - [`DutyCycle`] - Continuous / intermittent / short-time
//! - [`StartingMethod`] - Motor starter type
//! - [`InstallationMethod`] - Tray, conduit, air, buried, duct
//! - [`CircuitType`] - Voltage-drop limit class
//!
//! # Example
//!
//! ```
//! use calc_core::loads::{Load, LoadType, StartingMethod};
//!
//! let pump = Load::new("P-101", LoadType::Pump, 75.0, 415.0, 3, 120.0)
//!     .with_power_factor(0.85)
//!     .with_efficiency(0.92)
//!     .with_starting_method(StartingMethod::StarDelta);
//!
//! assert!(pump.validate().is_ok());
//! ```

pub mod load_types;

pub use load_types::{CircuitType, DutyCycle, InstallationMethod, LoadType, StartingMethod};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::standards::Standard;
use crate::units::{Feet, Horsepower, Kilowatts, Meters};

/// Power factor the input normalizer assumes when none is given
pub const DEFAULT_POWER_FACTOR: f64 = 0.85;
/// Efficiency the input normalizer assumes when none is given
pub const DEFAULT_EFFICIENCY: f64 = 0.9;
/// Grouping factor the input normalizer assumes when none is given
pub const DEFAULT_GROUPING_FACTOR: f64 = 1.0;

/// One load to be supplied, protected and cabled.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "M-01",
///   "load_type": "Motor",
///   "power_kw": 75.0,
///   "voltage_v": 415.0,
///   "phases": 3,
///   "power_factor": 0.85,
///   "efficiency": 0.92,
///   "duty_cycle": "Continuous",
///   "starting_method": "DirectOnLine",
///   "cable_length_m": 120.0,
///   "installation_method": "Tray",
///   "grouping_factor": 1.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    /// Schedule identifier (e.g., "M-01", "LP-2")
    pub id: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Equipment category
    #[serde(default)]
    pub load_type: LoadType,

    /// Rated output power in kW
    pub power_kw: f64,

    /// Line-to-line (3-phase) or line-to-neutral (1-phase) voltage in V
    pub voltage_v: f64,

    /// Number of phases, 1 or 3
    pub phases: u8,

    /// Power factor cos φ, in (0, 1]
    pub power_factor: f64,

    /// Efficiency η, in (0, 1]
    pub efficiency: f64,

    /// Operating regime
    #[serde(default)]
    pub duty_cycle: DutyCycle,

    /// Motor starter (motor-driven loads only)
    #[serde(default)]
    pub starting_method: Option<StartingMethod>,

    /// One-way cable route length in metres
    pub cable_length_m: f64,

    /// How the cable is run
    #[serde(default)]
    pub installation_method: InstallationMethod,

    /// Grouping derating factor, in (0, 1]
    pub grouping_factor: f64,

    /// Standard the load was scheduled against, if the schedule says so
    #[serde(default)]
    pub standard: Option<Standard>,

    /// Override of the circuit class used for the voltage-drop limit
    #[serde(default)]
    pub circuit_type: Option<CircuitType>,

    /// Override of the project ambient temperature (°C)
    #[serde(default)]
    pub ambient_temp_c: Option<f64>,

    /// Prospective fault level at the supply point (kA)
    #[serde(default)]
    pub fault_level_ka: Option<f64>,

    /// Fault clearing time for the adiabatic check (s)
    #[serde(default)]
    pub fault_clearing_time_s: Option<f64>,
}

impl Load {
    /// Create a load with the normalizer's defaults for the optional fields.
    pub fn new(
        id: impl Into<String>,
        load_type: LoadType,
        power_kw: f64,
        voltage_v: f64,
        phases: u8,
        cable_length_m: f64,
    ) -> Self {
        Load {
            id: id.into(),
            description: String::new(),
            load_type,
            power_kw,
            voltage_v,
            phases,
            power_factor: DEFAULT_POWER_FACTOR,
            efficiency: DEFAULT_EFFICIENCY,
            duty_cycle: DutyCycle::Continuous,
            starting_method: None,
            cable_length_m,
            installation_method: InstallationMethod::Tray,
            grouping_factor: DEFAULT_GROUPING_FACTOR,
            standard: None,
            circuit_type: None,
            ambient_temp_c: None,
            fault_level_ka: None,
            fault_clearing_time_s: None,
        }
    }

    /// Create a load whose rating is given in horsepower
    pub fn from_horsepower(
        id: impl Into<String>,
        load_type: LoadType,
        power_hp: f64,
        voltage_v: f64,
        phases: u8,
        cable_length_m: f64,
    ) -> Self {
        let kw: Kilowatts = Horsepower(power_hp).into();
        Load::new(id, load_type, kw.value(), voltage_v, phases, cable_length_m)
    }

    /// Builder: set the one-way cable length in feet
    pub fn with_length_ft(mut self, feet: f64) -> Self {
        self.cable_length_m = Meters::from(Feet(feet)).value();
        self
    }

    /// Builder: set power factor
    pub fn with_power_factor(mut self, power_factor: f64) -> Self {
        self.power_factor = power_factor;
        self
    }

    /// Builder: set efficiency
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// Builder: set duty cycle
    pub fn with_duty_cycle(mut self, duty_cycle: DutyCycle) -> Self {
        self.duty_cycle = duty_cycle;
        self
    }

    /// Builder: set motor starting method
    pub fn with_starting_method(mut self, method: StartingMethod) -> Self {
        self.starting_method = Some(method);
        self
    }

    /// Builder: set installation method
    pub fn with_installation(mut self, method: InstallationMethod) -> Self {
        self.installation_method = method;
        self
    }

    /// Builder: set grouping factor
    pub fn with_grouping_factor(mut self, factor: f64) -> Self {
        self.grouping_factor = factor;
        self
    }

    /// Builder: pin the load to a standard
    pub fn with_standard(mut self, standard: Standard) -> Self {
        self.standard = Some(standard);
        self
    }

    /// Builder: override the circuit class
    pub fn with_circuit_type(mut self, circuit_type: CircuitType) -> Self {
        self.circuit_type = Some(circuit_type);
        self
    }

    /// Builder: override ambient temperature
    pub fn with_ambient(mut self, ambient_temp_c: f64) -> Self {
        self.ambient_temp_c = Some(ambient_temp_c);
        self
    }

    /// Builder: set prospective fault level and clearing time
    pub fn with_fault(mut self, fault_level_ka: f64, clearing_time_s: f64) -> Self {
        self.fault_level_ka = Some(fault_level_ka);
        self.fault_clearing_time_s = Some(clearing_time_s);
        self
    }

    /// True for three-phase loads
    pub fn is_three_phase(&self) -> bool {
        self.phases == 3
    }

    /// Whether the continuous/motor design margin applies
    pub fn requires_design_margin(&self) -> bool {
        self.duty_cycle == DutyCycle::Continuous || self.load_type.is_motor()
    }

    /// Validate the electrical rating fields (P, V, phases, PF, η).
    ///
    /// These are the fields the current formulas divide by, so this runs
    /// before any arithmetic.
    pub fn validate_rating(&self) -> CalcResult<()> {
        if !(self.power_kw.is_finite() && self.power_kw > 0.0) {
            return Err(CalcError::input_validation(
                "power_kw",
                self.power_kw.to_string(),
                "Power must be positive",
            ));
        }
        if !(self.voltage_v.is_finite() && self.voltage_v > 0.0) {
            return Err(CalcError::input_validation(
                "voltage_v",
                self.voltage_v.to_string(),
                "Voltage must be positive",
            ));
        }
        if self.phases != 1 && self.phases != 3 {
            return Err(CalcError::input_validation(
                "phases",
                self.phases.to_string(),
                "Phase count must be 1 or 3",
            ));
        }
        if !(self.power_factor > 0.0 && self.power_factor <= 1.0) {
            return Err(CalcError::input_validation(
                "power_factor",
                self.power_factor.to_string(),
                "Power factor must be in (0, 1]",
            ));
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(CalcError::input_validation(
                "efficiency",
                self.efficiency.to_string(),
                "Efficiency must be in (0, 1]",
            ));
        }
        Ok(())
    }

    /// Validate every standard-independent invariant.
    ///
    /// The voltage-set check needs a standard and lives on
    /// [`StandardsProvider::check_load`](crate::standards::StandardsProvider::check_load).
    pub fn validate(&self) -> CalcResult<()> {
        if self.id.trim().is_empty() {
            return Err(CalcError::input_validation("id", "", "Load identifier must not be empty"));
        }
        self.validate_rating()?;
        if !(self.cable_length_m.is_finite() && self.cable_length_m > 0.0) {
            return Err(CalcError::input_validation(
                "cable_length_m",
                self.cable_length_m.to_string(),
                "Cable length must be positive",
            ));
        }
        if !(self.grouping_factor > 0.0 && self.grouping_factor <= 1.0) {
            return Err(CalcError::input_validation(
                "grouping_factor",
                self.grouping_factor.to_string(),
                "Grouping factor must be in (0, 1]",
            ));
        }
        if self.starting_method.is_some() && !self.load_type.is_motor() {
            return Err(CalcError::input_validation(
                "starting_method",
                format!("{:?}", self.starting_method),
                format!("Starting method given for non-motor load type {}", self.load_type),
            ));
        }
        if let Some(ambient) = self.ambient_temp_c {
            if !ambient.is_finite() {
                return Err(CalcError::input_validation(
                    "ambient_temp_c",
                    ambient.to_string(),
                    "Ambient temperature must be a finite number",
                ));
            }
        }
        if let Some(ka) = self.fault_level_ka {
            if !(ka.is_finite() && ka > 0.0) {
                return Err(CalcError::input_validation(
                    "fault_level_ka",
                    ka.to_string(),
                    "Fault level must be positive",
                ));
            }
        }
        if let Some(t) = self.fault_clearing_time_s {
            if !(t.is_finite() && t > 0.0) {
                return Err(CalcError::input_validation(
                    "fault_clearing_time_s",
                    t.to_string(),
                    "Fault clearing time must be positive",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor() -> Load {
        Load::new("M-01", LoadType::Motor, 75.0, 415.0, 3, 120.0)
            .with_efficiency(0.92)
    }

    #[test]
    fn test_defaults() {
        let load = motor();
        assert_eq!(load.power_factor, DEFAULT_POWER_FACTOR);
        assert_eq!(load.installation_method, InstallationMethod::Tray);
        assert_eq!(load.grouping_factor, 1.0);
        assert!(load.validate().is_ok());
    }

    #[test]
    fn test_from_horsepower() {
        let load = Load::from_horsepower("M-02", LoadType::Motor, 100.0, 480.0, 3, 50.0);
        assert!((load.power_kw - 74.57).abs() < 0.01);
    }

    #[test]
    fn test_length_in_feet() {
        let load = Load::from_horsepower("M-03", LoadType::Motor, 50.0, 480.0, 3, 0.0).with_length_ft(250.0);
        assert!((load.cable_length_m - 76.2).abs() < 1e-9);
        assert!(load.validate().is_ok());
    }

    #[test]
    fn test_invalid_power() {
        let mut load = motor();
        load.power_kw = 0.0;
        let err = load.validate().unwrap_err();
        assert!(matches!(err, CalcError::InputValidation { ref field, .. } if field == "power_kw"));
    }

    #[test]
    fn test_invalid_phase_count() {
        let mut load = motor();
        load.phases = 2;
        assert!(load.validate_rating().is_err());
    }

    #[test]
    fn test_power_factor_bounds() {
        assert!(motor().with_power_factor(1.0).validate().is_ok());
        assert!(motor().with_power_factor(0.0).validate().is_err());
        assert!(motor().with_power_factor(1.01).validate().is_err());
        assert!(motor().with_power_factor(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_efficiency_bounds() {
        assert!(motor().with_efficiency(0.0).validate().is_err());
        assert!(motor().with_efficiency(1.2).validate().is_err());
    }

    #[test]
    fn test_cable_length_required() {
        let mut load = motor();
        load.cable_length_m = 0.0;
        assert!(load.validate().is_err());
        // The rating check alone does not look at the cable
        assert!(load.validate_rating().is_ok());
    }

    #[test]
    fn test_starting_method_only_for_motors() {
        let lamp = Load::new("L-1", LoadType::Lighting, 2.0, 230.0, 1, 30.0)
            .with_starting_method(StartingMethod::DirectOnLine);
        assert!(lamp.validate().is_err());
        assert!(motor().with_starting_method(StartingMethod::Vfd).validate().is_ok());
    }

    #[test]
    fn test_design_margin_rule() {
        let heater = Load::new("H-1", LoadType::Heating, 10.0, 415.0, 3, 20.0)
            .with_duty_cycle(DutyCycle::Intermittent);
        assert!(!heater.requires_design_margin());
        let intermittent_motor = motor().with_duty_cycle(DutyCycle::ShortTime);
        assert!(intermittent_motor.requires_design_margin());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let load = motor().with_fault(25.0, 0.1).with_standard(Standard::Iec);
        let json = serde_json::to_string_pretty(&load).unwrap();
        let roundtrip: Load = serde_json::from_str(&json).unwrap();
        assert_eq!(load, roundtrip);
    }

    #[test]
    fn test_minimal_json_uses_serde_defaults() {
        let json = r#"{
            "id": "L-7",
            "power_kw": 3.0,
            "voltage_v": 230.0,
            "phases": 1,
            "power_factor": 0.9,
            "efficiency": 1.0,
            "cable_length_m": 25.0,
            "grouping_factor": 1.0
        }"#;
        let load: Load = serde_json::from_str(json).unwrap();
        assert_eq!(load.load_type, LoadType::General);
        assert_eq!(load.duty_cycle, DutyCycle::Continuous);
        assert!(load.starting_method.is_none());
    }
}
