//! Load classification enums
//!
//! Categorical attributes of an electrical load: what kind of equipment it
//! is, how it runs, how a motor is started, how its cable is installed, and
//! which circuit class its voltage-drop limit comes from.

use serde::{Deserialize, Serialize};

/// Equipment category of a load.
///
/// The category drives three decisions downstream: whether the 1.25 motor
/// margin applies, which MCB trip curve is assigned, and whether a
/// three-phase cable needs a neutral core.
///
/// # Example
/// ```
/// use calc_core::loads::LoadType;
///
/// assert!(LoadType::Motor.is_motor());
/// assert!(LoadType::Lighting.needs_neutral());
/// assert_eq!(LoadType::Pump.code(), "PMP");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LoadType {
    /// Induction motor drive
    Motor,
    /// Lighting circuit or panel
    Lighting,
    /// Resistive heating
    Heating,
    /// HVAC unit (compressor / fan motors)
    Hvac,
    /// Pump set
    Pump,
    /// Socket-outlet (small power) circuit
    Socket,
    /// Transformer primary
    Transformer,
    /// UPS / rectifier input
    Ups,
    /// Welding outlet
    Welding,
    /// Sub-distribution feeder
    Feeder,
    /// Anything else
    #[default]
    General,
}

impl LoadType {
    /// All load types in display order
    pub const ALL: [LoadType; 11] = [
        LoadType::Motor,
        LoadType::Lighting,
        LoadType::Heating,
        LoadType::Hvac,
        LoadType::Pump,
        LoadType::Socket,
        LoadType::Transformer,
        LoadType::Ups,
        LoadType::Welding,
        LoadType::Feeder,
        LoadType::General,
    ];

    /// Short schedule code
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Motor => "MTR",
            LoadType::Lighting => "LTG",
            LoadType::Heating => "HTR",
            LoadType::Hvac => "HVAC",
            LoadType::Pump => "PMP",
            LoadType::Socket => "SKT",
            LoadType::Transformer => "TRF",
            LoadType::Ups => "UPS",
            LoadType::Welding => "WLD",
            LoadType::Feeder => "FDR",
            LoadType::General => "GEN",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Motor => "Motor",
            LoadType::Lighting => "Lighting",
            LoadType::Heating => "Heating",
            LoadType::Hvac => "HVAC",
            LoadType::Pump => "Pump",
            LoadType::Socket => "Socket outlets",
            LoadType::Transformer => "Transformer",
            LoadType::Ups => "UPS",
            LoadType::Welding => "Welding",
            LoadType::Feeder => "Feeder",
            LoadType::General => "General",
        }
    }

    /// Motor-driven loads get the 1.25 design margin and may carry a starting method
    pub fn is_motor(&self) -> bool {
        matches!(self, LoadType::Motor | LoadType::Pump | LoadType::Hvac)
    }

    /// Loads with single-phase sub-circuits or unbalanced current need a neutral core
    pub fn needs_neutral(&self) -> bool {
        matches!(
            self,
            LoadType::Lighting | LoadType::Socket | LoadType::Ups | LoadType::Feeder | LoadType::General
        )
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Operating regime of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DutyCycle {
    /// Runs for 3 hours or more at full current
    #[default]
    Continuous,
    /// Periodic on/off operation
    Intermittent,
    /// Runs for a bounded short period
    ShortTime,
}

/// Motor starting method.
///
/// Only meaningful for motor-driven loads; the multiplier scales full-load
/// current to the expected starting current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartingMethod {
    /// Direct-on-line
    DirectOnLine,
    /// Star-delta starter
    StarDelta,
    /// Soft starter
    SoftStarter,
    /// Variable frequency drive
    Vfd,
}

impl StartingMethod {
    /// Starting current as a multiple of full-load current
    pub fn starting_current_multiplier(&self) -> f64 {
        match self {
            StartingMethod::DirectOnLine => 6.0,
            StartingMethod::StarDelta => 2.0,
            StartingMethod::SoftStarter => 3.0,
            StartingMethod::Vfd => 1.1,
        }
    }
}

/// Cable installation method.
///
/// Ampacity tables are keyed by (size, method); every profile also carries
/// a per-method correction factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InstallationMethod {
    /// Perforated cable tray
    #[default]
    Tray,
    /// Conduit or trunking
    Conduit,
    /// Clipped direct / free air
    Air,
    /// Direct buried
    Buried,
    /// Buried duct
    Duct,
}

impl InstallationMethod {
    /// All installation methods
    pub const ALL: [InstallationMethod; 5] = [
        InstallationMethod::Tray,
        InstallationMethod::Conduit,
        InstallationMethod::Air,
        InstallationMethod::Buried,
        InstallationMethod::Duct,
    ];

    /// Underground installations require armoured cable
    pub fn is_underground(&self) -> bool {
        matches!(self, InstallationMethod::Buried | InstallationMethod::Duct)
    }
}

impl std::fmt::Display for InstallationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InstallationMethod::Tray => "Tray",
            InstallationMethod::Conduit => "Conduit",
            InstallationMethod::Air => "Air",
            InstallationMethod::Buried => "Buried",
            InstallationMethod::Duct => "Duct",
        };
        f.write_str(name)
    }
}

/// Circuit class used to look up the permitted voltage drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitType {
    /// Lighting final circuit (IEC / IS)
    Lighting,
    /// Power / other final circuit (IEC / IS)
    Power,
    /// Branch circuit (NEC 210.19 informational note)
    Branch,
    /// Feeder (NEC 215.2 informational note)
    Feeder,
    /// Feeder plus branch (NEC)
    Combined,
}

impl std::fmt::Display for CircuitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CircuitType::Lighting => "lighting",
            CircuitType::Power => "power",
            CircuitType::Branch => "branch",
            CircuitType::Feeder => "feeder",
            CircuitType::Combined => "combined",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_classification() {
        assert!(LoadType::Motor.is_motor());
        assert!(LoadType::Pump.is_motor());
        assert!(LoadType::Hvac.is_motor());
        assert!(!LoadType::Lighting.is_motor());
        assert!(!LoadType::Heating.is_motor());
    }

    #[test]
    fn test_neutral_requirement() {
        assert!(LoadType::Lighting.needs_neutral());
        assert!(!LoadType::Motor.needs_neutral());
        assert!(!LoadType::Transformer.needs_neutral());
    }

    #[test]
    fn test_starting_multipliers_ordered() {
        assert!(
            StartingMethod::DirectOnLine.starting_current_multiplier()
                > StartingMethod::SoftStarter.starting_current_multiplier()
        );
        assert!(StartingMethod::Vfd.starting_current_multiplier() < 1.5);
    }

    #[test]
    fn test_underground() {
        assert!(InstallationMethod::Buried.is_underground());
        assert!(InstallationMethod::Duct.is_underground());
        assert!(!InstallationMethod::Tray.is_underground());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&InstallationMethod::Conduit).unwrap();
        assert_eq!(json, "\"Conduit\"");
        let parsed: DutyCycle = serde_json::from_str("\"ShortTime\"").unwrap();
        assert_eq!(parsed, DutyCycle::ShortTime);
    }

    #[test]
    fn test_all_contains_all_variants() {
        assert_eq!(LoadType::ALL.len(), 11);
        assert_eq!(InstallationMethod::ALL.len(), 5);
    }
}
