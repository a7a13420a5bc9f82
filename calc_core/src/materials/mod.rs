//! # Conductor Materials
//!
//! Conductor metals and insulation systems with the physical constants the
//! sizing engines need.
//!
//! ## Properties
//!
//! | Material  | ρ at 20 °C (Ω·mm²/m) | α (1/°C) |
//! |-----------|-----------------------|----------|
//! | Copper    | 0.017241              | 0.00393  |
//! | Aluminium | 0.028264              | 0.00403  |
//!
//! | Insulation | Max operating temp (°C) | Max short-circuit temp (°C) |
//! |------------|-------------------------|-----------------------------|
//! | PVC        | 70                      | 160                         |
//! | XLPE       | 90                      | 250                         |
//!
//! ## Example
//!
//! ```rust
//! use calc_core::materials::{Conductor, ConductorMaterial, Insulation};
//!
//! let cable = Conductor::new(ConductorMaterial::Copper, Insulation::Xlpe);
//! // Resistivity is corrected from 20 °C to the 90 °C operating temperature
//! let rho = cable.operating_resistivity();
//! assert!((rho - 0.021984).abs() < 1e-5);
//! ```

use serde::{Deserialize, Serialize};

/// Conductor metal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConductorMaterial {
    #[default]
    Copper,
    Aluminium,
}

impl ConductorMaterial {
    /// Reference temperature of the tabulated resistivity (°C)
    pub const REFERENCE_TEMP_C: f64 = 20.0;

    /// Resistivity at 20 °C in Ω·mm²/m
    pub fn resistivity_20c(&self) -> f64 {
        match self {
            ConductorMaterial::Copper => 0.017_241,
            ConductorMaterial::Aluminium => 0.028_264,
        }
    }

    /// Linear temperature coefficient of resistance at 20 °C (1/°C)
    pub fn temperature_coefficient(&self) -> f64 {
        match self {
            ConductorMaterial::Copper => 0.003_93,
            ConductorMaterial::Aluminium => 0.004_03,
        }
    }

    /// Chemical symbol used in cable designations
    pub fn symbol(&self) -> &'static str {
        match self {
            ConductorMaterial::Copper => "Cu",
            ConductorMaterial::Aluminium => "Al",
        }
    }
}

/// Insulation system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Insulation {
    /// Thermoplastic PVC, 70 °C
    Pvc,
    /// Cross-linked polyethylene, 90 °C
    #[default]
    Xlpe,
}

impl Insulation {
    /// Maximum continuous conductor temperature (°C)
    pub fn max_operating_temp_c(&self) -> f64 {
        match self {
            Insulation::Pvc => 70.0,
            Insulation::Xlpe => 90.0,
        }
    }

    /// Maximum conductor temperature during a short circuit (°C)
    pub fn max_short_circuit_temp_c(&self) -> f64 {
        match self {
            Insulation::Pvc => 160.0,
            Insulation::Xlpe => 250.0,
        }
    }

    /// Designation code
    pub fn code(&self) -> &'static str {
        match self {
            Insulation::Pvc => "PVC",
            Insulation::Xlpe => "XLPE",
        }
    }
}

/// A conductor material with its insulation system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Conductor {
    pub material: ConductorMaterial,
    pub insulation: Insulation,
}

impl Conductor {
    /// Create a conductor description
    pub fn new(material: ConductorMaterial, insulation: Insulation) -> Self {
        Conductor { material, insulation }
    }

    /// Resistivity at an arbitrary conductor temperature (Ω·mm²/m):
    /// ρ_T = ρ_20 × (1 + α × (T − 20))
    pub fn resistivity_at(&self, temp_c: f64) -> f64 {
        let dt = temp_c - ConductorMaterial::REFERENCE_TEMP_C;
        self.material.resistivity_20c() * (1.0 + self.material.temperature_coefficient() * dt)
    }

    /// Resistivity at the insulation's rated operating temperature
    pub fn operating_resistivity(&self) -> f64 {
        self.resistivity_at(self.insulation.max_operating_temp_c())
    }

    /// Short designation, e.g. "Cu/XLPE"
    pub fn designation(&self) -> String {
        format!("{}/{}", self.material.symbol(), self.insulation.code())
    }
}

impl std::fmt::Display for Conductor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.designation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copper_xlpe_operating_resistivity() {
        let c = Conductor::new(ConductorMaterial::Copper, Insulation::Xlpe);
        // 0.017241 × (1 + 0.00393 × 70) = 0.021984
        assert!((c.operating_resistivity() - 0.021_984).abs() < 1e-5);
    }

    #[test]
    fn test_pvc_runs_cooler() {
        let xlpe = Conductor::new(ConductorMaterial::Copper, Insulation::Xlpe);
        let pvc = Conductor::new(ConductorMaterial::Copper, Insulation::Pvc);
        assert!(pvc.operating_resistivity() < xlpe.operating_resistivity());
    }

    #[test]
    fn test_aluminium_more_resistive() {
        let cu = Conductor::new(ConductorMaterial::Copper, Insulation::Xlpe);
        let al = Conductor::new(ConductorMaterial::Aluminium, Insulation::Xlpe);
        assert!(al.operating_resistivity() > 1.5 * cu.operating_resistivity());
    }

    #[test]
    fn test_resistivity_at_reference_temp() {
        let c = Conductor::default();
        assert_eq!(c.resistivity_at(20.0), ConductorMaterial::Copper.resistivity_20c());
    }

    #[test]
    fn test_designation() {
        let c = Conductor::new(ConductorMaterial::Aluminium, Insulation::Pvc);
        assert_eq!(c.designation(), "Al/PVC");
        let json = serde_json::to_string(&c).unwrap();
        let roundtrip: Conductor = serde_json::from_str(&json).unwrap();
        assert_eq!(c, roundtrip);
    }
}
