//! Standard profile data model
//!
//! A [`StandardProfile`] is pure data: every number a standard contributes
//! to the sizing engines lives here, so adding a standard means adding a
//! table, not a branch. Profiles are built once (built-ins are cached by
//! [`StandardsProvider`](super::StandardsProvider)) and never mutated.
//!
//! ## Lookup policies
//!
//! - Temperature derating: linear interpolation between the two nearest
//!   tabulated points; outside the table the nearest end value is used and
//!   an [`Notice::OutOfRangeInterpolation`] is returned.
//! - Grouping derating: exact count, otherwise the next larger tabulated
//!   count (lower factor); beyond the table, clamped with a notice.
//! - Everything else: exact lookup, a miss is `StandardsDataMissing`.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult, Notice};
use crate::loads::{CircuitType, InstallationMethod, LoadType};
use crate::materials::{ConductorMaterial, Insulation};

use super::{BreakerType, Standard, TripCurve, VoltageTier};

/// A value read from a sparse table, with a notice if it was clamped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolated {
    pub value: f64,
    pub notice: Option<Notice>,
}

/// One (x, y) point of a sparse curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TablePoint {
    pub x: f64,
    pub y: f64,
}

/// Shorthand constructor used by the built-in tables
pub(crate) fn pt(x: f64, y: f64) -> TablePoint {
    TablePoint { x, y }
}

/// Grouping derating for a number of circuits laid together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupingEntry {
    pub cables: u32,
    pub factor: f64,
}

/// Correction applied for an installation method on top of its ampacity column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallationFactor {
    pub method: InstallationMethod,
    pub factor: f64,
}

/// Tabulated ampacity per installation method; `None` means not tabulated
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodAmpacity {
    #[serde(default)]
    pub tray: Option<f64>,
    #[serde(default)]
    pub conduit: Option<f64>,
    #[serde(default)]
    pub air: Option<f64>,
    #[serde(default)]
    pub buried: Option<f64>,
    #[serde(default)]
    pub duct: Option<f64>,
}

impl MethodAmpacity {
    /// All five columns populated, in `InstallationMethod::ALL` order
    pub(crate) fn all(values: [f64; 5]) -> Self {
        MethodAmpacity {
            tray: Some(values[0]),
            conduit: Some(values[1]),
            air: Some(values[2]),
            buried: Some(values[3]),
            duct: Some(values[4]),
        }
    }

    /// Ampacity for one method
    pub fn get(&self, method: InstallationMethod) -> Option<f64> {
        match method {
            InstallationMethod::Tray => self.tray,
            InstallationMethod::Conduit => self.conduit,
            InstallationMethod::Air => self.air,
            InstallationMethod::Buried => self.buried,
            InstallationMethod::Duct => self.duct,
        }
    }
}

/// One standard conductor size with its ampacity and reactance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorRow {
    /// Cross-section in mm²
    pub size_mm2: f64,
    /// Trade designation ("70 mm²", "4/0 AWG", "250 kcmil")
    pub label: String,
    /// Positive-sequence reactance at system frequency (Ω/km)
    #[serde(default)]
    pub reactance_ohm_per_km: Option<f64>,
    /// Ampacity (A) per installation method
    pub ampacity: MethodAmpacity,
}

/// Permitted voltage drop for one circuit class (%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropLimit {
    pub circuit: CircuitType,
    pub percent: f64,
}

/// Which circuit class a load falls into when the load does not say
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircuitDefaults {
    pub lighting: CircuitType,
    pub power: CircuitType,
    pub feeder: CircuitType,
}

/// Standard breaker ratings for one voltage tier (A, ascending)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerLadder {
    pub tier: VoltageTier,
    pub ratings: Vec<f64>,
}

/// Breaker type threshold rule; first matching rule wins.
///
/// `None` bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakerTypeRule {
    pub breaker_type: BreakerType,
    #[serde(default)]
    pub max_rating_a: Option<f64>,
    #[serde(default)]
    pub max_voltage_v: Option<f64>,
}

impl BreakerTypeRule {
    fn matches(&self, rating_a: f64, voltage_v: f64) -> bool {
        self.max_rating_a.map_or(true, |max| rating_a <= max)
            && self.max_voltage_v.map_or(true, |max| voltage_v <= max)
    }
}

/// Tabulated breaking capacity of a breaker type up to a rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakingCapacity {
    pub breaker_type: BreakerType,
    #[serde(default)]
    pub max_rating_a: Option<f64>,
    pub capacity_ka: f64,
}

/// MCB trip curve for a load type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveRule {
    pub load_type: LoadType,
    pub curve: TripCurve,
}

/// Adiabatic k constant for a conductor/insulation pair (A·√s/mm²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConstant {
    pub material: ConductorMaterial,
    pub insulation: Insulation,
    pub k: f64,
}

/// Complete reference data of one standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardProfile {
    /// Which standard this profile implements
    pub standard: Standard,
    /// Citation of the underlying tables
    pub reference: String,
    /// Ambient temperature the ampacity tables assume (°C)
    pub reference_ambient_c: f64,
    /// System voltages the standard recognizes (V)
    pub recognized_voltages: Vec<f64>,
    /// Ambient temperature derating curve (x = °C, y = factor)
    pub temperature_derating: Vec<TablePoint>,
    /// Grouping derating by number of circuits
    pub grouping_derating: Vec<GroupingEntry>,
    /// Per-method correction factors
    pub installation_factors: Vec<InstallationFactor>,
    /// Standard conductor sizes, ascending
    pub conductors: Vec<ConductorRow>,
    /// Permitted voltage drop by circuit class
    pub voltage_drop_limits: Vec<VoltageDropLimit>,
    /// Circuit class defaults by load family
    pub circuit_defaults: CircuitDefaults,
    /// Breaker rating ladders per voltage tier
    pub breaker_ladders: Vec<BreakerLadder>,
    /// Breaker type thresholds, evaluated in order
    pub breaker_type_rules: Vec<BreakerTypeRule>,
    /// Breaking capacities, evaluated in order
    pub breaking_capacities: Vec<BreakingCapacity>,
    /// MCB curve per load type
    pub curve_rules: Vec<CurveRule>,
    /// Curve for load types without a rule
    pub default_curve: TripCurve,
    /// Adiabatic constants
    pub short_circuit_constants: Vec<MaterialConstant>,
}

/// Linear interpolation over an ascending sparse curve, clamped at both ends.
///
/// Returns the value and, when clamped, the x it was clamped to.
pub fn interpolate_clamped(points: &[TablePoint], x: f64) -> Option<(f64, Option<f64>)> {
    let first = points.first()?;
    let last = points.last()?;
    if x < first.x {
        return Some((first.y, Some(first.x)));
    }
    if x > last.x {
        return Some((last.y, Some(last.x)));
    }
    for pair in points.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if x >= lo.x && x <= hi.x {
            if hi.x == lo.x {
                return Some((lo.y, None));
            }
            let t = (x - lo.x) / (hi.x - lo.x);
            return Some((lo.y + t * (hi.y - lo.y), None));
        }
    }
    // Single-point table with x == first.x
    Some((first.y, None))
}

impl StandardProfile {
    /// Parse a custom profile from JSON and validate it
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let profile: StandardProfile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    fn missing(&self, table: &str, key: impl Into<String>) -> CalcError {
        CalcError::standards_data_missing(self.standard.to_string(), table, key)
    }

    /// Check that every table is present and well-formed.
    pub fn validate(&self) -> CalcResult<()> {
        if self.recognized_voltages.is_empty() {
            return Err(self.missing("recognized_voltages", "table is empty"));
        }
        if self.temperature_derating.is_empty() {
            return Err(self.missing("temperature_derating", "table is empty"));
        }
        if self.temperature_derating.windows(2).any(|w| w[1].x <= w[0].x) {
            return Err(self.missing("temperature_derating", "temperatures must be strictly ascending"));
        }
        if self.temperature_derating.iter().any(|p| p.y <= 0.0) {
            return Err(self.missing("temperature_derating", "factors must be positive"));
        }
        if self.grouping_derating.is_empty() {
            return Err(self.missing("grouping_derating", "table is empty"));
        }
        if self.grouping_derating.windows(2).any(|w| w[1].cables <= w[0].cables) {
            return Err(self.missing("grouping_derating", "cable counts must be strictly ascending"));
        }
        if self.conductors.is_empty() {
            return Err(self.missing("conductors", "table is empty"));
        }
        if self.conductors.windows(2).any(|w| w[1].size_mm2 <= w[0].size_mm2) {
            return Err(self.missing("conductors", "sizes must be strictly ascending"));
        }
        if self.voltage_drop_limits.is_empty() {
            return Err(self.missing("voltage_drop_limits", "table is empty"));
        }
        if self.voltage_drop_limits.iter().any(|l| l.percent <= 0.0) {
            return Err(self.missing("voltage_drop_limits", "limits must be positive"));
        }
        if self.breaker_ladders.is_empty() {
            return Err(self.missing("breaker_ladders", "no ladder defined"));
        }
        for ladder in &self.breaker_ladders {
            if ladder.ratings.is_empty() || ladder.ratings.windows(2).any(|w| w[1] <= w[0]) {
                return Err(self.missing(
                    "breaker_ladders",
                    format!("{:?} ladder must be non-empty and strictly ascending", ladder.tier),
                ));
            }
        }
        if self.breaker_type_rules.is_empty() {
            return Err(self.missing("breaker_type_rules", "table is empty"));
        }
        if self.short_circuit_constants.iter().any(|c| c.k <= 0.0) {
            return Err(self.missing("short_circuit_constants", "k must be positive"));
        }
        Ok(())
    }

    /// Temperature factor, interpolated and clamped
    pub fn temperature_factor(&self, ambient_c: f64) -> CalcResult<Interpolated> {
        let (value, clamped) = interpolate_clamped(&self.temperature_derating, ambient_c)
            .ok_or_else(|| self.missing("temperature_derating", "table is empty"))?;
        let notice = clamped.map(|edge| Notice::OutOfRangeInterpolation {
            table: "temperature_derating".to_string(),
            requested: ambient_c,
            clamped_to: edge,
        });
        Ok(Interpolated { value, notice })
    }

    /// Grouping factor for a number of circuits
    pub fn grouping_factor(&self, cables: u32) -> CalcResult<Interpolated> {
        if cables == 0 {
            return Err(CalcError::input_validation("cables", "0", "At least one circuit is required"));
        }
        if let Some(entry) = self.grouping_derating.iter().find(|e| e.cables >= cables) {
            return Ok(Interpolated { value: entry.factor, notice: None });
        }
        let last = self
            .grouping_derating
            .last()
            .ok_or_else(|| self.missing("grouping_derating", "table is empty"))?;
        Ok(Interpolated {
            value: last.factor,
            notice: Some(Notice::OutOfRangeInterpolation {
                table: "grouping_derating".to_string(),
                requested: cables as f64,
                clamped_to: last.cables as f64,
            }),
        })
    }

    /// Installation correction factor
    pub fn installation_factor(&self, method: InstallationMethod) -> CalcResult<f64> {
        self.installation_factors
            .iter()
            .find(|f| f.method == method)
            .map(|f| f.factor)
            .ok_or_else(|| self.missing("installation_factors", method.to_string()))
    }

    /// Conductor row by exact size
    pub fn conductor(&self, size_mm2: f64) -> CalcResult<&ConductorRow> {
        self.conductors
            .iter()
            .find(|row| (row.size_mm2 - size_mm2).abs() < 1e-9)
            .ok_or_else(|| self.missing("conductors", format!("{} mm²", size_mm2)))
    }

    /// Voltage drop limit for a circuit class (%)
    pub fn voltage_drop_limit(&self, circuit: CircuitType) -> CalcResult<f64> {
        self.voltage_drop_limits
            .iter()
            .find(|l| l.circuit == circuit)
            .map(|l| l.percent)
            .ok_or_else(|| self.missing("voltage_drop_limits", circuit.to_string()))
    }

    /// Ladder for a voltage tier
    pub fn breaker_ladder(&self, tier: VoltageTier) -> CalcResult<&[f64]> {
        self.breaker_ladders
            .iter()
            .find(|l| l.tier == tier)
            .map(|l| l.ratings.as_slice())
            .ok_or_else(|| self.missing("breaker_ladders", format!("{:?}", tier)))
    }

    /// Breaker type by threshold rules
    pub fn breaker_type(&self, rating_a: f64, voltage_v: f64) -> CalcResult<BreakerType> {
        self.breaker_type_rules
            .iter()
            .find(|rule| rule.matches(rating_a, voltage_v))
            .map(|rule| rule.breaker_type)
            .ok_or_else(|| self.missing("breaker_type_rules", format!("{} A at {} V", rating_a, voltage_v)))
    }

    /// Breaking capacity of a type at a rating (kA)
    pub fn breaking_capacity_ka(&self, breaker_type: BreakerType, rating_a: f64) -> CalcResult<f64> {
        self.breaking_capacities
            .iter()
            .find(|bc| bc.breaker_type == breaker_type && bc.max_rating_a.map_or(true, |max| rating_a <= max))
            .map(|bc| bc.capacity_ka)
            .ok_or_else(|| self.missing("breaking_capacities", format!("{} {} A", breaker_type, rating_a)))
    }

    /// MCB curve for a load type
    pub fn curve_for(&self, load_type: LoadType) -> TripCurve {
        self.curve_rules
            .iter()
            .find(|r| r.load_type == load_type)
            .map(|r| r.curve)
            .unwrap_or(self.default_curve)
    }

    /// Adiabatic k for a conductor/insulation pair
    pub fn material_constant(&self, material: ConductorMaterial, insulation: Insulation) -> CalcResult<f64> {
        self.short_circuit_constants
            .iter()
            .find(|c| c.material == material && c.insulation == insulation)
            .map(|c| c.k)
            .ok_or_else(|| {
                self.missing(
                    "short_circuit_constants",
                    format!("{}/{}", material.symbol(), insulation.code()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> Vec<TablePoint> {
        vec![pt(30.0, 1.0), pt(40.0, 0.91), pt(50.0, 0.82)]
    }

    #[test]
    fn test_interpolation_midpoint() {
        let (v, clamped) = interpolate_clamped(&curve(), 45.0).unwrap();
        assert!((v - 0.865).abs() < 1e-12);
        assert!(clamped.is_none());
    }

    #[test]
    fn test_interpolation_exact_point() {
        let (v, clamped) = interpolate_clamped(&curve(), 40.0).unwrap();
        assert_eq!(v, 0.91);
        assert!(clamped.is_none());
    }

    #[test]
    fn test_interpolation_clamps_below_and_above() {
        assert_eq!(interpolate_clamped(&curve(), 10.0), Some((1.0, Some(30.0))));
        assert_eq!(interpolate_clamped(&curve(), 70.0), Some((0.82, Some(50.0))));
    }

    #[test]
    fn test_interpolation_empty_table() {
        assert!(interpolate_clamped(&[], 30.0).is_none());
    }

    #[test]
    fn test_single_point_table() {
        let single = [pt(30.0, 1.0)];
        assert_eq!(interpolate_clamped(&single, 30.0), Some((1.0, None)));
    }

    #[test]
    fn test_breaker_type_rule_bounds() {
        let rule = BreakerTypeRule {
            breaker_type: BreakerType::Mcb,
            max_rating_a: Some(125.0),
            max_voltage_v: Some(1000.0),
        };
        assert!(rule.matches(125.0, 415.0));
        assert!(!rule.matches(160.0, 415.0));
        assert!(!rule.matches(100.0, 3300.0));
    }

    #[test]
    fn test_method_ampacity_get() {
        let row = MethodAmpacity::all([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(row.get(InstallationMethod::Air), Some(3.0));
        assert_eq!(MethodAmpacity::default().get(InstallationMethod::Tray), None);
    }
}
