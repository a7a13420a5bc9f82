//! # Equation Registry
//!
//! Central registry of the electrical equations applied by the sizing
//! pipeline. Each equation carries its formula, code reference, variables
//! and assumptions, so every enriched load can list exactly which formulas
//! produced it.
//!
//! ## Usage
//!
//! ```rust
//! use calc_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::ThreePhaseCurrent, "Operating current");
//!
//! let meta = Equation::AdiabaticWithstand.metadata();
//! assert_eq!(meta.formula_plain, "S = sqrt(I^2 * t) / k");
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Reference to the standard clause an equation comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CodeReference {
    /// IEC 60364 - Low-voltage electrical installations
    Iec60364 {
        part: &'static str,
        clause: &'static str,
    },
    /// IEC 60909 - Short-circuit currents in three-phase AC systems
    Iec60909 { clause: &'static str },
    /// IEC 60947 / IEC 60898 - Circuit breakers
    Iec60947 { part: &'static str },
    /// NFPA 70 National Electrical Code
    Nec { year: u16, section: &'static str },
    /// Circuit theory; no code clause needed
    Fundamentals,
}

impl CodeReference {
    /// Full citation for reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Iec60364 { part, clause } => format!("IEC 60364-{} clause {}", part, clause),
            CodeReference::Iec60909 { clause } => format!("IEC 60909-0 clause {}", clause),
            CodeReference::Iec60947 { part } => format!("IEC 60947-{}", part),
            CodeReference::Nec { year, section } => format!("NEC {} {}", year, section),
            CodeReference::Fundamentals => "Circuit Fundamentals".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::Iec60364 { .. } => "IEC 60364",
            CodeReference::Iec60909 { .. } => "IEC 60909",
            CodeReference::Iec60947 { .. } => "IEC 60947",
            CodeReference::Nec { .. } => "NEC",
            CodeReference::Fundamentals => "Fundamentals",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for grouping equations in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Operating, design and starting current
    LoadCurrent,
    /// Ampacity correction factors
    Derating,
    /// Conductor size selection
    CableSizing,
    /// Conductor impedance and voltage drop
    VoltageDrop,
    /// Fault current and thermal withstand
    ShortCircuit,
    /// Protective device selection
    Protection,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::LoadCurrent => "Load Current",
            EquationCategory::Derating => "Derating",
            EquationCategory::CableSizing => "Cable Sizing",
            EquationCategory::VoltageDrop => "Voltage Drop",
            EquationCategory::ShortCircuit => "Short Circuit",
            EquationCategory::Protection => "Protection",
        }
    }

    /// Pipeline order (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::LoadCurrent => 1,
            EquationCategory::Derating => 2,
            EquationCategory::CableSizing => 3,
            EquationCategory::VoltageDrop => 4,
            EquationCategory::ShortCircuit => 5,
            EquationCategory::Protection => 6,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "I", "V", "PF")
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for an equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// What the equation calculates
    pub description: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    /// Code/standard reference
    pub reference: CodeReference,
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All equations applied by the sizing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    // -------------------------------------------------------------------------
    // Load current
    // -------------------------------------------------------------------------
    /// I = 1000P / (√3·V·PF·η)
    ThreePhaseCurrent,
    /// I = 1000P / (V·PF·η)
    SinglePhaseCurrent,
    /// Ib = 1.25·I for continuous or motor loads
    DesignCurrent,
    /// Ist = m·I for motors with a starter
    StartingCurrent,

    // -------------------------------------------------------------------------
    // Derating & sizing
    // -------------------------------------------------------------------------
    /// Linear interpolation over the temperature curve
    TemperatureDerating,
    /// f = f_T · f_inst · f_group
    CombinedDerating,
    /// Iz_req = Ib / f
    RequiredAmpacity,
    /// S = max(S_amp, S_vd, S_sc)
    GoverningSize,

    // -------------------------------------------------------------------------
    // Voltage drop
    // -------------------------------------------------------------------------
    /// R = ρ20·(1 + α(θ − 20))·1000 / S
    ConductorResistance,
    /// Vd = √3·I·L·(R cos φ + X sin φ)/1000
    VoltageDropThreePhase,
    /// Vd = 2·I·L·(R cos φ + X sin φ)/1000
    VoltageDropSinglePhase,
    /// Vd% = Vd / V × 100
    VoltageDropPercent,

    // -------------------------------------------------------------------------
    // Short circuit
    // -------------------------------------------------------------------------
    /// Isc = V / (√3·Z)
    SystemFaultCurrent,
    /// Isc_min = 0.8·Isc
    MinimumFaultCurrent,
    /// S = √(I²t) / k
    AdiabaticWithstand,

    // -------------------------------------------------------------------------
    // Protection
    // -------------------------------------------------------------------------
    /// In = min{ladder entry ≥ Ib}
    BreakerRating,
    /// Icu ≥ Isc
    BreakingCapacityCheck,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::ThreePhaseCurrent => EquationMetadata {
                name: "Three-Phase Load Current",
                description: "Line current drawn by a balanced three-phase load",
                formula_plain: "I = 1000 * P / (sqrt(3) * V * PF * eta)",
                reference: CodeReference::Fundamentals,
                variables: vec![
                    Variable::new("P", "Rated output power", "kW"),
                    Variable::new("V", "Line-to-line voltage", "V"),
                    Variable::new("PF", "Power factor", "-"),
                    Variable::new("eta", "Efficiency", "-"),
                ],
                assumptions: vec!["Balanced load", "Sinusoidal steady state"],
                category: EquationCategory::LoadCurrent,
                source_module: "equations/electrical.rs",
                source_function: "three_phase_current",
            },

            Equation::SinglePhaseCurrent => EquationMetadata {
                name: "Single-Phase Load Current",
                description: "Current drawn by a single-phase load",
                formula_plain: "I = 1000 * P / (V * PF * eta)",
                reference: CodeReference::Fundamentals,
                variables: vec![
                    Variable::new("P", "Rated output power", "kW"),
                    Variable::new("V", "Phase voltage", "V"),
                    Variable::new("PF", "Power factor", "-"),
                    Variable::new("eta", "Efficiency", "-"),
                ],
                assumptions: vec!["Sinusoidal steady state"],
                category: EquationCategory::LoadCurrent,
                source_module: "equations/electrical.rs",
                source_function: "single_phase_current",
            },

            Equation::DesignCurrent => EquationMetadata {
                name: "Design Current",
                description: "Operating current with the continuous-duty / motor margin",
                formula_plain: "Ib = 1.25 * I (continuous or motor), Ib = I otherwise",
                reference: CodeReference::Nec { year: 2023, section: "210.19(A) / 430.22" },
                variables: vec![
                    Variable::new("Ib", "Design current", "A"),
                    Variable::new("I", "Operating current", "A"),
                ],
                assumptions: vec!["Same margin applied under every standard"],
                category: EquationCategory::LoadCurrent,
                source_module: "calculations/current.rs",
                source_function: "design_current",
            },

            Equation::StartingCurrent => EquationMetadata {
                name: "Motor Starting Current",
                description: "Expected inrush current for the motor's starting method",
                formula_plain: "Ist = m * I",
                reference: CodeReference::Fundamentals,
                variables: vec![
                    Variable::new("Ist", "Starting current", "A"),
                    Variable::new("m", "Starting multiplier (DOL 6, star-delta 2, soft starter 3, VFD 1.1)", "-"),
                ],
                assumptions: vec!["Typical multipliers, not manufacturer data"],
                category: EquationCategory::LoadCurrent,
                source_module: "calculations/current.rs",
                source_function: "starting_current",
            },

            Equation::TemperatureDerating => EquationMetadata {
                name: "Ambient Temperature Factor",
                description: "Linear interpolation between the two nearest tabulated temperatures",
                formula_plain: "f_T = f1 + (T - T1) * (f2 - f1) / (T2 - T1)",
                reference: CodeReference::Iec60364 { part: "5-52", clause: "B.52.14" },
                variables: vec![
                    Variable::new("T", "Ambient temperature", "degC"),
                    Variable::new("f_T", "Temperature correction factor", "-"),
                ],
                assumptions: vec!["Clamped to the nearest tabulated value outside the table"],
                category: EquationCategory::Derating,
                source_module: "standards/profile.rs",
                source_function: "interpolate_clamped",
            },

            Equation::CombinedDerating => EquationMetadata {
                name: "Combined Derating Factor",
                description: "Product of temperature, installation and grouping factors",
                formula_plain: "f = f_T * f_inst * f_group",
                reference: CodeReference::Iec60364 { part: "5-52", clause: "523" },
                variables: vec![
                    Variable::new("f_inst", "Installation method factor", "-"),
                    Variable::new("f_group", "Grouping factor", "-"),
                ],
                assumptions: vec!["Factors are independent"],
                category: EquationCategory::Derating,
                source_module: "standards/mod.rs",
                source_function: "StandardsProvider::derating",
            },

            Equation::RequiredAmpacity => EquationMetadata {
                name: "Required Tabulated Ampacity",
                description: "Tabulated ampacity a conductor needs so its derated rating covers the design current",
                formula_plain: "Iz_req = Ib / f",
                reference: CodeReference::Iec60364 { part: "4-43", clause: "433.1" },
                variables: vec![
                    Variable::new("Iz_req", "Required tabulated ampacity", "A"),
                    Variable::new("Ib", "Design current", "A"),
                    Variable::new("f", "Combined derating factor", "-"),
                ],
                assumptions: vec!["Smallest size with tabulated ampacity >= Iz_req is selected"],
                category: EquationCategory::CableSizing,
                source_module: "calculations/cable.rs",
                source_function: "ampacity_requirement",
            },

            Equation::GoverningSize => EquationMetadata {
                name: "Governing Conductor Size",
                description: "Largest of the three independent minimum sizes; its criterion is the limiting factor",
                formula_plain: "S = max(S_ampacity, S_voltage_drop, S_short_circuit)",
                reference: CodeReference::Fundamentals,
                variables: vec![Variable::new("S", "Selected conductor size", "mm^2")],
                assumptions: vec!["Ties resolve ampacity, then voltage drop, then short circuit"],
                category: EquationCategory::CableSizing,
                source_module: "calculations/cable.rs",
                source_function: "governing_requirement",
            },

            Equation::ConductorResistance => EquationMetadata {
                name: "Conductor Resistance at Operating Temperature",
                description: "Resistance per km corrected from 20 degC to the insulation's rated temperature",
                formula_plain: "R = rho20 * (1 + alpha * (theta - 20)) * 1000 / S",
                reference: CodeReference::Iec60364 { part: "5-52", clause: "G.1" },
                variables: vec![
                    Variable::new("rho20", "Resistivity at 20 degC", "ohm mm^2/m"),
                    Variable::new("alpha", "Temperature coefficient", "1/degC"),
                    Variable::new("theta", "Conductor operating temperature", "degC"),
                    Variable::new("S", "Cross-section", "mm^2"),
                ],
                assumptions: vec!["Linear temperature coefficient", "Skin effect neglected"],
                category: EquationCategory::VoltageDrop,
                source_module: "calculations/voltage_drop.rs",
                source_function: "resistance_ohm_per_km",
            },

            Equation::VoltageDropThreePhase => EquationMetadata {
                name: "Three-Phase Voltage Drop",
                description: "Line-to-line voltage drop along a three-phase run",
                formula_plain: "Vd = sqrt(3) * I * L * (R * cos(phi) + X * sin(phi)) / 1000",
                reference: CodeReference::Iec60364 { part: "5-52", clause: "G.1" },
                variables: vec![
                    Variable::new("L", "One-way length", "m"),
                    Variable::new("R", "Resistance", "ohm/km"),
                    Variable::new("X", "Reactance", "ohm/km"),
                ],
                assumptions: vec!["Balanced load", "sin(phi) = sqrt(1 - PF^2)"],
                category: EquationCategory::VoltageDrop,
                source_module: "equations/electrical.rs",
                source_function: "voltage_drop_three_phase",
            },

            Equation::VoltageDropSinglePhase => EquationMetadata {
                name: "Single-Phase Voltage Drop",
                description: "Voltage drop over the go and return conductors",
                formula_plain: "Vd = 2 * I * L * (R * cos(phi) + X * sin(phi)) / 1000",
                reference: CodeReference::Iec60364 { part: "5-52", clause: "G.1" },
                variables: vec![
                    Variable::new("L", "One-way length", "m"),
                    Variable::new("R", "Resistance", "ohm/km"),
                    Variable::new("X", "Reactance", "ohm/km"),
                ],
                assumptions: vec!["sin(phi) = sqrt(1 - PF^2)"],
                category: EquationCategory::VoltageDrop,
                source_module: "equations/electrical.rs",
                source_function: "voltage_drop_single_phase",
            },

            Equation::VoltageDropPercent => EquationMetadata {
                name: "Percentage Voltage Drop",
                description: "Voltage drop relative to the system voltage, checked against the circuit limit",
                formula_plain: "Vd% = Vd / V * 100",
                reference: CodeReference::Iec60364 { part: "5-52", clause: "525" },
                variables: vec![Variable::new("V", "System voltage", "V")],
                assumptions: vec![],
                category: EquationCategory::VoltageDrop,
                source_module: "equations/electrical.rs",
                source_function: "voltage_drop_percent",
            },

            Equation::SystemFaultCurrent => EquationMetadata {
                name: "Symmetrical Fault Current",
                description: "Prospective three-phase fault current from source voltage and impedance",
                formula_plain: "Isc = V / (sqrt(3) * Z)",
                reference: CodeReference::Iec60909 { clause: "4.2" },
                variables: vec![
                    Variable::new("Isc", "Prospective fault current", "A"),
                    Variable::new("Z", "Impedance to the fault", "ohm"),
                ],
                assumptions: vec!["Voltage factor c = 1.0", "Bolted fault"],
                category: EquationCategory::ShortCircuit,
                source_module: "equations/electrical.rs",
                source_function: "symmetrical_fault_current",
            },

            Equation::MinimumFaultCurrent => EquationMetadata {
                name: "Minimum Fault Current",
                description: "Conservative minimum used for protective-device coordination checks",
                formula_plain: "Isc_min = 0.8 * Isc",
                reference: CodeReference::Iec60909 { clause: "7.1" },
                variables: vec![Variable::new("Isc_min", "Minimum fault current", "kA")],
                assumptions: vec![],
                category: EquationCategory::ShortCircuit,
                source_module: "calculations/short_circuit.rs",
                source_function: "minimum_fault_current_ka",
            },

            Equation::AdiabaticWithstand => EquationMetadata {
                name: "Adiabatic Short-Circuit Withstand",
                description: "Minimum cross-section that survives the fault without exceeding the insulation limit",
                formula_plain: "S = sqrt(I^2 * t) / k",
                reference: CodeReference::Iec60364 { part: "4-43", clause: "434.5.2" },
                variables: vec![
                    Variable::new("I", "Fault current", "A"),
                    Variable::new("t", "Clearing time", "s"),
                    Variable::new("k", "Material constant", "A sqrt(s)/mm^2"),
                ],
                assumptions: vec!["No heat dissipation during the fault", "Valid for t <= 5 s"],
                category: EquationCategory::ShortCircuit,
                source_module: "equations/electrical.rs",
                source_function: "adiabatic_min_size",
            },

            Equation::BreakerRating => EquationMetadata {
                name: "Breaker Rating Selection",
                description: "Smallest standard rating not below the design current",
                formula_plain: "In = min{ r in ladder : r >= Ib }",
                reference: CodeReference::Iec60364 { part: "4-43", clause: "433.1" },
                variables: vec![
                    Variable::new("In", "Breaker rated current", "A"),
                    Variable::new("Ib", "Design current", "A"),
                ],
                assumptions: vec!["In <= Iz is reported, not enforced"],
                category: EquationCategory::Protection,
                source_module: "calculations/breaker.rs",
                source_function: "select",
            },

            Equation::BreakingCapacityCheck => EquationMetadata {
                name: "Breaking Capacity Check",
                description: "Breaker must interrupt the prospective fault current",
                formula_plain: "Icu >= Isc",
                reference: CodeReference::Iec60947 { part: "2" },
                variables: vec![
                    Variable::new("Icu", "Rated ultimate breaking capacity", "kA"),
                    Variable::new("Isc", "Prospective fault current", "kA"),
                ],
                assumptions: vec!["Escalates to the next ladder rating when insufficient"],
                category: EquationCategory::Protection,
                source_module: "calculations/breaker.rs",
                source_function: "select",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// All categories in pipeline order
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![LoadCurrent, Derating, CableSizing, VoltageDrop, ShortCircuit, Protection];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::ThreePhaseCurrent,
    Equation::SinglePhaseCurrent,
    Equation::DesignCurrent,
    Equation::StartingCurrent,
    Equation::TemperatureDerating,
    Equation::CombinedDerating,
    Equation::RequiredAmpacity,
    Equation::GoverningSize,
    Equation::ConductorResistance,
    Equation::VoltageDropThreePhase,
    Equation::VoltageDropSinglePhase,
    Equation::VoltageDropPercent,
    Equation::SystemFaultCurrent,
    Equation::MinimumFaultCurrent,
    Equation::AdiabaticWithstand,
    Equation::BreakerRating,
    Equation::BreakingCapacityCheck,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being applied to a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Where/why it was used (e.g., "Voltage drop at 70 mm²")
    pub context: String,
}

impl EquationUsage {
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
        }
    }
}

/// Collector for equation usage during one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Consume the tracker, keeping the usages in recording order
    pub fn into_usages(self) -> Vec<EquationUsage> {
        self.usages
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group unique equations by category, in pipeline order
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }

    /// Merge another tracker into this one
    pub fn merge(&mut self, other: EquationTracker) {
        self.usages.extend(other.usages);
    }
}

// ============================================================================
// Markdown Reference Generation
// ============================================================================

/// Generate the equations reference document (EQUATIONS.md).
///
/// ```rust
/// use calc_core::equations::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("Adiabatic Short-Circuit Withstand"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# Feeder Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

Every formula the cable and breaker sizing pipeline applies, with its code
reference, source location and assumptions.

---

"#,
    );

    for category in Equation::all_categories() {
        let equations = Equation::in_category(category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();
            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** `{}` :: `{}`\n\n",
                meta.source_module, meta.source_function
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty());
            assert!(!meta.formula_plain.is_empty());
        }
    }

    #[test]
    fn test_citation() {
        let r = CodeReference::Iec60364 { part: "4-43", clause: "434.5.2" };
        assert_eq!(r.citation(), "IEC 60364-4-43 clause 434.5.2");
        let nec = CodeReference::Nec { year: 2023, section: "215.2" };
        assert_eq!(nec.citation(), "NEC 2023 215.2");
    }

    #[test]
    fn test_equation_tracker() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::VoltageDropThreePhase, "25 mm²");
        tracker.record(Equation::VoltageDropThreePhase, "35 mm²");
        tracker.record(Equation::AdiabaticWithstand, "Fault");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(tracker.unique_equations().len(), 2);
    }

    #[test]
    fn test_by_category_sorted() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::BreakerRating, "x");
        tracker.record(Equation::ThreePhaseCurrent, "x");
        tracker.record(Equation::AdiabaticWithstand, "x");

        let cats: Vec<_> = tracker.by_category().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            cats,
            vec![EquationCategory::LoadCurrent, EquationCategory::ShortCircuit, EquationCategory::Protection]
        );
    }

    #[test]
    fn test_every_equation_in_a_category() {
        let total: usize = Equation::all_categories()
            .into_iter()
            .map(|c| Equation::in_category(c).len())
            .sum();
        assert_eq!(total, ALL_EQUATIONS.len());
    }

    #[test]
    fn test_markdown_contains_every_equation() {
        let md = generate_equations_markdown();
        for eq in ALL_EQUATIONS {
            assert!(md.contains(eq.metadata().name), "missing {:?}", eq);
        }
    }

    #[test]
    fn test_usage_serialization() {
        let usage = EquationUsage::new(Equation::DesignCurrent, "Ib");
        let json = serde_json::to_string(&usage).unwrap();
        assert!(json.contains("DesignCurrent"));
        let back: EquationUsage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, usage);
    }
}
