//! # Project Data Structures
//!
//! The `Project` struct is the root container for a load schedule and the
//! engine settings it is sized with. Projects serialize to human-readable
//! JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (standard, ambient, conductor, fault source)
//! └── loads: Vec<Load> (the schedule, in order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::FailurePolicy;
//! use calc_core::loads::{Load, LoadType};
//! use calc_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! project.add_load(Load::new("P-101", LoadType::Pump, 37.0, 415.0, 3, 85.0));
//!
//! let report = project.run(FailurePolicy::BestEffort).unwrap();
//! assert_eq!(report.succeeded, 1);
//!
//! // Serialize to JSON
//! let json = project.to_json().unwrap();
//! assert!(json.contains("P-101"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::{calculate_batch_with, BatchOptions, BatchReport, FailurePolicy, FaultSource};
use crate::errors::{CalcError, CalcResult};
use crate::loads::Load;
use crate::materials::Conductor;
use crate::standards::{Standard, StandardsProvider};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Engine settings applied to every load
    #[serde(default)]
    pub settings: GlobalSettings,

    /// The load schedule
    ///
    /// Order is preserved through a batch run; outcomes come back indexed
    /// by position in this list.
    #[serde(default)]
    pub loads: Vec<Load>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            loads: Vec::new(),
        }
    }

    /// Append a load to the schedule.
    ///
    /// Returns its index.
    pub fn add_load(&mut self, load: Load) -> usize {
        self.loads.push(load);
        self.touch();
        self.loads.len() - 1
    }

    /// Remove a load by id; returns it if present
    pub fn remove_load(&mut self, id: &str) -> Option<Load> {
        let position = self.loads.iter().position(|l| l.id == id)?;
        self.touch();
        Some(self.loads.remove(position))
    }

    /// Find a load by id
    pub fn get_load(&self, id: &str) -> Option<&Load> {
        self.loads.iter().find(|l| l.id == id)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn load_count(&self) -> usize {
        self.loads.len()
    }

    /// Parse a project from JSON
    pub fn from_json(json: &str) -> CalcResult<Self> {
        serde_json::from_str(json).map_err(|e| CalcError::serialization(format!("Invalid project JSON: {}", e)))
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Size every load in the schedule with the project settings
    pub fn run(&self, policy: FailurePolicy) -> CalcResult<BatchReport> {
        self.run_with(BatchOptions::new(policy))
    }

    /// As [`run`](Self::run), with explicit batch options
    pub fn run_with(&self, options: BatchOptions) -> CalcResult<BatchReport> {
        let provider = StandardsProvider::new(self.settings.standard);
        calculate_batch_with(&self.loads, &provider, &self.settings, options)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Engine configuration shared by every load in a run.
///
/// Per-load fields (`ambient_temp_c`, `fault_level_ka`,
/// `fault_clearing_time_s`) take precedence over these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Standard loads are sized against
    #[serde(default)]
    pub standard: Standard,

    /// Site ambient temperature (°C)
    #[serde(default = "default_ambient_temp_c")]
    pub ambient_temp_c: f64,

    /// Conductor material and insulation for every cable
    #[serde(default)]
    pub conductor: Conductor,

    /// Upstream network, if known
    #[serde(default)]
    pub fault_source: Option<FaultSource>,

    /// Clearing time used with the fault source (s)
    #[serde(default = "default_fault_clearing_time_s")]
    pub fault_clearing_time_s: f64,
}

fn default_ambient_temp_c() -> f64 {
    40.0
}

fn default_fault_clearing_time_s() -> f64 {
    0.1
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            standard: Standard::Iec,
            ambient_temp_c: default_ambient_temp_c(),
            conductor: Conductor::default(),
            fault_source: None,
            fault_clearing_time_s: default_fault_clearing_time_s(),
        }
    }
}

impl GlobalSettings {
    /// Reject settings no load could be sized with
    pub fn validate(&self) -> CalcResult<()> {
        if !self.ambient_temp_c.is_finite() {
            return Err(CalcError::input_validation(
                "ambient_temp_c",
                self.ambient_temp_c.to_string(),
                "Site ambient temperature must be a finite number",
            ));
        }
        if !(self.fault_clearing_time_s.is_finite() && self.fault_clearing_time_s > 0.0) {
            return Err(CalcError::input_validation(
                "fault_clearing_time_s",
                self.fault_clearing_time_s.to_string(),
                "Fault clearing time must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadType;
    use crate::materials::{ConductorMaterial, Insulation};

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.job_id, "25-001");
        assert_eq!(project.meta.client, "Acme Corp");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings, GlobalSettings::default());
    }

    #[test]
    fn test_default_settings() {
        let settings = GlobalSettings::default();
        assert_eq!(settings.standard, Standard::Iec);
        assert_eq!(settings.ambient_temp_c, 40.0);
        assert_eq!(settings.conductor, Conductor::new(ConductorMaterial::Copper, Insulation::Xlpe));
        assert!(settings.fault_source.is_none());
        assert_eq!(settings.fault_clearing_time_s, 0.1);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Engineer", "25-042", "Test Client");
        project.add_load(Load::new("M-1", LoadType::Motor, 75.0, 415.0, 3, 120.0));
        let json = project.to_json().unwrap();

        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("\"standard\": \"IEC\""));

        let roundtrip = Project::from_json(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "Jane Engineer");
        assert_eq!(roundtrip.loads, project.loads);
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: GlobalSettings = serde_json::from_str(r#"{"standard":"NEC"}"#).unwrap();
        assert_eq!(settings.standard, Standard::Nec);
        assert_eq!(settings.ambient_temp_c, 40.0);
        assert_eq!(settings.fault_clearing_time_s, 0.1);
    }

    #[test]
    fn test_settings_validation() {
        assert!(GlobalSettings::default().validate().is_ok());

        let nan_ambient = GlobalSettings {
            ambient_temp_c: f64::NAN,
            ..GlobalSettings::default()
        };
        let err = nan_ambient.validate().unwrap_err();
        assert!(matches!(err, CalcError::InputValidation { ref field, .. } if field == "ambient_temp_c"));

        let zero_clearing = GlobalSettings {
            fault_clearing_time_s: 0.0,
            ..GlobalSettings::default()
        };
        assert!(zero_clearing.validate().is_err());
    }

    #[test]
    fn test_add_remove_load() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        let index = project.add_load(Load::new("P-1", LoadType::Pump, 11.0, 415.0, 3, 30.0));
        assert_eq!(index, 0);
        assert_eq!(project.load_count(), 1);
        assert!(project.get_load("P-1").is_some());

        assert!(project.remove_load("missing").is_none());
        assert!(project.remove_load("P-1").is_some());
        assert_eq!(project.load_count(), 0);
    }

    #[test]
    fn test_run_uses_project_settings() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        project.settings.standard = Standard::Nec;
        project.settings.fault_source = Some(FaultSource::FaultLevel { fault_level_ka: 10.0 });
        project.add_load(Load::new("P-1", LoadType::Pump, 30.0, 480.0, 3, 40.0));

        let report = project.run(FailurePolicy::FailFast).unwrap();
        assert_eq!(report.standard, Standard::Nec);
        let enriched = report.enriched().next().unwrap();
        assert_eq!(enriched.short_circuit().unwrap().fault_current_ka, 10.0);
    }

    #[test]
    fn test_invalid_json() {
        let err = Project::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
