//! # Error Types
//!
//! Structured error types for calc_core. These errors are designed to be
//! informative for both humans and LLMs, providing enough context to
//! understand and fix issues programmatically.
//!
//! Fatal errors ([`CalcError`]) stop the calculation of one load (or, for a
//! missing standards profile, the whole batch). Non-fatal conditions are
//! reported as [`Notice`] values attached to the enriched result.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(CalcError::input_validation(
//!             "cable_length_m",
//!             length_m.to_string(),
//!             "Cable length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(validate_length(-1.0).unwrap_err().error_code(), "INPUT_VALIDATION");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// A sizing criterion that can bind (govern) a selection.
///
/// Serialized in snake_case so error payloads read naturally:
/// `"criterion": "short_circuit_withstand"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Derated ampacity must cover the design current
    Ampacity,
    /// Percentage voltage drop must stay within the standard's limit
    VoltageDrop,
    /// Conductor must survive the fault thermally (adiabatic)
    ShortCircuitWithstand,
    /// Breaker ladder must contain a rating at or above the design current
    BreakerRating,
}

impl Criterion {
    /// Machine-friendly name (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Ampacity => "ampacity",
            Criterion::VoltageDrop => "voltage_drop",
            Criterion::ShortCircuitWithstand => "short_circuit_withstand",
            Criterion::BreakerRating => "breaker_rating",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Standards,
    CableSizing,
    BreakerSelection,
    Batch,
    Internal,
}

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A load violates one of its invariants (fatal for that load only)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InputValidation {
        field: String,
        value: String,
        reason: String,
    },

    /// The active standard has no data for the requested table entry.
    ///
    /// This is a configuration gap, not a bad load.
    #[error("Standards data missing: {standard} has no '{table}' entry for {key}")]
    StandardsDataMissing {
        standard: String,
        table: String,
        key: String,
    },

    /// No standard size or rating satisfies a criterion.
    ///
    /// For `voltage_drop`, `required` is the drop at the largest size and
    /// `available` is the permitted limit.
    #[error("Capacity exceeded on {criterion}: {}", capacity_detail(.criterion, .required, .available, .shortfall, .unit))]
    CapacityExceeded {
        criterion: Criterion,
        required: f64,
        available: f64,
        shortfall: f64,
        unit: String,
    },

    /// No breaker in the ladder meets both the rating and the breaking capacity
    #[error(
        "Insufficient breaking capacity: fault current {fault_current_ka:.1} kA exceeds every breaker rated >= {design_current_a:.1} A (best {best_available_ka:.1} kA)"
    )]
    InsufficientBreakingCapacity {
        fault_current_ka: f64,
        best_available_ka: f64,
        design_current_a: f64,
    },

    /// A fail-fast batch stopped at this load
    #[error("Batch aborted at load '{load_id}' (#{index}): {cause}")]
    BatchAborted {
        load_id: String,
        index: usize,
        cause: Box<CalcError>,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// File system error while reading or writing a project or report
    #[error("File error during {operation} on '{path}': {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Project file written by an incompatible schema version
    #[error("Version mismatch: file is v{file_version}, expected v{expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InputValidation error
    pub fn input_validation(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InputValidation {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a StandardsDataMissing error
    pub fn standards_data_missing(standard: impl Into<String>, table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::StandardsDataMissing {
            standard: standard.into(),
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create a CapacityExceeded error; the shortfall is `required - available`
    pub fn capacity_exceeded(criterion: Criterion, required: f64, available: f64, unit: impl Into<String>) -> Self {
        CalcError::CapacityExceeded {
            criterion,
            required,
            available,
            shortfall: required - available,
            unit: unit.into(),
        }
    }

    /// Create an InsufficientBreakingCapacity error
    pub fn insufficient_breaking_capacity(fault_current_ka: f64, best_available_ka: f64, design_current_a: f64) -> Self {
        CalcError::InsufficientBreakingCapacity {
            fault_current_ka,
            best_available_ka,
            design_current_a,
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError { reason: reason.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The criterion that failed, if this is a capacity error
    pub fn criterion(&self) -> Option<Criterion> {
        match self {
            CalcError::CapacityExceeded { criterion, .. } => Some(*criterion),
            CalcError::BatchAborted { cause, .. } => cause.criterion(),
            _ => None,
        }
    }

    /// Pipeline stage that produced this error
    pub fn stage(&self) -> Stage {
        match self {
            CalcError::InputValidation { .. } => Stage::Validation,
            CalcError::StandardsDataMissing { .. } => Stage::Standards,
            CalcError::CapacityExceeded { criterion: Criterion::BreakerRating, .. } => Stage::BreakerSelection,
            CalcError::CapacityExceeded { .. } => Stage::CableSizing,
            CalcError::InsufficientBreakingCapacity { .. } => Stage::BreakerSelection,
            CalcError::BatchAborted { .. } => Stage::Batch,
            CalcError::SerializationError { .. }
            | CalcError::FileError { .. }
            | CalcError::VersionMismatch { .. }
            | CalcError::Internal { .. } => Stage::Internal,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InputValidation { .. } => "INPUT_VALIDATION",
            CalcError::StandardsDataMissing { .. } => "STANDARDS_DATA_MISSING",
            CalcError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            CalcError::InsufficientBreakingCapacity { .. } => "INSUFFICIENT_BREAKING_CAPACITY",
            CalcError::BatchAborted { .. } => "BATCH_ABORTED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

fn capacity_detail(criterion: &Criterion, required: &f64, available: &f64, shortfall: &f64, unit: &str) -> String {
    match criterion {
        Criterion::VoltageDrop => format!(
            "drop at the largest size is {:.2} {u}, exceeding the {:.2} {u} limit by {:.2} {u}",
            required,
            available,
            shortfall,
            u = unit
        ),
        _ => format!(
            "required {:.2} {u}, largest available {:.2} {u} (short by {:.2} {u})",
            required,
            available,
            shortfall,
            u = unit
        ),
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

/// Non-fatal condition attached to an otherwise successful result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum Notice {
    /// A table lookup fell outside the tabulated range and was clamped
    OutOfRangeInterpolation {
        table: String,
        requested: f64,
        clamped_to: f64,
    },

    /// Breaker rating In is above the cable's derated ampacity Iz.
    ///
    /// Reported only; protection coordination is not enforced.
    BreakerExceedsCableAmpacity {
        breaker_rating_a: f64,
        derated_ampacity_a: f64,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::OutOfRangeInterpolation { table, requested, clamped_to } => write!(
                f,
                "{} lookup at {} is outside the table; clamped to {}",
                table, requested, clamped_to
            ),
            Notice::BreakerExceedsCableAmpacity { breaker_rating_a, derated_ampacity_a } => write!(
                f,
                "breaker {:.0} A exceeds derated cable ampacity {:.1} A",
                breaker_rating_a, derated_ampacity_a
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::input_validation("power_kw", "-5.0", "Power must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::standards_data_missing("IEC", "ampacity", "70 mm² / Tray").error_code(),
            "STANDARDS_DATA_MISSING"
        );
        assert_eq!(
            CalcError::insufficient_breaking_capacity(80.0, 65.0, 100.0).error_code(),
            "INSUFFICIENT_BREAKING_CAPACITY"
        );
    }

    #[test]
    fn test_capacity_exceeded_shortfall() {
        let err = CalcError::capacity_exceeded(Criterion::ShortCircuitWithstand, 900.0, 630.0, "mm²");
        match &err {
            CalcError::CapacityExceeded { shortfall, .. } => assert!((shortfall - 270.0).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.criterion(), Some(Criterion::ShortCircuitWithstand));
        assert_eq!(err.stage(), Stage::CableSizing);
        assert!(err.to_string().contains("short_circuit_withstand"));
    }

    #[test]
    fn test_voltage_drop_capacity_message() {
        let err = CalcError::capacity_exceeded(Criterion::VoltageDrop, 7.5, 5.0, "%");
        let message = err.to_string();
        assert!(message.contains("exceeding the 5.00 % limit by 2.50 %"), "{}", message);
        assert!(!message.contains("largest available"));
    }

    #[test]
    fn test_criterion_serializes_snake_case() {
        let json = serde_json::to_string(&Criterion::ShortCircuitWithstand).unwrap();
        assert_eq!(json, "\"short_circuit_withstand\"");
    }

    #[test]
    fn test_batch_aborted_wraps_cause() {
        let cause = CalcError::capacity_exceeded(Criterion::VoltageDrop, 7.5, 5.0, "%");
        let err = CalcError::BatchAborted {
            load_id: "M-3".to_string(),
            index: 2,
            cause: Box::new(cause),
        };
        assert_eq!(err.criterion(), Some(Criterion::VoltageDrop));
        let json = serde_json::to_string(&err).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, roundtrip);
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice::OutOfRangeInterpolation {
            table: "temperature_derating".to_string(),
            requested: 65.0,
            clamped_to: 60.0,
        };
        assert!(notice.to_string().contains("clamped to 60"));
    }
}
