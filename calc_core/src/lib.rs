//! # calc_core - Cable and Protective-Device Sizing Engine
//!
//! `calc_core` sizes the cable and breaker for every load in an electrical
//! schedule under IEC 60364, IS 732 / IS 3961 or the NEC. All inputs and
//! outputs are JSON-serializable, making it easy to drive from other tools
//! or from an LLM assistant.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from a load and a standards provider to a result
//! - **Data-driven standards**: Each standard is a [`StandardProfile`](standards::StandardProfile) value
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types naming the failing stage and criterion
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::calculate_with_standard;
//! use calc_core::loads::{Load, LoadType};
//! use calc_core::standards::Standard;
//!
//! let motor = Load::new("M-1", LoadType::Motor, 75.0, 415.0, 3, 120.0)
//!     .with_efficiency(0.92)
//!     .with_ambient(45.0);
//!
//! let enriched = calculate_with_standard(&motor, Standard::Iec).unwrap();
//! println!("{} on a {} A {}", enriched.cable.designation, enriched.breaker.rating_a, enriched.breaker.breaker_type);
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, metadata, and engine settings
//! - [`calculations`] - Current, cable, voltage drop, short circuit, breaker, batch
//! - [`standards`] - IEC / IS / NEC reference data and the provider API
//! - [`loads`] - Load records and their invariants
//! - [`materials`] - Conductor materials and insulation
//! - [`equations`] - Equation registry for the calculation audit trail
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types and notices
//! - [`file_io`] - Atomic project and report files

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod project;
pub mod standards;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, calculate_batch, BatchReport, EnrichedLoad, FailurePolicy};
pub use errors::{CalcError, CalcResult, Notice};
pub use file_io::{load_project, save_project, save_report};
pub use loads::Load;
pub use project::{GlobalSettings, Project, ProjectMetadata};
pub use standards::{Standard, StandardsProvider};
