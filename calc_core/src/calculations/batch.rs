//! # Batch Runs
//!
//! Sizes many loads against one shared, immutable [`StandardsProvider`].
//! Loads are independent, so the run is a rayon parallel map; results come
//! back in input order regardless of scheduling.
//!
//! ## Failure policies
//!
//! | Policy        | Per-load failure                                   |
//! |---------------|----------------------------------------------------|
//! | `FailFast`    | Whole run fails with `BatchAborted` for the lowest failing index |
//! | `BestEffort`  | Failure recorded in that load's outcome, run continues |
//!
//! Under either policy an unknown standard aborts the run before any load is
//! processed. A `StandardsDataMissing` raised by one load's lookup is that
//! load's failure like any other.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::batch::{calculate_batch, FailurePolicy};
//! use calc_core::loads::{Load, LoadType};
//! use calc_core::project::GlobalSettings;
//!
//! let loads = vec![
//!     Load::new("P-1", LoadType::Pump, 30.0, 415.0, 3, 40.0),
//!     Load::new("L-1", LoadType::Lighting, 2.0, 230.0, 1, 25.0),
//! ];
//! let report = calculate_batch(&loads, "IEC", &GlobalSettings::default(), FailurePolicy::BestEffort).unwrap();
//! assert_eq!(report.succeeded, 2);
//! assert_eq!(report.outcomes[1].load_id, "L-1");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::loads::Load;
use crate::project::GlobalSettings;
use crate::standards::{Standard, StandardsProvider};

use super::{calculate, EnrichedLoad};

/// What a batch does when one load fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure
    #[default]
    FailFast,
    /// Report every load's result individually
    BestEffort,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::FailFast => f.write_str("fail_fast"),
            FailurePolicy::BestEffort => f.write_str("best_effort"),
        }
    }
}

/// Run options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchOptions {
    pub policy: FailurePolicy,
    /// Worker threads; 0 uses rayon's global pool
    #[serde(default)]
    pub threads: usize,
}

impl BatchOptions {
    pub fn new(policy: FailurePolicy) -> Self {
        BatchOptions { policy, threads: 0 }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

/// Result for one load, tagged with its input position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub index: usize,
    pub load_id: String,
    pub result: Result<EnrichedLoad, CalcError>,
}

impl LoadOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub standard: Standard,
    pub policy: FailurePolicy,
    pub succeeded: usize,
    pub failed: usize,
    /// One entry per input load, in input order
    pub outcomes: Vec<LoadOutcome>,
}

impl BatchReport {
    fn new(standard: Standard, policy: FailurePolicy, outcomes: Vec<LoadOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        BatchReport {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            standard,
            policy,
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }

    /// Successfully sized loads, in input order
    pub fn enriched(&self) -> impl Iterator<Item = &EnrichedLoad> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failures with their load ids, in input order
    pub fn failures(&self) -> impl Iterator<Item = (&str, &CalcError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.load_id.as_str(), e)))
    }
}

/// Size a batch of loads against a standard named by string.
///
/// An unrecognized name is a `StandardsDataMissing` error; no load runs.
pub fn calculate_batch(
    loads: &[Load],
    standard_name: &str,
    settings: &GlobalSettings,
    policy: FailurePolicy,
) -> CalcResult<BatchReport> {
    let standard: Standard = standard_name.parse()?;
    let provider = StandardsProvider::new(standard);
    calculate_batch_with(loads, &provider, settings, BatchOptions::new(policy))
}

/// Size a batch of loads against an explicit provider
pub fn calculate_batch_with(
    loads: &[Load],
    provider: &StandardsProvider,
    settings: &GlobalSettings,
    options: BatchOptions,
) -> CalcResult<BatchReport> {
    info!(
        loads = loads.len(),
        standard = %provider.standard(),
        policy = %options.policy,
        threads = options.threads,
        "batch started"
    );

    let first_failure = AtomicUsize::new(usize::MAX);
    let run = || -> Vec<Option<LoadOutcome>> {
        loads
            .par_iter()
            .enumerate()
            .map(|(index, load)| {
                // A lower-index failure already decides a fail-fast run
                if options.policy == FailurePolicy::FailFast && first_failure.load(Ordering::Acquire) < index {
                    return None;
                }
                let result = calculate(load, provider, settings);
                if let Err(err) = &result {
                    warn!(load = %load.id, index, code = err.error_code(), %err, "load failed");
                    if options.policy == FailurePolicy::FailFast {
                        first_failure.fetch_min(index, Ordering::AcqRel);
                    }
                }
                Some(LoadOutcome {
                    index,
                    load_id: load.id.clone(),
                    result,
                })
            })
            .collect()
    };

    let outcomes = if options.threads > 0 {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .map_err(|e| CalcError::Internal {
                message: format!("building batch thread pool: {}", e),
            })?;
        pool.install(run)
    } else {
        run()
    };

    // Collected in input order, so the first failure is the lowest index
    let abort = match options.policy {
        FailurePolicy::FailFast => outcomes.iter().flatten().find(|o| !o.is_ok()),
        FailurePolicy::BestEffort => None,
    };
    if let Some(outcome) = abort {
        if let Err(cause) = &outcome.result {
            warn!(load = %outcome.load_id, index = outcome.index, "batch aborted");
            return Err(CalcError::BatchAborted {
                load_id: outcome.load_id.clone(),
                index: outcome.index,
                cause: Box::new(cause.clone()),
            });
        }
    }

    let outcomes: Vec<LoadOutcome> = outcomes.into_iter().flatten().collect();
    let report = BatchReport::new(provider.standard(), options.policy, outcomes);
    info!(
        run_id = %report.run_id,
        succeeded = report.succeeded,
        failed = report.failed,
        "batch finished"
    );
    Ok(report)
}
