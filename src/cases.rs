//! Running every configured case.
//!
//! Each case gets its own [`Simulator`](crate::Simulator). A case that fails
//! is logged and recorded; the remaining cases still run.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::config::{CaseDefinition, LotteryConfig};
use crate::error::{LotteryError, LotteryResult};
use crate::outcome::Distribution;
use crate::policy::DuplicateWinPolicy;
use crate::stage::StageOutcome;

/// Result of one successfully evaluated case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    /// Case label.
    pub case_name: String,
    /// Policy the case ran under.
    pub duplicate_win_policy: Option<DuplicateWinPolicy>,
    /// Theoretical seats across every targeted event.
    pub total_seats_for_target_events: f64,
    /// Per-stage diagnostics.
    pub stages: Vec<StageOutcome>,
    /// Final distribution.
    pub probabilities: Distribution,
}

/// A case that could not be evaluated.
#[derive(Debug, Serialize)]
pub struct CaseFailure {
    /// Case label.
    pub case_name: String,
    /// Why it failed.
    #[serde(serialize_with = "serialize_error")]
    pub error: LotteryError,
}

fn serialize_error<S: Serializer>(error: &LotteryError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Everything a batch run produced.
///
/// Serializes as `{"cases": [...], "failures": [...]}`.
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    #[serde(rename = "cases")]
    results: Vec<CaseResult>,
    failures: Vec<CaseFailure>,
    #[serde(skip)]
    order: Vec<Slot>,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Completed(usize),
    Failed(usize),
}

/// One case of a batch, as [`BatchOutcome::entries`] yields it.
#[derive(Debug, Clone, Copy)]
pub enum CaseEntry<'a> {
    /// The case produced a result.
    Completed(&'a CaseResult),
    /// The case was skipped.
    Failed(&'a CaseFailure),
}

impl BatchOutcome {
    /// Records a successful case.
    pub fn push_result(&mut self, result: CaseResult) {
        self.order.push(Slot::Completed(self.results.len()));
        self.results.push(result);
    }

    /// Records a failed case.
    pub fn push_failure(&mut self, failure: CaseFailure) {
        self.order.push(Slot::Failed(self.failures.len()));
        self.failures.push(failure);
    }

    /// Successful cases, in document order.
    #[must_use]
    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    /// Failed cases, in document order.
    #[must_use]
    pub fn failures(&self) -> &[CaseFailure] {
        &self.failures
    }

    /// Every case, successful or not, in document order.
    pub fn entries(&self) -> impl Iterator<Item = CaseEntry<'_>> {
        self.order.iter().map(|slot| match *slot {
            Slot::Completed(i) => CaseEntry::Completed(&self.results[i]),
            Slot::Failed(i) => CaseEntry::Failed(&self.failures[i]),
        })
    }

    /// True if at least one case ran and none succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.results.is_empty() && !self.failures.is_empty()
    }

    /// The JSON run document for this batch, stamped with `generated_at`.
    #[must_use]
    pub const fn document(&self, generated_at: DateTime<Utc>) -> RunDocument<'_> {
        RunDocument {
            generated_at,
            outcome: self,
        }
    }
}

/// JSON output of one run: `{"generated_at", "cases", "failures"}`.
#[derive(Debug, Serialize)]
pub struct RunDocument<'a> {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    outcome: &'a BatchOutcome,
}

/// Evaluates one case on a fresh simulator.
///
/// # Errors
///
/// Returns `LotteryError::ConfigLoad` for an unknown duplicate policy and
/// `LotteryError::Configuration` for invalid figures or stages.
pub fn run_case(config: &LotteryConfig, case: &CaseDefinition) -> LotteryResult<CaseResult> {
    let policy = case.duplicate_win_policy()?;
    let mut simulator = config.build_simulator(policy)?;
    let result = simulator.calculate()?.clone();

    info!(
        case = %case.case_name,
        stages = result.stages.len(),
        no_win = result.probabilities.no_win().unwrap_or_default(),
        "case evaluated"
    );

    Ok(CaseResult {
        case_name: case.case_name.clone(),
        duplicate_win_policy: policy,
        total_seats_for_target_events: simulator.total_seats_for_target_events(),
        stages: result.stages,
        probabilities: result.probabilities,
    })
}

/// Evaluates every case in `config`, continuing past failures.
#[must_use]
pub fn run_cases(config: &LotteryConfig) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for case in &config.simulation_cases_to_run {
        match run_case(config, case) {
            Ok(result) => outcome.push_result(result),
            Err(error) => {
                warn!(case = %case.case_name, %error, "case skipped");
                outcome.push_failure(CaseFailure {
                    case_name: case.case_name.clone(),
                    error,
                });
            }
        }
    }
    outcome
}
