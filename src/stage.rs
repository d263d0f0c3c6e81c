//! Lottery stages and their computed outcomes.
//!
//! A [`Stage`] is immutable configuration. The numbers a calculation derives
//! for it live in a separate [`StageOutcome`] record, so re-running a
//! calculation never sees values left over from an earlier run.

use serde::{Deserialize, Serialize};

/// One sequential round of the lottery.
///
/// Stages are validated by [`Simulator::add_stage`](crate::Simulator::add_stage),
/// not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    name: String,
    core_fan_ratio: f64,
    extra_applicants: u64,
    weight: f64,
}

impl Stage {
    pub(crate) fn new(
        name: impl Into<String>,
        core_fan_ratio: f64,
        extra_applicants: u64,
        weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            core_fan_ratio,
            extra_applicants,
            weight,
        }
    }

    /// Stage label. Expected to be unique within a simulator.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Share of the core-fan population applying at this stage.
    #[must_use]
    pub const fn core_fan_ratio(&self) -> f64 {
        self.core_fan_ratio
    }

    /// Non-core applicants added to this stage's pool.
    #[must_use]
    pub const fn extra_applicants(&self) -> u64 {
        self.extra_applicants
    }

    /// Relative share of total seats.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// Everything a calculation derived for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    /// Stage label.
    pub name: String,
    /// Seats allocated by weight, before the duplicate-win reduction.
    pub allocated_seats: u64,
    /// Seats left for new winners after the reduction.
    pub effective_seats: u64,
    /// Core-fan applicants plus extra applicants, ignoring earlier winners.
    pub premise_applicants: u64,
    /// Premise applicants minus everyone who already won at an earlier stage.
    pub actual_applicants: u64,
    /// New winners at this stage.
    pub winners: u64,
    /// Probability of winning here given the applicant reached this stage unwon.
    pub conditional_win_prob: f64,
    /// Probability of winning for the first time at this stage.
    pub win_prob: f64,
}
