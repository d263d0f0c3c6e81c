//! The win-probability cascade.
//!
//! A [`Simulator`] holds the population figures of one lottery and an ordered
//! list of stages. [`Simulator::calculate`] walks the stages once, in
//! insertion order, removing every winner from the applicant pools of later
//! stages, and yields the probability of a first win at each stage plus the
//! probability of losing them all.
//!
//! A simulator is not meant to be shared: `calculate` takes `&mut self`.
//! Comparing several cases means building one simulator per case.

mod allocation;
mod builder;

pub use builder::SimulatorBuilder;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigurationError;
use crate::outcome::{Distribution, OutcomeKey};
use crate::policy::DuplicateWinPolicy;
use crate::rounding::round_count;
use crate::stage::{Stage, StageOutcome};

use allocation::allocate_seats;

/// Output of one successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Per-stage diagnostics, in evaluation order.
    pub stages: Vec<StageOutcome>,
    /// Final outcome distribution.
    pub probabilities: Distribution,
}

/// Lottery simulator for one case.
#[derive(Debug, Clone)]
pub struct Simulator {
    total_attendance: u64,
    num_events: u64,
    target_event_counts: BTreeMap<String, i64>,
    core_fan_population: u64,
    duplicate_win_policy: Option<DuplicateWinPolicy>,

    seats_per_event: f64,
    total_target_events: u64,
    total_seats_for_target_events: f64,

    stages: Vec<Stage>,
    total_weight: f64,

    result: Option<CascadeResult>,
}

impl Simulator {
    /// Creates a simulator and derives the seat figures.
    ///
    /// `target_event_counts` maps a region/category label to the number of
    /// events the applicant enters there.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::NonPositiveEventCount` if `num_events <= 0` and
    /// `ConfigurationError::NonPositiveTargetEvents` if the target counts do not sum
    /// to a positive number.
    #[allow(clippy::cast_precision_loss)]
    pub fn new<I, S>(
        total_attendance: u64,
        num_events: i64,
        target_event_counts: I,
        core_fan_population: u64,
        duplicate_win_policy: Option<DuplicateWinPolicy>,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let num_events = u64::try_from(num_events)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigurationError::NonPositiveEventCount { num_events })?;

        let target_event_counts: BTreeMap<String, i64> = target_event_counts
            .into_iter()
            .map(|(label, count)| (label.into(), count))
            .collect();
        let target_sum = target_event_counts
            .values()
            .fold(0_i64, |acc, c| acc.saturating_add(*c));
        let total_target_events = u64::try_from(target_sum)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigurationError::NonPositiveTargetEvents { total: target_sum })?;

        let seats_per_event = total_attendance as f64 / num_events as f64;
        let total_seats_for_target_events = seats_per_event * total_target_events as f64;

        Ok(Self {
            total_attendance,
            num_events,
            target_event_counts,
            core_fan_population,
            duplicate_win_policy,
            seats_per_event,
            total_target_events,
            total_seats_for_target_events,
            stages: Vec::new(),
            total_weight: 0.0,
            result: None,
        })
    }

    /// Starts a fluent builder.
    #[must_use]
    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::new()
    }

    /// Appends a stage. Stages are evaluated in the order they are added.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` naming the stage if the core-fan ratio is
    /// outside [0.0, 1.0], extra applicants are negative, or the weight is not > 0.
    pub fn add_stage(
        &mut self,
        name: impl Into<String>,
        core_fan_ratio: f64,
        extra_applicants: i64,
        weight: f64,
    ) -> Result<(), ConfigurationError> {
        let name = name.into();
        if !(0.0..=1.0).contains(&core_fan_ratio) {
            return Err(ConfigurationError::CoreFanRatioOutOfRange {
                stage: name,
                ratio: core_fan_ratio,
            });
        }
        let Ok(extra) = u64::try_from(extra_applicants) else {
            return Err(ConfigurationError::NegativeExtraApplicants {
                stage: name,
                extra_applicants,
            });
        };
        if !(weight > 0.0 && weight.is_finite()) {
            return Err(ConfigurationError::NonPositiveWeight {
                stage: name,
                weight,
            });
        }

        self.stages.push(Stage::new(name, core_fan_ratio, extra, weight));
        self.total_weight += weight;
        Ok(())
    }

    /// Runs the cascade and stores the result.
    ///
    /// Any previous result is discarded first, so after an error
    /// [`final_probabilities`](Self::final_probabilities) returns `None`.
    ///
    /// # Errors
    ///
    /// Propagates seat-allocation errors (zero total weight, reduction rate out of range).
    pub fn calculate(&mut self) -> Result<&CascadeResult, ConfigurationError> {
        self.result = None;
        let result = self.evaluate()?;
        Ok(&*self.result.insert(result))
    }

    /// Runs the cascade without storing anything.
    ///
    /// # Errors
    ///
    /// Same as [`calculate`](Self::calculate).
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate(&self) -> Result<CascadeResult, ConfigurationError> {
        if self.stages.is_empty() {
            return Ok(CascadeResult {
                stages: Vec::new(),
                probabilities: Distribution::no_stages(),
            });
        }

        let seats = allocate_seats(
            &self.stages,
            self.total_weight,
            self.total_seats_for_target_events,
            self.duplicate_win_policy.as_ref(),
        )?;

        let mut cumulative_new_winners: u64 = 0;
        let mut prob_reaching_unwon = 1.0_f64;
        let mut outcomes = Vec::with_capacity(self.stages.len());
        let mut probabilities = Distribution::default();

        for (stage, seat) in self.stages.iter().zip(seats) {
            let potential_core_fans =
                round_count(self.core_fan_population as f64 * stage.core_fan_ratio());
            let premise_applicants = potential_core_fans.saturating_add(stage.extra_applicants());
            // Earlier winners do not apply again.
            let actual_applicants = premise_applicants.saturating_sub(cumulative_new_winners);

            let (winners, conditional_win_prob) =
                if actual_applicants == 0 || seat.effective == 0 {
                    (0, 0.0)
                } else {
                    let winners = actual_applicants.min(seat.effective);
                    (winners, winners as f64 / actual_applicants as f64)
                };

            let win_prob = prob_reaching_unwon * conditional_win_prob;
            prob_reaching_unwon *= 1.0 - conditional_win_prob;
            cumulative_new_winners = cumulative_new_winners.saturating_add(winners);

            debug!(
                stage = stage.name(),
                allocated = seat.allocated,
                effective = seat.effective,
                premise_applicants,
                actual_applicants,
                winners,
                conditional_win_prob,
                win_prob,
                "stage evaluated"
            );

            probabilities.push(OutcomeKey::win_at(stage.name()), win_prob);
            outcomes.push(StageOutcome {
                name: stage.name().to_string(),
                allocated_seats: seat.allocated,
                effective_seats: seat.effective,
                premise_applicants,
                actual_applicants,
                winners,
                conditional_win_prob,
                win_prob,
            });
        }
        probabilities.push(OutcomeKey::NoWin, prob_reaching_unwon);

        Ok(CascadeResult {
            stages: outcomes,
            probabilities,
        })
    }

    /// Final distribution of the last successful [`calculate`](Self::calculate).
    #[must_use]
    pub fn final_probabilities(&self) -> Option<&Distribution> {
        self.result.as_ref().map(|r| &r.probabilities)
    }

    /// Per-stage diagnostics of the last successful [`calculate`](Self::calculate).
    #[must_use]
    pub fn stage_outcomes(&self) -> Option<&[StageOutcome]> {
        self.result.as_ref().map(|r| r.stages.as_slice())
    }

    /// Everything the last successful calculation produced.
    #[must_use]
    pub const fn result(&self) -> Option<&CascadeResult> {
        self.result.as_ref()
    }

    /// Total attendance across all events.
    #[must_use]
    pub const fn total_attendance(&self) -> u64 {
        self.total_attendance
    }

    /// Number of events in the tour.
    #[must_use]
    pub const fn num_events(&self) -> u64 {
        self.num_events
    }

    /// Targeted event counts by label.
    #[must_use]
    pub const fn target_event_counts(&self) -> &BTreeMap<String, i64> {
        &self.target_event_counts
    }

    /// Size of the core-fan population.
    #[must_use]
    pub const fn core_fan_population(&self) -> u64 {
        self.core_fan_population
    }

    /// Configured duplicate-win policy, if any.
    #[must_use]
    pub const fn duplicate_win_policy(&self) -> Option<&DuplicateWinPolicy> {
        self.duplicate_win_policy.as_ref()
    }

    /// Average seats per event.
    #[must_use]
    pub const fn seats_per_event(&self) -> f64 {
        self.seats_per_event
    }

    /// Number of events the applicant enters.
    #[must_use]
    pub const fn total_target_events(&self) -> u64 {
        self.total_target_events
    }

    /// Theoretical seats across every targeted event.
    #[must_use]
    pub const fn total_seats_for_target_events(&self) -> f64 {
        self.total_seats_for_target_events
    }

    /// Stages in evaluation order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Sum of all stage weights.
    #[must_use]
    pub const fn total_weight(&self) -> f64 {
        self.total_weight
    }
}
