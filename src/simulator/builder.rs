//! Fluent construction of a [`Simulator`].

use std::collections::BTreeMap;

use crate::error::ConfigurationError;
use crate::policy::DuplicateWinPolicy;

use super::Simulator;

#[derive(Debug, Clone)]
struct PendingStage {
    name: String,
    core_fan_ratio: f64,
    extra_applicants: i64,
    weight: f64,
}

/// Builder for [`Simulator`].
///
/// Validation happens in [`build`](Self::build), with the same rules and
/// errors as [`Simulator::new`] and [`Simulator::add_stage`].
#[derive(Debug, Clone, Default)]
pub struct SimulatorBuilder {
    total_attendance: u64,
    num_events: i64,
    target_event_counts: BTreeMap<String, i64>,
    core_fan_population: u64,
    duplicate_win_policy: Option<DuplicateWinPolicy>,
    stages: Vec<PendingStage>,
}

impl SimulatorBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total attendance across all events.
    #[must_use]
    pub fn total_attendance(mut self, total_attendance: u64) -> Self {
        self.total_attendance = total_attendance;
        self
    }

    /// Number of events in the tour. Must be > 0.
    #[must_use]
    pub fn num_events(mut self, num_events: i64) -> Self {
        self.num_events = num_events;
        self
    }

    /// Number of events the applicant enters under `label`. Repeating a label
    /// replaces its count.
    #[must_use]
    pub fn target_events(mut self, label: impl Into<String>, count: i64) -> Self {
        self.target_event_counts.insert(label.into(), count);
        self
    }

    /// Size of the core-fan population.
    #[must_use]
    pub fn core_fan_population(mut self, population: u64) -> Self {
        self.core_fan_population = population;
        self
    }

    /// Duplicate-win policy.
    #[must_use]
    pub fn duplicate_win_policy(mut self, policy: DuplicateWinPolicy) -> Self {
        self.duplicate_win_policy = Some(policy);
        self
    }

    /// Queue a stage. Stages keep the order in which they are queued.
    #[must_use]
    pub fn stage(
        mut self,
        name: impl Into<String>,
        core_fan_ratio: f64,
        extra_applicants: i64,
        weight: f64,
    ) -> Self {
        self.stages.push(PendingStage {
            name: name.into(),
            core_fan_ratio,
            extra_applicants,
            weight,
        });
        self
    }

    /// Build the simulator.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` raised by construction or by any queued stage.
    pub fn build(self) -> Result<Simulator, ConfigurationError> {
        let mut simulator = Simulator::new(
            self.total_attendance,
            self.num_events,
            self.target_event_counts,
            self.core_fan_population,
            self.duplicate_win_policy,
        )?;
        for stage in self.stages {
            simulator.add_stage(
                stage.name,
                stage.core_fan_ratio,
                stage.extra_applicants,
                stage.weight,
            )?;
        }
        Ok(simulator)
    }
}
