//! JSON configuration document.
//!
//! One document describes the tour, the events the applicant enters, the
//! stage list and a set of cases. Every case is evaluated on its own
//! [`Simulator`] with the same stages and a different duplicate-win policy.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use crate::error::{ConfigLoadError, ConfigurationError};
use crate::policy::DuplicateWinPolicy;
use crate::simulator::Simulator;

/// Default location of the configuration document.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Tour-wide population figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Attendance summed over every event.
    pub total_overall_attendance: u64,
    /// Number of events in the tour.
    pub num_total_events: i64,
    /// Size of the core-fan population.
    pub core_fan_total_population: u64,
}

/// Targeted event counts by label, in document order.
///
/// A label written twice keeps its first position and its last count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetEvents(Vec<(String, i64)>);

impl TargetEvents {
    /// Sets the count for `label`.
    pub fn insert(&mut self, label: impl Into<String>, count: i64) {
        let label = label.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = count,
            None => self.0.push((label, count)),
        }
    }

    /// Count for `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<i64> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, count)| *count)
    }

    /// Labels and counts in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Sum of every count.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.0
            .iter()
            .fold(0_i64, |sum, (_, count)| sum.saturating_add(*count))
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no label is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for TargetEvents {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut events = Self::default();
        for (label, count) in iter {
            events.insert(label, count);
        }
        events
    }
}

impl Serialize for TargetEvents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

struct TargetEventsVisitor;

impl<'de> Visitor<'de> for TargetEventsVisitor {
    type Value = TargetEvents;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of event labels to counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut events = TargetEvents::default();
        while let Some((label, count)) = access.next_entry::<String, i64>()? {
            events.insert(label, count);
        }
        Ok(events)
    }
}

impl<'de> Deserialize<'de> for TargetEvents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TargetEventsVisitor)
    }
}

/// One stage as written in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    /// Stage label.
    pub name: String,
    /// Share of core fans applying, in [0.0, 1.0].
    pub applicant_core_fan_ratio: f64,
    /// Non-core applicants.
    pub additional_applicants: i64,
    /// Relative seat share.
    pub weight: f64,
}

/// One case to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDefinition {
    /// Label shown in reports.
    pub case_name: String,
    /// Raw duplicate-win policy; `{}`, `null` or absent means none.
    #[serde(default)]
    pub duplicate_config: serde_json::Value,
}

impl CaseDefinition {
    /// Decodes the duplicate-win policy of this case.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError::UnknownDuplicatePolicy` if the policy is not recognised.
    pub fn duplicate_win_policy(&self) -> Result<Option<DuplicateWinPolicy>, ConfigLoadError> {
        match &self.duplicate_config {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(map) if map.is_empty() => Ok(None),
            other => serde_json::from_value(other.clone())
                .map(Some)
                .map_err(|e| ConfigLoadError::UnknownDuplicatePolicy {
                    case_name: self.case_name.clone(),
                    reason: e.to_string(),
                }),
        }
    }
}

/// The whole configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// Tour-wide figures.
    pub simulation_settings: SimulationSettings,
    /// Events the applicant enters, by region or category, in document order.
    pub user_target_events_details: TargetEvents,
    /// Stages in evaluation order.
    pub lottery_stages_definition: Vec<StageDefinition>,
    /// Cases to evaluate.
    #[serde(default)]
    pub simulation_cases_to_run: Vec<CaseDefinition>,
}

impl LotteryConfig {
    /// Parses a document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or a schema mismatch.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Stages in document order.
    pub fn stage_definitions(&self) -> impl Iterator<Item = &StageDefinition> {
        self.lottery_stages_definition.iter()
    }

    /// Builds an independent simulator under `policy`, with every stage added.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` from construction or `add_stage`.
    pub fn build_simulator(
        &self,
        policy: Option<DuplicateWinPolicy>,
    ) -> Result<Simulator, ConfigurationError> {
        let settings = &self.simulation_settings;
        let mut simulator = Simulator::new(
            settings.total_overall_attendance,
            settings.num_total_events,
            self.user_target_events_details.iter(),
            settings.core_fan_total_population,
            policy,
        )?;
        for stage in self.stage_definitions() {
            simulator.add_stage(
                stage.name.as_str(),
                stage.applicant_core_fan_ratio,
                stage.additional_applicants,
                stage.weight,
            )?;
        }
        Ok(simulator)
    }
}

/// Reads and parses the configuration document at `path`.
///
/// # Errors
///
/// Returns `ConfigLoadError::Io` if the file cannot be read and
/// `ConfigLoadError::Parse` if it is not a valid document.
pub fn load_config(path: impl AsRef<Path>) -> Result<LotteryConfig, ConfigLoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = LotteryConfig::from_json_str(&text).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        stages = config.lottery_stages_definition.len(),
        cases = config.simulation_cases_to_run.len(),
        "loaded configuration"
    );
    Ok(config)
}
