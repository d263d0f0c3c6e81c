//! Plain-text rendering of results.
//!
//! Everything here reads finished results only: [`CaseResult`] values and the
//! configuration document. Nothing feeds back into a calculation.

use std::fmt;

use crate::cases::{BatchOutcome, CaseEntry, CaseResult};
use crate::config::LotteryConfig;
use crate::outcome::OutcomeKey;

const BAR_WIDTH: usize = 20;

/// Run header: the population figures every case shares.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSummary<'a> {
    config: &'a LotteryConfig,
}

impl<'a> ScenarioSummary<'a> {
    /// Summary of `config`.
    #[must_use]
    pub const fn new(config: &'a LotteryConfig) -> Self {
        Self { config }
    }
}

impl fmt::Display for ScenarioSummary<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = &self.config.simulation_settings;
        writeln!(f, "===== Simulation Settings =====")?;
        writeln!(f, "Total attendance:     {}", settings.total_overall_attendance)?;
        writeln!(f, "Number of events:     {}", settings.num_total_events)?;
        if settings.num_total_events > 0 {
            let per_event =
                settings.total_overall_attendance as f64 / settings.num_total_events as f64;
            writeln!(f, "Seats per event:      {per_event:.0}")?;
        } else {
            writeln!(f, "Seats per event:      n/a (no events)")?;
        }
        writeln!(f, "Core-fan population:  {}", settings.core_fan_total_population)?;

        let details = &self.config.user_target_events_details;
        let total = details.total();
        let breakdown = details
            .iter()
            .map(|(label, count)| format!("{label}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "Targeted events:      {total} ({breakdown})")?;
        write!(f, "-------------------------------")
    }
}

/// Report for one case.
#[derive(Debug, Clone, Copy)]
pub struct SimulationReport<'a> {
    result: &'a CaseResult,
    details: bool,
}

impl<'a> SimulationReport<'a> {
    /// Report for `result`, without the per-stage table.
    #[must_use]
    pub const fn new(result: &'a CaseResult) -> Self {
        Self {
            result,
            details: false,
        }
    }

    /// Toggle the per-stage table.
    #[must_use]
    pub const fn with_details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }

    fn write_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "--- Stage details ---")?;
        let header = format!(
            "{:<16} | {:>9} | {:>9} | {:>10} | {:>10} | {:>8} | {:>11}",
            "Stage", "Allocated", "Effective", "Premise", "Actual", "Winners", "Conditional"
        );
        let rule = "-".repeat(header.len());
        writeln!(f, "{header}")?;
        writeln!(f, "{rule}")?;

        let (mut allocated, mut effective, mut winners) = (0_u64, 0_u64, 0_u64);
        for s in &self.result.stages {
            writeln!(
                f,
                "{:<16} | {:>9} | {:>9} | {:>10} | {:>10} | {:>8} | {:>10.2}%",
                s.name,
                s.allocated_seats,
                s.effective_seats,
                s.premise_applicants,
                s.actual_applicants,
                s.winners,
                s.conditional_win_prob * 100.0
            )?;
            allocated = allocated.saturating_add(s.allocated_seats);
            effective = effective.saturating_add(s.effective_seats);
            winners = winners.saturating_add(s.winners);
        }
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<16} | {allocated:>9} | {effective:>9} | {:>10} | {:>10} | {winners:>8} |",
            "Total", "", ""
        )
    }
}

impl fmt::Display for SimulationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "--- Results: {} ---", result.case_name)?;
        writeln!(
            f,
            "Seats across targeted events (theoretical): {:.0}",
            result.total_seats_for_target_events
        )?;
        match &result.duplicate_win_policy {
            Some(policy) => writeln!(f, "Duplicate winners: {policy}")?,
            None => writeln!(f, "Duplicate winners: not modelled")?,
        }

        if self.details && !result.stages.is_empty() {
            self.write_details(f)?;
        }

        writeln!(f)?;
        writeln!(f, "--- Outcome distribution ---")?;
        for entry in &result.probabilities {
            writeln!(f, "{}: {:.2}%", entry.key, entry.probability * 100.0)?;
        }
        write!(
            f,
            "Total: {:.2}% (floating-point rounding may move this slightly off 100%)",
            result.probabilities.total() * 100.0
        )
    }
}

/// Side-by-side percentages of several cases.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    case_names: Vec<String>,
    rows: Vec<ComparisonRow>,
}

/// One outcome across every case.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    /// The outcome.
    pub key: OutcomeKey,
    /// Probability per case, in case order. Missing outcomes read as 0.
    pub probabilities: Vec<f64>,
}

impl ComparisonTable {
    /// Builds the table. Rows follow the outcome order of the first case.
    #[must_use]
    pub fn from_results(results: &[CaseResult]) -> Self {
        let case_names = results.iter().map(|r| r.case_name.clone()).collect();
        let rows = results
            .first()
            .map(|first| {
                first
                    .probabilities
                    .iter()
                    .map(|entry| ComparisonRow {
                        key: entry.key.clone(),
                        probabilities: results
                            .iter()
                            .map(|r| r.probabilities.get(&entry.key).unwrap_or(0.0))
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { case_names, rows }
    }

    /// Case labels, in column order.
    #[must_use]
    pub fn case_names(&self) -> &[String] {
        &self.case_names
    }

    /// Rows, in outcome order.
    #[must_use]
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn bar(probability: f64) -> String {
    let filled = (probability.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Win probability by stage =====")?;
        for row in &self.rows {
            writeln!(f, "{}", row.key.label())?;
            for (name, p) in self.case_names.iter().zip(&row.probabilities) {
                writeln!(f, "  {name:<28} {} {:>6.1}%", bar(*p), p * 100.0)?;
            }
        }
        Ok(())
    }
}

/// Text output of a whole batch: summary, one block per case in document
/// order, then the comparison.
#[derive(Debug, Clone, Copy)]
pub struct BatchReport<'a> {
    config: &'a LotteryConfig,
    outcome: &'a BatchOutcome,
    details: bool,
}

impl<'a> BatchReport<'a> {
    /// Report for `outcome`, produced from `config`.
    #[must_use]
    pub const fn new(config: &'a LotteryConfig, outcome: &'a BatchOutcome) -> Self {
        Self {
            config,
            outcome,
            details: false,
        }
    }

    /// Toggle the per-stage table of every case.
    #[must_use]
    pub const fn with_details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }
}

impl fmt::Display for BatchReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", ScenarioSummary::new(self.config))?;

        for entry in self.outcome.entries() {
            writeln!(f)?;
            match entry {
                CaseEntry::Completed(result) => {
                    writeln!(f, "===== Simulation Case: {} =====", result.case_name)?;
                    writeln!(f, "{}", SimulationReport::new(result).with_details(self.details))?;
                }
                CaseEntry::Failed(failure) => {
                    writeln!(f, "===== Simulation Case: {} =====", failure.case_name)?;
                    writeln!(f, "skipped: {}", failure.error)?;
                }
            }
        }

        writeln!(f)?;
        match self.outcome.results().len() {
            0 => writeln!(f, "No case produced a result."),
            1 => writeln!(f, "Only one case succeeded; nothing to compare."),
            _ => write!(f, "{}", ComparisonTable::from_results(self.outcome.results())),
        }
    }
}
