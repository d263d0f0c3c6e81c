//! # lottery-cascade - win probabilities for staged ticket lotteries
//!
//! Ticket sales for a tour are often run as a sequence of lottery stages
//! (fan-club pre-sale, CD-code pre-sale, general sale, ...). Each stage gets a
//! share of the seats, draws from its own applicant pool, and anyone who wins
//! early drops out of the later pools. This crate computes, for one applicant,
//! the probability of a first win at each stage and of losing every stage.
//!
//! ## Core Concepts
//!
//! - **Stage**: one lottery round with its applicant model and seat weight
//! - **Simulator**: population figures plus the ordered stages of one case
//! - **Duplicate-win policy**: seats assumed lost to applicants who already won
//! - **Distribution**: ordered outcome probabilities produced by a calculation
//!
//! ## Usage
//!
//! ```
//! use lottery_cascade::{DuplicateWinPolicy, Simulator};
//!
//! let mut simulator = Simulator::new(
//!     10_000,
//!     10,
//!     [("tokyo", 1)],
//!     1_000,
//!     Some(DuplicateWinPolicy::seat_reduction(0.2)),
//! )?;
//! simulator.add_stage("fan club", 0.5, 0, 1.0)?;
//! simulator.add_stage("general", 1.0, 0, 1.0)?;
//!
//! let result = simulator.calculate()?;
//! assert!((result.probabilities.win_at("fan club").unwrap() - 0.8).abs() < 1e-9);
//! assert!((result.probabilities.total() - 1.0).abs() < 1e-9);
//! # Ok::<(), lottery_cascade::ConfigurationError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core
pub mod error;
pub mod outcome;
pub mod policy;
pub mod rounding;
pub mod simulator;
pub mod stage;

// Collaborators around the core
pub mod cases;
pub mod config;
pub mod report;

// Re-export primary types at crate root for convenience
pub use error::{ConfigLoadError, ConfigurationError, LotteryError, LotteryResult};
pub use outcome::{Distribution, OutcomeKey, OutcomeProbability};
pub use policy::DuplicateWinPolicy;
pub use simulator::{CascadeResult, Simulator, SimulatorBuilder};
pub use stage::{Stage, StageOutcome};

pub use cases::{run_case, run_cases, BatchOutcome, CaseEntry, CaseFailure, CaseResult, RunDocument};
pub use config::{
    load_config, CaseDefinition, LotteryConfig, SimulationSettings, StageDefinition, TargetEvents,
};
pub use report::{BatchReport, ComparisonTable, ScenarioSummary, SimulationReport};
