//! Probability distribution over lottery outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One possible outcome of the whole lottery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OutcomeKey {
    /// First win happens at the named stage.
    WinAt {
        /// Stage label.
        stage: String,
    },
    /// The applicant loses every stage.
    NoWin,
}

impl OutcomeKey {
    /// Outcome for a first win at `stage`.
    #[must_use]
    pub fn win_at(stage: impl Into<String>) -> Self {
        Self::WinAt {
            stage: stage.into(),
        }
    }

    /// Short label used in tables: the stage name, or "no win".
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::WinAt { stage } => stage,
            Self::NoWin => "no win",
        }
    }
}

impl fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WinAt { stage } => write!(f, "win at {stage}"),
            Self::NoWin => write!(f, "no win at any stage"),
        }
    }
}

/// A single outcome and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbability {
    /// Which outcome.
    #[serde(flatten)]
    pub key: OutcomeKey,
    /// Its probability, in [0.0, 1.0].
    pub probability: f64,
}

/// Ordered outcome distribution: one entry per stage in evaluation order,
/// then the no-win entry.
///
/// Values are not renormalised. Their total may drift from 1.0 by
/// floating-point error; [`Distribution::total`] exposes the drift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution {
    entries: Vec<OutcomeProbability>,
}

impl Distribution {
    /// Distribution of a lottery with no stages: certain loss.
    #[must_use]
    pub fn no_stages() -> Self {
        let mut d = Self::default();
        d.push(OutcomeKey::NoWin, 1.0);
        d
    }

    pub(crate) fn push(&mut self, key: OutcomeKey, probability: f64) {
        self.entries.push(OutcomeProbability { key, probability });
    }

    /// Probability recorded for `key`. With duplicate stage names the first
    /// entry wins.
    #[must_use]
    pub fn get(&self, key: &OutcomeKey) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| &e.key == key)
            .map(|e| e.probability)
    }

    /// Probability of a first win at the named stage.
    #[must_use]
    pub fn win_at(&self, stage: &str) -> Option<f64> {
        self.entries.iter().find_map(|e| match &e.key {
            OutcomeKey::WinAt { stage: s } if s == stage => Some(e.probability),
            _ => None,
        })
    }

    /// Probability of losing every stage.
    #[must_use]
    pub fn no_win(&self) -> Option<f64> {
        self.get(&OutcomeKey::NoWin)
    }

    /// Sum of all probabilities.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    /// Entries in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &OutcomeProbability> {
        self.entries.iter()
    }

    /// Number of outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Distribution {
    type Item = &'a OutcomeProbability;
    type IntoIter = std::slice::Iter<'a, OutcomeProbability>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
