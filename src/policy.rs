//! Duplicate-win policies.
//!
//! A policy models seats that go to applicants who already won elsewhere and
//! therefore never reach a new winner. The set of policies is closed; the
//! allocator dispatches on the variant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// How duplicate winners are accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuplicateWinPolicy {
    /// Every stage loses a flat share of its allocated seats.
    SeatReduction {
        /// Share of seats forfeited to duplicate winners, in [0.0, 1.0].
        #[serde(default)]
        rate: f64,
    },
}

impl DuplicateWinPolicy {
    /// Creates a seat-reduction policy. The rate is checked at allocation time.
    #[must_use]
    pub const fn seat_reduction(rate: f64) -> Self {
        Self::SeatReduction { rate }
    }

    /// Returns the share of allocated seats lost at every stage.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ReductionRateOutOfRange` if the rate is not in [0.0, 1.0].
    pub fn reduction_rate(&self) -> Result<f64, ConfigurationError> {
        match *self {
            Self::SeatReduction { rate } => {
                if !(0.0..=1.0).contains(&rate) {
                    return Err(ConfigurationError::ReductionRateOutOfRange { rate });
                }
                Ok(rate)
            }
        }
    }
}

impl fmt::Display for DuplicateWinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeatReduction { rate } => write!(
                f,
                "effective new-winner seats reduced by {:.1}% at every stage",
                rate * 100.0
            ),
        }
    }
}

/// Reduction rate for an optional policy; no policy means no reduction.
pub(crate) fn effective_reduction_rate(
    policy: Option<&DuplicateWinPolicy>,
) -> Result<f64, ConfigurationError> {
    policy.map_or(Ok(0.0), DuplicateWinPolicy::reduction_rate)
}
