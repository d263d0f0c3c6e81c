//! Error types for the lottery cascade.
//!
//! All errors are strongly typed using thiserror so callers can match on the
//! violated constraint instead of parsing messages.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid simulator or stage configuration.
///
/// Raised synchronously by the call that received the bad value. Every
/// message names the violated constraint, and the stage when there is one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("event count must be positive (got {num_events})")]
    NonPositiveEventCount {
        num_events: i64,
    },

    #[error("target event count must be positive (got {total})")]
    NonPositiveTargetEvents {
        total: i64,
    },

    #[error("stage '{stage}': core-fan ratio {ratio} must lie in [0.0, 1.0]")]
    CoreFanRatioOutOfRange {
        stage: String,
        ratio: f64,
    },

    #[error("stage '{stage}': extra applicants must be >= 0 (got {extra_applicants})")]
    NegativeExtraApplicants {
        stage: String,
        extra_applicants: i64,
    },

    #[error("stage '{stage}': weight must be > 0 (got {weight})")]
    NonPositiveWeight {
        stage: String,
        weight: f64,
    },

    #[error("reduction rate out of range: {rate} must lie in [0.0, 1.0]")]
    ReductionRateOutOfRange {
        rate: f64,
    },

    #[error("stages present with zero total weight ({stage_count} stages)")]
    ZeroTotalWeight {
        stage_count: usize,
    },
}

impl ConfigurationError {
    /// Returns the stage this error refers to, if any.
    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::CoreFanRatioOutOfRange { stage, .. }
            | Self::NegativeExtraApplicants { stage, .. }
            | Self::NonPositiveWeight { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

/// Failures of the configuration-file collaborator.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config document '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("case '{case_name}': unknown duplicate policy: {reason}")]
    UnknownDuplicatePolicy {
        case_name: String,
        reason: String,
    },
}

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum LotteryError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Config load error: {0}")]
    ConfigLoad(#[from] ConfigLoadError),
}

impl LotteryError {
    /// Returns true if this is a simulator/stage configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if this error came from loading the config document.
    #[must_use]
    pub const fn is_config_load(&self) -> bool {
        matches!(self, Self::ConfigLoad(_))
    }
}

/// Result type alias for lottery operations.
pub type LotteryResult<T> = Result<T, LotteryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_count_message_names_constraint() {
        let err = ConfigurationError::NonPositiveEventCount { num_events: 0 };
        let msg = format!("{err}");
        assert!(msg.contains("event count must be positive"));
        assert!(err.stage().is_none());
    }

    #[test]
    fn test_stage_errors_carry_stage_name() {
        let err = ConfigurationError::CoreFanRatioOutOfRange {
            stage: "1st".to_string(),
            ratio: 1.5,
        };
        assert_eq!(err.stage(), Some("1st"));
        let msg = format!("{err}");
        assert!(msg.contains("1st"));
        assert!(msg.contains("1.5"));

        let err = ConfigurationError::NonPositiveWeight {
            stage: "general".to_string(),
            weight: 0.0,
        };
        assert_eq!(err.stage(), Some("general"));
        assert!(format!("{err}").contains("weight must be > 0"));
    }

    #[test]
    fn test_reduction_rate_message() {
        let err = ConfigurationError::ReductionRateOutOfRange { rate: 1.2 };
        assert!(format!("{err}").contains("reduction rate out of range"));
    }

    #[test]
    fn test_lottery_error_from_configuration() {
        let err: LotteryError = ConfigurationError::ZeroTotalWeight { stage_count: 2 }.into();
        assert!(err.is_configuration());
        assert!(!err.is_config_load());
        assert!(format!("{err}").contains("zero total weight"));
    }

    #[test]
    fn test_lottery_error_from_config_load() {
        let err: LotteryError = ConfigLoadError::UnknownDuplicatePolicy {
            case_name: "boost".to_string(),
            reason: "unknown variant".to_string(),
        }
        .into();
        assert!(err.is_config_load());
        assert!(format!("{err}").contains("boost"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ConfigLoadError::Io {
            path: PathBuf::from("missing/config.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(format!("{err}").contains("missing/config.json"));
    }
}
