//! Error types for CultivApp domain values

use thiserror::Error;

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, CultivappError>;

/// Main error type for the shared domain layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CultivappError {
    #[error("Unknown stage type: '{0}'")]
    UnknownStageType(String),

    #[error("Unknown rule type: '{0}'")]
    UnknownRuleType(String),

    #[error("Unknown crop status: '{0}'")]
    UnknownCropStatus(String),

    #[error("Invalid rule id: '{0}'")]
    InvalidRuleId(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
