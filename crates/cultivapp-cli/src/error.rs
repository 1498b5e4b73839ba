//! Error types for the CultivApp CLI
//!
//! User-facing errors with clear, actionable messages.

use crate::stages::editor::StageEditError;
use crate::stages::validation::StageValidationError;
use cultivapp_common::RuleId;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Backend answered with a non-success status
    #[error("Server error: {0}. Ensure the CultivApp backend is running and accessible.")]
    Api(String),

    /// Stage plan file has invalid format or content
    #[error("Invalid stage plan: {0}. Run 'cultivapp stages init --force' to start a new plan.")]
    InvalidPlan(String),

    /// Plan file already exists
    #[error("Stage plan already exists: {0}. Use --force to overwrite it.")]
    PlanExists(String),

    /// Plan file does not exist yet
    #[error("No stage plan found at '{0}'. Run 'cultivapp stages init' first.")]
    PlanNotFound(String),

    /// Editor operation rejected
    #[error(transparent)]
    StageEdit(#[from] StageEditError),

    /// Stage sequence failed consumer-side validation
    #[error("{0}")]
    Validation(#[from] StageValidationError),

    /// Selected rule ids that are not in the loaded catalog
    #[error("Rules not found in the catalog: {}. Run 'cultivapp rules list' to see available rules.", format_ids(.0))]
    UnresolvedRules(Vec<RuleId>),

    /// Submit was requested without a species
    #[error("No species id for submission. Pass --especie or set it with 'cultivapp stages init --especie <ID>'.")]
    MissingEspecie,

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your connection and server URL.")]
    Http(#[from] reqwest::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or config file.")]
    Config(String),

    /// YAML parsing failed
    #[error("Failed to parse YAML: {0}. Check the file syntax at the indicated line/column.")]
    YamlParse(#[from] serde_yaml::Error),

    /// TOML config could not be read
    #[error("Failed to parse config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML config could not be written
    #[error("Failed to write config file: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl CliError {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid plan error
    pub fn invalid_plan(msg: impl Into<String>) -> Self {
        Self::InvalidPlan(msg.into())
    }
}

fn format_ids(ids: &[RuleId]) -> String {
    ids.iter()
        .map(RuleId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_rules_message() {
        let err = CliError::UnresolvedRules(vec![RuleId(7), RuleId(9)]);
        assert!(err.to_string().contains("7, 9"));
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = CliError::from(StageValidationError::TooFewStages { found: 2 });
        assert_eq!(err.to_string(), "Se requieren al menos 3 etapas");
    }
}
