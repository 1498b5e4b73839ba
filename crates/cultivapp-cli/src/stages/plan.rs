//! Stage plan file handling (etapas.yml)
//!
//! The plan file carries an editing session between CLI invocations.

use crate::error::{CliError, Result};
use crate::stages::editor::StageSequence;
use std::path::Path;

impl StageSequence {
    /// Load a plan file. The loaded sequence is normalized.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CliError::PlanNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let mut sequence: StageSequence = serde_yaml::from_str(&content)
            .map_err(|e| CliError::invalid_plan(format!("Failed to parse YAML: {}", e)))?;
        sequence.normalize();

        Ok(sequence)
    }

    /// Save the plan to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write a new empty plan. Fails if one exists unless `force` is set.
    pub fn create(path: impl AsRef<Path>, especie_id: Option<i64>, force: bool) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(CliError::PlanExists(path.display().to_string()));
        }

        let sequence = Self::new(especie_id);
        sequence.save(path)?;
        Ok(sequence)
    }
}
