//! CultivApp CLI Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Command-line client for the CultivApp farm-management backend.
//!
//! # Overview
//!
//! - **Stage planning**: build a species' ordered stage sequence in a local plan
//!   file, attach maintenance rules and submit it (`cultivapp stages ...`)
//! - **Rule catalog**: browse, filter, create and delete rules (`cultivapp rules ...`)
//! - **Crop progress**: progress bars, health scores and task status (`cultivapp crops ...`)
//! - **Tasks**: execute a scheduled task (`cultivapp tasks run`)
//! - **Configuration**: server URL, token and defaults (`cultivapp config ...`)

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod stages;

// Re-export commonly used types
pub use catalog::RuleCatalogBrowser;
pub use error::{CliError, Result};
pub use stages::{StageSequence, StageSequenceEditor};

use clap::{Parser, Subcommand};
use cultivapp_common::{RuleId, RuleType, StageType};
use std::path::PathBuf;

/// CultivApp - farm management from the command line
#[derive(Parser, Debug)]
#[command(name = "cultivapp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server URL (overrides config file and CULTIVAPP_SERVER_URL)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Stage plan file (overrides config file and CULTIVAPP_PLAN_FILE)
    #[arg(long, global = true)]
    pub plan: Option<PathBuf>,

    /// Print the full CLI reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure a species' growth stages
    Stages {
        #[command(subcommand)]
        command: StagesCommand,
    },

    /// Browse and maintain the rule catalog
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },

    /// Show crop progress and health
    Crops {
        #[command(subcommand)]
        command: CropsCommand,
    },

    /// Work with scheduled tasks
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Stage plan subcommands
#[derive(Subcommand, Debug)]
pub enum StagesCommand {
    /// Create an empty stage plan
    Init {
        /// Species the plan is for
        #[arg(short, long)]
        especie: Option<i64>,

        /// Overwrite an existing plan
        #[arg(short, long)]
        force: bool,
    },

    /// List the stage types offered by the server
    Types,

    /// Add a stage to the plan, or remove it if present
    Toggle {
        /// Stage type (e.g. SIEMBRA, desarrollo-vegetativo)
        stage: StageType,
    },

    /// Move a stage one position earlier
    Up { stage: StageType },

    /// Move a stage one position later
    Down { stage: StageType },

    /// Set a stage's expected duration in days
    Duration {
        stage: StageType,

        /// Days (minimum 1); an empty string unsets the duration
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Attach catalog rules to a stage
    Attach {
        stage: StageType,

        /// Rule ids to attach
        #[arg(required = true)]
        ids: Vec<RuleId>,

        /// Browse only these rule types (repeatable)
        #[arg(short, long = "tipo")]
        tipo: Vec<RuleType>,
    },

    /// Remove rules from a stage
    Detach {
        stage: StageType,

        #[arg(required = true)]
        ids: Vec<RuleId>,
    },

    /// Show the plan and whether it can be submitted
    Show,

    /// Validate the plan and send it to the server
    Submit {
        /// Species id (defaults to the one stored in the plan)
        #[arg(short, long)]
        especie: Option<i64>,
    },

    /// List the stages stored on the server for a species
    List {
        #[arg(short, long)]
        especie: i64,
    },
}

/// Rule catalog subcommands
#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// List rules
    List {
        /// Only these rule types (repeatable)
        #[arg(short, long = "tipo")]
        tipo: Vec<RuleType>,
    },

    /// List rule types
    Types,

    /// Create a rule
    Add {
        /// Rule description
        #[arg(short, long)]
        descripcion: String,

        /// Rule type
        #[arg(short, long)]
        tipo: RuleType,

        /// Recurrence interval in days
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        intervalo: u32,
    },

    /// Delete a rule
    Delete { id: RuleId },
}

/// Crop subcommands
#[derive(Subcommand, Debug)]
pub enum CropsCommand {
    /// List crops
    List {
        /// Only crops of this user
        #[arg(short, long)]
        usuario: Option<i64>,
    },

    /// Show one crop's progress, health and tasks
    Show { id: i64 },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// Execute a task and show the refreshed crop
    Run {
        /// Task id
        tarea_id: i64,

        /// Crop the task belongs to
        #[arg(short, long)]
        cultivo: i64,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value (empty to clear)
        value: String,
    },

    /// Show all configuration
    Show,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_attach_with_types() {
        let cli = Cli::try_parse_from([
            "cultivapp", "stages", "attach", "siembra", "1", "4", "--tipo", "riego", "--tipo",
            "FERTILIZACION",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Stages {
                command: StagesCommand::Attach { stage, ids, tipo },
            }) => {
                assert_eq!(stage, StageType::Siembra);
                assert_eq!(ids, vec![RuleId(1), RuleId(4)]);
                assert_eq!(tipo, vec![RuleType::Riego, RuleType::Fertilizacion]);
            },
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        assert!(Cli::try_parse_from(["cultivapp", "stages", "toggle", "CRECIMIENTO"]).is_err());
    }

    #[test]
    fn test_empty_duration_value() {
        let cli = Cli::try_parse_from(["cultivapp", "stages", "duration", "COSECHA", ""]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Stages {
                command: StagesCommand::Duration { ref value, .. }
            }) if value.is_empty()
        ));
    }

    #[test]
    fn test_negative_duration_reaches_editor() {
        let cli = Cli::try_parse_from(["cultivapp", "stages", "duration", "SIEMBRA", "-4"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Stages {
                command: StagesCommand::Duration { stage: StageType::Siembra, ref value }
            }) if value == "-4"
        ));
    }
}
