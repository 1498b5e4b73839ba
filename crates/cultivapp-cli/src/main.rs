//! CultivApp CLI - Main entry point

use clap::Parser;
use cultivapp_cli::config::Config;
use cultivapp_cli::{
    commands, Cli, Commands, ConfigCommand, CropsCommand, RulesCommand, StagesCommand, TasksCommand,
};
use cultivapp_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(command) = cli.command.as_ref() else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    // Warnings only unless --verbose; CULTIVAPP_LOG_* variables take precedence
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .build();
    let log_config = match log_config.clone().merge_env() {
        Ok(Some(merged)) => merged,
        Ok(None) => log_config,
        Err(e) => {
            eprintln!("Warning: ignoring invalid logging environment: {}", e);
            log_config
        },
    };

    // The CLI works without logging
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(&cli, command).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, command: &Commands) -> cultivapp_cli::Result<()> {
    let config = Config::load()?
        .with_server_url(cli.server_url.clone())
        .with_plan_file(cli.plan.clone());

    match command {
        Commands::Stages { command } => match command {
            StagesCommand::Init { especie, force } => {
                commands::stages::init(&config, *especie, *force).await
            },
            StagesCommand::Types => commands::stages::types(&config).await,
            StagesCommand::Toggle { stage } => commands::stages::toggle(&config, *stage).await,
            StagesCommand::Up { stage } => commands::stages::up(&config, *stage).await,
            StagesCommand::Down { stage } => commands::stages::down(&config, *stage).await,
            StagesCommand::Duration { stage, value } => {
                commands::stages::duration(&config, *stage, value.clone()).await
            },
            StagesCommand::Attach { stage, ids, tipo } => {
                commands::stages::attach(&config, *stage, ids.clone(), tipo.clone()).await
            },
            StagesCommand::Detach { stage, ids } => {
                commands::stages::detach(&config, *stage, ids.clone()).await
            },
            StagesCommand::Show => commands::stages::show(&config).await,
            StagesCommand::Submit { especie } => commands::stages::submit(&config, *especie).await,
            StagesCommand::List { especie } => commands::stages::list(&config, *especie).await,
        },

        Commands::Rules { command } => match command {
            RulesCommand::List { tipo } => commands::rules::list(&config, tipo.clone()).await,
            RulesCommand::Types => commands::rules::types(&config).await,
            RulesCommand::Add {
                descripcion,
                tipo,
                intervalo,
            } => commands::rules::add(&config, descripcion.clone(), *tipo, *intervalo).await,
            RulesCommand::Delete { id } => commands::rules::delete(&config, *id).await,
        },

        Commands::Crops { command } => match command {
            CropsCommand::List { usuario } => commands::crops::list(&config, *usuario).await,
            CropsCommand::Show { id } => commands::crops::show(&config, *id).await,
        },

        Commands::Tasks { command } => match command {
            TasksCommand::Run { tarea_id, cultivo } => {
                commands::tasks::run(&config, *tarea_id, *cultivo).await
            },
        },

        Commands::Config { command } => match command {
            ConfigCommand::Get { key } => commands::config::get(&config, key.clone()).await,
            ConfigCommand::Set { key, value } => {
                commands::config::set(key.clone(), value.clone()).await
            },
            ConfigCommand::Show => commands::config::show(&config).await,
        },
    }
}
