//! Build automation tasks for CultivApp
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for CultivApp", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<cultivapp_cli::Cli>();

    let content = format!(
        r#"# CultivApp CLI Reference

Generated from the CLI source code on {}.

## Quick Start

```bash
# Point the CLI at the backend and store a token
cultivapp config set server_url http://localhost:8080
cultivapp config set token <TOKEN>

# Plan the stages of species 7
cultivapp stages init --especie 7
cultivapp stages toggle PREPARACION
cultivapp stages toggle SIEMBRA
cultivapp stages toggle COSECHA
cultivapp stages duration SIEMBRA 15
cultivapp stages attach SIEMBRA 1 4 --tipo RIEGO --tipo FERTILIZACION
cultivapp stages show
cultivapp stages submit

# Follow a crop
cultivapp crops show 3
cultivapp tasks run 12 --cultivo 3
```

## Stage Plan File

`cultivapp stages` edits `etapas.yml` in the working directory (see `--plan`):

```yaml
especie_id: 7
stages:
  - stage: SIEMBRA
    order: 1
    duration_days: 15
    rule_ids: [1, 4]
```

A plan can be submitted once it has at least 3 stages and every stage has at
least 1 rule.

## Commands

{}

## Environment Variables

- `CULTIVAPP_SERVER_URL` - Backend URL (default: `http://localhost:8080`)
- `CULTIVAPP_TOKEN` - Bearer token
- `CULTIVAPP_API_TIMEOUT_SECS` - Request timeout (default: 30)
- `CULTIVAPP_PLAN_FILE` - Stage plan file (default: `etapas.yml`)
- `CULTIVAPP_CONFIG` - Config file location
- `CULTIVAPP_LOG_LEVEL`, `CULTIVAPP_LOG_OUTPUT`, `CULTIVAPP_LOG_FORMAT`,
  `CULTIVAPP_LOG_DIR`, `CULTIVAPP_LOG_FILTER` - Logging

---

*To update, run `cargo run -p xtask -- generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
