//! `cultivapp stages` command implementation
//!
//! Edits the stage plan file and submits it as a species' stage sequence.

use crate::api::ApiClient;
use crate::catalog::RuleCatalogBrowser;
use crate::commands::rules::rules_table;
use crate::config::Config;
use crate::error::Result;
use crate::stages::{
    self, validate_rule_ids_known, validate_stage_requests, StageEditError, StageSequence,
    StageSequenceEditor,
};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use cultivapp_common::{Rule, RuleId, RuleType, StageType};
use std::collections::BTreeSet;
use tracing::debug;

/// Create an empty plan file
pub async fn init(config: &Config, especie: Option<i64>, force: bool) -> Result<()> {
    StageSequence::create(&config.plan_file, especie, force)?;

    println!(
        "{} Created stage plan {}",
        "✓".green(),
        config.plan_file.display().to_string().cyan()
    );
    if especie.is_none() {
        println!("  Pass --especie to 'cultivapp stages submit' when sending it.");
    }
    Ok(())
}

/// Print the stage-type catalog
pub async fn types(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let stage_types = client.stage_types().await?;

    if stage_types.is_empty() {
        println!("No stage types available");
        return Ok(());
    }

    for stage in stage_types {
        println!("{:<24} {}", stage.code(), stage.label().dimmed());
    }
    Ok(())
}

/// Add or remove a stage
pub async fn toggle(config: &Config, stage: StageType) -> Result<()> {
    let added = edit_plan(config, |editor| Ok(editor.toggle_stage(stage)))?;

    if added {
        println!("{} Added stage {}", "✓".green(), stage.code());
    } else {
        println!("{} Removed stage {}", "✓".green(), stage.code());
    }
    Ok(())
}

/// Move a stage one position earlier
pub async fn up(config: &Config, stage: StageType) -> Result<()> {
    let moved = edit_plan(config, |editor| {
        let index = position_of(editor, stage)?;
        Ok(editor.move_up(index))
    })?;
    report_move(stage, moved, "first");
    Ok(())
}

/// Move a stage one position later
pub async fn down(config: &Config, stage: StageType) -> Result<()> {
    let moved = edit_plan(config, |editor| {
        let index = position_of(editor, stage)?;
        Ok(editor.move_down(index))
    })?;
    report_move(stage, moved, "last");
    Ok(())
}

/// Set (or with an empty value, unset) a stage's duration
pub async fn duration(config: &Config, stage: StageType, value: String) -> Result<()> {
    let duration = edit_plan(config, |editor| Ok(editor.set_duration(stage, &value)?))?;

    match duration {
        Some(days) => println!("{} {} lasts {} day(s)", "✓".green(), stage.code(), days),
        None => println!("{} Cleared duration of {}", "✓".green(), stage.code()),
    }
    Ok(())
}

/// Attach catalog rules to a stage.
///
/// The requested ids join the stage's current rules in the browser
/// selection. With `--tipo`, the catalog is browsed one type at a time.
/// Every selected id must be found somewhere in the browsed catalog,
/// otherwise nothing is attached.
pub async fn attach(
    config: &Config,
    stage: StageType,
    ids: Vec<RuleId>,
    tipos: Vec<RuleType>,
) -> Result<()> {
    let sequence = StageSequence::load(&config.plan_file)?;
    let current = sequence
        .get(stage)
        .ok_or(StageEditError::StageNotSelected(stage))?
        .rule_ids
        .clone();

    let client = ApiClient::from_config(config)?;
    let mut browser = RuleCatalogBrowser::new(current);
    let requested: BTreeSet<RuleId> = ids.into_iter().collect();
    for id in &requested {
        if !browser.is_selected(*id) {
            browser.toggle_select(*id);
        }
    }

    if tipos.is_empty() {
        browser.load_all(&client).await?;
    } else {
        for tipo in tipos {
            browser.filter_by_type(&client, [tipo]).await?;
        }
    }

    let selected = browser.confirm_resolved()?;

    let mut editor = editor_for(sequence);
    editor.attach_rules(stage, requested.iter().copied())?;
    editor.sequence().save(&config.plan_file)?;

    let attached: Vec<Rule> = selected
        .into_iter()
        .filter(|r| requested.contains(&r.id))
        .collect();

    println!("{} Attached {} rule(s) to {}", "✓".green(), requested.len(), stage.code());
    println!("{}", rules_table(&attached));
    Ok(())
}

/// Remove rules from a stage
pub async fn detach(config: &Config, stage: StageType, ids: Vec<RuleId>) -> Result<()> {
    edit_plan(config, |editor| Ok(editor.detach_rules(stage, ids.iter().copied())?))?;

    println!("{} Detached rules from {}", "✓".green(), stage.code());
    Ok(())
}

/// Print the plan and whether it can be submitted
pub async fn show(config: &Config) -> Result<()> {
    let sequence = StageSequence::load(&config.plan_file)?;

    println!(
        "{} {}",
        "Stage plan:".cyan().bold(),
        config.plan_file.display()
    );
    if let Some(especie_id) = sequence.especie_id {
        println!("Especie: {}", especie_id);
    }
    println!();

    if sequence.is_empty() {
        println!("No stages selected. Add one with 'cultivapp stages toggle <STAGE>'.");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Orden", "Etapa", "Duración (días)", "Reglas"]);

        for stage in &sequence.stages {
            let rules = stage
                .rule_ids
                .iter()
                .map(RuleId::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            table.add_row(vec![
                stage.order.to_string(),
                format!("{} ({})", stage.stage.code(), stage.stage.label()),
                stage
                    .duration_days
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                if rules.is_empty() { "-".to_string() } else { rules },
            ]);
        }
        println!("{}", table);
    }

    println!();
    let requests = sequence.build_requests(sequence.especie_id);
    if let Err(e) = validate_stage_requests(&requests) {
        println!("{} {}", "✗".red(), e);
        return Ok(());
    }

    let client = ApiClient::from_config(config)?;
    let mut browser = RuleCatalogBrowser::default();
    if browser.load_all(&client).await.is_err() {
        let reason = browser.last_error().unwrap_or("unknown error");
        println!("{} Could not check rule ids against the catalog: {}", "!".yellow(), reason);
        return Ok(());
    }
    match validate_rule_ids_known(&requests, &browser.known_ids()) {
        Ok(()) => println!("{} Ready to submit", "✓".green()),
        Err(e) => println!("{} {}", "✗".red(), e),
    }
    Ok(())
}

/// Validate and send the plan as a stage batch
pub async fn submit(config: &Config, especie: Option<i64>) -> Result<()> {
    let sequence = StageSequence::load(&config.plan_file)?;
    let client = ApiClient::from_config(config)?;

    let sent = stages::submit(&sequence, especie, &client, &client).await?;

    println!(
        "{} Submitted {} stage(s) for especie {}",
        "✓".green(),
        sent.len(),
        sent.first().and_then(|r| r.especie_id).unwrap_or_default()
    );
    Ok(())
}

/// Stages stored on the server for a species
pub async fn list(config: &Config, especie: i64) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let stages = client.stages_by_especie(especie).await?;

    if stages.is_empty() {
        println!("No stages configured for especie {}", especie);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["ID", "Orden", "Etapa", "Duración (días)"]);
    for stage in &stages {
        table.add_row(vec![
            stage.id.to_string(),
            stage.orden.to_string(),
            stage.nombre.code().to_string(),
            stage
                .duracion_dias
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{}", table);
    Ok(())
}

/// Editor whose listener logs whether the sequence is submittable
fn editor_for(sequence: StageSequence) -> StageSequenceEditor {
    StageSequenceEditor::new(sequence).on_change(|requests| {
        match validate_stage_requests(requests) {
            Ok(()) => debug!(stages = requests.len(), "Stage sequence is ready to submit"),
            Err(e) => debug!(stages = requests.len(), reason = %e, "Stage sequence not submittable yet"),
        }
    })
}

/// Load the plan, apply one edit and save it back
fn edit_plan<T>(
    config: &Config,
    edit: impl FnOnce(&mut StageSequenceEditor) -> Result<T>,
) -> Result<T> {
    let sequence = StageSequence::load(&config.plan_file)?;
    let mut editor = editor_for(sequence);
    let outcome = edit(&mut editor)?;
    editor.sequence().save(&config.plan_file)?;
    Ok(outcome)
}

fn position_of(editor: &StageSequenceEditor, stage: StageType) -> Result<usize> {
    Ok(editor
        .sequence()
        .position(stage)
        .ok_or(StageEditError::StageNotSelected(stage))?)
}

fn report_move(stage: StageType, moved: bool, edge: &str) {
    if moved {
        println!("{} Moved {}", "✓".green(), stage.code());
    } else {
        println!("{} {} is already {}", "ℹ".cyan(), stage.code(), edge);
    }
}
