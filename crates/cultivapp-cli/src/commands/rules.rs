//! `cultivapp rules` command implementation
//!
//! Browses and maintains the maintenance rule catalog.

use crate::api::{ApiClient, NewRule};
use crate::catalog::RuleCatalogBrowser;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use cultivapp_common::{Rule, RuleId, RuleType};

/// List the catalog, optionally only some rule types
pub async fn list(config: &Config, tipos: Vec<RuleType>) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let mut browser = RuleCatalogBrowser::new([]);

    if tipos.is_empty() {
        browser.load_all(&client).await?;
    } else {
        browser.filter_by_type(&client, tipos).await?;
    }

    if browser.visible().is_empty() {
        println!("No rules found ({})", browser.filter());
        return Ok(());
    }

    println!("{}", rules_table(browser.visible()));
    println!("\nTotal: {} rule(s)", browser.visible().len());
    Ok(())
}

/// Print the rule-type catalog
pub async fn types(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    for tipo in client.rule_types().await? {
        match tipo.health_category() {
            Some(category) => println!("{:<16} {}", tipo.code(), category.label().dimmed()),
            None => println!("{}", tipo.code()),
        }
    }
    Ok(())
}

/// Create a rule
pub async fn add(config: &Config, descripcion: String, tipo: RuleType, intervalo_dias: u32) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let rule = client
        .create_rule(&NewRule {
            descripcion,
            tipo,
            intervalo_dias,
        })
        .await?;

    println!("{} Created rule {}", "✓".green(), rule.id.to_string().cyan());
    println!("{}", rules_table(std::slice::from_ref(&rule)));
    Ok(())
}

/// Delete a rule
pub async fn delete(config: &Config, id: RuleId) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    client.delete_rule(id).await?;

    println!("{} Deleted rule {}", "✓".green(), id);
    Ok(())
}

/// Catalog rules as a table
pub(crate) fn rules_table(rules: &[Rule]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["ID", "Tipo", "Cada (días)", "Descripción"]);

    for rule in rules {
        table.add_row(vec![
            rule.id.to_string(),
            rule.tipo.code().to_string(),
            rule.intervalo_dias.to_string(),
            rule.descripcion.clone(),
        ]);
    }
    table
}
