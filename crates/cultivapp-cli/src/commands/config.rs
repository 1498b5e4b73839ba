//! `cultivapp config` command implementation
//!
//! Reads and writes the CLI config file.

use crate::config::{Config, ConfigFile, CONFIG_KEYS};
use crate::error::Result;
use colored::Colorize;

/// Print the effective value of one key
pub async fn get(config: &Config, key: String) -> Result<()> {
    println!("{}", config.get(&key)?);
    Ok(())
}

/// Persist one key in the config file. An empty value removes it.
pub async fn set(key: String, value: String) -> Result<()> {
    let path = Config::config_path()?;
    let mut file = ConfigFile::load(&path)?;
    file.set(&key, &value)?;
    file.save(&path)?;

    if value.trim().is_empty() {
        println!("{} Cleared {}", "✓".green(), key);
    } else {
        println!("{} Set {} in {}", "✓".green(), key, path.display());
    }
    Ok(())
}

/// Show all effective settings
pub async fn show(config: &Config) -> Result<()> {
    println!("{}", "CultivApp CLI Configuration:".cyan().bold());
    println!();
    for key in CONFIG_KEYS {
        let value = if key == "token" {
            mask_token(config.token.as_deref())
        } else {
            config.get(key)?
        };
        println!("{:<15} {}", format!("{}:", key), value);
    }
    println!();
    println!("{} {}", "Config file:".cyan(), Config::config_path()?.display());
    println!("{}", "Environment Variables:".cyan());
    println!("  CULTIVAPP_SERVER_URL        - Server URL");
    println!("  CULTIVAPP_TOKEN             - Bearer token");
    println!("  CULTIVAPP_API_TIMEOUT_SECS  - Request timeout");
    println!("  CULTIVAPP_PLAN_FILE         - Stage plan file");
    println!("  CULTIVAPP_CONFIG            - Config file location");

    Ok(())
}

fn mask_token(token: Option<&str>) -> String {
    match token {
        None => "(not set)".to_string(),
        Some(t) if t.chars().count() <= 4 => "****".to_string(),
        Some(t) => {
            let tail: String = t.chars().skip(t.chars().count() - 4).collect();
            format!("****{}", tail)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_get() {
        let result = get(&Config::default(), "server_url".to_string()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_config_get_unknown_key() {
        let result = get(&Config::default(), "cache_dir".to_string()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token(None), "(not set)");
        assert_eq!(mask_token(Some("abc")), "****");
        assert_eq!(mask_token(Some("eyJhbGciOi1234")), "****1234");
    }
}
