//! Ledger configuration: the account and player tables that drive
//! attribution, reconciliation, and display filtering.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LedgerError, Result};

/// Configuration for one ledger run.
///
/// Every field has a default matching the statement export this tool was
/// built around, so a config file is only needed to override them.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Bank account name that appears as `From` on every payout row.
    #[serde(default = "default_house_account")]
    pub house_account: String,

    /// Player whose payout is back-solved so each session's ledger balances.
    #[serde(default = "default_settlement_player")]
    pub settlement_player: String,

    /// Real name -> display alias, applied before aggregation.
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Display aliases excluded from reports (but kept in the exported table).
    #[serde(default)]
    pub hidden_players: Vec<String>,
}

fn default_house_account() -> String {
    "Adv Plus Banking - 1686".to_string()
}

fn default_settlement_player() -> String {
    "Meet".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        let mut aliases = HashMap::new();
        aliases.insert("Dharmik".to_string(), "D_Anonymous".to_string());
        aliases.insert("Ananth".to_string(), "Pro".to_string());

        Self {
            house_account: default_house_account(),
            settlement_player: default_settlement_player(),
            aliases,
            hidden_players: vec!["D_Anonymous".to_string()],
        }
    }
}

impl LedgerConfig {
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: LedgerConfig =
            toml::from_str(input).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.house_account.trim().is_empty() {
            return Err(LedgerError::Config("house_account must not be empty".into()));
        }

        if self.settlement_player.trim().is_empty() {
            return Err(LedgerError::Config(
                "settlement_player must not be empty".into(),
            ));
        }

        for (name, alias) in &self.aliases {
            if alias.trim().is_empty() {
                return Err(LedgerError::Config(format!(
                    "alias for '{}' must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Resolve a player name through the alias table.
    pub fn display_name<'a>(&'a self, player: &'a str) -> &'a str {
        self.aliases.get(player).map(String::as_str).unwrap_or(player)
    }

    /// Whether a player should be dropped from report output.
    pub fn is_hidden(&self, player: &str) -> bool {
        self.hidden_players.iter().any(|p| p == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
house_account = "Checking - 0001"
settlement_player = "Sam"
hidden_players = ["Ghost"]

[aliases]
"Robert" = "Bob"
"Ghost Player" = "Ghost"
"#;

    #[test]
    fn parse_full_config() {
        let config = LedgerConfig::from_toml(FULL_CONFIG).unwrap();
        assert_eq!(config.house_account, "Checking - 0001");
        assert_eq!(config.settlement_player, "Sam");
        assert_eq!(config.aliases["Robert"], "Bob");
        assert!(config.is_hidden("Ghost"));
        assert!(!config.is_hidden("Bob"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = LedgerConfig::from_toml("settlement_player = \"Sam\"").unwrap();
        assert_eq!(config.settlement_player, "Sam");
        assert_eq!(config.house_account, default_house_account());
        assert!(config.aliases.is_empty());
        assert!(config.hidden_players.is_empty());
    }

    #[test]
    fn builtin_default_tables() {
        let config = LedgerConfig::default();
        assert_eq!(config.house_account, "Adv Plus Banking - 1686");
        assert_eq!(config.settlement_player, "Meet");
        assert_eq!(config.display_name("Dharmik"), "D_Anonymous");
        assert_eq!(config.display_name("Ananth"), "Pro");
        assert_eq!(config.display_name("Meet"), "Meet");
        assert!(config.is_hidden("D_Anonymous"));
    }

    #[test]
    fn reject_empty_settlement_player() {
        let err = LedgerConfig::from_toml("settlement_player = \"  \"").unwrap_err();
        assert!(err.to_string().contains("settlement_player"));
    }

    #[test]
    fn reject_empty_alias_target() {
        let input = r#"
[aliases]
"Robert" = ""
"#;
        let err = LedgerConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("Robert"));
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(LedgerConfig::from_toml("house_account = [1, 2]").is_err());
    }
}
