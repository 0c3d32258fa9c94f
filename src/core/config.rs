//! Battle configuration with documented constants
//!
//! Values that shape a campaign's pacing live here and can be overridden
//! from a TOML file. The fixed combat tables live in `battle::constants`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{DEFAULT_MORALE, DEFAULT_SUPPLY_DAYS, DEFAULT_WALL_STRENGTH};
use crate::core::error::{BattleError, Result};

/// Configuration for battle setup and resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // === SETUP ===
    /// Morale both sides start a battle with (0-100)
    pub initial_morale: u32,

    /// Rounds of supplies the attacking army brings into the field
    ///
    /// This is also the hard upper bound on battle length: once it runs
    /// out the defender wins by exhaustion.
    pub initial_supply_days: u32,

    /// Wall strength used when the defending city reports none
    pub default_wall_strength: u32,

    // === RESOLUTION ===
    /// Loyalty gained by the winning commander
    pub winner_loyalty_gain: u32,

    /// Loyalty lost by the losing commander
    pub loser_loyalty_loss: u32,

    /// Home city morale gained after a successful assault
    pub attacker_victory_morale_gain: u32,

    /// Home city morale lost after a failed assault
    pub attacker_defeat_morale_loss: u32,

    /// Defending city morale gained after holding
    pub defender_victory_morale_gain: u32,

    /// Captured city morale lost on capture, before the floor applies
    pub defender_defeat_morale_loss: u32,

    /// Minimum morale of a freshly captured city
    pub captured_city_morale_floor: u32,

    // === AI ===
    /// Personality loaded for AI-controlled sides
    ///
    /// Resolved against `data/ai_personalities/{name}.toml`; "default"
    /// falls back to built-in weights when the file is absent.
    pub ai_personality: String,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            initial_morale: DEFAULT_MORALE,
            initial_supply_days: DEFAULT_SUPPLY_DAYS,
            default_wall_strength: DEFAULT_WALL_STRENGTH,

            winner_loyalty_gain: 5,
            loser_loyalty_loss: 10,
            attacker_victory_morale_gain: 10,
            attacker_defeat_morale_loss: 8,
            defender_victory_morale_gain: 8,
            defender_defeat_morale_loss: 12,
            captured_city_morale_floor: 30,

            ai_personality: "default".to_string(),
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.initial_morale > 100 {
            return Err(BattleError::Config(format!(
                "initial_morale ({}) must be within 0-100",
                self.initial_morale
            )));
        }

        // A battle that starts without supplies ends before the first round
        if self.initial_supply_days == 0 {
            return Err(BattleError::Config(
                "initial_supply_days must be positive".into(),
            ));
        }

        if self.captured_city_morale_floor > 100 {
            return Err(BattleError::Config(format!(
                "captured_city_morale_floor ({}) must be within 0-100",
                self.captured_city_morale_floor
            )));
        }

        if self.ai_personality.trim().is_empty() {
            return Err(BattleError::Config("ai_personality must be named".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BattleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_morale, 70);
        assert_eq!(config.initial_supply_days, 10);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BattleConfig::from_toml_str("initial_supply_days = 6\n").unwrap();
        assert_eq!(config.initial_supply_days, 6);
        assert_eq!(config.initial_morale, 70);
        assert_eq!(config.ai_personality, "default");
    }

    #[test]
    fn test_rejects_zero_supply() {
        let err = BattleConfig::from_toml_str("initial_supply_days = 0\n").unwrap_err();
        assert!(matches!(err, BattleError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = BattleConfig::from_toml_str("initial_morale = \"high\"").unwrap_err();
        assert!(matches!(err, BattleError::Toml(_)));
    }

    #[test]
    fn test_morale_out_of_range() {
        let config = BattleConfig {
            initial_morale: 150,
            ..BattleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
