//! AI personality configuration loaded from TOML
//!
//! Personalities set the thresholds the policy reacts to and the weights
//! of its randomized action mixes.

use std::fs;
use std::path::PathBuf;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::action::BattleAction;
use crate::core::error::Result;

/// Relative weights of the actions in a randomized mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionWeights {
    #[serde(default)]
    pub attack: f64,
    #[serde(default)]
    pub defend: f64,
    #[serde(default)]
    pub flank: f64,
    #[serde(default)]
    pub fire_attack: f64,
}

impl ActionWeights {
    pub fn new(attack: f64, defend: f64, flank: f64, fire_attack: f64) -> Self {
        Self {
            attack,
            defend,
            flank,
            fire_attack,
        }
    }

    /// Draw an action from the mix; a degenerate mix falls back to Attack
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> BattleAction {
        let options = [
            (BattleAction::Attack, self.attack),
            (BattleAction::Defend, self.defend),
            (BattleAction::Flank, self.flank),
            (BattleAction::FireAttack, self.fire_attack),
        ];
        match WeightedIndex::new(options.iter().map(|(_, w)| w.max(0.0))) {
            Ok(dist) => options[dist.sample(rng)].0,
            Err(_) => BattleAction::Attack,
        }
    }
}

/// Thresholds that switch the policy between behaviors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Attacker retreats below this morale
    pub retreat_morale: u32,
    /// Attacker retreats below this many troops
    pub retreat_troops: u32,
    /// Defender digs in below this morale
    pub defend_morale: u32,
    /// Attacker commits to direct assault above this siege progress
    pub siege_push: u32,
    /// Attacker turns aggressive below this many supply days
    pub supply_pressure: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            retreat_morale: 20,
            retreat_troops: 500,
            defend_morale: 40,
            siege_push: 60,
            supply_pressure: 3,
        }
    }
}

/// Complete AI personality configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPersonality {
    /// Name of this personality (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Defender mix when morale holds
    #[serde(default = "default_defender_mix")]
    pub defender_mix: ActionWeights,
    /// Attacker mix in ordinary conditions
    #[serde(default = "default_attacker_mix")]
    pub attacker_mix: ActionWeights,
    /// Attacker mix when supplies run short
    #[serde(default = "default_aggressive_mix")]
    pub aggressive_mix: ActionWeights,
}

fn default_defender_mix() -> ActionWeights {
    ActionWeights::new(0.3, 0.5, 0.2, 0.0)
}

fn default_attacker_mix() -> ActionWeights {
    ActionWeights::new(0.6, 0.0, 0.25, 0.15)
}

fn default_aggressive_mix() -> ActionWeights {
    ActionWeights::new(0.5, 0.0, 0.3, 0.2)
}

impl Default for AiPersonality {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            thresholds: ThresholdConfig::default(),
            defender_mix: default_defender_mix(),
            attacker_mix: default_attacker_mix(),
            aggressive_mix: default_aggressive_mix(),
        }
    }
}

/// Parse a personality from TOML content
pub fn parse_personality(name: &str, contents: &str) -> Result<AiPersonality> {
    let mut personality: AiPersonality = toml::from_str(contents)?;
    personality.name = name.to_string();
    Ok(personality)
}

/// Load personality from TOML file
///
/// Loads from `data/ai_personalities/{name}.toml`
pub fn load_personality(name: &str) -> Result<AiPersonality> {
    let contents = fs::read_to_string(personality_path(name))?;
    parse_personality(name, &contents)
}

/// Get path to personality file
fn personality_path(name: &str) -> PathBuf {
    PathBuf::from("data/ai_personalities").join(format!("{}.toml", name))
}
