//! Battle state - the single mutable record of an ongoing battle
//!
//! A BattleState only names the cities, factions and officers involved; it
//! never owns them. The orchestrator dereferences those names against the
//! world when the battle is resolved.

use serde::{Deserialize, Serialize};

use crate::battle::constants::*;
use crate::battle::round::check_battle_end;
use crate::battle::terrain::Terrain;
use crate::battle::weather::Weather;
use crate::core::error::{BattleError, Result};

/// One side entering a battle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Belligerent {
    pub city: String,
    pub faction: String,
    pub commander: String,
    pub troops: u32,
}

impl Belligerent {
    pub fn new(
        city: impl Into<String>,
        faction: impl Into<String>,
        commander: impl Into<String>,
        troops: u32,
    ) -> Self {
        Self {
            city: city.into(),
            faction: faction.into(),
            commander: commander.into(),
            troops,
        }
    }
}

/// Full state of a battle between an attacking and a defending city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub attacker_city: String,
    pub defender_city: String,
    pub attacker_faction: String,
    pub defender_faction: String,
    pub attacker_commander: String,
    pub defender_commander: String,

    pub attacker_troops: u32,
    pub defender_troops: u32,
    /// 0-100
    pub attacker_morale: u32,
    /// 0-100
    pub defender_morale: u32,
    pub round: u32,
    /// 0-100, reaching 100 breaches the walls
    pub siege_progress: u32,
    pub supply_days: u32,

    pub terrain: Terrain,
    pub weather: Option<Weather>,
    /// Walls of the defending city when the battle began
    pub wall_strength: u32,
    pub combat_log: Vec<String>,
}

impl BattleState {
    pub fn new(
        attacker: Belligerent,
        defender: Belligerent,
        terrain: Terrain,
        weather: Option<Weather>,
    ) -> Self {
        Self {
            attacker_city: attacker.city,
            defender_city: defender.city,
            attacker_faction: attacker.faction,
            defender_faction: defender.faction,
            attacker_commander: attacker.commander,
            defender_commander: defender.commander,
            attacker_troops: attacker.troops,
            defender_troops: defender.troops,
            attacker_morale: DEFAULT_MORALE,
            defender_morale: DEFAULT_MORALE,
            round: 0,
            siege_progress: 0,
            supply_days: DEFAULT_SUPPLY_DAYS,
            terrain,
            weather,
            wall_strength: DEFAULT_WALL_STRENGTH,
            combat_log: Vec::new(),
        }
    }

    pub fn with_morale(mut self, morale: u32) -> Self {
        let morale = morale.min(MAX_MORALE);
        self.attacker_morale = morale;
        self.defender_morale = morale;
        self
    }

    pub fn with_supply_days(mut self, days: u32) -> Self {
        self.supply_days = days;
        self
    }

    pub fn with_wall_strength(mut self, walls: u32) -> Self {
        self.wall_strength = walls;
        self
    }

    /// Snapshot for display and callers
    pub fn status(&self) -> BattleStatus {
        BattleStatus {
            round: self.round,
            attacker_troops: self.attacker_troops,
            defender_troops: self.defender_troops,
            attacker_morale: self.attacker_morale,
            defender_morale: self.defender_morale,
            siege_progress: self.siege_progress,
            supply_days: self.supply_days,
            is_active: check_battle_end(self).is_ongoing(),
            combat_log: self.combat_log.clone(),
        }
    }

    /// Check the 0-100 bounds on morale and siege progress
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("attacker_morale", self.attacker_morale),
            ("defender_morale", self.defender_morale),
            ("siege_progress", self.siege_progress),
        ] {
            if value > 100 {
                return Err(BattleError::CorruptState(format!(
                    "{field} = {value} is outside 0-100"
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a saved battle; terrain, weather and bounds are checked
    pub fn from_json(json: &str) -> Result<Self> {
        let state: BattleState = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }
}

/// Current battle status as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleStatus {
    pub round: u32,
    pub attacker_troops: u32,
    pub defender_troops: u32,
    pub attacker_morale: u32,
    pub defender_morale: u32,
    pub siege_progress: u32,
    pub supply_days: u32,
    pub is_active: bool,
    pub combat_log: Vec<String>,
}
