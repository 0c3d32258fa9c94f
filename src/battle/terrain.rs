//! Battlefield terrain and its combat modifiers
//!
//! Terrain is fixed by the defending city and shapes both sides' power.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::battle::action::BattleAction;
use crate::battle::constants::*;
use crate::core::error::BattleError;

/// Terrain type of a battlefield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Terrain {
    #[default]
    Plains,   // No modifiers
    Mountain, // Favors defenders, hurts cavalry
    Forest,   // Fire and ambush
    Coastal,  // Naval support for defenders
    River,    // Crossing penalty and early attrition
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Plains,
        Terrain::Mountain,
        Terrain::Forest,
        Terrain::Coastal,
        Terrain::River,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Terrain::Plains => "plains",
            Terrain::Mountain => "mountain",
            Terrain::Forest => "forest",
            Terrain::Coastal => "coastal",
            Terrain::River => "river",
        }
    }
}

/// Attacker and defender power multipliers for a terrain and the attacker's action
///
/// Total: every pair yields a value, 1.0 where no rule applies.
pub fn terrain_modifier(terrain: Terrain, action: BattleAction) -> (f64, f64) {
    let mut atk_mod = 1.0;
    let mut def_mod = 1.0;

    match terrain {
        Terrain::Plains => {}
        Terrain::Mountain => {
            def_mod = MOUNTAIN_DEFENSE_BONUS;
            atk_mod = MOUNTAIN_ASSAULT_PENALTY;
            if action == BattleAction::Flank {
                atk_mod *= MOUNTAIN_CAVALRY_PENALTY;
            }
        }
        Terrain::Forest => match action {
            BattleAction::FireAttack => atk_mod = FOREST_FIRE_ATTACK_BONUS,
            BattleAction::Flank => atk_mod = FOREST_AMBUSH_BONUS,
            _ => {}
        },
        Terrain::River => atk_mod = RIVER_CROSSING_PENALTY,
        Terrain::Coastal => def_mod = COASTAL_DEFENSE_BONUS,
    }

    (atk_mod, def_mod)
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terrain {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plains" => Ok(Terrain::Plains),
            "mountain" => Ok(Terrain::Mountain),
            "forest" => Ok(Terrain::Forest),
            "coastal" => Ok(Terrain::Coastal),
            "river" => Ok(Terrain::River),
            _ => Err(BattleError::InvalidTerrain(s.to_string())),
        }
    }
}

impl From<Terrain> for &'static str {
    fn from(terrain: Terrain) -> Self {
        terrain.as_str()
    }
}

impl TryFrom<String> for Terrain {
    type Error = BattleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
