//! Tactical actions a side can take in a battle round

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::BattleError;

/// Tactical action chosen by one side for one round
///
/// Serialized as its lowercase tag ("attack", "fire_attack", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum BattleAction {
    /// Standard assault
    Attack,
    /// Defensive stance, trades damage dealt for damage taken
    Defend,
    /// Flanking maneuver
    Flank,
    /// Fire-based attack, sensitive to weather and terrain
    FireAttack,
    /// Withdraw from the field (attacker only)
    Retreat,
}

impl BattleAction {
    pub const ALL: [BattleAction; 5] = [
        BattleAction::Attack,
        BattleAction::Defend,
        BattleAction::Flank,
        BattleAction::FireAttack,
        BattleAction::Retreat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defend => "defend",
            Self::Flank => "flank",
            Self::FireAttack => "fire_attack",
            Self::Retreat => "retreat",
        }
    }

    /// Verb phrase used in the combat log
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Attack => "launches an assault",
            Self::Defend => "takes a defensive stance",
            Self::Flank => "attempts a flanking maneuver",
            Self::FireAttack => "unleashes fire attack",
            Self::Retreat => "retreats",
        }
    }
}

impl fmt::Display for BattleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BattleAction {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attack" => Ok(Self::Attack),
            "defend" => Ok(Self::Defend),
            "flank" => Ok(Self::Flank),
            "fire_attack" | "fire-attack" | "fire" => Ok(Self::FireAttack),
            "retreat" => Ok(Self::Retreat),
            _ => Err(BattleError::InvalidAction(s.to_string())),
        }
    }
}

impl From<BattleAction> for &'static str {
    fn from(action: BattleAction) -> Self {
        action.as_str()
    }
}

impl TryFrom<String> for BattleAction {
    type Error = BattleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
