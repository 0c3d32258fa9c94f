//! Battlefield weather and its combat modifiers
//!
//! Weather affects each side's chosen action and drives siege speed and
//! snow attrition. A battle may be fought with no weather reported, which
//! behaves like clear skies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::battle::action::BattleAction;
use crate::battle::constants::*;
use crate::core::error::BattleError;

/// Current weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
    Fog,
    Drought,
}

impl Weather {
    pub const ALL: [Weather; 5] = [
        Weather::Clear,
        Weather::Rain,
        Weather::Snow,
        Weather::Fog,
        Weather::Drought,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Fog => "fog",
            Self::Drought => "drought",
        }
    }

    /// Power multiplier for an action fought in this weather
    pub fn action_modifier(&self, action: BattleAction) -> f64 {
        match self {
            Self::Clear => 1.0,
            Self::Rain => match action {
                BattleAction::FireAttack => RAIN_FIRE_ATTACK_PENALTY,
                _ => RAIN_MOVEMENT_PENALTY,
            },
            Self::Drought => match action {
                BattleAction::FireAttack => DROUGHT_FIRE_ATTACK_BONUS,
                _ => 1.0,
            },
            Self::Snow => SNOW_MOVEMENT_PENALTY,
            Self::Fog => match action {
                BattleAction::Flank => FOG_AMBUSH_BONUS,
                _ => FOG_VISIBILITY_PENALTY,
            },
        }
    }
}

/// Weather multiplier for an action; no weather means no effect
pub fn weather_modifier(weather: Option<Weather>, action: BattleAction) -> f64 {
    weather.map_or(1.0, |w| w.action_modifier(action))
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "rain" => Ok(Self::Rain),
            "snow" => Ok(Self::Snow),
            "fog" => Ok(Self::Fog),
            "drought" => Ok(Self::Drought),
            _ => Err(BattleError::InvalidWeather(s.to_string())),
        }
    }
}

impl From<Weather> for &'static str {
    fn from(weather: Weather) -> Self {
        weather.as_str()
    }
}

impl TryFrom<String> for Weather {
    type Error = BattleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
