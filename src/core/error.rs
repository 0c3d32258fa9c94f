use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("A battle is already in progress")]
    BattleAlreadyActive,

    #[error("No battle is currently active")]
    NoActiveBattle,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("{city} already belongs to {faction}")]
    SameFaction { city: String, faction: String },

    #[error("Invalid troop count: {0}")]
    InvalidTroopCount(u32),

    #[error("{city} has only {available} troops, {requested} requested")]
    InsufficientTroops {
        city: String,
        available: u32,
        requested: u32,
    },

    #[error("No officer in {0} can lead the army")]
    NoCommander(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid terrain: {0}")]
    InvalidTerrain(String),

    #[error("Invalid weather: {0}")]
    InvalidWeather(String),

    #[error("Corrupt battle state: {0}")]
    CorruptState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BattleError {
    /// Stable tag for callers that branch on the error category
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BattleAlreadyActive => "battle_already_active",
            Self::NoActiveBattle => "no_active_battle",
            Self::CityNotFound(_) => "city_not_found",
            Self::SameFaction { .. } => "same_faction",
            Self::InvalidTroopCount(_) => "invalid_troop_count",
            Self::InsufficientTroops { .. } => "insufficient_troops",
            Self::NoCommander(_) => "no_commander",
            Self::InvalidAction(_) => "invalid_action",
            Self::InvalidTerrain(_) => "invalid_terrain",
            Self::InvalidWeather(_) => "invalid_weather",
            Self::CorruptState(_) => "corrupt_state",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serde(_) => "serde",
            Self::Toml(_) => "toml",
        }
    }
}

impl BattleError {
    /// Placeholder values for the catalog entry under `error.<kind>`
    pub fn message_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::CityNotFound(city) | Self::NoCommander(city) => vec![("city", city.clone())],
            Self::SameFaction { city, faction } => {
                vec![("city", city.clone()), ("faction", faction.clone())]
            }
            Self::InvalidTroopCount(troops) => vec![("troops", troops.to_string())],
            Self::InsufficientTroops {
                city,
                available,
                requested,
            } => vec![
                ("city", city.clone()),
                ("available", available.to_string()),
                ("requested", requested.to_string()),
            ],
            Self::InvalidAction(action) => vec![("action", action.clone())],
            _ => Vec::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
