//! Faction - a political entity controlling cities and officers

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Faction {
    pub name: String,
    /// Names of the cities this faction holds
    pub cities: Vec<String>,
    /// Names of the officers serving this faction
    pub officers: Vec<String>,
    /// Diplomatic standing with other factions (-100 to +100)
    #[serde(default)]
    pub relations: AHashMap<String, i32>,
}

impl Faction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn holds(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    pub(crate) fn gain_city(&mut self, city: &str) {
        if !self.holds(city) {
            self.cities.push(city.to_string());
        }
    }

    pub(crate) fn lose_city(&mut self, city: &str) {
        self.cities.retain(|c| c != city);
    }
}
