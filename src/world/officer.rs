//! Officer - a named character who can command a city's army

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub name: String,
    pub faction: String,
    /// Military leadership, decides who commands a city's army
    pub leadership: u32,
    /// Devotion to faction (0-100)
    pub loyalty: u32,
    /// City the officer is stationed in
    pub city: Option<String>,
}

impl Officer {
    pub fn new(name: impl Into<String>, faction: impl Into<String>, leadership: u32) -> Self {
        Self {
            name: name.into(),
            faction: faction.into(),
            leadership,
            loyalty: 70,
            city: None,
        }
    }

    pub fn stationed_at(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_loyalty(mut self, loyalty: u32) -> Self {
        self.loyalty = loyalty.min(100);
        self
    }

    pub fn is_stationed_in(&self, city: &str) -> bool {
        self.city.as_deref() == Some(city)
    }
}
