//! City - a settlement that garrisons troops and can be captured

use serde::{Deserialize, Serialize};

use crate::battle::terrain::Terrain;

/// A city on the campaign map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    /// Faction that controls this city
    pub owner: String,

    // Military
    pub troops: u32,
    /// Army morale (0-100)
    pub morale: u32,
    pub defense: u32,

    // Geography
    pub terrain: Terrain,
    /// Fortification level, slows sieges
    pub walls: u32,
}

impl City {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            troops: 300,
            morale: 60,
            defense: 50,
            terrain: Terrain::Plains,
            walls: 50,
        }
    }

    pub fn with_troops(mut self, troops: u32) -> Self {
        self.troops = troops;
        self
    }

    pub fn with_morale(mut self, morale: u32) -> Self {
        self.morale = morale.min(100);
        self
    }

    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn with_walls(mut self, walls: u32) -> Self {
        self.walls = walls;
        self
    }
}
