//! WorldState - the persistent game world a battle is fought against

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::state::BattleState;
use crate::battle::weather::Weather;
use crate::core::error::{BattleError, Result};
use crate::world::city::City;
use crate::world::faction::Faction;
use crate::world::officer::Officer;

/// The world state for a single game session
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorldState {
    pub cities: AHashMap<String, City>,
    pub factions: AHashMap<String, Faction>,
    pub officers: AHashMap<String, Officer>,
    /// Weather over the campaign this turn, if reported
    #[serde(default)]
    pub weather: Option<Weather>,
    /// The single battle slot; at most one battle runs per session
    #[serde(default)]
    active_battle: Option<BattleState>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weather(mut self, weather: Option<Weather>) -> Self {
        self.weather = weather;
        self
    }

    pub fn add_faction(&mut self, faction: Faction) {
        self.factions.insert(faction.name.clone(), faction);
    }

    /// Add a city and register it in its owner's territory
    pub fn add_city(&mut self, city: City) {
        self.factions
            .entry(city.owner.clone())
            .or_insert_with(|| Faction::new(city.owner.clone()))
            .gain_city(&city.name);
        self.cities.insert(city.name.clone(), city);
    }

    /// Add an officer and register them in their faction's roster
    pub fn add_officer(&mut self, officer: Officer) {
        let faction = self
            .factions
            .entry(officer.faction.clone())
            .or_insert_with(|| Faction::new(officer.faction.clone()));
        if !faction.officers.contains(&officer.name) {
            faction.officers.push(officer.name.clone());
        }
        self.officers.insert(officer.name.clone(), officer);
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    pub fn city_mut(&mut self, name: &str) -> Option<&mut City> {
        self.cities.get_mut(name)
    }

    pub fn officer(&self, name: &str) -> Option<&Officer> {
        self.officers.get(name)
    }

    pub fn officer_mut(&mut self, name: &str) -> Option<&mut Officer> {
        self.officers.get_mut(name)
    }

    pub fn faction(&self, name: &str) -> Option<&Faction> {
        self.factions.get(name)
    }

    /// Officers of `faction` stationed in `city`
    pub fn officers_in_city<'w, 'q>(
        &'w self,
        faction: &'q str,
        city: &'q str,
    ) -> impl Iterator<Item = &'w Officer> + 'q
    where
        'w: 'q,
    {
        self.officers
            .values()
            .filter(move |o| o.faction == faction && o.is_stationed_in(city))
    }

    /// Highest-leadership officer of the owning faction in a city
    ///
    /// Ties go to the lexically smallest name so the choice does not depend
    /// on map iteration order.
    pub fn select_commander(&self, city: &str) -> Option<&Officer> {
        let owner = &self.cities.get(city)?.owner;
        self.officers_in_city(owner, city).max_by(|a, b| {
            a.leadership
                .cmp(&b.leadership)
                .then_with(|| b.name.cmp(&a.name))
        })
    }

    /// Move a city from its current owner to `new_owner`
    pub fn transfer_city(&mut self, city: &str, new_owner: &str) -> Result<()> {
        let old_owner = {
            let city = self
                .cities
                .get_mut(city)
                .ok_or_else(|| BattleError::CityNotFound(city.to_string()))?;
            std::mem::replace(&mut city.owner, new_owner.to_string())
        };

        if let Some(faction) = self.factions.get_mut(&old_owner) {
            faction.lose_city(city);
        }
        self.factions
            .entry(new_owner.to_string())
            .or_insert_with(|| Faction::new(new_owner))
            .gain_city(city);
        Ok(())
    }

    // === BATTLE SLOT ===

    pub fn active_battle(&self) -> Option<&BattleState> {
        self.active_battle.as_ref()
    }

    pub fn has_active_battle(&self) -> bool {
        self.active_battle.is_some()
    }

    /// Claim the battle slot; fails fast if a battle is already running
    pub fn acquire_battle_slot(&mut self, battle: BattleState) -> Result<()> {
        if self.active_battle.is_some() {
            return Err(BattleError::BattleAlreadyActive);
        }
        self.active_battle = Some(battle);
        Ok(())
    }

    /// Replace the running battle with its next state
    pub(crate) fn replace_active_battle(&mut self, battle: BattleState) {
        self.active_battle = Some(battle);
    }

    /// Clear the battle slot, returning whatever occupied it
    pub fn release_battle_slot(&mut self) -> Option<BattleState> {
        self.active_battle.take()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let world: WorldState = serde_json::from_str(json)?;
        if let Some(battle) = &world.active_battle {
            battle.validate()?;
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::Belligerent;
    use crate::battle::terrain::Terrain;

    fn world() -> WorldState {
        let mut world = WorldState::new();
        world.add_city(City::new("Xinye", "Shu"));
        world.add_city(City::new("Fancheng", "Wei"));
        world.add_officer(Officer::new("Zhang Fei", "Shu", 85).stationed_at("Xinye"));
        world.add_officer(Officer::new("Guan Yu", "Shu", 95).stationed_at("Xinye"));
        world.add_officer(Officer::new("Zhao Yun", "Shu", 95).stationed_at("Xinye"));
        // Enemy officer held in Xinye must not command it
        world.add_officer(Officer::new("Yu Jin", "Wei", 99).stationed_at("Xinye"));
        world
    }

    fn battle() -> BattleState {
        BattleState::new(
            Belligerent::new("Xinye", "Shu", "Guan Yu", 1000),
            Belligerent::new("Fancheng", "Wei", "Cao Ren", 1000),
            Terrain::Plains,
            None,
        )
    }

    #[test]
    fn test_add_city_registers_territory() {
        let world = world();
        assert!(world.faction("Shu").unwrap().holds("Xinye"));
        assert!(world.faction("Wei").unwrap().holds("Fancheng"));
        assert_eq!(world.faction("Shu").unwrap().officers.len(), 3);
    }

    #[test]
    fn test_commander_tie_breaks_by_name() {
        let world = world();
        assert_eq!(world.select_commander("Xinye").unwrap().name, "Guan Yu");
    }

    #[test]
    fn test_officers_in_city_skips_other_factions() {
        let world = world();
        let mut names: Vec<&str> = world
            .officers_in_city("Shu", "Xinye")
            .map(|o| o.name.as_str())
            .collect();
        names.sort_unstable();
        assert_eq!(names, ["Guan Yu", "Zhang Fei", "Zhao Yun"]);
        assert_eq!(world.officers_in_city("Wei", "Xinye").count(), 1);
    }

    #[test]
    fn test_no_commander_in_empty_city() {
        let world = world();
        assert!(world.select_commander("Fancheng").is_none());
        assert!(world.select_commander("Luoyang").is_none());
    }

    #[test]
    fn test_transfer_city_moves_territory() {
        let mut world = world();
        world.transfer_city("Fancheng", "Shu").unwrap();
        assert_eq!(world.city("Fancheng").unwrap().owner, "Shu");
        assert!(world.faction("Shu").unwrap().holds("Fancheng"));
        assert!(!world.faction("Wei").unwrap().holds("Fancheng"));
    }

    #[test]
    fn test_transfer_unknown_city_fails() {
        let mut world = world();
        assert!(matches!(
            world.transfer_city("Luoyang", "Shu"),
            Err(BattleError::CityNotFound(_))
        ));
    }

    #[test]
    fn test_battle_slot_is_exclusive() {
        let mut world = world();
        world.acquire_battle_slot(battle()).unwrap();
        assert!(matches!(
            world.acquire_battle_slot(battle()),
            Err(BattleError::BattleAlreadyActive)
        ));
        assert!(world.release_battle_slot().is_some());
        assert!(!world.has_active_battle());
        assert!(world.acquire_battle_slot(battle()).is_ok());
    }

    #[test]
    fn test_world_round_trips_with_battle() {
        let mut world = world();
        world.acquire_battle_slot(battle()).unwrap();
        let restored = WorldState::from_json(&world.to_json().unwrap()).unwrap();
        assert_eq!(restored.active_battle(), world.active_battle());
        assert_eq!(restored.cities.len(), 2);
    }
}
