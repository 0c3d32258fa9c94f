//! World state collaborator: cities, factions, officers and the battle slot

pub mod city;
pub mod faction;
pub mod officer;
pub mod state;

pub use city::City;
pub use faction::Faction;
pub use officer::Officer;
pub use state::WorldState;
