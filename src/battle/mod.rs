//! Battle system - round-based field battles and sieges between cities
//!
//! Leaf modules are pure: modifier tables, the damage and siege models and
//! the round function never touch the world. Only the orchestrator reads
//! and writes world state.

pub mod action;
pub mod ai;
pub mod constants;
pub mod damage;
pub mod orchestrator;
pub mod round;
pub mod siege;
pub mod state;
pub mod terrain;
pub mod weather;

// Re-exports for convenient access
pub use action::BattleAction;
pub use ai::{choose_action, ActionPolicy, AiPersonality, ThresholdPolicy};
pub use damage::{calculate_damage, CombatInput};
pub use orchestrator::{
    BattleEngine, BattleResponse, Describe, ResolutionSummary, TurnOutcome, TurnStatus,
};
pub use round::{
    advance_round, check_battle_end, BattleOutcome, EndReason, RoundKind, RoundReport, Winner,
};
pub use siege::siege_progress;
pub use state::{BattleState, BattleStatus, Belligerent};
pub use terrain::{terrain_modifier, Terrain};
pub use weather::{weather_modifier, Weather};

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Guan Yu's Shu army from Xinye against Cao Ren holding Fancheng
    pub fn sample_state(terrain: Terrain, weather: Option<Weather>) -> BattleState {
        BattleState::new(
            Belligerent::new("Xinye", "Shu", "Guan Yu", 5000),
            Belligerent::new("Fancheng", "Wei", "Cao Ren", 5000),
            terrain,
            weather,
        )
    }
}
