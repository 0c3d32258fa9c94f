//! AI action policy for non-human sides
//!
//! Architecture: Trait + Data hybrid
//! - ActionPolicy trait defines interface for swappable implementations
//! - AiPersonality struct holds TOML-loaded thresholds and weights

mod personality;
mod policy;

pub use personality::{load_personality, parse_personality, ActionWeights, AiPersonality, ThresholdConfig};
pub use policy::{choose_action, ThresholdPolicy};

use rand::RngCore;

use crate::battle::action::BattleAction;
use crate::battle::state::BattleState;

/// Trait for battle AI implementations
pub trait ActionPolicy {
    /// Pick this round's action for one side
    fn choose_action(&self, state: &BattleState, is_defender: bool, rng: &mut dyn RngCore)
        -> BattleAction;

    /// Get the personality configuration
    fn personality(&self) -> &AiPersonality;
}
