//! Threshold-driven action choice for AI-controlled sides

use rand::{Rng, RngCore};

use super::personality::AiPersonality;
use super::ActionPolicy;
use crate::battle::action::BattleAction;
use crate::battle::state::BattleState;
use crate::battle::terrain::Terrain;
use crate::battle::weather::Weather;

/// Choose an action for one side of a battle
///
/// Defenders never retreat.
pub fn choose_action<R: Rng + ?Sized>(
    state: &BattleState,
    is_defender: bool,
    personality: &AiPersonality,
    rng: &mut R,
) -> BattleAction {
    let t = &personality.thresholds;

    if is_defender {
        if state.defender_morale < t.defend_morale {
            return BattleAction::Defend;
        }
        return personality.defender_mix.pick(rng);
    }

    if state.attacker_morale < t.retreat_morale || state.attacker_troops < t.retreat_troops {
        return BattleAction::Retreat;
    }

    if state.terrain == Terrain::Forest || state.weather == Some(Weather::Drought) {
        return BattleAction::FireAttack;
    }

    if state.siege_progress > t.siege_push {
        return BattleAction::Attack;
    }

    if state.supply_days < t.supply_pressure {
        return personality.aggressive_mix.pick(rng);
    }

    personality.attacker_mix.pick(rng)
}

/// The stock AI: fixed thresholds, weighted random mixes
#[derive(Debug, Clone, Default)]
pub struct ThresholdPolicy {
    personality: AiPersonality,
}

impl ThresholdPolicy {
    pub fn new(personality: AiPersonality) -> Self {
        Self { personality }
    }
}

impl ActionPolicy for ThresholdPolicy {
    fn choose_action(
        &self,
        state: &BattleState,
        is_defender: bool,
        rng: &mut dyn RngCore,
    ) -> BattleAction {
        choose_action(state, is_defender, &self.personality, rng)
    }

    fn personality(&self) -> &AiPersonality {
        &self.personality
    }
}
