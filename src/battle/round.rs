//! Round processing and the battle's terminal check
//!
//! A battle is Ongoing until one of the end conditions fires. Each call to
//! `advance_round` consumes the current state and returns the next one, so
//! the orchestrator always holds exactly one authoritative copy.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::action::BattleAction;
use crate::battle::constants::*;
use crate::battle::damage::{calculate_damage, CombatInput};
use crate::battle::siege::siege_progress;
use crate::battle::state::BattleState;
use crate::battle::terrain::{terrain_modifier, Terrain};
use crate::battle::weather::{weather_modifier, Weather};

/// Side that won a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Attacker,
    Defender,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::Attacker => "attacker",
            Winner::Defender => "defender",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    AttackerEliminated,
    DefenderEliminated,
    AttackerMoraleBroken,
    DefenderMoraleBroken,
    WallsBreached,
    SuppliesExhausted,
    /// The attacker ordered a retreat
    AttackerWithdrew,
}

impl EndReason {
    pub fn winner(&self) -> Winner {
        match self {
            EndReason::DefenderEliminated
            | EndReason::DefenderMoraleBroken
            | EndReason::WallsBreached => Winner::Attacker,
            EndReason::AttackerEliminated
            | EndReason::AttackerMoraleBroken
            | EndReason::SuppliesExhausted
            | EndReason::AttackerWithdrew => Winner::Defender,
        }
    }

    /// Localization key for this reason
    pub fn key(&self) -> &'static str {
        match self {
            EndReason::AttackerEliminated => "battle.reason.attacker_eliminated",
            EndReason::DefenderEliminated => "battle.reason.defender_eliminated",
            EndReason::AttackerMoraleBroken => "battle.reason.attacker_morale_broken",
            EndReason::DefenderMoraleBroken => "battle.reason.defender_morale_broken",
            EndReason::WallsBreached => "battle.reason.walls_breached",
            EndReason::SuppliesExhausted => "battle.reason.supplies_exhausted",
            EndReason::AttackerWithdrew => "battle.reason.attacker_withdrew",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EndReason::AttackerEliminated => "Attacking army eliminated",
            EndReason::DefenderEliminated => "Defending army eliminated",
            EndReason::AttackerMoraleBroken => "Attacker morale broken",
            EndReason::DefenderMoraleBroken => "Defender morale broken",
            EndReason::WallsBreached => "City walls breached",
            EndReason::SuppliesExhausted => "Attacker supplies exhausted",
            EndReason::AttackerWithdrew => "Attacker withdrew from the field",
        };
        f.write_str(text)
    }
}

/// Result of the terminal check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Ongoing,
    Ended(EndReason),
}

impl BattleOutcome {
    pub fn is_ongoing(&self) -> bool {
        matches!(self, BattleOutcome::Ongoing)
    }

    pub fn winner(&self) -> Option<Winner> {
        match self {
            BattleOutcome::Ongoing => None,
            BattleOutcome::Ended(reason) => Some(reason.winner()),
        }
    }
}

/// Kind of round that was fought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundKind {
    Combat,
    Retreat,
}

/// What happened in one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub kind: RoundKind,
    pub round: u32,
    pub message: String,
    pub attacker_casualties: u32,
    pub defender_casualties: u32,
    pub siege_progress: u32,
}

/// Check whether the battle has ended, in priority order
pub fn check_battle_end(state: &BattleState) -> BattleOutcome {
    let reason = if state.attacker_troops == 0 {
        EndReason::AttackerEliminated
    } else if state.defender_troops == 0 {
        EndReason::DefenderEliminated
    } else if state.attacker_morale < MORALE_BREAK_THRESHOLD {
        EndReason::AttackerMoraleBroken
    } else if state.defender_morale < MORALE_BREAK_THRESHOLD {
        EndReason::DefenderMoraleBroken
    } else if state.siege_progress >= SIEGE_COMPLETE {
        EndReason::WallsBreached
    } else if state.supply_days == 0 {
        EndReason::SuppliesExhausted
    } else {
        return BattleOutcome::Ongoing;
    };
    BattleOutcome::Ended(reason)
}

/// Morale lost for a round's casualties, scaled to at most MORALE_LOSS_SCALE
fn morale_loss(casualties: u32, troops_before: u32) -> u32 {
    if troops_before == 0 {
        return 0;
    }
    (casualties as f64 / troops_before as f64 * MORALE_LOSS_SCALE) as u32
}

/// Fight one round and return the next state
pub fn advance_round<R: Rng + ?Sized>(
    mut state: BattleState,
    attacker_action: BattleAction,
    defender_action: BattleAction,
    rng: &mut R,
) -> (BattleState, RoundReport) {
    state.round += 1;

    if attacker_action == BattleAction::Retreat {
        state
            .combat_log
            .push(format!("Round {}: {} orders a retreat!", state.round, state.attacker_commander));
        let report = RoundReport {
            kind: RoundKind::Retreat,
            round: state.round,
            message: format!(
                "{} retreats from {}!",
                state.attacker_commander, state.defender_city
            ),
            attacker_casualties: 0,
            defender_casualties: 0,
            siege_progress: state.siege_progress,
        };
        tracing::debug!(round = state.round, "attacker retreats");
        return (state, report);
    }

    let (terrain_atk_mod, terrain_def_mod) = terrain_modifier(state.terrain, attacker_action);
    let weather_atk_mod = weather_modifier(state.weather, attacker_action);
    let weather_def_mod = weather_modifier(state.weather, defender_action);

    let input = CombatInput {
        attacker_troops: state.attacker_troops,
        attacker_morale: state.attacker_morale,
        defender_troops: state.defender_troops,
        defender_morale: state.defender_morale,
        attacker_action,
        defender_action,
        terrain_atk_mod,
        terrain_def_mod,
        weather_atk_mod,
        weather_def_mod,
    };
    let (mut atk_casualties, def_casualties) = calculate_damage(&input, rng);

    let attacker_before = state.attacker_troops;
    let defender_before = state.defender_troops;
    state.attacker_troops -= atk_casualties;
    state.defender_troops -= def_casualties;

    if state.attacker_troops > 0 {
        let loss = morale_loss(atk_casualties, attacker_before);
        state.attacker_morale = state.attacker_morale.saturating_sub(loss);
    }
    if state.defender_troops > 0 {
        let loss = morale_loss(def_casualties, defender_before);
        state.defender_morale = state.defender_morale.saturating_sub(loss);
    }

    if attacker_action != BattleAction::Defend {
        let is_fire = attacker_action == BattleAction::FireAttack;
        let progress = siege_progress(&state, state.wall_strength, is_fire, rng);
        state.siege_progress = (state.siege_progress + progress).min(SIEGE_COMPLETE);
    }

    state.supply_days = state.supply_days.saturating_sub(1);

    if state.weather == Some(Weather::Snow) {
        let frostbite = (state.attacker_troops as f64 * SNOW_ATTRITION_RATE) as u32;
        state.attacker_troops -= frostbite;
        atk_casualties += frostbite;
    }

    if state.terrain == Terrain::River && state.round <= RIVER_CROSSING_ROUNDS {
        let drowned = (state.attacker_troops as f64 * RIVER_CROSSING_ATTRITION) as u32;
        state.attacker_troops -= drowned;
        atk_casualties += drowned;
    }

    let entry = format!(
        "Round {}: {} {}, {} {}. Casualties: Attacker {}, Defender {}",
        state.round,
        state.attacker_commander,
        attacker_action.describe(),
        state.defender_commander,
        defender_action.describe(),
        atk_casualties,
        def_casualties
    );
    state.combat_log.push(entry.clone());

    tracing::debug!(
        round = state.round,
        attacker_casualties = atk_casualties,
        defender_casualties = def_casualties,
        siege = state.siege_progress,
        supply = state.supply_days,
        "battle round fought"
    );

    let report = RoundReport {
        kind: RoundKind::Combat,
        round: state.round,
        message: entry,
        attacker_casualties: atk_casualties,
        defender_casualties: def_casualties,
        siege_progress: state.siege_progress,
    };
    (state, report)
}
