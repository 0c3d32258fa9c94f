//! Casualty calculation for one battle round
//!
//! Power is troops scaled by morale, then by the action taken, terrain and
//! weather. Each side loses a share of its troops proportional to the
//! opposing share of total power, capped per round and jittered.

use rand::Rng;

use crate::battle::action::BattleAction;
use crate::battle::constants::*;

/// Everything the damage model needs for one exchange
#[derive(Debug, Clone, Copy)]
pub struct CombatInput {
    pub attacker_troops: u32,
    pub attacker_morale: u32,
    pub defender_troops: u32,
    pub defender_morale: u32,
    pub attacker_action: BattleAction,
    pub defender_action: BattleAction,
    pub terrain_atk_mod: f64,
    pub terrain_def_mod: f64,
    pub weather_atk_mod: f64,
    pub weather_def_mod: f64,
}

/// Base combat power of a side
pub fn base_power(troops: u32, morale: u32) -> f64 {
    troops as f64 * (1.0 + morale as f64 / 100.0)
}

/// Fraction of a side lost to the opposing power, before jitter
pub fn casualty_rate(opposing_power: f64, own_power: f64) -> f64 {
    let total = opposing_power + own_power;
    if total <= 0.0 {
        return 0.0;
    }
    (opposing_power / total * CASUALTY_SCALE).min(MAX_CASUALTY_RATE)
}

/// Final (attacker, defender) power after actions and modifiers
pub fn effective_powers(input: &CombatInput) -> (f64, f64) {
    let mut atk_power = base_power(input.attacker_troops, input.attacker_morale);
    let mut def_power = base_power(input.defender_troops, input.defender_morale);

    let mut atk_action_mod = 1.0;
    let mut def_action_mod = 1.0;

    match input.attacker_action {
        BattleAction::Attack => {}
        BattleAction::Defend => {
            atk_action_mod = DEFEND_POWER_FACTOR;
            def_action_mod = DEFEND_DAMAGE_FACTOR;
        }
        BattleAction::Flank => atk_action_mod = FLANK_POWER_FACTOR,
        BattleAction::FireAttack => atk_action_mod = FIRE_ATTACK_POWER_FACTOR,
        BattleAction::Retreat => {
            atk_action_mod = 0.0;
            def_action_mod = PURSUIT_DAMAGE_FACTOR;
        }
    }

    match input.defender_action {
        BattleAction::Defend => def_action_mod *= DEFEND_DAMAGE_FACTOR,
        BattleAction::Flank | BattleAction::FireAttack => def_power *= COUNTER_ATTACK_FACTOR,
        BattleAction::Attack | BattleAction::Retreat => {}
    }

    atk_power *= atk_action_mod * input.terrain_atk_mod * input.weather_atk_mod;
    def_power *= def_action_mod * input.terrain_def_mod * input.weather_def_mod;

    (atk_power, def_power)
}

/// Casualties (attacker, defender) for one exchange
///
/// Both values are clamped to the side's troop count. A retreating
/// attacker takes no casualties here.
pub fn calculate_damage<R: Rng + ?Sized>(input: &CombatInput, rng: &mut R) -> (u32, u32) {
    let (atk_power, def_power) = effective_powers(input);

    let mut atk_casualties = 0u32;
    let mut def_casualties = 0u32;

    if atk_power > 0.0 {
        let rate = casualty_rate(atk_power, def_power);
        let jitter = rng.gen_range(JITTER_MIN..=JITTER_MAX);
        def_casualties = (input.defender_troops as f64 * rate * jitter) as u32;
    }

    if def_power > 0.0 && input.attacker_action != BattleAction::Retreat {
        let rate = casualty_rate(def_power, atk_power);
        let jitter = rng.gen_range(JITTER_MIN..=JITTER_MAX);
        atk_casualties = (input.attacker_troops as f64 * rate * jitter) as u32;
    }

    (
        atk_casualties.min(input.attacker_troops),
        def_casualties.min(input.defender_troops),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn input(attacker_action: BattleAction, defender_action: BattleAction) -> CombatInput {
        CombatInput {
            attacker_troops: 5000,
            attacker_morale: 70,
            defender_troops: 5000,
            defender_morale: 70,
            attacker_action,
            defender_action,
            terrain_atk_mod: 1.0,
            terrain_def_mod: 1.0,
            weather_atk_mod: 1.0,
            weather_def_mod: 1.0,
        }
    }

    #[test]
    fn test_even_fight_rate() {
        // Equal power: each side loses 20% before jitter
        assert!((casualty_rate(100.0, 100.0) - 0.2).abs() < 1e-9);
        assert_eq!(casualty_rate(1000.0, 1.0), MAX_CASUALTY_RATE);
        assert_eq!(casualty_rate(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_attack_vs_attack_within_jitter() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (atk, def) = calculate_damage(&input(BattleAction::Attack, BattleAction::Attack), &mut rng);
        // 5000 * 0.2 * [0.8, 1.2]
        assert!((800..=1200).contains(&atk));
        assert!((800..=1200).contains(&def));
    }

    #[test]
    fn test_defender_stance_stacks() {
        let (_, plain) = effective_powers(&input(BattleAction::Defend, BattleAction::Attack));
        let (_, stacked) = effective_powers(&input(BattleAction::Defend, BattleAction::Defend));
        assert!((stacked - plain * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_counter_flank_boosts_defender() {
        let (_, base) = effective_powers(&input(BattleAction::Attack, BattleAction::Attack));
        let (_, counter) = effective_powers(&input(BattleAction::Attack, BattleAction::Flank));
        assert!((counter - base * 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_retreat_deals_and_takes_nothing_here() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (atk, def) = calculate_damage(&input(BattleAction::Retreat, BattleAction::Attack), &mut rng);
        assert_eq!(atk, 0);
        assert_eq!(def, 0);
    }

    #[test]
    fn test_empty_side_takes_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut inp = input(BattleAction::Attack, BattleAction::Attack);
        inp.defender_troops = 0;
        let (atk, def) = calculate_damage(&inp, &mut rng);
        assert_eq!(def, 0);
        assert_eq!(atk, 0);
    }

    #[test]
    fn test_same_seed_same_casualties() {
        let inp = input(BattleAction::FireAttack, BattleAction::Defend);
        let a = calculate_damage(&inp, &mut ChaCha8Rng::seed_from_u64(99));
        let b = calculate_damage(&inp, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
