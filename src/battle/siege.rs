//! Siege progress toward breaching a walled city

use rand::Rng;

use crate::battle::constants::*;
use crate::battle::state::BattleState;
use crate::battle::weather::Weather;

/// This round's siege increment, in [0, MAX_SIEGE_PER_ROUND]
///
/// The caller adds the increment to the running total and caps it at
/// SIEGE_COMPLETE.
pub fn siege_progress<R: Rng + ?Sized>(
    state: &BattleState,
    wall_strength: u32,
    is_fire_attack: bool,
    rng: &mut R,
) -> u32 {
    let mut progress = (state.attacker_troops as f64 / SIEGE_TROOP_DIVISOR)
        * (100.0 / (wall_strength as f64 + SIEGE_WALL_OFFSET));

    if is_fire_attack {
        progress *= SIEGE_FIRE_MULTIPLIER;
    }

    match state.weather {
        Some(Weather::Rain) => progress *= SIEGE_RAIN_MULTIPLIER,
        Some(Weather::Drought) => progress *= SIEGE_DROUGHT_MULTIPLIER,
        _ => {}
    }

    let jittered = (progress * rng.gen_range(JITTER_MIN..=JITTER_MAX)) as u32;
    jittered.min(MAX_SIEGE_PER_ROUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::terrain::Terrain;
    use crate::battle::test_support::sample_state;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_small_army_barely_dents_walls() {
        let state = sample_state(Terrain::Plains, None);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // 5000 troops vs walls 50: 5 * 100/60 = 8.3 before jitter
        let progress = siege_progress(&state, 50, false, &mut rng);
        assert!((6..=10).contains(&progress));
    }

    #[test]
    fn test_fire_attack_doubles() {
        let state = sample_state(Terrain::Plains, None);
        let plain = siege_progress(&state, 50, false, &mut ChaCha8Rng::seed_from_u64(11));
        let fire = siege_progress(&state, 50, true, &mut ChaCha8Rng::seed_from_u64(11));
        assert!(fire >= plain * 2 - 1);
    }

    #[test]
    fn test_capped_per_round() {
        let mut state = sample_state(Terrain::Plains, Some(Weather::Drought));
        state.attacker_troops = 500_000;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(siege_progress(&state, 0, true, &mut rng), MAX_SIEGE_PER_ROUND);
    }

    #[test]
    fn test_strong_walls_slow_siege() {
        let state = sample_state(Terrain::Plains, Some(Weather::Rain));
        let weak = siege_progress(&state, 10, false, &mut ChaCha8Rng::seed_from_u64(8));
        let strong = siege_progress(&state, 90, false, &mut ChaCha8Rng::seed_from_u64(8));
        assert!(strong < weak);
    }
}
