//! Battle orchestration against the world state
//!
//! The engine is the only place where a battle touches the world:
//! `initiate` claims the battle slot and drafts troops, `advance` fights one
//! round and `resolve` applies the aftermath once the battle has ended.
//! Every entry point validates before it mutates, so a failed call leaves
//! the world exactly as it found it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::battle::action::BattleAction;
use crate::battle::ai::{load_personality, ActionPolicy, AiPersonality, ThresholdPolicy};
use crate::battle::round::{
    advance_round, check_battle_end, BattleOutcome, EndReason, RoundKind, RoundReport, Winner,
};
use crate::battle::state::{BattleState, BattleStatus, Belligerent};
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, Result};
use crate::locale::{Localizer, Translate};
use crate::world::WorldState;

/// Owns the pieces a battle needs besides the world itself
pub struct BattleEngine {
    config: BattleConfig,
    locale: Box<dyn Translate>,
    policy: Box<dyn ActionPolicy>,
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleEngine {
    pub fn new() -> Self {
        Self::with_config(BattleConfig::default())
    }

    /// Build an engine whose AI uses the personality named in `config`
    ///
    /// A personality file that cannot be read or parsed is reported and the
    /// built-in weights are used instead.
    pub fn with_config(config: BattleConfig) -> Self {
        let personality = match load_personality(&config.ai_personality) {
            Ok(personality) => personality,
            Err(e) => {
                tracing::warn!(
                    personality = %config.ai_personality,
                    error = %e,
                    "falling back to built-in AI personality"
                );
                AiPersonality::default()
            }
        };
        Self {
            config,
            locale: Box::new(Localizer::english()),
            policy: Box::new(ThresholdPolicy::new(personality)),
        }
    }

    pub fn with_policy(mut self, policy: impl ActionPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_locale(mut self, locale: impl Translate + 'static) -> Self {
        self.locale = Box::new(locale);
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn policy(&self) -> &dyn ActionPolicy {
        self.policy.as_ref()
    }

    pub fn locale(&self) -> &dyn Translate {
        self.locale.as_ref()
    }

    /// Start a battle from `attacker_city` against `defender_city`
    pub fn initiate(
        &self,
        world: &mut WorldState,
        attacker_city: &str,
        defender_city: &str,
        troops: u32,
    ) -> Result<BattleState> {
        if world.has_active_battle() {
            return Err(BattleError::BattleAlreadyActive);
        }

        let home = world
            .city(attacker_city)
            .ok_or_else(|| BattleError::CityNotFound(attacker_city.to_string()))?;
        let target = world
            .city(defender_city)
            .ok_or_else(|| BattleError::CityNotFound(defender_city.to_string()))?;

        if home.owner == target.owner {
            return Err(BattleError::SameFaction {
                city: target.name.clone(),
                faction: target.owner.clone(),
            });
        }
        if troops == 0 {
            return Err(BattleError::InvalidTroopCount(troops));
        }
        if troops > home.troops {
            return Err(BattleError::InsufficientTroops {
                city: home.name.clone(),
                available: home.troops,
                requested: troops,
            });
        }

        let attacker_commander = world
            .select_commander(attacker_city)
            .ok_or_else(|| BattleError::NoCommander(attacker_city.to_string()))?;
        let defender_commander = world
            .select_commander(defender_city)
            .ok_or_else(|| BattleError::NoCommander(defender_city.to_string()))?;

        let state = BattleState::new(
            Belligerent::new(
                &home.name,
                &home.owner,
                &attacker_commander.name,
                troops,
            ),
            Belligerent::new(
                &target.name,
                &target.owner,
                &defender_commander.name,
                target.troops,
            ),
            target.terrain,
            world.weather,
        )
        .with_morale(self.config.initial_morale)
        .with_supply_days(self.config.initial_supply_days)
        .with_wall_strength(target.walls);

        world.acquire_battle_slot(state.clone())?;
        if let Some(home) = world.city_mut(attacker_city) {
            home.troops -= troops;
        }

        tracing::info!(
            attacker = %state.attacker_city,
            defender = %state.defender_city,
            troops,
            terrain = %state.terrain,
            "battle started"
        );
        Ok(state)
    }

    /// Fight one round of the active battle
    ///
    /// A missing defender action is chosen by the engine's AI policy. Only the
    /// attacker may retreat. When the round ends the battle, the aftermath is
    /// applied before returning.
    pub fn advance<R: Rng>(
        &self,
        world: &mut WorldState,
        attacker_action: BattleAction,
        defender_action: Option<BattleAction>,
        rng: &mut R,
    ) -> Result<TurnOutcome> {
        let state = world
            .active_battle()
            .cloned()
            .ok_or(BattleError::NoActiveBattle)?;

        let defender_action = match defender_action {
            Some(action) => action,
            None => self.policy.choose_action(&state, true, rng),
        };
        if defender_action == BattleAction::Retreat {
            return Err(BattleError::InvalidAction(
                "defender cannot retreat".to_string(),
            ));
        }

        let (next, report) = advance_round(state, attacker_action, defender_action, rng);
        let message = self.round_message(&next, &report, attacker_action, defender_action);

        // Retreat is decided here rather than in the terminal check
        let ending = match report.kind {
            RoundKind::Retreat => Some(EndReason::AttackerWithdrew),
            RoundKind::Combat => match check_battle_end(&next) {
                BattleOutcome::Ongoing => None,
                BattleOutcome::Ended(reason) => Some(reason),
            },
        };

        let Some(reason) = ending else {
            world.replace_active_battle(next.clone());
            return Ok(TurnOutcome {
                message,
                report,
                status: TurnStatus::Continuing(next),
            });
        };

        let summary = self.resolve(world, &next, reason)?;
        let message = format!("{message}\n{}", summary.describe(self.locale()));
        Ok(TurnOutcome {
            message,
            report,
            status: TurnStatus::Ended(summary),
        })
    }

    /// Same as `advance`, with actions given as labels such as "fire_attack"
    pub fn advance_labels<R: Rng>(
        &self,
        world: &mut WorldState,
        attacker_action: &str,
        defender_action: Option<&str>,
        rng: &mut R,
    ) -> Result<TurnOutcome> {
        let attacker_action: BattleAction = attacker_action.parse()?;
        let defender_action = defender_action
            .map(str::parse::<BattleAction>)
            .transpose()?;
        self.advance(world, attacker_action, defender_action, rng)
    }

    /// Apply the aftermath of a finished battle and clear the slot
    pub fn resolve(
        &self,
        world: &mut WorldState,
        state: &BattleState,
        reason: EndReason,
    ) -> Result<ResolutionSummary> {
        let plan = self.plan_resolution(world, state, reason)?;
        Ok(self.apply_resolution(world, plan))
    }

    /// Status of the active battle, if any
    pub fn status(&self, world: &WorldState) -> Option<BattleStatus> {
        world.active_battle().map(BattleState::status)
    }

    /// Wrap a result for callers that want a uniform envelope
    pub fn respond<T: Describe + Serialize>(&self, result: Result<T>) -> BattleResponse {
        match result {
            Ok(value) => BattleResponse::success(value.describe(self.locale()), &value)
                .unwrap_or_else(|e| BattleResponse::failure(&e, self.locale())),
            Err(e) => BattleResponse::failure(&e, self.locale()),
        }
    }

    /// Give up on the active battle without a winner
    ///
    /// Surviving attackers march back to their home city when it still
    /// exists. This is the way out when `resolve` fails because a city
    /// vanished mid-battle.
    pub fn abandon(&self, world: &mut WorldState) -> Result<BattleState> {
        let state = world
            .release_battle_slot()
            .ok_or(BattleError::NoActiveBattle)?;

        match world.city_mut(&state.attacker_city) {
            Some(home) => home.troops += state.attacker_troops,
            None => tracing::warn!(
                city = %state.attacker_city,
                troops = state.attacker_troops,
                "home city missing, abandoned army disbanded"
            ),
        }

        tracing::info!(
            attacker = %state.attacker_city,
            defender = %state.defender_city,
            round = state.round,
            "battle abandoned"
        );
        Ok(state)
    }

    fn round_message(
        &self,
        state: &BattleState,
        report: &RoundReport,
        attacker_action: BattleAction,
        defender_action: BattleAction,
    ) -> String {
        match report.kind {
            RoundKind::Retreat => self.locale.translate(
                "battle.retreat",
                &[
                    ("commander", &state.attacker_commander),
                    ("city", &state.defender_city),
                ],
            ),
            RoundKind::Combat => self.locale.translate(
                "battle.round",
                &[
                    ("round", &report.round.to_string()),
                    ("attacker", &state.attacker_commander),
                    ("attacker_action", attacker_action.describe()),
                    ("defender", &state.defender_commander),
                    ("defender_action", defender_action.describe()),
                    ("attacker_casualties", &report.attacker_casualties.to_string()),
                    ("defender_casualties", &report.defender_casualties.to_string()),
                ],
            ),
        }
    }

    /// Work out every change resolution will make without touching the world
    fn plan_resolution(
        &self,
        world: &WorldState,
        state: &BattleState,
        reason: EndReason,
    ) -> Result<ResolutionPlan> {
        let home = world
            .city(&state.attacker_city)
            .ok_or_else(|| BattleError::CityNotFound(state.attacker_city.clone()))?;
        let target = world
            .city(&state.defender_city)
            .ok_or_else(|| BattleError::CityNotFound(state.defender_city.clone()))?;

        let cfg = &self.config;
        let winner = reason.winner();
        let survivors = state.attacker_troops;

        let plan = match winner {
            Winner::Attacker => {
                let garrison = survivors / 2;
                let returned = survivors - garrison;
                ResolutionPlan {
                    winner,
                    reason,
                    attacker_city: home.name.clone(),
                    defender_city: target.name.clone(),
                    attacker_faction: state.attacker_faction.clone(),
                    previous_owner: target.owner.clone(),
                    home_troops: home.troops + returned,
                    home_morale: (home.morale + cfg.attacker_victory_morale_gain).min(100),
                    target_troops: state.defender_troops + garrison,
                    target_morale: capture_morale(
                        target.morale,
                        cfg.defender_defeat_morale_loss,
                        cfg.captured_city_morale_floor,
                    ),
                    new_owner: state.attacker_faction.clone(),
                    returned,
                    garrison,
                    winning_commander: state.attacker_commander.clone(),
                    losing_commander: state.defender_commander.clone(),
                }
            }
            Winner::Defender => ResolutionPlan {
                winner,
                reason,
                attacker_city: home.name.clone(),
                defender_city: target.name.clone(),
                attacker_faction: state.attacker_faction.clone(),
                previous_owner: target.owner.clone(),
                home_troops: home.troops + survivors,
                home_morale: home.morale.saturating_sub(cfg.attacker_defeat_morale_loss),
                target_troops: state.defender_troops,
                target_morale: (target.morale + cfg.defender_victory_morale_gain).min(100),
                new_owner: target.owner.clone(),
                returned: survivors,
                garrison: 0,
                winning_commander: state.defender_commander.clone(),
                losing_commander: state.attacker_commander.clone(),
            },
        };
        Ok(plan)
    }

    fn apply_resolution(&self, world: &mut WorldState, plan: ResolutionPlan) -> ResolutionSummary {
        let cfg = &self.config;

        if let Some(home) = world.city_mut(&plan.attacker_city) {
            home.troops = plan.home_troops;
            home.morale = plan.home_morale;
        }
        if let Some(target) = world.city_mut(&plan.defender_city) {
            target.troops = plan.target_troops;
            target.morale = plan.target_morale;
        }

        let captured_city = if plan.winner == Winner::Attacker {
            // Both cities were checked while planning
            if let Err(e) = world.transfer_city(&plan.defender_city, &plan.new_owner) {
                tracing::warn!(error = %e, "city transfer failed after planning");
            }
            Some(plan.defender_city.clone())
        } else {
            None
        };

        let mut skipped_commanders = Vec::new();
        let loyalty_changes = [
            (&plan.winning_commander, cfg.winner_loyalty_gain as i64),
            (&plan.losing_commander, -(cfg.loser_loyalty_loss as i64)),
        ];
        for (name, delta) in loyalty_changes {
            match world.officer_mut(name) {
                Some(officer) => {
                    officer.loyalty = (officer.loyalty as i64 + delta).clamp(0, 100) as u32;
                }
                None => {
                    tracing::warn!(commander = %name, "commander missing at resolution, loyalty unchanged");
                    skipped_commanders.push(name.clone());
                }
            }
        }

        world.release_battle_slot();

        tracing::info!(
            winner = %plan.winner,
            reason = %plan.reason,
            city = %plan.defender_city,
            "battle resolved"
        );

        ResolutionSummary {
            winner: plan.winner,
            reason: plan.reason,
            attacker_city: plan.attacker_city,
            defender_city: plan.defender_city,
            captured_city,
            attacker_faction: plan.attacker_faction,
            previous_owner: plan.previous_owner,
            new_owner: plan.new_owner,
            surviving_attackers: plan.returned + plan.garrison,
            returned_home: plan.returned,
            garrison: plan.garrison,
            defender_troops: plan.target_troops - plan.garrison,
            skipped_commanders,
        }
    }
}

/// Morale loss on capture, never pushing the city below the floor
fn capture_morale(morale: u32, loss: u32, floor: u32) -> u32 {
    if morale <= floor {
        morale
    } else {
        morale.saturating_sub(loss).max(floor)
    }
}

/// Resolution worked out against the world, applied in one step
#[derive(Debug)]
struct ResolutionPlan {
    winner: Winner,
    reason: EndReason,
    attacker_city: String,
    defender_city: String,
    attacker_faction: String,
    previous_owner: String,
    home_troops: u32,
    home_morale: u32,
    target_troops: u32,
    target_morale: u32,
    new_owner: String,
    returned: u32,
    garrison: u32,
    winning_commander: String,
    losing_commander: String,
}

/// What a finished battle changed in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub winner: Winner,
    pub reason: EndReason,
    pub attacker_city: String,
    pub defender_city: String,
    /// Set when the attacker took the city
    pub captured_city: Option<String>,
    pub attacker_faction: String,
    /// Owner of the defending city when the battle began
    pub previous_owner: String,
    /// Owner of the defending city after resolution
    pub new_owner: String,
    pub surviving_attackers: u32,
    pub returned_home: u32,
    pub garrison: u32,
    /// Defenders left standing in the city
    pub defender_troops: u32,
    /// Commanders that could not be found when loyalty was adjusted
    pub skipped_commanders: Vec<String>,
}

/// State of the battle after a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TurnStatus {
    Continuing(BattleState),
    Ended(ResolutionSummary),
}

/// Everything a caller learns from one `advance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub message: String,
    pub report: RoundReport,
    pub status: TurnStatus,
}

impl TurnOutcome {
    pub fn is_ended(&self) -> bool {
        matches!(self.status, TurnStatus::Ended(_))
    }

    pub fn summary(&self) -> Option<&ResolutionSummary> {
        match &self.status {
            TurnStatus::Ended(summary) => Some(summary),
            TurnStatus::Continuing(_) => None,
        }
    }
}

/// Player-facing text for an orchestrator result
pub trait Describe {
    fn describe(&self, locale: &dyn Translate) -> String;
}

impl Describe for BattleState {
    fn describe(&self, locale: &dyn Translate) -> String {
        locale.translate(
            "battle.started",
            &[
                ("attacker", &self.attacker_commander),
                ("troops", &self.attacker_troops.to_string()),
                ("from", &self.attacker_city),
                ("target", &self.defender_city),
            ],
        )
    }
}

impl Describe for ResolutionSummary {
    fn describe(&self, locale: &dyn Translate) -> String {
        let key = match self.winner {
            Winner::Attacker => "battle.victory",
            Winner::Defender => "battle.defeat",
        };
        let headline = locale.translate(
            key,
            &[
                ("attacker", &self.attacker_faction),
                ("defender", &self.previous_owner),
                ("city", &self.defender_city),
            ],
        );
        format!("{headline} ({})", locale.translate(self.reason.key(), &[]))
    }
}

impl Describe for TurnOutcome {
    fn describe(&self, _locale: &dyn Translate) -> String {
        self.message.clone()
    }
}

impl Describe for BattleStatus {
    fn describe(&self, locale: &dyn Translate) -> String {
        locale.translate(
            "battle.status",
            &[
                ("round", &self.round.to_string()),
                ("attacker_troops", &self.attacker_troops.to_string()),
                ("attacker_morale", &self.attacker_morale.to_string()),
                ("defender_troops", &self.defender_troops.to_string()),
                ("defender_morale", &self.defender_morale.to_string()),
                ("siege", &self.siege_progress.to_string()),
                ("supply", &self.supply_days.to_string()),
            ],
        )
    }
}

/// Uniform envelope for orchestrator results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub payload: Value,
}

impl BattleResponse {
    pub fn success(message: impl Into<String>, payload: &impl Serialize) -> Result<Self> {
        Ok(Self {
            success: true,
            message: message.into(),
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Failure envelope with text from `error.<kind>` in the catalog
    ///
    /// Kinds without a catalog entry use the error's own text.
    pub fn failure(error: &BattleError, locale: &dyn Translate) -> Self {
        let key = format!("error.{}", error.kind());
        let params = error.message_params();
        let params: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let mut message = locale.translate(&key, &params);
        if message == key {
            message = error.to_string();
        }
        Self {
            success: false,
            message,
            payload: serde_json::json!({ "kind": error.kind() }),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::terrain::Terrain;
    use crate::world::{City, Officer};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world() -> WorldState {
        let mut world = WorldState::new();
        world.add_city(City::new("Xinye", "Shu").with_troops(8000).with_morale(60));
        world.add_city(
            City::new("Fancheng", "Wei")
                .with_troops(3000)
                .with_morale(50)
                .with_terrain(Terrain::River)
                .with_walls(80),
        );
        world.add_officer(Officer::new("Guan Yu", "Shu", 95).stationed_at("Xinye"));
        world.add_officer(Officer::new("Cao Ren", "Wei", 80).stationed_at("Fancheng"));
        world
    }

    fn engine() -> BattleEngine {
        BattleEngine::new().with_policy(ThresholdPolicy::default())
    }

    #[test]
    fn test_initiate_drafts_troops_and_claims_slot() {
        let mut world = world();
        let state = engine().initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();

        assert_eq!(world.city("Xinye").unwrap().troops, 3000);
        assert_eq!(state.attacker_troops, 5000);
        assert_eq!(state.defender_troops, 3000);
        assert_eq!(state.terrain, Terrain::River);
        assert_eq!(state.wall_strength, 80);
        assert_eq!(state.attacker_commander, "Guan Yu");
        assert_eq!(state.defender_commander, "Cao Ren");
        assert_eq!(world.active_battle(), Some(&state));
    }

    #[test]
    fn test_initiate_rejects_zero_troops() {
        let mut world = world();
        let err = engine().initiate(&mut world, "Xinye", "Fancheng", 0).unwrap_err();
        assert!(matches!(err, BattleError::InvalidTroopCount(0)));
        assert!(!world.has_active_battle());
    }

    #[test]
    fn test_initiate_requires_defending_commander() {
        let mut world = world();
        world.officer_mut("Cao Ren").unwrap().city = None;
        let err = engine().initiate(&mut world, "Xinye", "Fancheng", 1000).unwrap_err();
        assert!(matches!(err, BattleError::NoCommander(ref c) if c == "Fancheng"));
        assert_eq!(world.city("Xinye").unwrap().troops, 8000);
    }

    #[test]
    fn test_capture_morale_respects_floor() {
        assert_eq!(capture_morale(60, 12, 30), 48);
        assert_eq!(capture_morale(35, 12, 30), 30);
        assert_eq!(capture_morale(20, 12, 30), 20);
    }

    #[test]
    fn test_attacker_victory_garrisons_half() {
        let mut world = world();
        let engine = engine();
        let mut state = engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        state.attacker_troops = 4001;
        state.defender_troops = 0;

        let summary = engine
            .resolve(&mut world, &state, EndReason::DefenderEliminated)
            .unwrap();

        assert_eq!(summary.garrison, 2000);
        assert_eq!(summary.returned_home, 2001);
        assert_eq!(summary.captured_city.as_deref(), Some("Fancheng"));
        let fancheng = world.city("Fancheng").unwrap();
        assert_eq!(fancheng.owner, "Shu");
        assert_eq!(fancheng.troops, 2000);
        assert_eq!(fancheng.morale, 38);
        let xinye = world.city("Xinye").unwrap();
        assert_eq!(xinye.troops, 3000 + 2001);
        assert_eq!(xinye.morale, 70);
        assert_eq!(world.officer("Guan Yu").unwrap().loyalty, 75);
        assert_eq!(world.officer("Cao Ren").unwrap().loyalty, 60);
        assert!(!world.has_active_battle());
    }

    #[test]
    fn test_defender_victory_sends_survivors_home() {
        let mut world = world();
        let engine = engine();
        let mut state = engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        state.attacker_troops = 1200;
        state.defender_troops = 2500;
        state.supply_days = 0;

        let summary = engine
            .resolve(&mut world, &state, EndReason::SuppliesExhausted)
            .unwrap();

        assert_eq!(summary.winner, Winner::Defender);
        assert_eq!(summary.captured_city, None);
        assert_eq!(summary.new_owner, "Wei");
        assert_eq!(world.city("Xinye").unwrap().troops, 4200);
        assert_eq!(world.city("Xinye").unwrap().morale, 52);
        assert_eq!(world.city("Fancheng").unwrap().troops, 2500);
        assert_eq!(world.city("Fancheng").unwrap().morale, 58);
        assert_eq!(world.officer("Cao Ren").unwrap().loyalty, 75);
        assert_eq!(world.officer("Guan Yu").unwrap().loyalty, 60);
    }

    #[test]
    fn test_missing_commander_is_reported() {
        let mut world = world();
        let engine = engine();
        let state = engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        world.officers.remove("Cao Ren");

        let summary = engine
            .resolve(&mut world, &state, EndReason::AttackerWithdrew)
            .unwrap();
        assert_eq!(summary.skipped_commanders, vec!["Cao Ren".to_string()]);
        assert_eq!(world.officer("Guan Yu").unwrap().loyalty, 60);
    }

    #[test]
    fn test_missing_city_fails_without_mutation() {
        let mut world = world();
        let engine = engine();
        let state = engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        world.cities.remove("Fancheng");
        let before = world.to_json().unwrap();

        let err = engine
            .resolve(&mut world, &state, EndReason::WallsBreached)
            .unwrap_err();
        assert!(matches!(err, BattleError::CityNotFound(ref c) if c == "Fancheng"));
        assert_eq!(world.to_json().unwrap(), before);
        assert!(world.has_active_battle());
    }

    #[test]
    fn test_retreat_ends_battle_for_defender() {
        let mut world = world();
        let engine = engine();
        engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let outcome = engine
            .advance(&mut world, BattleAction::Retreat, None, &mut rng)
            .unwrap();

        assert_eq!(outcome.report.kind, RoundKind::Retreat);
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.reason, EndReason::AttackerWithdrew);
        assert_eq!(summary.winner, Winner::Defender);
        assert_eq!(world.city("Xinye").unwrap().troops, 8000);
        assert!(outcome.message.contains("Guan Yu retreats from Fancheng!"));
    }

    #[test]
    fn test_advance_labels_rejects_unknown_action() {
        let mut world = world();
        let engine = engine();
        engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let err = engine
            .advance_labels(&mut world, "charge", None, &mut rng)
            .unwrap_err();
        assert!(matches!(err, BattleError::InvalidAction(_)));
        assert_eq!(world.active_battle().unwrap().round, 0);
    }

    #[test]
    fn test_continuing_turn_replaces_slot() {
        let mut world = world();
        let engine = engine();
        engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let outcome = engine
            .advance_labels(&mut world, "attack", Some("defend"), &mut rng)
            .unwrap();

        match outcome.status {
            TurnStatus::Continuing(ref state) => {
                assert_eq!(state.round, 1);
                assert_eq!(world.active_battle(), Some(state));
            }
            TurnStatus::Ended(_) => panic!("first round should not end the battle"),
        }
        assert!(outcome
            .message
            .starts_with("Round 1: Guan Yu launches an assault"));
        assert_eq!(engine.status(&world).unwrap().round, 1);
    }

    #[test]
    fn test_defender_retreat_is_rejected() {
        let mut world = world();
        let engine = engine();
        engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let err = engine
            .advance_labels(&mut world, "attack", Some("retreat"), &mut rng)
            .unwrap_err();
        assert!(matches!(err, BattleError::InvalidAction(_)));

        let err = engine
            .advance(&mut world, BattleAction::Attack, Some(BattleAction::Retreat), &mut rng)
            .unwrap_err();
        assert!(matches!(err, BattleError::InvalidAction(_)));

        let state = world.active_battle().unwrap();
        assert_eq!(state.round, 0);
        assert_eq!(state.defender_troops, 3000);
        assert!(state.combat_log.is_empty());
    }

    #[test]
    fn test_abandon_returns_army_home() {
        let mut world = world();
        let engine = engine();
        engine.initiate(&mut world, "Xinye", "Fancheng", 5000).unwrap();
        let mut state = world.active_battle().cloned().unwrap();
        state.attacker_troops = 4200;
        world.replace_active_battle(state.clone());
        world.cities.remove("Fancheng");

        assert!(engine
            .resolve(&mut world, &state, EndReason::WallsBreached)
            .is_err());

        let abandoned = engine.abandon(&mut world).unwrap();
        assert_eq!(abandoned.attacker_troops, 4200);
        assert!(!world.has_active_battle());
        assert_eq!(world.city("Xinye").unwrap().troops, 3000 + 4200);
        assert!(matches!(
            engine.abandon(&mut world),
            Err(BattleError::NoActiveBattle)
        ));
    }

    #[test]
    fn test_failure_text_comes_from_catalog() {
        let locale = Localizer::english();
        let response = BattleResponse::failure(&BattleError::CityNotFound("Luoyang".into()), &locale);
        assert_eq!(response.message, "City Luoyang does not exist.");
        assert_eq!(response.payload["kind"], "city_not_found");

        // No catalog entry for this kind
        let response = BattleResponse::failure(&BattleError::InvalidWeather("hail".into()), &locale);
        assert_eq!(response.message, "Invalid weather: hail");
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("no wire form"))
        }
    }

    impl Describe for Unserializable {
        fn describe(&self, _locale: &dyn Translate) -> String {
            "never shown".to_string()
        }
    }

    #[test]
    fn test_unserializable_payload_becomes_failure() {
        let response = engine().respond(Ok(Unserializable));
        assert!(!response.success);
        assert_eq!(response.payload["kind"], "serde");
        assert_ne!(response.message, "never shown");
    }

    #[test]
    fn test_response_envelope() {
        let mut world = world();
        let engine = engine();

        let ok = engine.respond(engine.initiate(&mut world, "Xinye", "Fancheng", 1000));
        assert!(ok.success);
        assert_eq!(ok.payload["attacker_city"], "Xinye");
        assert!(ok.message.contains("Fancheng"));

        let err = engine.respond(engine.initiate(&mut world, "Xinye", "Fancheng", 1000));
        assert!(!err.success);
        assert_eq!(err.payload["kind"], "battle_already_active");
    }
}
