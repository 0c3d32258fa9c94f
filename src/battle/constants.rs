//! Battle system constants - the fixed combat tables in one place
//!
//! These values are MULTIPLICATIVE factors on combat power unless noted.

// Terrain
pub const MOUNTAIN_DEFENSE_BONUS: f64 = 1.30;
pub const MOUNTAIN_ASSAULT_PENALTY: f64 = 0.85;
pub const MOUNTAIN_CAVALRY_PENALTY: f64 = 0.80;
pub const FOREST_FIRE_ATTACK_BONUS: f64 = 1.25;
pub const FOREST_AMBUSH_BONUS: f64 = 1.20;
pub const RIVER_CROSSING_PENALTY: f64 = 0.85;
pub const COASTAL_DEFENSE_BONUS: f64 = 1.15;

// Weather
pub const RAIN_FIRE_ATTACK_PENALTY: f64 = 0.80;
pub const RAIN_MOVEMENT_PENALTY: f64 = 0.90;
pub const DROUGHT_FIRE_ATTACK_BONUS: f64 = 1.50;
pub const SNOW_MOVEMENT_PENALTY: f64 = 0.70;
pub const FOG_AMBUSH_BONUS: f64 = 1.30;
pub const FOG_VISIBILITY_PENALTY: f64 = 0.80;

// Actions
pub const DEFEND_POWER_FACTOR: f64 = 0.5;
pub const DEFEND_DAMAGE_FACTOR: f64 = 0.5;
pub const FLANK_POWER_FACTOR: f64 = 1.3;
pub const FIRE_ATTACK_POWER_FACTOR: f64 = 1.4;
pub const PURSUIT_DAMAGE_FACTOR: f64 = 1.5;
pub const COUNTER_ATTACK_FACTOR: f64 = 1.2;

// Casualties
pub const CASUALTY_SCALE: f64 = 0.4;
pub const MAX_CASUALTY_RATE: f64 = 0.25;
pub const JITTER_MIN: f64 = 0.8;
pub const JITTER_MAX: f64 = 1.2;

// Battle setup
pub const DEFAULT_MORALE: u32 = 70;
pub const DEFAULT_SUPPLY_DAYS: u32 = 10;
pub const DEFAULT_WALL_STRENGTH: u32 = 50;

// Morale (points on the 0-100 scale)
pub const MAX_MORALE: u32 = 100;
pub const MORALE_LOSS_SCALE: f64 = 20.0;
pub const MORALE_BREAK_THRESHOLD: u32 = 10;

// Siege
pub const SIEGE_TROOP_DIVISOR: f64 = 1000.0;
pub const SIEGE_WALL_OFFSET: f64 = 10.0;
pub const SIEGE_FIRE_MULTIPLIER: f64 = 2.0;
pub const SIEGE_RAIN_MULTIPLIER: f64 = 0.7;
pub const SIEGE_DROUGHT_MULTIPLIER: f64 = 1.3;
pub const MAX_SIEGE_PER_ROUND: u32 = 20;
pub const SIEGE_COMPLETE: u32 = 100;

// Attrition (fraction of attacker troops lost per round)
pub const SNOW_ATTRITION_RATE: f64 = 0.03;
pub const RIVER_CROSSING_ATTRITION: f64 = 0.02;
pub const RIVER_CROSSING_ROUNDS: u32 = 2;
