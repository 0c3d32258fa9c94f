//! Sango Tactics - turn-based field battles and sieges between warring cities
//!
//! One battle at a time runs against a [`world::WorldState`]. The
//! [`battle::BattleEngine`] starts it, advances it round by round and writes
//! the aftermath back into the world once it ends.

pub mod battle;
pub mod core;
pub mod locale;
pub mod world;
