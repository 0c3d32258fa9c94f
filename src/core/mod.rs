pub mod config;
pub mod error;

pub use config::BattleConfig;
pub use error::{BattleError, Result};
