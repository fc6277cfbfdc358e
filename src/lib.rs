//! Vitality Sim - a seedable turn-based combat resolver for the Vitality System
//!
//! One attacker against one defender or a group of enemies, resolved turn by
//! turn, plus batch runs with summary statistics.

pub mod attack;
pub mod combat_log;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod error;
pub mod simulation;
pub mod stats;

pub use attack::*;
pub use combat_log::*;
pub use combatant::*;
pub use config::*;
pub use dice::*;
pub use error::*;
pub use simulation::*;
pub use stats::*;
