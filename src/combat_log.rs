//! Per-turn event sinks
//!
//! Logging is purely observational. A sink that fails is dropped for the rest
//! of the run by the resolver; it never changes the outcome.

use serde::{Deserialize, Serialize};

/// One attack application against one enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub turn: u32,
    pub attacker: String,
    pub attack_type: String,
    /// Index of the enemy within the encounter
    pub target: usize,
    /// Natural d20, `None` for direct attacks
    pub roll: Option<u32>,
    pub hit: bool,
    pub damage: i32,
    pub remaining_hp: i32,
    /// Running damage total for the run after this event
    pub total_damage: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("combat log sink failed: {0}")]
pub struct LogError(pub String);

/// Sink for turn events
pub trait CombatLog {
    fn record(&mut self, event: &TurnEvent) -> Result<(), LogError>;

    /// Whether events should be built at all for this sink
    fn enabled(&self) -> bool {
        true
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl CombatLog for NullLog {
    fn record(&mut self, _event: &TurnEvent) -> Result<(), LogError> {
        Ok(())
    }

    fn enabled(&self) -> bool {
        false
    }
}

/// Keeps events in memory for verbose output
#[derive(Debug, Default)]
pub struct TraceCollector {
    events: Vec<TurnEvent>,
}

impl TraceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TurnEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TurnEvent> {
        self.events
    }
}

impl CombatLog for TraceCollector {
    fn record(&mut self, event: &TurnEvent) -> Result<(), LogError> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Forwards events to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl CombatLog for TracingLog {
    fn record(&mut self, event: &TurnEvent) -> Result<(), LogError> {
        tracing::debug!(
            turn = event.turn,
            attacker = %event.attacker,
            attack_type = %event.attack_type,
            target = event.target,
            roll = ?event.roll,
            hit = event.hit,
            damage = event.damage,
            remaining_hp = event.remaining_hp,
            "turn event"
        );
        Ok(())
    }
}
