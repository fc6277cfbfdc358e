//! Per-run results and batch statistics

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Outcome of one resolved encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatRunResult {
    pub turns: u32,
    pub total_damage: i64,
    pub attacks: u32,
    pub hits: u32,
    pub enemies_defeated: u32,
    /// The turn cap ended the run with enemies still standing
    pub capped: bool,
}

/// Aggregate over a batch of runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Results in submission order
    pub results: Vec<CombatRunResult>,
    pub avg_turns: f64,
    pub std_turns: f64,
    pub min_turns: u32,
    pub max_turns: u32,
    /// Total damage over total turns across the whole batch
    pub damage_per_turn: f64,
    pub avg_damage: f64,
    pub hit_rate: f64,
    pub capped_runs: usize,
}

impl BatchSummary {
    pub fn from_results(results: Vec<CombatRunResult>) -> Result<Self> {
        if results.is_empty() {
            return Err(SimError::InvalidArgument(
                "cannot summarise an empty batch".to_string(),
            ));
        }
        let n = results.len() as f64;

        let total_turns: u64 = results.iter().map(|r| r.turns as u64).sum();
        let total_damage: i64 = results.iter().map(|r| r.total_damage).sum();
        let total_attacks: u64 = results.iter().map(|r| r.attacks as u64).sum();
        let total_hits: u64 = results.iter().map(|r| r.hits as u64).sum();

        let avg_turns = total_turns as f64 / n;
        let variance = results
            .iter()
            .map(|r| (r.turns as f64 - avg_turns).powi(2))
            .sum::<f64>()
            / n;

        let min_turns = results.iter().map(|r| r.turns).min().unwrap_or(0);
        let max_turns = results.iter().map(|r| r.turns).max().unwrap_or(0);

        let damage_per_turn = if total_turns > 0 {
            total_damage as f64 / total_turns as f64
        } else {
            0.0
        };
        let hit_rate = if total_attacks > 0 {
            total_hits as f64 / total_attacks as f64
        } else {
            0.0
        };
        let capped_runs = results.iter().filter(|r| r.capped).count();

        Ok(Self {
            avg_turns,
            std_turns: variance.sqrt(),
            min_turns,
            max_turns,
            damage_per_turn,
            avg_damage: total_damage as f64 / n,
            hit_rate,
            capped_runs,
            results,
        })
    }

    pub fn num_runs(&self) -> usize {
        self.results.len()
    }

    /// Nearest-rank percentile of turn counts, `p` in `0.0..=100.0`
    pub fn turns_percentile(&self, p: f64) -> Option<u32> {
        if self.results.is_empty() || !(0.0..=100.0).contains(&p) {
            return None;
        }
        let mut turns: Vec<u32> = self.results.iter().map(|r| r.turns).collect();
        turns.sort_unstable();
        let rank = ((p / 100.0) * turns.len() as f64).ceil() as usize;
        let idx = rank.saturating_sub(1).min(turns.len() - 1);
        Some(turns[idx])
    }
}
