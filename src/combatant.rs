//! Attacker and defender stat blocks, and the encounter they meet in

use serde::{Deserialize, Serialize};

/// Attacker stat block as supplied by a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attacker {
    #[serde(default = "default_attacker_name")]
    pub name: String,
    #[serde(default)]
    pub tier: i32,
    /// Accuracy bonus added to every d20
    #[serde(default)]
    pub accuracy: i32,
    /// Damage bonus added to every rolled hit
    #[serde(default)]
    pub damage: i32,
    /// Attack types made each turn, in order
    pub attacks: Vec<String>,
}

fn default_attacker_name() -> String {
    "attacker".to_string()
}

impl Attacker {
    pub fn new(name: impl Into<String>, tier: i32, accuracy: i32, damage: i32) -> Self {
        Self {
            name: name.into(),
            tier,
            accuracy,
            damage,
            attacks: Vec::new(),
        }
    }

    /// Builder-style helper to append an attack type
    pub fn with_attack(mut self, attack: impl Into<String>) -> Self {
        self.attacks.push(attack.into());
        self
    }
}

/// Defender stat block. Avoidance and durability fall back to tier-derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Defender {
    #[serde(default)]
    pub tier: i32,
    #[serde(default)]
    pub avoidance: Option<i32>,
    #[serde(default)]
    pub durability: Option<i32>,
}

impl Defender {
    pub fn new(tier: i32, avoidance: i32, durability: i32) -> Self {
        Self {
            tier,
            avoidance: Some(avoidance),
            durability: Some(durability),
        }
    }

    /// Target number for accuracy checks, 10 + tier by default
    pub fn avoidance(&self) -> i32 {
        self.avoidance.unwrap_or(self.tier.saturating_add(10))
    }

    /// Flat reduction on rolled damage, equal to tier by default
    pub fn durability(&self) -> i32 {
        self.durability.unwrap_or(self.tier)
    }
}

/// What the attacker is up against: `num_enemies` copies of `defender`,
/// each starting with `enemy_hp` hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    #[serde(default)]
    pub defender: Defender,
    #[serde(default = "default_num_enemies")]
    pub num_enemies: u32,
    pub enemy_hp: i32,
}

fn default_num_enemies() -> u32 {
    1
}

impl Encounter {
    /// A single target with `target_hp` hit points
    pub fn single(defender: Defender, target_hp: i32) -> Self {
        Self {
            defender,
            num_enemies: 1,
            enemy_hp: target_hp,
        }
    }

    pub fn group(defender: Defender, num_enemies: u32, enemy_hp: i32) -> Self {
        Self {
            defender,
            num_enemies,
            enemy_hp,
        }
    }
}
