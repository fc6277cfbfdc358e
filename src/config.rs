//! Configuration structures for loading build YAML/JSON files

use crate::attack::{AttackRegistry, AttackType};
use crate::combatant::{Attacker, Encounter};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_TURNS: u32 = 100;

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

/// Full build configuration loaded from YAML/JSON
///
/// ```yaml
/// attacker:
///   name: Vex
///   tier: 2
///   accuracy: 2
///   damage: 1
///   attacks: [melee]
/// encounter:
///   num_enemies: 3
///   enemy_hp: 20
///   defender: { tier: 2 }
/// max_turns: 50
/// seed: 1234
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub attacker: Attacker,
    pub encounter: Encounter,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    /// Base seed for reproducible runs; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Extra attack types on top of the standard registry
    #[serde(default)]
    pub attack_types: Vec<AttackType>,
}

impl BuildConfig {
    pub fn new(attacker: Attacker, encounter: Encounter) -> Self {
        Self {
            attacker,
            encounter,
            max_turns: DEFAULT_MAX_TURNS,
            seed: None,
            attack_types: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Load a build configuration from a YAML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let path_str = path.as_ref().to_string_lossy().to_lowercase();

        if path_str.ends_with(".json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Standard registry plus any attack types declared in this build
    pub fn registry(&self) -> Result<AttackRegistry> {
        AttackRegistry::standard().with_extra(self.attack_types.iter().cloned())
    }
}
