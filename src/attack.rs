//! Attack type definitions and the registry the resolver looks them up in

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One attack type as used by an attacker's build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackType {
    pub name: String,
    /// Multiplier on the attacker's tier, added to direct damage
    #[serde(default)]
    pub tier_scaling: i32,
    #[serde(default)]
    pub accuracy_mod: i32,
    #[serde(default)]
    pub damage_mod: i32,
    /// Hits every standing enemy instead of the first one
    #[serde(default)]
    pub is_area: bool,
    /// Skips the accuracy roll and deals `direct_damage_base` instead
    #[serde(default)]
    pub is_direct: bool,
    #[serde(default)]
    pub direct_damage_base: i32,
}

impl AttackType {
    fn rolled(name: &str, accuracy_mod: i32, is_area: bool) -> Self {
        Self {
            name: name.to_string(),
            tier_scaling: 0,
            accuracy_mod,
            damage_mod: 0,
            is_area,
            is_direct: false,
            direct_damage_base: 0,
        }
    }

    fn direct(name: &str, accuracy_mod: i32, is_area: bool, base: i32) -> Self {
        Self {
            name: name.to_string(),
            tier_scaling: 0,
            accuracy_mod,
            damage_mod: 0,
            is_area,
            is_direct: true,
            direct_damage_base: base,
        }
    }

    /// Fixed damage of a direct attack for an attacker of `tier`.
    /// Returns `None` for attacks that roll.
    pub fn direct_damage(&self, tier: i32) -> Option<i32> {
        self.is_direct.then(|| {
            self.direct_damage_base
                .saturating_add(self.tier_scaling.saturating_mul(tier))
        })
    }
}

/// Read-only catalog of attack types keyed by name.
///
/// Built once and handed to the resolver by reference; nothing mutates it
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackRegistry {
    types: BTreeMap<String, AttackType>,
}

impl AttackRegistry {
    /// The built-in Vitality System attack types
    pub fn standard() -> Self {
        let entries = [
            AttackType::rolled("melee", 0, false),
            AttackType::rolled("ranged", 0, false),
            AttackType::rolled("area", -1, true),
            AttackType::direct("direct_damage", 0, false, 14),
            AttackType::direct("direct_area_damage", -1, true, 14),
        ];
        Self {
            types: entries
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect(),
        }
    }

    /// Build a registry from scratch. Duplicate names are rejected.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = AttackType>,
    {
        let mut types = BTreeMap::new();
        for entry in entries {
            insert_unique(&mut types, entry)?;
        }
        Ok(Self { types })
    }

    /// Consume this registry and return one that also holds `extra`.
    /// An entry that shadows an existing name is rejected.
    pub fn with_extra<I>(self, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = AttackType>,
    {
        let mut types = self.types;
        for entry in extra {
            insert_unique(&mut types, entry)?;
        }
        Ok(Self { types })
    }

    pub fn get(&self, name: &str) -> Result<&AttackType> {
        self.types
            .get(name)
            .ok_or_else(|| SimError::Configuration(format!("unknown attack type '{}'", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = &AttackType> {
        self.types.values()
    }
}

impl Default for AttackRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn insert_unique(types: &mut BTreeMap<String, AttackType>, entry: AttackType) -> Result<()> {
    if entry.name.is_empty() {
        return Err(SimError::Configuration(
            "attack type name must not be empty".to_string(),
        ));
    }
    if types.contains_key(&entry.name) {
        return Err(SimError::Configuration(format!(
            "duplicate attack type '{}'",
            entry.name
        )));
    }
    types.insert(entry.name.clone(), entry);
    Ok(())
}
