//! Core simulation engine: turn-by-turn combat resolution and batch runs

use crate::attack::{AttackRegistry, AttackType};
use crate::combat_log::{CombatLog, NullLog, TraceCollector, TracingLog, TurnEvent};
use crate::combatant::{Attacker, Encounter};
use crate::config::BuildConfig;
use crate::dice::{Dice, FastRng};
use crate::error::{Result, SimError};
use crate::stats::{BatchSummary, CombatRunResult};
use rayon::prelude::*;

/// Natural d20 results that override the accuracy comparison
const NATURAL_HIT: u32 = 20;
const NATURAL_MISS: u32 = 1;

/// Damage dice for rolled attacks: 3d6
const DAMAGE_DICE: u32 = 3;
const DAMAGE_SIDES: u32 = 6;

/// Largest group a single encounter may hold
pub const MAX_ENEMIES: u32 = 10_000;

/// Resolves one encounter at a time against a fixed registry and turn cap
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a AttackRegistry,
    max_turns: u32,
}

/// Running counters for a single encounter
#[derive(Debug, Default)]
struct Tally {
    total_damage: i64,
    attacks: u32,
    hits: u32,
    enemies_defeated: u32,
}

impl Tally {
    fn finish(self, turns: u32, capped: bool) -> CombatRunResult {
        CombatRunResult {
            turns,
            total_damage: self.total_damage,
            attacks: self.attacks,
            hits: self.hits,
            enemies_defeated: self.enemies_defeated,
            capped,
        }
    }
}

/// Wraps the caller's log so a failing sink is reported once and then ignored
struct LogSink<'l> {
    log: &'l mut dyn CombatLog,
    enabled: bool,
}

impl<'l> LogSink<'l> {
    fn new(log: &'l mut dyn CombatLog) -> Self {
        let enabled = log.enabled();
        Self { log, enabled }
    }

    fn emit(&mut self, event: impl FnOnce() -> TurnEvent) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.log.record(&event()) {
            tracing::warn!(error = %e, "combat log failed, continuing without it");
            self.enabled = false;
        }
    }
}

/// Everything about the current turn that an attack application needs
struct Strike<'r> {
    turn: u32,
    attacker: &'r Attacker,
    attack: &'r AttackType,
    avoidance: i32,
    durability: i32,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a AttackRegistry, max_turns: u32) -> Result<Self> {
        if max_turns == 0 {
            return Err(SimError::InvalidArgument(
                "turn cap must be at least 1".to_string(),
            ));
        }
        Ok(Self { registry, max_turns })
    }

    /// Resolve one encounter until every enemy is down or the turn cap is hit.
    ///
    /// All inputs are validated before the first turn. Reaching the cap is
    /// not an error; the result reports `turns == max_turns` and `capped`.
    pub fn resolve<D: Dice + ?Sized>(
        &self,
        attacker: &Attacker,
        encounter: &Encounter,
        dice: &mut D,
        log: &mut dyn CombatLog,
    ) -> Result<CombatRunResult> {
        let attacks = self.lookup_attacks(attacker)?;
        validate_encounter(encounter)?;

        let mut hp = vec![encounter.enemy_hp; encounter.num_enemies as usize];
        let avoidance = encounter.defender.avoidance();
        let durability = encounter.defender.durability();
        let mut tally = Tally::default();
        let mut sink = LogSink::new(log);

        for turn in 1..=self.max_turns {
            for attack in attacks.iter().copied() {
                if hp.iter().all(|&h| h <= 0) {
                    break;
                }
                let strike = Strike {
                    turn,
                    attacker,
                    attack,
                    avoidance,
                    durability,
                };
                strike.apply(&mut hp, dice, &mut tally, &mut sink);
            }

            if hp.iter().all(|&h| h <= 0) {
                let result = tally.finish(turn, false);
                tracing::debug!(
                    turns = result.turns,
                    total_damage = result.total_damage,
                    "combat resolved"
                );
                return Ok(result);
            }
        }

        let result = tally.finish(self.max_turns, true);
        tracing::debug!(
            turns = result.turns,
            total_damage = result.total_damage,
            standing = hp.iter().filter(|&&h| h > 0).count(),
            "combat hit turn cap"
        );
        Ok(result)
    }

    fn lookup_attacks(&self, attacker: &Attacker) -> Result<Vec<&'a AttackType>> {
        if attacker.attacks.is_empty() {
            return Err(SimError::Configuration(format!(
                "attacker '{}' has no attack types",
                attacker.name
            )));
        }
        attacker
            .attacks
            .iter()
            .map(|name| self.registry.get(name))
            .collect()
    }
}

fn validate_encounter(encounter: &Encounter) -> Result<()> {
    if encounter.enemy_hp <= 0 {
        return Err(SimError::InvalidState(format!(
            "enemy hit points must be positive, got {}",
            encounter.enemy_hp
        )));
    }
    if encounter.num_enemies == 0 {
        return Err(SimError::InvalidArgument(
            "encounter needs at least one enemy".to_string(),
        ));
    }
    if encounter.num_enemies > MAX_ENEMIES {
        return Err(SimError::InvalidArgument(format!(
            "encounter holds at most {} enemies, got {}",
            MAX_ENEMIES, encounter.num_enemies
        )));
    }
    Ok(())
}

impl Strike<'_> {
    /// Make one attack against the current targets. Area attacks take every
    /// standing enemy, others take the first one still up.
    fn apply<D: Dice + ?Sized>(
        &self,
        hp: &mut [i32],
        dice: &mut D,
        tally: &mut Tally,
        sink: &mut LogSink<'_>,
    ) {
        let targets: Vec<usize> = if self.attack.is_area {
            (0..hp.len()).filter(|&i| hp[i] > 0).collect()
        } else {
            hp.iter().position(|&h| h > 0).into_iter().collect()
        };

        match self.attack.direct_damage(self.attacker.tier) {
            Some(fixed) => {
                let damage = fixed.max(0);
                for target in targets {
                    self.land(target, None, true, damage, hp, tally, sink);
                }
            }
            None => {
                // One damage roll per attack, shared by every target it hits
                let rolled = i64::from(dice.roll_sum(DAMAGE_DICE, DAMAGE_SIDES))
                    + i64::from(self.attacker.damage)
                    + i64::from(self.attacker.tier)
                    + i64::from(self.attack.damage_mod)
                    - i64::from(self.durability);
                let damage = rolled.clamp(0, i64::from(i32::MAX)) as i32;
                for target in targets {
                    let roll = dice.d20();
                    let hit = self.is_hit(roll);
                    self.land(target, Some(roll), hit, damage, hp, tally, sink);
                }
            }
        }
    }

    fn is_hit(&self, roll: u32) -> bool {
        match roll {
            NATURAL_HIT => true,
            NATURAL_MISS => false,
            _ => {
                let total = i64::from(roll)
                    + i64::from(self.attacker.accuracy)
                    + i64::from(self.attacker.tier)
                    + i64::from(self.attack.accuracy_mod);
                total >= i64::from(self.avoidance)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn land(
        &self,
        target: usize,
        roll: Option<u32>,
        hit: bool,
        damage: i32,
        hp: &mut [i32],
        tally: &mut Tally,
        sink: &mut LogSink<'_>,
    ) {
        tally.attacks = tally.attacks.saturating_add(1);
        let dealt = if hit { damage } else { 0 };
        if hit {
            tally.hits = tally.hits.saturating_add(1);
            tally.total_damage = tally.total_damage.saturating_add(i64::from(dealt));
            hp[target] -= dealt;
            if hp[target] <= 0 {
                tally.enemies_defeated += 1;
            }
        }

        let remaining_hp = hp[target];
        let total_damage = tally.total_damage;
        sink.emit(|| TurnEvent {
            turn: self.turn,
            attacker: self.attacker.name.clone(),
            attack_type: self.attack.name.clone(),
            target,
            roll,
            hit,
            damage: dealt,
            remaining_hp,
            total_damage,
        });
    }
}

/// Run a single simulation with a fresh random seed
pub fn run_simulation(registry: &AttackRegistry, config: &BuildConfig) -> Result<CombatRunResult> {
    let mut rng = FastRng::from_entropy();
    run_simulation_with_rng(registry, config, &mut rng)
}

/// Run a single simulation with a specific seed
pub fn run_simulation_with_seed(
    registry: &AttackRegistry,
    config: &BuildConfig,
    seed: u64,
) -> Result<CombatRunResult> {
    let mut rng = FastRng::new(seed);
    run_simulation_with_rng(registry, config, &mut rng)
}

/// Run a simulation with a specific dice source
pub fn run_simulation_with_rng<D: Dice + ?Sized>(
    registry: &AttackRegistry,
    config: &BuildConfig,
    dice: &mut D,
) -> Result<CombatRunResult> {
    let resolver = Resolver::new(registry, config.max_turns)?;
    resolve_logged(&resolver, config, dice)
}

/// Resolve without keeping events; they go to `tracing` when debug is on
fn resolve_logged<D: Dice + ?Sized>(
    resolver: &Resolver<'_>,
    config: &BuildConfig,
    dice: &mut D,
) -> Result<CombatRunResult> {
    if tracing::enabled!(tracing::Level::DEBUG) {
        resolver.resolve(&config.attacker, &config.encounter, dice, &mut TracingLog)
    } else {
        resolver.resolve(&config.attacker, &config.encounter, dice, &mut NullLog)
    }
}

/// Run one seeded simulation and keep every turn event
pub fn simulate_combat_verbose(
    registry: &AttackRegistry,
    config: &BuildConfig,
    seed: u64,
) -> Result<(CombatRunResult, Vec<TurnEvent>)> {
    let mut rng = FastRng::new(seed);
    let mut trace = TraceCollector::new();
    let result = Resolver::new(registry, config.max_turns)?.resolve(
        &config.attacker,
        &config.encounter,
        &mut rng,
        &mut trace,
    )?;
    Ok((result, trace.into_events()))
}

/// Seed for run `index` of a batch started from `base_seed`
#[inline]
pub fn run_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add(index as u64)
}

/// Run multiple simulations in parallel, results in submission order
pub fn run_simulations_parallel(
    registry: &AttackRegistry,
    config: &BuildConfig,
    count: usize,
    base_seed: u64,
) -> Result<Vec<CombatRunResult>> {
    let resolver = Resolver::new(registry, config.max_turns)?;
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = FastRng::new(run_seed(base_seed, i));
            resolve_logged(&resolver, config, &mut rng)
        })
        .collect()
}

/// Run multiple simulations sequentially
pub fn run_simulations_sequential(
    registry: &AttackRegistry,
    config: &BuildConfig,
    count: usize,
    base_seed: u64,
) -> Result<Vec<CombatRunResult>> {
    let resolver = Resolver::new(registry, config.max_turns)?;
    (0..count)
        .map(|i| {
            let mut rng = FastRng::new(run_seed(base_seed, i));
            resolve_logged(&resolver, config, &mut rng)
        })
        .collect()
}

/// Run `num_runs` independent simulations and summarise them.
///
/// Every run gets its own RNG seeded from the build's seed (or entropy) plus
/// the run index, so parallel and sequential batches agree.
pub fn run_batch(
    registry: &AttackRegistry,
    config: &BuildConfig,
    num_runs: usize,
    parallel: bool,
) -> Result<BatchSummary> {
    if num_runs == 0 {
        return Err(SimError::InvalidArgument(
            "number of runs must be positive".to_string(),
        ));
    }
    let base_seed = config.seed.unwrap_or_else(rand::random::<u64>);

    let results = if parallel {
        run_simulations_parallel(registry, config, num_runs, base_seed)?
    } else {
        run_simulations_sequential(registry, config, num_runs, base_seed)?
    };

    let summary = BatchSummary::from_results(results)?;
    tracing::info!(
        num_runs,
        base_seed,
        parallel,
        avg_turns = summary.avg_turns,
        damage_per_turn = summary.damage_per_turn,
        capped_runs = summary.capped_runs,
        "batch complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::LogError;
    use crate::combatant::Defender;

    /// Replays a fixed sequence of rolls, clamped to the die size
    struct ScriptedDice {
        rolls: Vec<u32>,
        next: usize,
    }

    impl ScriptedDice {
        fn new(rolls: Vec<u32>) -> Self {
            Self { rolls, next: 0 }
        }

        fn constant(value: u32) -> Self {
            Self::new(vec![value])
        }
    }

    impl Dice for ScriptedDice {
        fn roll(&mut self, sides: u32) -> u32 {
            let value = self.rolls[self.next % self.rolls.len()];
            self.next += 1;
            value.clamp(1, sides)
        }
    }

    struct FailingLog {
        calls: usize,
    }

    impl CombatLog for FailingLog {
        fn record(&mut self, _event: &TurnEvent) -> std::result::Result<(), LogError> {
            self.calls += 1;
            Err(LogError("disk full".to_string()))
        }
    }

    fn defender() -> Defender {
        Defender::new(0, 10, 0)
    }

    fn attacker(attacks: &[&str]) -> Attacker {
        attacks
            .iter()
            .fold(Attacker::new("tester", 0, 0, 0), |a, name| a.with_attack(*name))
    }

    #[test]
    fn direct_damage_kills_fourteen_hp_in_one_turn() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 100).unwrap();
        let mut trace = TraceCollector::new();
        let result = resolver
            .resolve(
                &attacker(&["direct_damage"]),
                &Encounter::single(defender(), 14),
                &mut FastRng::new(3),
                &mut trace,
            )
            .unwrap();
        assert_eq!(result.turns, 1);
        assert_eq!(result.total_damage, 14);
        assert_eq!(result.enemies_defeated, 1);
        assert!(!result.capped);
        assert_eq!(trace.events().len(), 1);
        assert_eq!(trace.events()[0].roll, None);
    }

    #[test]
    fn natural_one_always_misses() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 7).unwrap();
        let mut a = attacker(&["melee"]);
        a.accuracy = 100;
        let result = resolver
            .resolve(
                &a,
                &Encounter::single(defender(), 5),
                &mut ScriptedDice::constant(1),
                &mut NullLog,
            )
            .unwrap();
        assert_eq!(result.turns, 7);
        assert!(result.capped);
        assert_eq!(result.total_damage, 0);
        assert_eq!(result.hits, 0);
        assert_eq!(result.attacks, 7);
    }

    #[test]
    fn natural_twenty_always_hits() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 10).unwrap();
        let encounter = Encounter::single(Defender::new(0, 100, 0), 18);
        let result = resolver
            .resolve(
                &attacker(&["melee"]),
                &encounter,
                &mut ScriptedDice::constant(20),
                &mut NullLog,
            )
            .unwrap();
        // 3d6 all sixes
        assert_eq!(result.turns, 1);
        assert_eq!(result.total_damage, 18);
    }

    #[test]
    fn accuracy_mod_shifts_the_threshold() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 1).unwrap();
        let encounter = Encounter::single(defender(), 1000);

        // d20 of 10 against avoidance 10: melee meets it, area falls one short
        let melee = resolver
            .resolve(
                &attacker(&["melee"]),
                &encounter,
                &mut ScriptedDice::constant(10),
                &mut NullLog,
            )
            .unwrap();
        assert_eq!(melee.hits, 1);

        let area = resolver
            .resolve(
                &attacker(&["area"]),
                &encounter,
                &mut ScriptedDice::constant(10),
                &mut NullLog,
            )
            .unwrap();
        assert_eq!(area.hits, 0);
    }

    #[test]
    fn rolled_damage_includes_bonuses_and_durability() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 1).unwrap();
        let a = Attacker::new("tester", 2, 0, 3).with_attack("melee");
        let encounter = Encounter::single(Defender::new(0, 0, 4), 1000);
        let result = resolver
            .resolve(&a, &encounter, &mut ScriptedDice::constant(4), &mut NullLog)
            .unwrap();
        // 3d6 of 4s = 12, + damage 3 + tier 2 - durability 4
        assert_eq!(result.total_damage, 13);
    }

    #[test]
    fn durability_floors_damage_at_zero() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 25).unwrap();
        let encounter = Encounter::single(Defender::new(0, 0, 100), 10);
        let result = resolver
            .resolve(&attacker(&["melee"]), &encounter, &mut FastRng::new(11), &mut NullLog)
            .unwrap();
        assert_eq!(result.turns, 25);
        assert!(result.capped);
        assert_eq!(result.total_damage, 0);
    }

    #[test]
    fn rolled_area_attack_shares_one_damage_roll() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 1).unwrap();
        let mut trace = TraceCollector::new();
        // 3d6 of sixes, then one d20 per target: hit, miss, hit
        let result = resolver
            .resolve(
                &attacker(&["area"]),
                &Encounter::group(defender(), 3, 1000),
                &mut ScriptedDice::new(vec![6, 6, 6, 20, 1, 20]),
                &mut trace,
            )
            .unwrap();

        assert_eq!(result.attacks, 3);
        assert_eq!(result.hits, 2);
        assert_eq!(result.total_damage, 36);
        let events = trace.events();
        let rolls: Vec<Option<u32>> = events.iter().map(|e| e.roll).collect();
        assert_eq!(rolls, vec![Some(20), Some(1), Some(20)]);
        assert_eq!(events[0].damage, 18);
        assert_eq!(events[2].damage, events[0].damage);
        assert!(!events[1].hit);
        assert_eq!(events[1].damage, 0);
        assert_eq!(events[1].remaining_hp, 1000);
    }

    #[test]
    fn extreme_accuracy_still_hits_without_overflow() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 1).unwrap();
        let mut a = Attacker::new("tester", 1, i32::MAX, 0).with_attack("melee");
        let encounter = Encounter::single(Defender::new(0, i32::MAX, 0), 1000);
        let result = resolver
            .resolve(&a, &encounter, &mut ScriptedDice::constant(10), &mut NullLog)
            .unwrap();
        assert_eq!(result.hits, 1);

        a.accuracy = i32::MIN;
        let result = resolver
            .resolve(&a, &encounter, &mut ScriptedDice::constant(10), &mut NullLog)
            .unwrap();
        assert_eq!(result.hits, 0);
    }

    #[test]
    fn extreme_damage_is_clamped() {
        let registry = AttackRegistry::standard()
            .with_extra([AttackType {
                name: "huge".to_string(),
                tier_scaling: 1_000_000_000,
                accuracy_mod: 0,
                damage_mod: 0,
                is_area: false,
                is_direct: true,
                direct_damage_base: 14,
            }])
            .unwrap();
        let resolver = Resolver::new(&registry, 5).unwrap();

        let direct = Attacker::new("tester", 5, 0, 0).with_attack("huge");
        let result = resolver
            .resolve(
                &direct,
                &Encounter::group(defender(), 2, i32::MAX),
                &mut FastRng::new(1),
                &mut NullLog,
            )
            .unwrap();
        assert_eq!(result.turns, 2);
        assert_eq!(result.total_damage, 2 * i64::from(i32::MAX));

        let rolled = Attacker::new("tester", 1, 0, i32::MAX).with_attack("melee");
        let result = resolver
            .resolve(
                &rolled,
                &Encounter::single(defender(), i32::MAX),
                &mut ScriptedDice::constant(20),
                &mut NullLog,
            )
            .unwrap();
        assert_eq!(result.turns, 1);
        assert_eq!(result.total_damage, i64::from(i32::MAX));
    }

    #[test]
    fn area_attack_hits_every_standing_enemy() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 10).unwrap();
        let result = resolver
            .resolve(
                &attacker(&["direct_area_damage"]),
                &Encounter::group(defender(), 3, 5),
                &mut FastRng::new(1),
                &mut NullLog,
            )
            .unwrap();
        assert_eq!(result.turns, 1);
        assert_eq!(result.total_damage, 42);
        assert_eq!(result.enemies_defeated, 3);
    }

    #[test]
    fn single_target_attacks_work_through_the_group() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 10).unwrap();
        let mut trace = TraceCollector::new();
        let result = resolver
            .resolve(
                &attacker(&["direct_damage"]),
                &Encounter::group(defender(), 3, 14),
                &mut FastRng::new(1),
                &mut trace,
            )
            .unwrap();
        assert_eq!(result.turns, 3);
        assert_eq!(result.enemies_defeated, 3);
        let targets: Vec<usize> = trace.events().iter().map(|e| e.target).collect();
        assert_eq!(targets, vec![0, 1, 2]);
    }

    #[test]
    fn every_listed_attack_is_made_each_turn() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 10).unwrap();
        let result = resolver
            .resolve(
                &attacker(&["direct_damage", "direct_damage"]),
                &Encounter::single(defender(), 28),
                &mut FastRng::new(1),
                &mut NullLog,
            )
            .unwrap();
        assert_eq!(result.turns, 1);
        assert_eq!(result.attacks, 2);
    }

    #[test]
    fn attacks_stop_once_everyone_is_down() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 10).unwrap();
        let result = resolver
            .resolve(
                &attacker(&["direct_damage", "direct_damage"]),
                &Encounter::single(defender(), 10),
                &mut FastRng::new(1),
                &mut NullLog,
            )
            .unwrap();
        assert_eq!(result.attacks, 1);
        assert_eq!(result.total_damage, 14);
    }

    #[test]
    fn unknown_attack_fails_before_any_turn() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 10).unwrap();
        let mut trace = TraceCollector::new();
        let err = resolver
            .resolve(
                &attacker(&["melee", "fireball"]),
                &Encounter::single(defender(), 10),
                &mut FastRng::new(1),
                &mut trace,
            )
            .unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));
        assert!(trace.events().is_empty());
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let registry = AttackRegistry::standard();
        assert!(matches!(
            Resolver::new(&registry, 0).unwrap_err(),
            SimError::InvalidArgument(_)
        ));

        let resolver = Resolver::new(&registry, 10).unwrap();
        let mut rng = FastRng::new(1);
        let err = resolver
            .resolve(
                &attacker(&["melee"]),
                &Encounter::single(defender(), 0),
                &mut rng,
                &mut NullLog,
            )
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidState(_)));

        let err = resolver
            .resolve(
                &attacker(&["melee"]),
                &Encounter::group(defender(), 0, 10),
                &mut rng,
                &mut NullLog,
            )
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));

        let err = resolver
            .resolve(
                &attacker(&["melee"]),
                &Encounter::group(defender(), u32::MAX, 10),
                &mut rng,
                &mut NullLog,
            )
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));

        let err = resolver
            .resolve(&attacker(&[]), &Encounter::single(defender(), 10), &mut rng, &mut NullLog)
            .unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));
    }

    #[test]
    fn failing_log_does_not_change_the_outcome() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 50).unwrap();
        let a = attacker(&["melee"]);
        let encounter = Encounter::group(defender(), 3, 20);

        let quiet = resolver
            .resolve(&a, &encounter, &mut FastRng::new(9), &mut NullLog)
            .unwrap();
        let mut failing = FailingLog { calls: 0 };
        let noisy = resolver
            .resolve(&a, &encounter, &mut FastRng::new(9), &mut failing)
            .unwrap();

        assert_eq!(quiet, noisy);
        assert_eq!(failing.calls, 1);
    }

    #[test]
    fn tracing_log_leaves_the_outcome_alone() {
        let registry = AttackRegistry::standard();
        let resolver = Resolver::new(&registry, 50).unwrap();
        let a = attacker(&["melee", "area"]);
        let encounter = Encounter::group(defender(), 3, 20);

        let quiet = resolver
            .resolve(&a, &encounter, &mut FastRng::new(4), &mut NullLog)
            .unwrap();
        let traced = resolver
            .resolve(&a, &encounter, &mut FastRng::new(4), &mut TracingLog)
            .unwrap();
        assert_eq!(quiet, traced);
    }

    #[test]
    fn unseeded_run_resolves() {
        let registry = AttackRegistry::standard();
        let config = BuildConfig::new(
            attacker(&["direct_damage"]),
            Encounter::single(defender(), 14),
        );
        let result = run_simulation(&registry, &config).unwrap();
        assert_eq!(result.turns, 1);
        assert_eq!(result.total_damage, 14);
    }

    #[test]
    fn batch_rejects_zero_runs() {
        let registry = AttackRegistry::standard();
        let config = BuildConfig::new(attacker(&["melee"]), Encounter::single(defender(), 10));
        let err = run_batch(&registry, &config, 0, false).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn parallel_and_sequential_batches_agree() {
        let registry = AttackRegistry::standard();
        let config = BuildConfig::new(
            attacker(&["melee", "area"]),
            Encounter::group(defender(), 4, 25),
        )
        .with_seed(2024);
        let seq = run_batch(&registry, &config, 64, false).unwrap();
        let par = run_batch(&registry, &config, 64, true).unwrap();
        assert_eq!(seq.results, par.results);
        assert_eq!(seq.num_runs(), 64);
    }

    #[test]
    fn batch_results_follow_per_run_seeds() {
        let registry = AttackRegistry::standard();
        let config = BuildConfig::new(attacker(&["melee"]), Encounter::single(defender(), 40))
            .with_seed(500);
        let summary = run_batch(&registry, &config, 8, true).unwrap();
        for (i, result) in summary.results.iter().enumerate() {
            let single = run_simulation_with_seed(&registry, &config, run_seed(500, i)).unwrap();
            assert_eq!(*result, single);
        }
    }

    #[test]
    fn verbose_run_matches_quiet_run() {
        let registry = AttackRegistry::standard();
        let config = BuildConfig::new(attacker(&["melee"]), Encounter::group(defender(), 2, 30));
        let (result, events) = simulate_combat_verbose(&registry, &config, 77).unwrap();
        assert_eq!(result, run_simulation_with_seed(&registry, &config, 77).unwrap());
        assert_eq!(events.len() as u32, result.attacks);
        assert_eq!(events.last().map(|e| e.total_damage), Some(result.total_damage));
    }
}
