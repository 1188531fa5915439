//! Simulation driver: a variable-step event loop that advances both weapons, the rotation and
//! every buff timer together, once per independent batch.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::character::SpecialStats;
use crate::combat::abilities::{Ability, Rotation};
use crate::combat::buffs::{CrusaderBuff, Flurry};
use crate::combat::constants::{
    BLOODTHIRST_AP_COEFFICIENT, CRUSADER_PROC_DIVISOR, HEROIC_STRIKE_BONUS_DAMAGE,
    MAX_OPPONENT_LEVEL, MAX_TIME_STEP, MAX_WEAPON_SKILL, TIME_STEP_EPSILON, UNBRIDLED_WRATH_RAGE,
};
use crate::combat::hit_table::{AttackCategory, HitOutcome, HitResult, HitTables};
use crate::combat::rage::{rage_generation, Rage};
use crate::combat::rng::{RandomSource, Rng};
use crate::combat::samples::DamageSamples;
use crate::combat::weapon::{Hand, WeaponProfile, WeaponState};
use crate::error::SimulationError;

/// Independent blocks of combat behavior, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    /// Bloodthirst, Whirlwind and Heroic Strike.
    pub rotation: bool,
    /// Unbridled Wrath rage trickle and Flurry.
    pub talents: bool,
    /// Chance-on-hit extra swings from items.
    pub item_procs: bool,
    /// Crusader attack power proc.
    pub crusader: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self::all()
    }
}

impl FeatureToggles {
    pub const fn all() -> Self {
        Self {
            rotation: true,
            talents: true,
            item_procs: true,
            crusader: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            rotation: false,
            talents: false,
            item_procs: false,
            crusader: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated seconds per batch.
    pub sim_time: f64,
    pub opponent_level: i32,
    pub batches: usize,
    pub seed: u64,
    pub toggles: FeatureToggles,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sim_time: 60.0,
            opponent_level: 63,
            batches: 1000,
            seed: 7,
            toggles: FeatureToggles::all(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.sim_time.is_finite() && self.sim_time > 0.0) {
            return Err(SimulationError::InvalidSimTime(self.sim_time));
        }
        if self.batches == 0 {
            return Err(SimulationError::NoBatches);
        }
        if !(1..=MAX_OPPONENT_LEVEL).contains(&self.opponent_level) {
            return Err(SimulationError::InvalidOpponentLevel(self.opponent_level));
        }
        Ok(())
    }
}

/// Immutable view of the character, taken once at the start of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub special_stats: SpecialStats,
    pub main_hand: WeaponProfile,
    pub off_hand: WeaponProfile,
    /// Weapon-time multiplier, 1.0 for no haste.
    pub haste: f64,
    /// Percent chance per swing for an extra main-hand swing.
    pub chance_for_extra_hit: f64,
    pub crusader_mh: bool,
    pub crusader_oh: bool,
    pub mh_bonus_damage: f64,
    pub oh_bonus_damage: f64,
    pub weapon_skill_mh: i32,
    pub weapon_skill_oh: i32,
}

impl CombatSnapshot {
    pub fn validate(&self) -> Result<(), SimulationError> {
        for (hand, profile) in [(Hand::MainHand, &self.main_hand), (Hand::OffHand, &self.off_hand)] {
            if !(profile.swing_speed.is_finite() && profile.swing_speed > 0.0) {
                return Err(SimulationError::InvalidWeapon {
                    hand,
                    reason: format!("swing speed must be positive, got {}", profile.swing_speed),
                });
            }
        }
        for (hand, skill) in [
            (Hand::MainHand, self.weapon_skill_mh),
            (Hand::OffHand, self.weapon_skill_oh),
        ] {
            if !(1..=MAX_WEAPON_SKILL).contains(&skill) {
                return Err(SimulationError::InvalidWeaponSkill { hand, skill });
            }
        }
        if !(self.haste.is_finite() && self.haste > 0.0) {
            return Err(SimulationError::InvalidHaste(self.haste));
        }
        Ok(())
    }

    fn profile(&self, hand: Hand) -> &WeaponProfile {
        match hand {
            Hand::MainHand => &self.main_hand,
            Hand::OffHand => &self.off_hand,
        }
    }

    fn bonus_damage(&self, hand: Hand) -> f64 {
        match hand {
            Hand::MainHand => self.mh_bonus_damage,
            Hand::OffHand => self.oh_bonus_damage,
        }
    }

    fn crusader(&self, hand: Hand) -> bool {
        match hand {
            Hand::MainHand => self.crusader_mh,
            Hand::OffHand => self.crusader_oh,
        }
    }
}

/// State after one loop iteration, for tracing and invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepObservation {
    pub time: f64,
    pub dt: f64,
    pub rage: f64,
    pub flurry_charges: u8,
    pub attack_power: f64,
    pub total_damage: f64,
    pub crusader_active: bool,
    pub main_hand_swing: Option<HitResult>,
    pub off_hand_swing: Option<HitResult>,
    pub ability: Option<Ability>,
}

/// Step size for the next iteration: the nearest pending timer or swing, at most
/// [MAX_TIME_STEP], nudged past the boundary by [TIME_STEP_EPSILON] and capped by the
/// remaining run time.
pub fn next_time_step<I>(pending_timers: I, swing_times: [f64; 2], remaining: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let nearest = pending_timers
        .into_iter()
        .filter(|timer| *timer > 0.0)
        .chain(swing_times.into_iter().map(|t| t.max(0.0)))
        .fold(MAX_TIME_STEP, f64::min);
    (nearest + TIME_STEP_EPSILON).min(remaining)
}

/// Run state of a single batch.
pub struct Simulation<'a, R: RandomSource> {
    snapshot: &'a CombatSnapshot,
    sim_time: f64,
    opponent_level: i32,
    toggles: FeatureToggles,
    rng: R,
    special_stats: SpecialStats,
    tables: HitTables,
    weapons: [WeaponState; 2],
    crusader_proc_chances: [f64; 2],
    rage: Rage,
    rotation: Rotation,
    crusader: CrusaderBuff,
    flurry: Flurry,
    time: f64,
    total_damage: f64,
}

impl<'a, R: RandomSource> Simulation<'a, R> {
    pub fn new(snapshot: &'a CombatSnapshot, config: &SimulationConfig, rng: R) -> Self {
        let weapons = Hand::BOTH.map(|hand| {
            let mut weapon = WeaponState::new(snapshot.profile(hand), hand);
            weapon.compute_average_damage(snapshot.bonus_damage(hand));
            weapon
        });
        let crusader_proc_chances = Hand::BOTH.map(|hand| {
            if snapshot.crusader(hand) {
                snapshot.profile(hand).swing_speed / CRUSADER_PROC_DIVISOR
            } else {
                0.0
            }
        });
        let special_stats = snapshot.special_stats;
        Self {
            snapshot,
            sim_time: config.sim_time,
            opponent_level: config.opponent_level,
            toggles: config.toggles,
            rng,
            special_stats,
            tables: HitTables::build(
                config.opponent_level,
                snapshot.weapon_skill_mh,
                snapshot.weapon_skill_oh,
                &special_stats,
            ),
            weapons,
            crusader_proc_chances,
            rage: Rage::default(),
            rotation: Rotation::default(),
            crusader: CrusaderBuff::default(),
            flurry: Flurry::default(),
            time: 0.0,
            total_damage: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.sim_time
    }

    /// Run the remaining iterations and return the batch's average DPS.
    pub fn run(mut self) -> f64 {
        while !self.is_finished() {
            self.tick();
        }
        self.dps()
    }

    /// One loop iteration: pick the step, swing both weapons, run the rotation, count timers down.
    pub fn tick(&mut self) -> StepObservation {
        let dt = self.next_step();
        let mut swings = [None, None];

        for hand in Hand::BOTH {
            let elapsed = self.weapon_speed() * dt;
            let attack_power = self.special_stats.attack_power;
            if let Some(base_damage) = self.weapons[hand.index()].step(elapsed, attack_power) {
                swings[hand.index()] = Some(self.resolve_swing(hand, base_damage));
            }
        }

        let ability = if self.toggles.rotation {
            self.run_rotation()
        } else {
            None
        };

        self.advance_timers(dt);
        self.time += dt;

        StepObservation {
            time: self.time,
            dt,
            rage: self.rage.current(),
            flurry_charges: self.flurry.charges(),
            attack_power: self.special_stats.attack_power,
            total_damage: self.total_damage,
            crusader_active: self.crusader.is_active(),
            main_hand_swing: swings[Hand::MainHand.index()],
            off_hand_swing: swings[Hand::OffHand.index()],
            ability,
        }
    }

    pub fn dps(&self) -> f64 {
        if self.time > 0.0 {
            self.total_damage / self.time
        } else {
            0.0
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn total_damage(&self) -> f64 {
        self.total_damage
    }

    pub fn rage(&self) -> f64 {
        self.rage.current()
    }

    pub fn flurry_charges(&self) -> u8 {
        self.flurry.charges()
    }

    pub fn special_stats(&self) -> &SpecialStats {
        &self.special_stats
    }

    pub fn tables(&self) -> &HitTables {
        &self.tables
    }

    pub fn weapon(&self, hand: Hand) -> &WeaponState {
        &self.weapons[hand.index()]
    }

    pub fn crusader(&self) -> &CrusaderBuff {
        &self.crusader
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    /// Real time until the hand's next swing at the current haste and flurry state.
    pub fn time_to_next_swing(&self, hand: Hand) -> f64 {
        self.weapons[hand.index()].internal_swing_timer() / self.weapon_speed()
    }

    fn weapon_speed(&self) -> f64 {
        self.snapshot.haste * self.flurry.speed_factor()
    }

    fn next_step(&self) -> f64 {
        let pending = self
            .rotation
            .timers()
            .into_iter()
            .chain(self.crusader.timers());
        let swing_times = Hand::BOTH.map(|hand| self.time_to_next_swing(hand));
        next_time_step(pending, swing_times, self.sim_time - self.time)
    }

    fn attack(&mut self, hand: Hand, category: AttackCategory, damage: f64) -> HitOutcome {
        let roll = self.rng.roll_percent();
        self.tables.table(hand, category).resolve(damage, roll)
    }

    fn resolve_swing(&mut self, hand: Hand, base_damage: f64) -> HitResult {
        let heroic_strike = self.toggles.rotation
            && hand == Hand::MainHand
            && self.rotation.take_heroic_strike(&mut self.rage);

        let outcome = if heroic_strike {
            self.attack(
                hand,
                AttackCategory::Special,
                base_damage + HEROIC_STRIKE_BONUS_DAMAGE,
            )
        } else {
            let outcome = self.attack(hand, AttackCategory::Basic, base_damage);
            self.gain_swing_rage(hand, &outcome);
            outcome
        };
        self.total_damage += outcome.damage;
        self.apply_talents(outcome.result);

        if self.toggles.item_procs {
            self.roll_extra_hit();
        }
        if self.toggles.crusader {
            self.roll_crusader(hand);
        }
        outcome.result
    }

    fn gain_swing_rage(&mut self, hand: Hand, outcome: &HitOutcome) {
        let swing_speed = self.weapons[hand.index()].swing_speed();
        self.rage.gain(rage_generation(
            outcome.damage,
            swing_speed,
            outcome.result == HitResult::Crit,
            hand,
        ));
    }

    fn apply_talents(&mut self, result: HitResult) {
        if !self.toggles.talents {
            return;
        }
        if result.is_landed() {
            if self.rng.coin_flip() {
                self.rage.gain(UNBRIDLED_WRATH_RAGE);
            }
            self.flurry.consume();
        }
        if result == HitResult::Crit {
            self.flurry.trigger();
        }
    }

    fn roll_extra_hit(&mut self) {
        let chance = self.snapshot.chance_for_extra_hit;
        if chance <= 0.0 || self.rng.roll_percent() >= chance {
            return;
        }
        let main_hand = Hand::MainHand;
        let base_damage = self.weapons[main_hand.index()].swing(self.special_stats.attack_power);
        let outcome = self.attack(main_hand, AttackCategory::Basic, base_damage);
        self.total_damage += outcome.damage;
        self.gain_swing_rage(main_hand, &outcome);
        self.apply_talents(outcome.result);
        self.weapons[main_hand.index()].reset_timer();
    }

    fn roll_crusader(&mut self, hand: Hand) {
        let chance = self.crusader_proc_chances[hand.index()];
        if chance <= 0.0 || self.rng.next_unit() >= chance {
            return;
        }
        if let Some(bonus) = self.crusader.trigger(hand) {
            self.adjust_attack_power(bonus);
        }
    }

    fn run_rotation(&mut self) -> Option<Ability> {
        let fired = self.rotation.ready_ability(self.rage);
        if let Some(ability) = fired {
            let attack_power = self.special_stats.attack_power;
            let damage = match ability {
                Ability::Bloodthirst => attack_power * BLOODTHIRST_AP_COEFFICIENT,
                Ability::Whirlwind => self.weapons[Hand::MainHand.index()].swing(attack_power),
            };
            let outcome = self.attack(Hand::MainHand, AttackCategory::Special, damage);
            self.total_damage += outcome.damage;
            self.apply_talents(outcome.result);
            self.rotation.commit(ability, &mut self.rage);
        }
        self.rotation.queue_heroic_strike(self.rage);
        fired
    }

    fn advance_timers(&mut self, dt: f64) {
        self.rotation.advance(dt);
        if let Some(bonus) = self.crusader.advance(dt) {
            self.adjust_attack_power(-bonus);
        }
    }

    fn adjust_attack_power(&mut self, delta: f64) {
        let mut stats = self.special_stats;
        stats.attack_power += delta;
        self.apply_special_stats(stats);
    }

    /// Swap in new special stats, rebuilding hit tables when crit or hit moved.
    fn apply_special_stats(&mut self, stats: SpecialStats) {
        let rebuild = stats.critical_strike != self.special_stats.critical_strike
            || stats.hit != self.special_stats.hit;
        self.special_stats = stats;
        if rebuild {
            self.tables = HitTables::build(
                self.opponent_level,
                self.snapshot.weapon_skill_mh,
                self.snapshot.weapon_skill_oh,
                &self.special_stats,
            );
        }
    }
}

/// Average DPS of one batch with its own seeded generator.
pub fn simulate_batch(snapshot: &CombatSnapshot, config: &SimulationConfig, batch_index: usize) -> f64 {
    let rng = Rng::for_batch(config.seed, batch_index);
    let dps = Simulation::new(snapshot, config, rng).run();
    tracing::trace!(batch_index, dps, "batch complete");
    dps
}

/// Run every batch on the current thread.
pub fn simulate(
    snapshot: &CombatSnapshot,
    config: &SimulationConfig,
) -> Result<DamageSamples, SimulationError> {
    simulate_with_parallelism(snapshot, config, false)
}

/// Like [simulate] but distributes batches across the Rayon pool. Each batch writes its own
/// slot, so results match [simulate] sample for sample.
pub fn simulate_parallel(
    snapshot: &CombatSnapshot,
    config: &SimulationConfig,
) -> Result<DamageSamples, SimulationError> {
    simulate_with_parallelism(snapshot, config, true)
}

fn simulate_with_parallelism(
    snapshot: &CombatSnapshot,
    config: &SimulationConfig,
    parallel: bool,
) -> Result<DamageSamples, SimulationError> {
    config.validate()?;
    snapshot.validate()?;

    let run_one = |batch_index: usize| simulate_batch(snapshot, config, batch_index);
    let samples: Vec<f64> = if parallel {
        (0..config.batches).into_par_iter().map(run_one).collect()
    } else {
        (0..config.batches).map(run_one).collect()
    };
    let samples = DamageSamples::new(samples);
    tracing::debug!(
        batches = samples.len(),
        mean_dps = samples.mean(),
        standard_error = samples.standard_error(),
        "simulation complete"
    );
    Ok(samples)
}
