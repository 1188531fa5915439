use furysim::character::{sample_fury_warrior, SpecialStats};
use furysim::combat::{
    build_table, hit_chances, rage_generation, simulate, simulate_parallel, Ability,
    AttackCategory, CombatSnapshot, FeatureToggles, Hand, HitResult, HitTable, Rage, RandomSource,
    Rng, Simulation, SimulationConfig, WeaponProfile,
};
use proptest::prelude::*;

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

/// Always returns the same draw, so every roll lands in the same table bucket.
struct FixedDraw(f64);

impl RandomSource for FixedDraw {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

fn plain_snapshot(special_stats: SpecialStats) -> CombatSnapshot {
    CombatSnapshot {
        special_stats,
        main_hand: WeaponProfile {
            swing_speed: 2.6,
            min_damage: 80.0,
            max_damage: 150.0,
        },
        off_hand: WeaponProfile {
            swing_speed: 1.8,
            min_damage: 50.0,
            max_damage: 90.0,
        },
        haste: 1.0,
        chance_for_extra_hit: 0.0,
        crusader_mh: false,
        crusader_oh: false,
        mh_bonus_damage: 0.0,
        oh_bonus_damage: 0.0,
        weapon_skill_mh: 300,
        weapon_skill_oh: 300,
    }
}

fn short_config(batches: usize) -> SimulationConfig {
    SimulationConfig {
        sim_time: 30.0,
        batches,
        ..SimulationConfig::default()
    }
}

#[test]
fn level_63_boss_against_300_skill_matches_closed_form() {
    let stats = SpecialStats::new(25.0, 6.0, 1200.0);
    let chances = hit_chances(63, 300, &stats);

    // skill_diff 15: miss (5 + 3 + 1) * 0.8 + 20 - hit, dodge 5 + 1.5, crit 25 - 3 - 1.8.
    approx_eq(chances.miss, 21.2, 1e-9);
    approx_eq(chances.dodge, 6.5, 1e-12);
    approx_eq(chances.crit, 20.2, 1e-9);
    approx_eq(chances.glancing, 40.0, 0.0);
    approx_eq(chances.glancing_penalty, 35.0, 0.0);

    let basic = build_table(63, 300, &stats, Hand::MainHand, AttackCategory::Basic);
    let expected_basic = [21.2, 27.7, 67.7, 87.9];
    assert_eq!(basic.thresholds().len(), expected_basic.len());
    for (got, want) in basic.thresholds().iter().zip(expected_basic) {
        approx_eq(*got, want, 1e-9);
    }

    let special = build_table(63, 300, &stats, Hand::MainHand, AttackCategory::Special);
    let expected_special = [21.2, 27.7, 47.9];
    assert_eq!(special.thresholds().len(), expected_special.len());
    for (got, want) in special.thresholds().iter().zip(expected_special) {
        approx_eq(*got, want, 1e-9);
    }

    let glance = basic.resolve(100.0, 50.0);
    assert_eq!(glance.result, HitResult::Glancing);
    approx_eq(glance.damage, 65.0, 1e-12);
}

#[test]
fn white_hits_only_sum_to_total_damage() {
    // Zero crit and hit at level 63 leaves no crit bucket; with the rotation off nothing else fires.
    let snapshot = plain_snapshot(SpecialStats::new(0.0, 0.0, 10.0));
    let config = SimulationConfig {
        sim_time: 120.0,
        toggles: FeatureToggles::none(),
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(&snapshot, &config, Rng::new(99));
    let tables = sim.tables().clone();

    let mut expected_total = 0.0;
    let mut swings = 0;
    while !sim.is_finished() {
        let before = sim.total_damage();
        let observation = sim.tick();
        assert_eq!(observation.ability, None);
        assert!(!sim.rotation().heroic_strike_queued());

        let mut step_damage = 0.0;
        for (hand, swing) in [
            (Hand::MainHand, observation.main_hand_swing),
            (Hand::OffHand, observation.off_hand_swing),
        ] {
            let Some(result) = swing else { continue };
            assert_ne!(result, HitResult::Crit);
            swings += 1;
            let base = sim.weapon(hand).swing(10.0);
            let glancing_penalty = tables.table(hand, AttackCategory::Basic).glancing_penalty();
            step_damage += match result {
                HitResult::Miss | HitResult::Dodge => 0.0,
                HitResult::Glancing => base * (100.0 - glancing_penalty) / 100.0,
                HitResult::Crit => base * 2.2,
                HitResult::Hit => base,
            };
        }
        approx_eq(sim.total_damage() - before, step_damage, 1e-9);
        expected_total += step_damage;
    }
    assert!(swings > 90);
    approx_eq(sim.total_damage(), expected_total, 1e-6);
    assert_eq!(sim.flurry_charges(), 0);
}

#[test]
fn forced_crits_charge_flurry_and_speed_up_swings() {
    // Level 60 against 300 skill: basic thresholds [24, 29, 69, 99], so a roll of 80 always crits.
    let snapshot = plain_snapshot(SpecialStats::new(31.8, 0.0, 1000.0));
    let config = SimulationConfig {
        sim_time: 10.0,
        opponent_level: 60,
        toggles: FeatureToggles {
            talents: true,
            ..FeatureToggles::none()
        },
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(&snapshot, &config, FixedDraw(0.8));
    let thresholds = sim.tables().table(Hand::MainHand, AttackCategory::Basic).thresholds().to_vec();
    for (got, want) in thresholds.iter().zip([24.0, 29.0, 69.0, 99.0]) {
        approx_eq(*got, want, 1e-9);
    }

    let first = sim.tick();
    assert_eq!(first.main_hand_swing, Some(HitResult::Crit));
    assert_eq!(first.off_hand_swing, Some(HitResult::Crit));
    assert_eq!(sim.flurry_charges(), 3);

    let timer = sim.weapon(Hand::MainHand).internal_swing_timer();
    approx_eq(sim.time_to_next_swing(Hand::MainHand), timer / 1.3, 1e-12);
    approx_eq(sim.time_to_next_swing(Hand::MainHand), 2.6 / 1.3, 1e-6);

    let first_swing_at = first.time;
    let second_swing_at = loop {
        let observation = sim.tick();
        assert_eq!(observation.flurry_charges, 3);
        if observation.main_hand_swing.is_some() {
            break observation.time;
        }
        assert!(!sim.is_finished(), "second main-hand swing never happened");
    };
    approx_eq(second_swing_at - first_swing_at, 2.6 / 1.3, 1e-5);
}

/// Level 60 against 300 skill with no crit: basic thresholds [24, 29, 69, 69] and special
/// thresholds [24, 29, 29], so a roll of 50 glances on white swings and lands specials as hits.
fn level_60_config(toggles: FeatureToggles) -> SimulationConfig {
    SimulationConfig {
        sim_time: 30.0,
        opponent_level: 60,
        toggles,
        ..SimulationConfig::default()
    }
}

fn glanced(sim: &Simulation<'_, FixedDraw>, hand: Hand, base: f64) -> f64 {
    let penalty = sim.tables().table(hand, AttackCategory::Basic).glancing_penalty();
    base * (100.0 - penalty) / 100.0
}

#[test]
fn heroic_strike_upgrades_the_main_hand_swing() {
    let mut snapshot = plain_snapshot(SpecialStats::new(0.0, 0.0, 1000.0));
    for weapon in [&mut snapshot.main_hand, &mut snapshot.off_hand] {
        weapon.min_damage = 4000.0;
        weapon.max_damage = 4000.0;
    }
    let config = level_60_config(FeatureToggles {
        rotation: true,
        ..FeatureToggles::none()
    });
    let mut sim = Simulation::new(&snapshot, &config, FixedDraw(0.5));

    let mut rage = Rage::default();
    let mut heroic_strikes = 0;
    while !sim.is_finished() {
        let heroic_strike_due = sim.rotation().heroic_strike_queued() && sim.rage() > 13.0;
        let before = sim.total_damage();
        let observation = sim.tick();
        let attack_power = observation.attack_power;

        let mut expected = 0.0;
        let mut struck = false;
        if let Some(result) = observation.main_hand_swing {
            let base = sim.weapon(Hand::MainHand).swing(attack_power);
            if heroic_strike_due {
                assert_eq!(result, HitResult::Hit, "heroic strike rolls on the special table");
                expected += base + 157.0;
                rage.spend(13.0);
                struck = true;
                heroic_strikes += 1;
            } else {
                assert_eq!(result, HitResult::Glancing);
                let damage = glanced(&sim, Hand::MainHand, base);
                expected += damage;
                rage.gain(rage_generation(damage, 2.6, false, Hand::MainHand));
            }
        }
        if let Some(result) = observation.off_hand_swing {
            assert_eq!(result, HitResult::Glancing, "off hand never heroic strikes");
            let damage = glanced(&sim, Hand::OffHand, sim.weapon(Hand::OffHand).swing(attack_power));
            expected += damage;
            rage.gain(rage_generation(damage, 1.8, false, Hand::OffHand));
        }
        if let Some(ability) = observation.ability {
            expected += match ability {
                Ability::Bloodthirst => attack_power * 0.45,
                Ability::Whirlwind => sim.weapon(Hand::MainHand).swing(attack_power),
            };
            rage.spend(ability.rage_cost());
        }

        approx_eq(sim.total_damage() - before, expected, 1e-6);
        approx_eq(sim.rage(), rage.current(), 1e-9);
        if struck && observation.rage <= 75.0 {
            assert!(!sim.rotation().heroic_strike_queued());
        }
    }
    assert!(heroic_strikes > 0, "rage never reached the heroic strike threshold");
}

#[test]
fn extra_hit_swings_the_main_hand_and_resets_its_timer() {
    let snapshot = plain_snapshot(SpecialStats::new(0.0, 0.0, 1000.0));
    let config = level_60_config(FeatureToggles {
        item_procs: true,
        ..FeatureToggles::none()
    });

    let mut without = Simulation::new(&snapshot, &config, FixedDraw(0.5));
    let plain = without.tick();
    assert_eq!(plain.main_hand_swing, Some(HitResult::Glancing));
    approx_eq(
        without.weapon(Hand::MainHand).internal_swing_timer(),
        2.6 - 1e-7,
        1e-12,
    );

    // Every proc roll of 50 is under 100, so both white swings grant an extra main-hand swing.
    let proc_snapshot = CombatSnapshot {
        chance_for_extra_hit: 100.0,
        ..snapshot.clone()
    };
    let mut sim = Simulation::new(&proc_snapshot, &config, FixedDraw(0.5));
    let observation = sim.tick();
    assert_eq!(observation.main_hand_swing, Some(HitResult::Glancing));
    assert_eq!(observation.off_hand_swing, Some(HitResult::Glancing));
    assert_eq!(sim.weapon(Hand::MainHand).internal_swing_timer(), 2.6);

    let attack_power = observation.attack_power;
    let main = glanced(&sim, Hand::MainHand, sim.weapon(Hand::MainHand).swing(attack_power));
    let off = glanced(&sim, Hand::OffHand, sim.weapon(Hand::OffHand).swing(attack_power));
    approx_eq(sim.total_damage(), 3.0 * main + off, 1e-9);
    approx_eq(without.total_damage(), main + off, 1e-9);

    let main_rage = rage_generation(main, 2.6, false, Hand::MainHand);
    let off_rage = rage_generation(off, 1.8, false, Hand::OffHand);
    approx_eq(sim.rage(), 3.0 * main_rage + off_rage, 1e-9);
}

#[test]
fn rotation_respects_priority_and_global_cooldown() {
    let snapshot = sample_fury_warrior().snapshot().expect("sample build");
    let config = SimulationConfig {
        sim_time: 120.0,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(&snapshot, &config, Rng::new(11));

    let mut last_fire: Option<f64> = None;
    let mut fired = [0, 0];
    while !sim.is_finished() {
        let start = sim.time();
        let bloodthirst_ready = sim.rotation().is_ready(Ability::Bloodthirst);
        let global_ready = sim.rotation().global_ready();
        let observation = sim.tick();
        let Some(ability) = observation.ability else {
            continue;
        };

        assert!(global_ready, "{ability:?} fired during the global cooldown");
        if bloodthirst_ready {
            assert_eq!(ability, Ability::Bloodthirst, "whirlwind fired while bloodthirst was ready");
        }
        approx_eq(
            sim.rotation().cooldown_of(ability),
            ability.cooldown() - observation.dt,
            1e-9,
        );
        if let Some(previous) = last_fire {
            assert!(start - previous >= 1.0 - 1e-9, "abilities {previous} and {start} share a gcd");
        }
        last_fire = Some(start);
        fired[match ability {
            Ability::Bloodthirst => 0,
            Ability::Whirlwind => 1,
        }] += 1;
    }
    assert!(fired[0] > 0 && fired[1] > 0, "fired {fired:?}");
}

#[test]
fn run_state_invariants_hold_every_tick() {
    let snapshot = sample_fury_warrior().snapshot().expect("sample build");
    let config = SimulationConfig {
        sim_time: 300.0,
        ..SimulationConfig::default()
    };
    let base_attack_power = snapshot.special_stats.attack_power;

    for batch in 0..5 {
        let mut sim = Simulation::new(&snapshot, &config, Rng::for_batch(config.seed, batch));
        let mut ticks = 0;
        let mut saw_crusader = false;
        while !sim.is_finished() {
            let before = sim.time();
            let observation = sim.tick();
            ticks += 1;

            assert!(observation.dt > 0.0);
            assert!(observation.dt <= config.sim_time - before + 1e-12);
            assert!(observation.time > before);
            assert!((0.0..=100.0).contains(&observation.rage));
            assert!(observation.flurry_charges <= 3);

            let [mh, oh] = sim.crusader().timers();
            assert_eq!(observation.crusader_active, mh > 0.0 || oh > 0.0);
            let bonus = if observation.crusader_active { 200.0 } else { 0.0 };
            approx_eq(observation.attack_power, base_attack_power + bonus, 1e-9);
            saw_crusader |= observation.crusader_active;
        }
        assert!(ticks > 100);
        assert!(saw_crusader, "crusader should proc at least once in five minutes");
        approx_eq(sim.time(), config.sim_time, 1e-9);
    }
}

#[test]
fn seeded_runs_are_bit_identical_and_thread_independent() {
    let snapshot = sample_fury_warrior().snapshot().expect("sample build");
    let config = short_config(64);

    let first = simulate(&snapshot, &config).expect("first run");
    let second = simulate(&snapshot, &config).expect("second run");
    let parallel = simulate_parallel(&snapshot, &config).expect("parallel run");
    assert_eq!(first, second);
    assert_eq!(first, parallel);

    let reseeded = simulate(&snapshot, &SimulationConfig { seed: 8, ..config }).expect("reseeded");
    assert_ne!(first, reseeded);
}

#[test]
fn standard_error_shrinks_with_batch_count() {
    let snapshot = sample_fury_warrior().snapshot().expect("sample build");
    let small = simulate_parallel(&snapshot, &short_config(100)).expect("small run");
    let large = simulate_parallel(&snapshot, &short_config(1600)).expect("large run");

    // 16x the batches should cut the standard error by about 4x.
    let ratio = small.standard_error() / large.standard_error();
    assert!((2.5..6.5).contains(&ratio), "standard error ratio {ratio}");
    approx_eq(small.mean(), large.mean(), 4.0 * small.standard_error());
}

#[test]
fn sample_build_produces_plausible_dps() {
    let snapshot = sample_fury_warrior().snapshot().expect("sample build");
    let samples = simulate_parallel(&snapshot, &short_config(200)).expect("run");
    let summary = samples.summary();
    assert_eq!(summary.batches, 200);
    assert!(summary.mean_dps > 300.0 && summary.mean_dps < 3000.0, "{summary:?}");
    approx_eq(summary.confidence_95, 1.96 * summary.standard_error, 1e-12);

    let white = simulate_parallel(
        &snapshot,
        &SimulationConfig {
            toggles: FeatureToggles::none(),
            ..short_config(200)
        },
    )
    .expect("white hits run");
    assert!(white.mean() < samples.mean());
}

#[test]
fn building_a_table_twice_gives_the_same_table() {
    let stats = SpecialStats::new(27.5, 9.0, 1500.0);
    let first = HitTable::build(63, 305, &stats, AttackCategory::Basic);
    let second = HitTable::build(63, 305, &stats, AttackCategory::Basic);
    assert_eq!(first, second);
}

#[test]
#[should_panic(expected = "off-hand")]
fn off_hand_special_table_is_a_programming_error() {
    let _ = build_table(
        63,
        300,
        &SpecialStats::default(),
        Hand::OffHand,
        AttackCategory::Special,
    );
}

proptest! {
    #[test]
    fn thresholds_are_monotonic_and_bounded(
        level in 1i32..=100,
        skill in 1i32..=600,
        crit in -50.0f64..150.0,
        hit in -50.0f64..150.0,
        special in any::<bool>(),
    ) {
        let category = if special { AttackCategory::Special } else { AttackCategory::Basic };
        let table = HitTable::build(level, skill, &SpecialStats::new(crit, hit, 0.0), category);
        let thresholds = table.thresholds();
        prop_assert!(thresholds.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(thresholds.iter().all(|t| (0.0..=100.0).contains(t)));
    }

    #[test]
    fn every_roll_maps_to_a_defined_outcome(roll in 0.0f64..100.0, crit in 0.0f64..60.0) {
        let table = HitTable::build(63, 300, &SpecialStats::new(crit, 0.0, 0.0), AttackCategory::Basic);
        let outcome = table.resolve(100.0, roll);
        prop_assert!(outcome.damage >= 0.0 && outcome.damage <= 220.0);
    }
}
