pub mod abilities;
pub mod buffs;
pub mod constants;
pub mod engine;
pub mod hit_table;
pub mod rage;
pub mod rng;
pub mod samples;
pub mod weapon;

pub use abilities::{Ability, Rotation};
pub use buffs::{CrusaderBuff, Flurry};
pub use engine::{
    next_time_step, simulate, simulate_batch, simulate_parallel, CombatSnapshot, FeatureToggles,
    Simulation, SimulationConfig, StepObservation,
};
pub use hit_table::{
    build_table, hit_chances, AttackCategory, HitChances, HitOutcome, HitResult, HitTable,
    HitTables,
};
pub use rage::{rage_generation, Rage};
pub use rng::{batch_seed, RandomSource, Rng};
pub use samples::{add_standard_deviations, DamageSamples, DpsSummary};
pub use weapon::{Hand, WeaponProfile, WeaponState};
