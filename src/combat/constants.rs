//! Combat rule constants. Every tunable number in the simulation rules lives here.

/// Rage gained per point of damage dealt by a basic hit (15/4 over the level 60 rage conversion value).
pub const RAGE_FACTOR: f64 = 15.0 / 4.0 / 230.6;
/// Hit factor base for rage generation, doubled for crits and for the main hand.
pub const RAGE_HIT_FACTOR: f64 = 1.75;
pub const MAX_RAGE: f64 = 100.0;

pub const CRIT_DAMAGE_MULTIPLIER: f64 = 2.2;
/// Flat crit suppression applied by the target's aura.
pub const CRIT_AURA_CORRECTION: f64 = 1.8;
pub const GLANCING_CHANCE: f64 = 40.0;
pub const BASE_WEAPON_SKILL: i32 = 300;
pub const DEFENSE_PER_LEVEL: i32 = 5;
pub const MAX_OPPONENT_LEVEL: i32 = 255;
pub const MAX_WEAPON_SKILL: i32 = 1000;

/// Attack power contributes `ap * swing_speed / AP_DAMAGE_DIVISOR` to a swing.
pub const AP_DAMAGE_DIVISOR: f64 = 14.0;

pub const BLOODTHIRST_AP_COEFFICIENT: f64 = 0.45;
pub const BLOODTHIRST_RAGE_COST: f64 = 30.0;
pub const BLOODTHIRST_COOLDOWN: f64 = 6.0;
pub const WHIRLWIND_RAGE_COST: f64 = 25.0;
pub const WHIRLWIND_COOLDOWN: f64 = 10.0;
pub const GLOBAL_COOLDOWN: f64 = 1.0;
pub const HEROIC_STRIKE_BONUS_DAMAGE: f64 = 157.0;
pub const HEROIC_STRIKE_RAGE_COST: f64 = 13.0;
/// Heroic strike gets queued once rage exceeds this.
pub const HEROIC_STRIKE_QUEUE_THRESHOLD: f64 = 75.0;

pub const FLURRY_CHARGES: u8 = 3;
pub const FLURRY_SPEED_MULTIPLIER: f64 = 1.3;
pub const UNBRIDLED_WRATH_RAGE: f64 = 1.0;

/// Crusader proc chance per swing is `swing_speed / CRUSADER_PROC_DIVISOR`.
pub const CRUSADER_PROC_DIVISOR: f64 = 40.0;
pub const CRUSADER_DURATION: f64 = 15.0;
pub const CRUSADER_ATTACK_POWER: f64 = 200.0;

pub const MAX_TIME_STEP: f64 = 1.0;
/// Added to every step so a timer sitting exactly on zero still crosses it.
pub const TIME_STEP_EPSILON: f64 = 1e-7;
