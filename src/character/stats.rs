use std::ops::{Add, AddAssign, Mul, MulAssign};

use serde::{Deserialize, Serialize};

/// Strength needed for one point of attack power is 0.5.
pub const ATTACK_POWER_PER_STRENGTH: f64 = 2.0;
pub const AGILITY_PER_CRIT_PERCENT: f64 = 20.0;

/// Primary attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub strength: f64,
    #[serde(default)]
    pub agility: f64,
}

/// Combat-facing attributes. `critical_strike` and `hit` are percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialStats {
    #[serde(default)]
    pub critical_strike: f64,
    #[serde(default)]
    pub hit: f64,
    #[serde(default)]
    pub attack_power: f64,
}

impl Stats {
    pub const fn new(strength: f64, agility: f64) -> Self {
        Self { strength, agility }
    }

    pub fn to_special_stats(self) -> SpecialStats {
        SpecialStats {
            critical_strike: self.agility / AGILITY_PER_CRIT_PERCENT,
            hit: 0.0,
            attack_power: self.strength * ATTACK_POWER_PER_STRENGTH,
        }
    }
}

impl SpecialStats {
    pub const fn new(critical_strike: f64, hit: f64, attack_power: f64) -> Self {
        Self {
            critical_strike,
            hit,
            attack_power,
        }
    }
}

impl Add for Stats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            strength: self.strength + rhs.strength,
            agility: self.agility + rhs.agility,
        }
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Stats {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            strength: self.strength * rhs,
            agility: self.agility * rhs,
        }
    }
}

impl MulAssign<f64> for Stats {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl Add for SpecialStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            critical_strike: self.critical_strike + rhs.critical_strike,
            hit: self.hit + rhs.hit,
            attack_power: self.attack_power + rhs.attack_power,
        }
    }
}

impl AddAssign for SpecialStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
