//! Weapon runtime state: the internal swing timer and per-swing base damage.

use serde::{Deserialize, Serialize};

use crate::combat::constants::AP_DAMAGE_DIVISOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    MainHand,
    OffHand,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::MainHand, Hand::OffHand];

    pub const fn index(self) -> usize {
        match self {
            Self::MainHand => 0,
            Self::OffHand => 1,
        }
    }
}

/// Static description of a wielded weapon, as read from the character snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub swing_speed: f64,
    pub min_damage: f64,
    pub max_damage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponState {
    hand: Hand,
    swing_speed: f64,
    base_average_damage: f64,
    average_damage: f64,
    internal_swing_timer: f64,
}

impl WeaponState {
    /// Fresh runtime state. The swing timer starts empty, so the first swing lands on the first step.
    pub fn new(profile: &WeaponProfile, hand: Hand) -> Self {
        let base_average_damage = (profile.min_damage + profile.max_damage) / 2.0;
        Self {
            hand,
            swing_speed: profile.swing_speed,
            base_average_damage,
            average_damage: base_average_damage,
            internal_swing_timer: 0.0,
        }
    }

    pub fn compute_average_damage(&mut self, bonus_damage: f64) {
        self.average_damage = self.base_average_damage + bonus_damage;
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn swing_speed(&self) -> f64 {
        self.swing_speed
    }

    pub fn average_damage(&self) -> f64 {
        self.average_damage
    }

    /// Weapon-time left until the next swing completes.
    pub fn internal_swing_timer(&self) -> f64 {
        self.internal_swing_timer
    }

    /// Base damage of one swing at the given attack power.
    pub fn swing(&self, attack_power: f64) -> f64 {
        self.average_damage + attack_power * self.swing_speed / AP_DAMAGE_DIVISOR
    }

    /// Advance the swing timer by `elapsed` weapon-time. Returns the swing's base damage when the
    /// timer crosses zero; the overshoot carries into the next interval.
    pub fn step(&mut self, elapsed: f64, attack_power: f64) -> Option<f64> {
        self.internal_swing_timer -= elapsed;
        if self.internal_swing_timer < 0.0 {
            self.internal_swing_timer += self.swing_speed;
            Some(self.swing(attack_power))
        } else {
            None
        }
    }

    pub fn reset_timer(&mut self) {
        self.internal_swing_timer = self.swing_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> WeaponProfile {
        WeaponProfile {
            swing_speed: 2.7,
            min_damage: 100.0,
            max_damage: 200.0,
        }
    }

    #[test]
    fn first_step_swings_immediately_then_waits_full_interval() {
        let mut weapon = WeaponState::new(&profile(), Hand::MainHand);
        let first = weapon.step(1e-7, 0.0);
        assert_eq!(first, Some(150.0));
        assert!((weapon.internal_swing_timer() - (2.7 - 1e-7)).abs() < 1e-12);

        assert_eq!(weapon.step(1.0, 0.0), None);
        assert_eq!(weapon.step(1.0, 0.0), None);
        assert!(weapon.step(0.8, 0.0).is_some());
    }

    #[test]
    fn swing_damage_scales_with_attack_power_and_bonus() {
        let mut weapon = WeaponState::new(&profile(), Hand::OffHand);
        weapon.compute_average_damage(4.0);
        assert!((weapon.swing(1400.0) - (154.0 + 1400.0 * 2.7 / 14.0)).abs() < 1e-9);
        assert_eq!(weapon.hand(), Hand::OffHand);
    }

    #[test]
    fn reset_restores_full_interval() {
        let mut weapon = WeaponState::new(&profile(), Hand::MainHand);
        weapon.step(1.0, 0.0);
        weapon.reset_timer();
        assert_eq!(weapon.internal_swing_timer(), 2.7);
    }
}
