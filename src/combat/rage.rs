use crate::combat::constants::{MAX_RAGE, RAGE_FACTOR, RAGE_HIT_FACTOR};
use crate::combat::weapon::Hand;

/// Rage gained from a landed basic hit.
pub fn rage_generation(damage: f64, swing_speed: f64, crit: bool, hand: Hand) -> f64 {
    let crit_factor = if crit { 2.0 } else { 1.0 };
    let hand_factor = if hand == Hand::MainHand { 2.0 } else { 1.0 };
    let hit_factor = RAGE_HIT_FACTOR * crit_factor * hand_factor;
    damage * RAGE_FACTOR + hit_factor * swing_speed / 2.0
}

/// Rage pool, kept within [0, 100] by every mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rage(f64);

impl Rage {
    pub fn current(self) -> f64 {
        self.0
    }

    pub fn gain(&mut self, amount: f64) {
        self.0 = (self.0 + amount).clamp(0.0, MAX_RAGE);
    }

    pub fn spend(&mut self, amount: f64) {
        self.0 = (self.0 - amount).max(0.0);
    }

    pub fn at_least(self, amount: f64) -> bool {
        self.0 >= amount
    }

    pub fn exceeds(self, amount: f64) -> bool {
        self.0 > amount
    }
}
