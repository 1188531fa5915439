//! Timed and charge-based buffs: the crusader attack power proc and flurry.

use crate::combat::constants::{
    CRUSADER_ATTACK_POWER, CRUSADER_DURATION, FLURRY_CHARGES, FLURRY_SPEED_MULTIPLIER,
};
use crate::combat::weapon::Hand;

/// Attack power proc with one independent countdown per hand.
///
/// The bonus is applied once when either timer starts and removed once both timers have reached
/// zero. `active` latches the applied state so the bonus is never added or removed twice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrusaderBuff {
    timers: [f64; 2],
    active: bool,
}

impl CrusaderBuff {
    /// Start (or restart) the hand's timer. Returns the attack power to add, if the bonus
    /// was not already applied.
    pub fn trigger(&mut self, hand: Hand) -> Option<f64> {
        self.timers[hand.index()] = CRUSADER_DURATION;
        if self.active {
            None
        } else {
            self.active = true;
            Some(CRUSADER_ATTACK_POWER)
        }
    }

    /// Count both timers down. Returns the attack power to remove when the bonus expires.
    pub fn advance(&mut self, dt: f64) -> Option<f64> {
        for timer in &mut self.timers {
            *timer = (*timer - dt).max(0.0);
        }
        if self.active && self.timers.iter().all(|timer| *timer <= 0.0) {
            self.active = false;
            Some(CRUSADER_ATTACK_POWER)
        } else {
            None
        }
    }

    pub fn timer(&self, hand: Hand) -> f64 {
        self.timers[hand.index()]
    }

    pub fn timers(&self) -> [f64; 2] {
        self.timers
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Swing speed buff refreshed to full charges by a critical hit and drained by landed swings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flurry {
    charges: u8,
}

impl Flurry {
    pub fn charges(self) -> u8 {
        self.charges
    }

    pub fn trigger(&mut self) {
        self.charges = FLURRY_CHARGES;
    }

    pub fn consume(&mut self) {
        self.charges = self.charges.saturating_sub(1);
    }

    /// Multiplier applied to weapon time while charges remain.
    pub fn speed_factor(self) -> f64 {
        if self.charges > 0 {
            FLURRY_SPEED_MULTIPLIER
        } else {
            1.0
        }
    }
}
