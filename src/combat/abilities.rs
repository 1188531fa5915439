//! Ability rotation: cooldown-gated Bloodthirst and Whirlwind plus the rage-dumping Heroic Strike
//! swing upgrade.

use serde::Serialize;

use crate::combat::constants::{
    BLOODTHIRST_COOLDOWN, BLOODTHIRST_RAGE_COST, GLOBAL_COOLDOWN, HEROIC_STRIKE_QUEUE_THRESHOLD,
    HEROIC_STRIKE_RAGE_COST, WHIRLWIND_COOLDOWN, WHIRLWIND_RAGE_COST,
};
use crate::combat::rage::Rage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Bloodthirst,
    Whirlwind,
}

impl Ability {
    pub const fn rage_cost(self) -> f64 {
        match self {
            Self::Bloodthirst => BLOODTHIRST_RAGE_COST,
            Self::Whirlwind => WHIRLWIND_RAGE_COST,
        }
    }

    pub const fn cooldown(self) -> f64 {
        match self {
            Self::Bloodthirst => BLOODTHIRST_COOLDOWN,
            Self::Whirlwind => WHIRLWIND_COOLDOWN,
        }
    }
}

/// Cooldown counters and the queued Heroic Strike flag. A counter is ready at or below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    bloodthirst_cd: f64,
    whirlwind_cd: f64,
    global_cd: f64,
    heroic_strike_queued: bool,
}

impl Rotation {
    pub fn is_ready(&self, ability: Ability) -> bool {
        self.cooldown_of(ability) <= 0.0
    }

    pub fn global_ready(&self) -> bool {
        self.global_cd <= 0.0
    }

    pub fn cooldown_of(&self, ability: Ability) -> f64 {
        match ability {
            Ability::Bloodthirst => self.bloodthirst_cd,
            Ability::Whirlwind => self.whirlwind_cd,
        }
    }

    /// Highest-priority ability allowed to fire right now. Whirlwind only fills gaps while
    /// Bloodthirst is cooling down.
    pub fn ready_ability(&self, rage: Rage) -> Option<Ability> {
        if !self.global_ready() {
            return None;
        }
        if self.is_ready(Ability::Bloodthirst) && rage.at_least(Ability::Bloodthirst.rage_cost()) {
            return Some(Ability::Bloodthirst);
        }
        if self.is_ready(Ability::Whirlwind)
            && rage.at_least(Ability::Whirlwind.rage_cost())
            && !self.is_ready(Ability::Bloodthirst)
        {
            return Some(Ability::Whirlwind);
        }
        None
    }

    /// Start the ability's cooldown and the global cooldown, and pay its rage.
    pub fn commit(&mut self, ability: Ability, rage: &mut Rage) {
        rage.spend(ability.rage_cost());
        match ability {
            Ability::Bloodthirst => self.bloodthirst_cd = ability.cooldown(),
            Ability::Whirlwind => self.whirlwind_cd = ability.cooldown(),
        }
        self.global_cd = GLOBAL_COOLDOWN;
    }

    /// Latch the Heroic Strike flag once rage runs high. It stays set until a swing consumes it.
    pub fn queue_heroic_strike(&mut self, rage: Rage) {
        if rage.exceeds(HEROIC_STRIKE_QUEUE_THRESHOLD) {
            self.heroic_strike_queued = true;
        }
    }

    pub fn heroic_strike_queued(&self) -> bool {
        self.heroic_strike_queued
    }

    /// Consume the queued Heroic Strike if there is rage to pay for it.
    pub fn take_heroic_strike(&mut self, rage: &mut Rage) -> bool {
        if self.heroic_strike_queued && rage.exceeds(HEROIC_STRIKE_RAGE_COST) {
            self.heroic_strike_queued = false;
            rage.spend(HEROIC_STRIKE_RAGE_COST);
            true
        } else {
            false
        }
    }

    /// Pending countdowns, for choosing the next time step.
    pub fn timers(&self) -> [f64; 3] {
        [self.bloodthirst_cd, self.whirlwind_cd, self.global_cd]
    }

    pub fn advance(&mut self, dt: f64) {
        for cd in [
            &mut self.bloodthirst_cd,
            &mut self.whirlwind_cd,
            &mut self.global_cd,
        ] {
            *cd = (*cd - dt).max(0.0);
        }
    }
}
