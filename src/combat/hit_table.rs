//! Hit outcome model: cumulative outcome thresholds per hand and attack category, and the
//! inverse-CDF lookup that turns a [0, 100) roll into an outcome.

use serde::Serialize;

use crate::character::SpecialStats;
use crate::combat::constants::{
    BASE_WEAPON_SKILL, CRIT_AURA_CORRECTION, CRIT_DAMAGE_MULTIPLIER, DEFENSE_PER_LEVEL,
    GLANCING_CHANCE,
};
use crate::combat::weapon::Hand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitResult {
    Miss,
    Dodge,
    Glancing,
    Crit,
    Hit,
}

impl HitResult {
    /// True for every outcome that connects with the target.
    pub const fn is_landed(self) -> bool {
        !matches!(self, Self::Miss | Self::Dodge)
    }
}

/// White (auto-attack) versus yellow (ability) attacks. Only basic attacks can glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackCategory {
    Basic,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    pub damage: f64,
    pub result: HitResult,
}

/// Per-outcome chances in percent, before accumulation. Values may be negative for extreme
/// skill/hit inputs; [HitTable::build] clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitChances {
    pub miss: f64,
    pub dodge: f64,
    pub glancing: f64,
    pub crit: f64,
    /// Percent of damage removed from a glancing blow.
    pub glancing_penalty: f64,
}

const BASIC_ORDER: [HitResult; 4] = [
    HitResult::Miss,
    HitResult::Dodge,
    HitResult::Glancing,
    HitResult::Crit,
];
const SPECIAL_ORDER: [HitResult; 3] = [HitResult::Miss, HitResult::Dodge, HitResult::Crit];

/// Closed-form outcome chances for a dual-wielding attacker.
pub fn hit_chances(opponent_level: i32, weapon_skill: i32, stats: &SpecialStats) -> HitChances {
    let target_defense = opponent_level.saturating_mul(DEFENSE_PER_LEVEL);
    let skill_diff = target_defense.saturating_sub(weapon_skill);
    let base_skill_diff = target_defense.saturating_sub(BASE_WEAPON_SKILL);
    let skill_diff_f = f64::from(skill_diff);

    let crit = stats.critical_strike - f64::from(base_skill_diff) * 0.2 - CRIT_AURA_CORRECTION;

    let base_miss = if skill_diff > 10 {
        5.0 + skill_diff_f * 0.2 + 1.0
    } else {
        5.0 + skill_diff_f * 0.1
    };
    let dual_wield_miss = base_miss * 0.8 + 20.0;
    let miss = dual_wield_miss - stats.hit;

    let dodge = 5.0 + skill_diff_f * 0.1;

    let glancing_penalty = if skill_diff > 8 {
        35.0 - (15.0 - skill_diff_f) * 4.0
    } else {
        5.0
    };

    HitChances {
        miss,
        dodge,
        glancing: GLANCING_CHANCE,
        crit,
        glancing_penalty,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitTable {
    category: AttackCategory,
    thresholds: Vec<f64>,
    glancing_penalty: f64,
}

impl HitTable {
    /// Build the cumulative table. Negative component chances count as zero and the running sum
    /// is capped at 100, so thresholds are always non-decreasing within [0, 100].
    pub fn build(
        opponent_level: i32,
        weapon_skill: i32,
        stats: &SpecialStats,
        category: AttackCategory,
    ) -> Self {
        let chances = hit_chances(opponent_level, weapon_skill, stats);
        let components: &[f64] = match category {
            AttackCategory::Basic => &[chances.miss, chances.dodge, chances.glancing, chances.crit],
            AttackCategory::Special => &[chances.miss, chances.dodge, chances.crit],
        };

        let mut running = 0.0_f64;
        let thresholds = components
            .iter()
            .map(|chance| {
                running = (running + chance.max(0.0)).min(100.0);
                running
            })
            .collect();

        Self {
            category,
            thresholds,
            glancing_penalty: chances.glancing_penalty,
        }
    }

    pub fn category(&self) -> AttackCategory {
        self.category
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn glancing_penalty(&self) -> f64 {
        self.glancing_penalty
    }

    /// Index of the first threshold that is >= `roll`; one past the end means a plain hit.
    pub fn outcome_index(&self, roll: f64) -> usize {
        self.thresholds.partition_point(|threshold| *threshold < roll)
    }

    pub fn result_for_index(&self, index: usize) -> HitResult {
        let order: &[HitResult] = match self.category {
            AttackCategory::Basic => &BASIC_ORDER,
            AttackCategory::Special => &SPECIAL_ORDER,
        };
        match index.cmp(&order.len()) {
            std::cmp::Ordering::Less => order[index],
            std::cmp::Ordering::Equal => HitResult::Hit,
            std::cmp::Ordering::Greater => {
                panic!("outcome index {index} outside {:?} hit table", self.category)
            }
        }
    }

    /// Resolve one attack of `base_damage` against a [0, 100) roll.
    pub fn resolve(&self, base_damage: f64, roll: f64) -> HitOutcome {
        let result = self.result_for_index(self.outcome_index(roll));
        let damage = match result {
            HitResult::Miss | HitResult::Dodge => 0.0,
            HitResult::Glancing => base_damage * (100.0 - self.glancing_penalty) / 100.0,
            HitResult::Crit => base_damage * CRIT_DAMAGE_MULTIPLIER,
            HitResult::Hit => base_damage,
        };
        HitOutcome { damage, result }
    }
}

/// Build the table for one hand and category. The off hand never performs special attacks;
/// asking for that table is a programming error.
pub fn build_table(
    opponent_level: i32,
    weapon_skill: i32,
    stats: &SpecialStats,
    hand: Hand,
    category: AttackCategory,
) -> HitTable {
    if hand == Hand::OffHand && category == AttackCategory::Special {
        panic!("off-hand has no special attack table");
    }
    HitTable::build(opponent_level, weapon_skill, stats, category)
}

/// Every table one batch needs, built once from the batch's stat snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTables {
    main_basic: HitTable,
    main_special: HitTable,
    off_basic: HitTable,
}

impl HitTables {
    pub fn build(
        opponent_level: i32,
        weapon_skill_mh: i32,
        weapon_skill_oh: i32,
        stats: &SpecialStats,
    ) -> Self {
        Self {
            main_basic: build_table(
                opponent_level,
                weapon_skill_mh,
                stats,
                Hand::MainHand,
                AttackCategory::Basic,
            ),
            main_special: build_table(
                opponent_level,
                weapon_skill_mh,
                stats,
                Hand::MainHand,
                AttackCategory::Special,
            ),
            off_basic: build_table(
                opponent_level,
                weapon_skill_oh,
                stats,
                Hand::OffHand,
                AttackCategory::Basic,
            ),
        }
    }

    pub fn table(&self, hand: Hand, category: AttackCategory) -> &HitTable {
        match (hand, category) {
            (Hand::MainHand, AttackCategory::Basic) => &self.main_basic,
            (Hand::MainHand, AttackCategory::Special) => &self.main_special,
            (Hand::OffHand, AttackCategory::Basic) => &self.off_basic,
            (Hand::OffHand, AttackCategory::Special) => {
                panic!("off-hand has no special attack table")
            }
        }
    }
}
