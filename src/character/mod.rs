//! Character build: race, gear, enchants and buffs aggregated into the totals the simulator reads.

pub mod gear;
pub mod presets;
pub mod stats;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use gear::{
    Armor, ArmorSocket, Buff, Enchant, ExtraSkill, SkillType, WeaponItem, WeaponSocket,
};
pub use presets::sample_fury_warrior;
pub use stats::{SpecialStats, Stats};

use crate::combat::constants::BASE_WEAPON_SKILL;
use crate::combat::{CombatSnapshot, Hand};
use crate::error::SimulationError;

/// Battle shout attack power granted by the fury talent build.
const FURY_ATTACK_POWER: f64 = 241.0;
/// Cruelty plus axe specialization style crit from the fury talent build.
const FURY_CRIT: f64 = 5.0 + 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    Human,
    Dwarf,
    NightElf,
    Gnome,
}

impl Race {
    pub const fn base_stats(self) -> Stats {
        match self {
            Self::Human => Stats::new(120.0, 80.0),
            Self::Dwarf => Stats::new(122.0, 76.0),
            Self::NightElf => Stats::new(117.0, 85.0),
            Self::Gnome => Stats::new(115.0, 83.0),
        }
    }

    pub const fn base_special_stats(self) -> SpecialStats {
        SpecialStats::new(0.0, 0.0, 160.0)
    }

    pub fn racial_skills(self) -> Vec<ExtraSkill> {
        match self {
            Self::Human => vec![
                ExtraSkill::new(SkillType::Sword, 5),
                ExtraSkill::new(SkillType::Mace, 5),
            ],
            Self::Dwarf | Self::NightElf | Self::Gnome => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Talent {
    #[default]
    None,
    Fury,
}

/// Offsets layered on top of the build, used by stat weight experiments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Perturbation {
    pub stats: Stats,
    pub special_stats: SpecialStats,
    /// Additional haste in percent.
    pub haste_percent: f64,
    pub weapon_skill: f64,
    pub chance_for_extra_hit: f64,
}

/// Aggregated totals of a build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterTotals {
    pub stats: Stats,
    pub special_stats: SpecialStats,
    pub haste: f64,
    pub chance_for_extra_hit: f64,
    pub crusader_mh: bool,
    pub crusader_oh: bool,
    pub mh_bonus_damage: f64,
    pub oh_bonus_damage: f64,
    pub weapon_skill_mh: i32,
    pub weapon_skill_oh: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub race: Race,
    #[serde(default)]
    pub talent: Talent,
    #[serde(default)]
    pub armor: Vec<Armor>,
    /// Main hand first, off hand second.
    #[serde(default)]
    pub weapons: Vec<WeaponItem>,
    #[serde(default)]
    pub enchants: Vec<Enchant>,
    #[serde(default)]
    pub buffs: Vec<Buff>,
    #[serde(skip)]
    perturbation: Perturbation,
}

impl Character {
    pub fn new(race: Race) -> Self {
        Self {
            race,
            talent: Talent::None,
            armor: Vec::new(),
            weapons: Vec::new(),
            enchants: Vec::new(),
            buffs: Vec::new(),
            perturbation: Perturbation::default(),
        }
    }

    pub fn with_talent(mut self, talent: Talent) -> Self {
        self.talent = talent;
        self
    }

    pub fn equip_armor(&mut self, armor: Armor) -> &mut Self {
        self.armor.push(armor);
        self
    }

    pub fn equip_weapon(&mut self, weapon: WeaponItem) -> &mut Self {
        self.weapons.push(weapon);
        self
    }

    pub fn add_enchant(&mut self, enchant: Enchant) -> &mut Self {
        self.enchants.push(enchant);
        self
    }

    pub fn add_buff(&mut self, buff: Buff) -> &mut Self {
        self.buffs.push(buff);
        self
    }

    pub fn perturbation(&self) -> &Perturbation {
        &self.perturbation
    }

    pub fn perturbation_mut(&mut self) -> &mut Perturbation {
        &mut self.perturbation
    }

    /// Sum every source of stats. Primary stats are scaled by the buff multipliers before being
    /// converted into attack power and crit.
    pub fn compute_all_stats(&self) -> CharacterTotals {
        let mut stats = self.race.base_stats() + self.perturbation.stats;
        let mut special_stats = self.race.base_special_stats() + self.perturbation.special_stats;
        let mut haste = 1.0 + self.perturbation.haste_percent / 100.0;
        let mut chance_for_extra_hit = self.perturbation.chance_for_extra_hit;
        let mut crusader_mh = false;
        let mut crusader_oh = false;
        let mut stat_multiplier = 1.0;
        let mut mh_bonus_damage = 0.0;
        let mut oh_bonus_damage = 0.0;

        for armor in &self.armor {
            stats += armor.stats;
            special_stats += armor.special_stats;
            chance_for_extra_hit += armor.chance_for_extra_hit;
        }
        for weapon in &self.weapons {
            stats += weapon.stats;
            special_stats += weapon.special_stats;
            chance_for_extra_hit += weapon.chance_for_extra_hit;
        }
        for enchant in &self.enchants {
            stats += enchant.stats;
            haste *= enchant.haste;
            crusader_mh |= enchant.crusader_mh;
            crusader_oh |= enchant.crusader_oh;
        }
        for buff in &self.buffs {
            stats += buff.stats;
            special_stats += buff.special_stats;
            stat_multiplier *= buff.stat_multiplier;
            mh_bonus_damage += buff.mh_bonus_damage;
            oh_bonus_damage += buff.oh_bonus_damage;
        }
        if self.talent == Talent::Fury {
            special_stats.attack_power += FURY_ATTACK_POWER;
            special_stats.critical_strike += FURY_CRIT;
        }

        stats *= stat_multiplier;
        special_stats += stats.to_special_stats();

        CharacterTotals {
            stats,
            special_stats,
            haste,
            chance_for_extra_hit,
            crusader_mh,
            crusader_oh,
            mh_bonus_damage,
            oh_bonus_damage,
            weapon_skill_mh: self.weapon_skill(Hand::MainHand),
            weapon_skill_oh: self.weapon_skill(Hand::OffHand),
        }
    }

    /// 300 plus every racial and gear skill bonus matching the hand's weapon type.
    pub fn weapon_skill(&self, hand: Hand) -> i32 {
        let Some(weapon) = self.weapons.get(hand.index()) else {
            return BASE_WEAPON_SKILL;
        };
        let bonus: i32 = self
            .race
            .racial_skills()
            .into_iter()
            .chain(self.armor.iter().filter_map(|armor| armor.bonus_skill))
            .chain(self.weapons.iter().filter_map(|weapon| weapon.bonus_skill))
            .filter(|skill| skill.applies_to(weapon.weapon_type))
            .map(|skill| skill.amount)
            .sum();
        BASE_WEAPON_SKILL
            .saturating_add(bonus)
            .saturating_add(self.perturbation.weapon_skill.round() as i32)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        self.validate_weapons()?;
        self.validate_armor()
    }

    fn validate_weapons(&self) -> Result<(), SimulationError> {
        if self.weapons.len() != 2 {
            return Err(SimulationError::WeaponCount {
                found: self.weapons.len(),
            });
        }
        if self.weapons[0].socket == WeaponSocket::OffHand {
            return Err(SimulationError::InvalidWeapon {
                hand: Hand::MainHand,
                reason: format!("'{}' is an off-hand weapon", self.weapons[0].name),
            });
        }
        if self.weapons[1].socket == WeaponSocket::MainHand {
            return Err(SimulationError::InvalidWeapon {
                hand: Hand::OffHand,
                reason: format!("'{}' is a main-hand weapon", self.weapons[1].name),
            });
        }
        Ok(())
    }

    fn validate_armor(&self) -> Result<(), SimulationError> {
        let mut occupied: BTreeMap<ArmorSocket, usize> = BTreeMap::new();
        for armor in &self.armor {
            let count = occupied.entry(armor.socket).or_default();
            *count += 1;
            if *count > armor.socket.capacity() {
                return Err(SimulationError::InvalidArmor(format!(
                    "extra copy of {:?} ('{}')",
                    armor.socket, armor.name
                )));
            }
        }
        Ok(())
    }

    /// Validate the build and take the immutable snapshot the simulator reads.
    pub fn snapshot(&self) -> Result<CombatSnapshot, SimulationError> {
        self.validate()?;
        let totals = self.compute_all_stats();
        let snapshot = CombatSnapshot {
            special_stats: totals.special_stats,
            main_hand: self.weapons[Hand::MainHand.index()].profile(),
            off_hand: self.weapons[Hand::OffHand.index()].profile(),
            haste: totals.haste,
            chance_for_extra_hit: totals.chance_for_extra_hit,
            crusader_mh: totals.crusader_mh,
            crusader_oh: totals.crusader_oh,
            mh_bonus_damage: totals.mh_bonus_damage,
            oh_bonus_damage: totals.oh_bonus_damage,
            weapon_skill_mh: totals.weapon_skill_mh,
            weapon_skill_oh: totals.weapon_skill_oh,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swords() -> (WeaponItem, WeaponItem) {
        (
            WeaponItem::new("Main", 2.6, 80.0, 150.0, SkillType::Sword),
            WeaponItem::new("Off", 1.8, 50.0, 90.0, SkillType::Sword),
        )
    }

    #[test]
    fn naked_human_totals_come_from_race_only() {
        let totals = Character::new(Race::Human).compute_all_stats();
        assert_eq!(totals.stats, Stats::new(120.0, 80.0));
        assert_eq!(totals.special_stats.attack_power, 160.0 + 240.0);
        assert_eq!(totals.special_stats.critical_strike, 4.0);
        assert_eq!(totals.haste, 1.0);
    }

    #[test]
    fn fury_talent_adds_battle_shout_and_crit() {
        let totals = Character::new(Race::Human)
            .with_talent(Talent::Fury)
            .compute_all_stats();
        assert_eq!(totals.special_stats.attack_power, 641.0);
        assert_eq!(totals.special_stats.critical_strike, 12.0);
    }

    #[test]
    fn stat_multiplier_scales_primary_stats_before_conversion() {
        let mut character = Character::new(Race::Gnome);
        character.add_buff(Buff {
            stat_multiplier: 1.1,
            ..Buff::new("Kings", Stats::default(), SpecialStats::default())
        });
        let totals = character.compute_all_stats();
        assert!((totals.stats.strength - 126.5).abs() < 1e-9);
        assert!((totals.special_stats.attack_power - (160.0 + 253.0)).abs() < 1e-9);
    }

    #[test]
    fn human_sword_skill_includes_racial_bonus() {
        let (main, off) = swords();
        let mut character = Character::new(Race::Human);
        character.equip_weapon(main).equip_weapon(off);
        assert_eq!(character.weapon_skill(Hand::MainHand), 305);
        assert_eq!(character.weapon_skill(Hand::OffHand), 305);

        let mut dwarf = Character::new(Race::Dwarf);
        let (main, off) = swords();
        dwarf.equip_weapon(main).equip_weapon(off);
        assert_eq!(dwarf.weapon_skill(Hand::MainHand), 300);
    }

    #[test]
    fn enchants_combine_haste_and_crusader_flags() {
        let mut character = Character::new(Race::NightElf);
        character
            .add_enchant(Enchant::crusader("Crusader MH", true))
            .add_enchant(Enchant {
                haste: 1.01,
                ..Enchant::with_stats("Haste", Stats::default())
            });
        let totals = character.compute_all_stats();
        assert!(totals.crusader_mh);
        assert!(!totals.crusader_oh);
        assert!((totals.haste - 1.01).abs() < 1e-12);
    }

    #[test]
    fn snapshot_rejects_missing_weapons() {
        let character = Character::new(Race::Human);
        assert_eq!(
            character.snapshot(),
            Err(SimulationError::WeaponCount { found: 0 })
        );
    }

    #[test]
    fn snapshot_rejects_swapped_hand_weapons() {
        let (mut main, off) = swords();
        main.socket = WeaponSocket::OffHand;
        let mut character = Character::new(Race::Human);
        character.equip_weapon(main).equip_weapon(off);
        assert!(matches!(
            character.snapshot(),
            Err(SimulationError::InvalidWeapon {
                hand: Hand::MainHand,
                ..
            })
        ));
    }

    #[test]
    fn armor_allows_two_rings_but_not_three() {
        let ring = |name: &str| {
            Armor::new(name, ArmorSocket::Ring, Stats::default(), SpecialStats::default())
        };
        let (main, off) = swords();
        let mut character = Character::new(Race::Human);
        character
            .equip_weapon(main)
            .equip_weapon(off)
            .equip_armor(ring("A"))
            .equip_armor(ring("B"));
        assert!(character.validate().is_ok());
        character.equip_armor(ring("C"));
        assert!(matches!(
            character.validate(),
            Err(SimulationError::InvalidArmor(_))
        ));
    }

    #[test]
    fn perturbation_feeds_into_totals() {
        let mut character = Character::new(Race::Human);
        character.perturbation_mut().stats.strength += 10.0;
        character.perturbation_mut().special_stats.hit += 1.0;
        let totals = character.compute_all_stats();
        assert_eq!(totals.special_stats.attack_power, 160.0 + 260.0);
        assert_eq!(totals.special_stats.hit, 1.0);
    }
}
