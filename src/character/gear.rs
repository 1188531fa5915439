//! Equipment, enchants and consumable buffs as read from build files.

use serde::{Deserialize, Serialize};

use crate::character::stats::{SpecialStats, Stats};
use crate::combat::WeaponProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Sword,
    Mace,
    Axe,
    Dagger,
    Fist,
    /// Applies to every weapon type.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraSkill {
    pub skill: SkillType,
    pub amount: i32,
}

impl ExtraSkill {
    pub const fn new(skill: SkillType, amount: i32) -> Self {
        Self { skill, amount }
    }

    pub fn applies_to(&self, weapon_type: SkillType) -> bool {
        self.skill == weapon_type || self.skill == SkillType::All
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSocket {
    Head,
    Neck,
    Shoulder,
    Back,
    Chest,
    Wrist,
    Hands,
    Belt,
    Legs,
    Boots,
    Ring,
    Trinket,
    Ranged,
}

impl ArmorSocket {
    /// How many items may occupy this socket at once.
    pub const fn capacity(self) -> usize {
        match self {
            Self::Ring | Self::Trinket => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub socket: ArmorSocket,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub special_stats: SpecialStats,
    #[serde(default)]
    pub chance_for_extra_hit: f64,
    #[serde(default)]
    pub bonus_skill: Option<ExtraSkill>,
}

impl Armor {
    pub fn new(
        name: impl Into<String>,
        socket: ArmorSocket,
        stats: Stats,
        special_stats: SpecialStats,
    ) -> Self {
        Self {
            name: name.into(),
            socket,
            stats,
            special_stats,
            chance_for_extra_hit: 0.0,
            bonus_skill: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSocket {
    MainHand,
    OffHand,
    #[default]
    OneHand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponItem {
    pub name: String,
    pub swing_speed: f64,
    pub min_damage: f64,
    pub max_damage: f64,
    pub weapon_type: SkillType,
    #[serde(default)]
    pub socket: WeaponSocket,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub special_stats: SpecialStats,
    #[serde(default)]
    pub chance_for_extra_hit: f64,
    #[serde(default)]
    pub bonus_skill: Option<ExtraSkill>,
}

impl WeaponItem {
    pub fn new(
        name: impl Into<String>,
        swing_speed: f64,
        min_damage: f64,
        max_damage: f64,
        weapon_type: SkillType,
    ) -> Self {
        Self {
            name: name.into(),
            swing_speed,
            min_damage,
            max_damage,
            weapon_type,
            socket: WeaponSocket::OneHand,
            stats: Stats::default(),
            special_stats: SpecialStats::default(),
            chance_for_extra_hit: 0.0,
            bonus_skill: None,
        }
    }

    pub fn profile(&self) -> WeaponProfile {
        WeaponProfile {
            swing_speed: self.swing_speed,
            min_damage: self.min_damage,
            max_damage: self.max_damage,
        }
    }
}

fn unit_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enchant {
    pub name: String,
    #[serde(default)]
    pub stats: Stats,
    /// Weapon-time multiplier; 1.01 is 1 % haste.
    #[serde(default = "unit_multiplier")]
    pub haste: f64,
    #[serde(default)]
    pub crusader_mh: bool,
    #[serde(default)]
    pub crusader_oh: bool,
}

impl Enchant {
    pub fn with_stats(name: impl Into<String>, stats: Stats) -> Self {
        Self {
            name: name.into(),
            stats,
            haste: 1.0,
            crusader_mh: false,
            crusader_oh: false,
        }
    }

    pub fn crusader(name: impl Into<String>, main_hand: bool) -> Self {
        Self {
            name: name.into(),
            stats: Stats::default(),
            haste: 1.0,
            crusader_mh: main_hand,
            crusader_oh: !main_hand,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub name: String,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub special_stats: SpecialStats,
    #[serde(default = "unit_multiplier")]
    pub stat_multiplier: f64,
    #[serde(default)]
    pub mh_bonus_damage: f64,
    #[serde(default)]
    pub oh_bonus_damage: f64,
}

impl Buff {
    pub fn new(name: impl Into<String>, stats: Stats, special_stats: SpecialStats) -> Self {
        Self {
            name: name.into(),
            stats,
            special_stats,
            stat_multiplier: 1.0,
            mh_bonus_damage: 0.0,
            oh_bonus_damage: 0.0,
        }
    }
}
