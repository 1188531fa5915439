use crate::character::gear::{
    Armor, ArmorSocket, Buff, Enchant, SkillType, WeaponItem, WeaponSocket,
};
use crate::character::stats::{SpecialStats, Stats};
use crate::character::{Character, Race, Talent};

/// Human dual-wield sword fury warrior in pre-raid best-in-slot gear with world buffs.
/// Used when no build file is given and as a fixture in tests and benches.
pub fn sample_fury_warrior() -> Character {
    let mut character = Character::new(Race::Human).with_talent(Talent::Fury);

    let armor = [
        ("Lionheart Helm", ArmorSocket::Head, Stats::new(18.0, 0.0), SpecialStats::new(2.0, 2.0, 0.0)),
        ("Onyxia Tooth Pendant", ArmorSocket::Neck, Stats::new(0.0, 12.0), SpecialStats::new(1.0, 1.0, 0.0)),
        ("Truestrike Shoulders", ArmorSocket::Shoulder, Stats::default(), SpecialStats::new(0.0, 2.0, 24.0)),
        ("Cape of the Black Baron", ArmorSocket::Back, Stats::new(0.0, 15.0), SpecialStats::new(0.0, 0.0, 20.0)),
        ("Savage Gladiator Chain", ArmorSocket::Chest, Stats::new(13.0, 14.0), SpecialStats::new(2.0, 0.0, 0.0)),
        ("Wristguards of Stability", ArmorSocket::Wrist, Stats::new(24.0, 0.0), SpecialStats::default()),
        ("Devilsaur Gauntlets", ArmorSocket::Hands, Stats::default(), SpecialStats::new(1.0, 0.0, 28.0)),
        ("Onslaught Girdle", ArmorSocket::Belt, Stats::new(31.0, 0.0), SpecialStats::new(1.0, 1.0, 0.0)),
        ("Devilsaur Leggings", ArmorSocket::Legs, Stats::default(), SpecialStats::new(1.0, 0.0, 46.0)),
        ("Battlechaser's Greaves", ArmorSocket::Boots, Stats::new(14.0, 13.0), SpecialStats::default()),
        ("Don Julio's Band", ArmorSocket::Ring, Stats::default(), SpecialStats::new(1.0, 1.0, 16.0)),
        ("Magni's Will", ArmorSocket::Ring, Stats::new(6.0, 0.0), SpecialStats::new(1.0, 0.0, 0.0)),
        ("Blackhand's Breadth", ArmorSocket::Trinket, Stats::default(), SpecialStats::new(2.0, 0.0, 0.0)),
    ];
    for (name, socket, stats, special_stats) in armor {
        character.equip_armor(Armor::new(name, socket, stats, special_stats));
    }
    character.equip_armor(Armor {
        chance_for_extra_hit: 2.0,
        ..Armor::new(
            "Hand of Justice",
            ArmorSocket::Trinket,
            Stats::default(),
            SpecialStats::new(0.0, 0.0, 20.0),
        )
    });

    character
        .equip_weapon(WeaponItem {
            socket: WeaponSocket::MainHand,
            special_stats: SpecialStats::new(1.0, 0.0, 0.0),
            stats: Stats::new(0.0, 9.0),
            ..WeaponItem::new("Brutality Blade", 2.5, 90.0, 168.0, SkillType::Sword)
        })
        .equip_weapon(WeaponItem {
            stats: Stats::new(9.0, 9.0),
            ..WeaponItem::new("Mirah's Song", 1.8, 57.0, 87.0, SkillType::Sword)
        });

    character
        .add_enchant(Enchant::crusader("Crusader (main hand)", true))
        .add_enchant(Enchant::crusader("Crusader (off hand)", false))
        .add_enchant(Enchant::with_stats("Agility (gloves)", Stats::new(0.0, 7.0)))
        .add_enchant(Enchant::with_stats("Strength (bracers)", Stats::new(9.0, 0.0)));

    character
        .add_buff(Buff::new("Mark of the Wild", Stats::new(12.0, 12.0), SpecialStats::default()))
        .add_buff(Buff::new("Juju Power", Stats::new(30.0, 0.0), SpecialStats::default()))
        .add_buff(Buff::new("Blessing of Might", Stats::default(), SpecialStats::new(0.0, 0.0, 185.0)))
        .add_buff(Buff::new("Rallying Cry", Stats::default(), SpecialStats::new(5.0, 0.0, 140.0)))
        .add_buff(Buff {
            stat_multiplier: 1.1,
            ..Buff::new("Blessing of Kings", Stats::default(), SpecialStats::default())
        })
        .add_buff(Buff {
            mh_bonus_damage: 8.0,
            oh_bonus_damage: 8.0,
            ..Buff::new("Dense Sharpening Stone", Stats::default(), SpecialStats::default())
        });

    character
}
