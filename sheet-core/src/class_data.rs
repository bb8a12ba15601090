//! Built-in D&D 5e class tables.
//!
//! These are the fallbacks used whenever the catalog has no progression data
//! for a class: hit dice, spellcasting abilities, caster types, cantrip and
//! spells-known tables, and multiclass prerequisites for the 13 core classes.

use crate::abilities::Ability;
use crate::character::ClassLevel;
use crate::progression::CasterProgression;

/// A class the engine has built-in tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownClass {
    Artificer,
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

/// Ability score requirement for multiclassing into or out of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    /// Every listed ability must be at least 13.
    All(&'static [Ability]),
    /// At least one listed ability must be at least 13.
    Any(&'static [Ability]),
}

/// Minimum score for a multiclass prerequisite.
pub const MULTICLASS_MINIMUM: i32 = 13;

/// Fallback rules for one class.
pub struct ClassData {
    /// Hit die size (6, 8, 10 or 12).
    pub hit_die: i32,
    /// Ability used for spellcasting, if the class casts.
    pub spellcasting_ability: Option<Ability>,
    /// Contribution to the multiclass caster level.
    pub caster: CasterProgression,
    /// Prepares from the whole class list instead of learning spells.
    pub full_list: bool,
    /// Cantrips known at levels 1-3, if the class gets cantrips.
    pub base_cantrips: Option<u32>,
    /// Spells known by class level.
    pub spells_known: Option<&'static [u32; 20]>,
    pub prerequisite: Prerequisite,
}

impl KnownClass {
    /// Case-insensitive lookup by class name.
    pub fn from_name(name: &str) -> Option<KnownClass> {
        let lower = name.trim().to_lowercase();
        KnownClass::all()
            .iter()
            .copied()
            .find(|c| c.name().to_lowercase() == lower)
    }

    pub fn name(&self) -> &'static str {
        match self {
            KnownClass::Artificer => "Artificer",
            KnownClass::Barbarian => "Barbarian",
            KnownClass::Bard => "Bard",
            KnownClass::Cleric => "Cleric",
            KnownClass::Druid => "Druid",
            KnownClass::Fighter => "Fighter",
            KnownClass::Monk => "Monk",
            KnownClass::Paladin => "Paladin",
            KnownClass::Ranger => "Ranger",
            KnownClass::Rogue => "Rogue",
            KnownClass::Sorcerer => "Sorcerer",
            KnownClass::Warlock => "Warlock",
            KnownClass::Wizard => "Wizard",
        }
    }

    pub fn all() -> &'static [KnownClass] {
        &[
            KnownClass::Artificer,
            KnownClass::Barbarian,
            KnownClass::Bard,
            KnownClass::Cleric,
            KnownClass::Druid,
            KnownClass::Fighter,
            KnownClass::Monk,
            KnownClass::Paladin,
            KnownClass::Ranger,
            KnownClass::Rogue,
            KnownClass::Sorcerer,
            KnownClass::Warlock,
            KnownClass::Wizard,
        ]
    }

    /// Whether the class is in the core spellcasting set.
    ///
    /// Artificer is not in the set; without catalog data it is a non-caster.
    pub fn is_spellcasting(&self) -> bool {
        matches!(
            self,
            KnownClass::Bard
                | KnownClass::Cleric
                | KnownClass::Druid
                | KnownClass::Paladin
                | KnownClass::Ranger
                | KnownClass::Sorcerer
                | KnownClass::Warlock
                | KnownClass::Wizard
        )
    }

    /// Fallback rules for this class.
    pub fn data(&self) -> ClassData {
        match self {
            KnownClass::Artificer => ClassData {
                hit_die: 8,
                spellcasting_ability: None,
                caster: CasterProgression::None,
                full_list: false,
                base_cantrips: None,
                spells_known: None,
                prerequisite: Prerequisite::All(&[Ability::Intelligence]),
            },
            KnownClass::Barbarian => ClassData {
                hit_die: 12,
                spellcasting_ability: None,
                caster: CasterProgression::None,
                full_list: false,
                base_cantrips: None,
                spells_known: None,
                prerequisite: Prerequisite::All(&[Ability::Strength]),
            },
            KnownClass::Bard => ClassData {
                hit_die: 8,
                spellcasting_ability: Some(Ability::Charisma),
                caster: CasterProgression::Full,
                full_list: false,
                base_cantrips: Some(2),
                spells_known: Some(&BARD_SPELLS_KNOWN),
                prerequisite: Prerequisite::All(&[Ability::Charisma]),
            },
            KnownClass::Cleric => ClassData {
                hit_die: 8,
                spellcasting_ability: Some(Ability::Wisdom),
                caster: CasterProgression::Full,
                full_list: true,
                base_cantrips: Some(3),
                spells_known: None,
                prerequisite: Prerequisite::All(&[Ability::Wisdom]),
            },
            KnownClass::Druid => ClassData {
                hit_die: 8,
                spellcasting_ability: Some(Ability::Wisdom),
                caster: CasterProgression::Full,
                full_list: true,
                base_cantrips: Some(2),
                spells_known: None,
                prerequisite: Prerequisite::All(&[Ability::Wisdom]),
            },
            KnownClass::Fighter => ClassData {
                hit_die: 10,
                spellcasting_ability: None,
                caster: CasterProgression::None,
                full_list: false,
                base_cantrips: None,
                spells_known: None,
                prerequisite: Prerequisite::Any(&[Ability::Strength, Ability::Dexterity]),
            },
            KnownClass::Monk => ClassData {
                hit_die: 8,
                spellcasting_ability: None,
                caster: CasterProgression::None,
                full_list: false,
                base_cantrips: None,
                spells_known: None,
                prerequisite: Prerequisite::All(&[Ability::Dexterity, Ability::Wisdom]),
            },
            KnownClass::Paladin => ClassData {
                hit_die: 10,
                spellcasting_ability: Some(Ability::Charisma),
                caster: CasterProgression::Half,
                full_list: true,
                base_cantrips: None,
                spells_known: None,
                prerequisite: Prerequisite::All(&[Ability::Strength, Ability::Charisma]),
            },
            KnownClass::Ranger => ClassData {
                hit_die: 10,
                spellcasting_ability: Some(Ability::Wisdom),
                caster: CasterProgression::Half,
                full_list: false,
                base_cantrips: None,
                spells_known: Some(&RANGER_SPELLS_KNOWN),
                prerequisite: Prerequisite::All(&[Ability::Dexterity, Ability::Wisdom]),
            },
            KnownClass::Rogue => ClassData {
                hit_die: 8,
                spellcasting_ability: None,
                caster: CasterProgression::None,
                full_list: false,
                base_cantrips: None,
                spells_known: None,
                prerequisite: Prerequisite::All(&[Ability::Dexterity]),
            },
            KnownClass::Sorcerer => ClassData {
                hit_die: 6,
                spellcasting_ability: Some(Ability::Charisma),
                caster: CasterProgression::Full,
                full_list: false,
                base_cantrips: Some(4),
                spells_known: Some(&SORCERER_SPELLS_KNOWN),
                prerequisite: Prerequisite::All(&[Ability::Charisma]),
            },
            KnownClass::Warlock => ClassData {
                hit_die: 8,
                spellcasting_ability: Some(Ability::Charisma),
                caster: CasterProgression::Pact,
                full_list: false,
                base_cantrips: Some(2),
                spells_known: Some(&WARLOCK_SPELLS_KNOWN),
                prerequisite: Prerequisite::All(&[Ability::Charisma]),
            },
            KnownClass::Wizard => ClassData {
                hit_die: 6,
                spellcasting_ability: Some(Ability::Intelligence),
                caster: CasterProgression::Full,
                full_list: true,
                base_cantrips: Some(3),
                spells_known: None,
                prerequisite: Prerequisite::All(&[Ability::Intelligence]),
            },
        }
    }
}

/// Hit die for classes the engine has no table for.
pub const DEFAULT_HIT_DIE: i32 = 8;

/// Cantrips known at a class level, given the count at levels 1-3.
///
/// Every full caster gains one more cantrip at 4th and 10th level.
pub fn scaled_cantrips(base: u32, level: i32) -> u32 {
    if level < 1 {
        return 0;
    }
    base + u32::from(level >= 4) + u32::from(level >= 10)
}

/// Look up a 20-level table, clamping the level into 1-20.
pub fn table_value(table: &[u32; 20], level: i32) -> u32 {
    let index = usize::try_from(level.clamp(1, 20) - 1).unwrap_or(0);
    table[index]
}

// ============================================================================
// Third casters
// ============================================================================

/// Subclasses that cast at one third of their class level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThirdCaster {
    EldritchKnight,
    ArcaneTrickster,
}

impl ThirdCaster {
    /// Detect a third-caster subclass. The base class must match too.
    pub fn detect(class: &ClassLevel) -> Option<ThirdCaster> {
        if class.is_class("fighter") && class.has_subclass("eldritch knight") {
            Some(ThirdCaster::EldritchKnight)
        } else if class.is_class("rogue") && class.has_subclass("arcane trickster") {
            Some(ThirdCaster::ArcaneTrickster)
        } else {
            None
        }
    }

    pub fn cantrips(&self, level: i32) -> u32 {
        let base = match self {
            ThirdCaster::EldritchKnight => 2,
            ThirdCaster::ArcaneTrickster => 3,
        };
        match level {
            l if l < 3 => 0,
            l if l < 10 => base,
            _ => base + 1,
        }
    }

    pub fn spells_known(&self, level: i32) -> u32 {
        table_value(&THIRD_CASTER_SPELLS_KNOWN, level)
    }
}

// ============================================================================
// Tables
// ============================================================================

const BARD_SPELLS_KNOWN: [u32; 20] = [
    4, 5, 6, 7, 8, 9, 10, 11, 12, 14, 15, 15, 16, 18, 19, 19, 20, 22, 22, 22,
];

const SORCERER_SPELLS_KNOWN: [u32; 20] = [
    2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 12, 13, 13, 14, 14, 15, 15, 15, 15,
];

const WARLOCK_SPELLS_KNOWN: [u32; 20] = [
    2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15,
];

const RANGER_SPELLS_KNOWN: [u32; 20] = [
    0, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11,
];

const THIRD_CASTER_SPELLS_KNOWN: [u32; 20] = [
    0, 0, 3, 4, 4, 4, 5, 6, 6, 7, 8, 8, 9, 10, 10, 11, 11, 11, 12, 13,
];

/// Spell slots per spell level (1st-9th) for a multiclass caster level.
pub const MULTICLASS_SLOTS: [[u32; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 2, 1, 1],
];

/// Pact Magic `(slot count, slot level)` by warlock level.
pub const PACT_SLOTS: [(u32, u8); 20] = [
    (1, 1),
    (2, 1),
    (2, 2),
    (2, 2),
    (2, 3),
    (2, 3),
    (2, 4),
    (2, 4),
    (2, 5),
    (2, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (4, 5),
    (4, 5),
    (4, 5),
    (4, 5),
];
