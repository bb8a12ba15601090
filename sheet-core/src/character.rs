//! Character snapshot types.
//!
//! A [`CharacterSnapshot`] is the read-only view of persisted character state
//! that every deriver consumes. The persistence layer owns these values; the
//! engine never writes them.

use crate::abilities::{Ability, AbilityScores, ProficiencyLevel, Skill};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// Source book assumed for references that were stored without one.
pub const DEFAULT_SOURCE: &str = "PHB";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Classes
// ============================================================================

/// One class a character has levels in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub class_name: String,
    #[serde(default = "default_source")]
    pub class_source: String,
    pub level: i32,
    #[serde(default)]
    pub subclass_name: Option<String>,
    #[serde(default)]
    pub subclass_source: Option<String>,
    #[serde(default)]
    pub hit_dice_type: String,
    #[serde(default)]
    pub hit_dice_remaining: i32,
}

impl ClassLevel {
    pub fn new(class_name: impl Into<String>, level: i32) -> Self {
        Self {
            class_name: class_name.into(),
            class_source: default_source(),
            level,
            subclass_name: None,
            subclass_source: None,
            hit_dice_type: String::new(),
            hit_dice_remaining: level,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.class_source = source.into();
        self
    }

    pub fn with_subclass(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.subclass_name = Some(name.into());
        self.subclass_source = Some(source.into());
        self
    }

    pub fn with_hit_dice(mut self, hit_dice_type: impl Into<String>, remaining: i32) -> Self {
        self.hit_dice_type = hit_dice_type.into();
        self.hit_dice_remaining = remaining;
        self
    }

    /// Case-insensitive class name comparison.
    pub fn is_class(&self, name: &str) -> bool {
        self.class_name.trim().eq_ignore_ascii_case(name)
    }

    /// Case-insensitive substring match against the subclass name.
    pub fn has_subclass(&self, fragment: &str) -> bool {
        self.subclass_name
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(&fragment.to_lowercase()))
    }
}

// ============================================================================
// Proficiencies
// ============================================================================

/// Proficiency tracking. Entries are free text as entered by the player.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Proficiencies {
    #[serde(default)]
    pub armor: BTreeSet<String>,
    #[serde(default)]
    pub weapons: BTreeSet<String>,
    #[serde(default)]
    pub tools: BTreeSet<String>,
    #[serde(default)]
    pub languages: BTreeSet<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub saves: BTreeSet<String>,
    #[serde(default)]
    pub expertise: BTreeSet<String>,
}

impl Proficiencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    pub fn with_expertise(mut self, skill: impl Into<String>) -> Self {
        self.expertise.insert(skill.into());
        self
    }

    pub fn with_save(mut self, ability: impl Into<String>) -> Self {
        self.saves.insert(ability.into());
        self
    }

    fn contains_ignore_case(set: &BTreeSet<String>, name: &str) -> bool {
        set.iter().any(|s| s.trim().eq_ignore_ascii_case(name))
    }

    /// Proficiency level in a skill. The expertise flag wins over plain
    /// proficiency.
    pub fn skill_level(&self, skill: Skill) -> ProficiencyLevel {
        if Self::contains_ignore_case(&self.expertise, skill.name()) {
            ProficiencyLevel::Expertise
        } else if Self::contains_ignore_case(&self.skills, skill.name()) {
            ProficiencyLevel::Proficient
        } else {
            ProficiencyLevel::None
        }
    }

    /// Whether a saving throw is proficient. Unparseable entries are ignored.
    pub fn is_save_proficient(&self, ability: Ability) -> bool {
        self.saves
            .iter()
            .any(|s| s.parse::<Ability>().is_ok_and(|a| a == ability))
    }
}

// ============================================================================
// Equipment
// ============================================================================

/// Equipped items by slot. Names are free text, not catalog keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquippedItems {
    #[serde(default)]
    pub armor: Option<String>,
    #[serde(default)]
    pub shield: Option<String>,
    #[serde(default)]
    pub main_hand: Option<String>,
    #[serde(default)]
    pub off_hand: Option<String>,
}

// ============================================================================
// Spells
// ============================================================================

/// Reference to a spell by name and source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpellReference {
    pub name: String,
    #[serde(default = "default_source")]
    pub source: String,
}

impl SpellReference {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for SpellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.source)
    }
}

/// Persisted slot counters for one spell level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotState {
    pub max: i32,
    pub current: i32,
}

impl SlotState {
    pub fn new(max: i32) -> Self {
        Self { max, current: max }
    }
}

/// Spells a character knows and the persisted slot counters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellBook {
    #[serde(default)]
    pub cantrips: Vec<SpellReference>,
    #[serde(default)]
    pub known_spells: Vec<SpellReference>,
    #[serde(default)]
    pub prepared_spells: Vec<SpellReference>,
    /// Keyed by spell level (1-9).
    #[serde(default)]
    pub spell_slots: BTreeMap<u8, SlotState>,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything the engine reads about a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: CharacterId,
    pub name: String,
    pub abilities: AbilityScores,
    /// Ordered; the first entry is the primary class.
    pub classes: Vec<ClassLevel>,
    #[serde(default)]
    pub proficiencies: Proficiencies,
    #[serde(default)]
    pub equipped: EquippedItems,
    #[serde(default)]
    pub spells: SpellBook,
}

impl CharacterSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            abilities: AbilityScores::default(),
            classes: Vec::new(),
            proficiencies: Proficiencies::default(),
            equipped: EquippedItems::default(),
            spells: SpellBook::default(),
        }
    }

    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_class(mut self, class: ClassLevel) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_proficiencies(mut self, proficiencies: Proficiencies) -> Self {
        self.proficiencies = proficiencies;
        self
    }

    pub fn with_armor(mut self, name: impl Into<String>) -> Self {
        self.equipped.armor = Some(name.into());
        self
    }

    pub fn with_shield(mut self, name: impl Into<String>) -> Self {
        self.equipped.shield = Some(name.into());
        self
    }

    pub fn with_main_hand(mut self, name: impl Into<String>) -> Self {
        self.equipped.main_hand = Some(name.into());
        self
    }

    pub fn with_off_hand(mut self, name: impl Into<String>) -> Self {
        self.equipped.off_hand = Some(name.into());
        self
    }

    pub fn with_spells(mut self, spells: SpellBook) -> Self {
        self.spells = spells;
        self
    }

    /// Sum of all class levels.
    pub fn total_level(&self) -> i32 {
        self.classes.iter().map(|c| c.level).sum()
    }

    /// The first class taken.
    pub fn primary_class(&self) -> Option<&ClassLevel> {
        self.classes.first()
    }

    pub fn proficiency_bonus(&self) -> i32 {
        crate::abilities::proficiency_bonus(self.total_level())
    }
}
