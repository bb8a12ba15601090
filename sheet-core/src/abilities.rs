//! Ability scores, skills, and the arithmetic every other deriver builds on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ability modifier for a score: `floor((score - 10) / 2)`.
///
/// Defined for any score, including values outside 1-30.
pub fn modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Proficiency bonus for a total character level.
///
/// Levels at or below zero get the level 1 bonus; levels past 20 get the
/// level 20 bonus.
pub fn proficiency_bonus(total_level: i32) -> i32 {
    let level = total_level.clamp(1, 20);
    (level + 3) / 4 + 1
}

/// Render a bonus with an explicit sign: `+3`, `+0`, `-1`.
pub fn format_signed(value: i32) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

// ============================================================================
// Abilities
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Error for text that names no ability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown ability: {0}")]
pub struct ParseAbilityError(pub String);

impl FromStr for Ability {
    type Err = ParseAbilityError;

    /// Accepts full names and three-letter abbreviations in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Ability::all()
            .into_iter()
            .find(|a| {
                lower == a.name().to_lowercase() || lower == a.abbreviation().to_lowercase()
            })
            .ok_or_else(|| ParseAbilityError(s.to_string()))
    }
}

/// Ability scores container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// D&D 5e skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    /// Governing ability for the skill.
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "Acrobatics",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Arcana => "Arcana",
            Skill::Athletics => "Athletics",
            Skill::Deception => "Deception",
            Skill::History => "History",
            Skill::Insight => "Insight",
            Skill::Intimidation => "Intimidation",
            Skill::Investigation => "Investigation",
            Skill::Medicine => "Medicine",
            Skill::Nature => "Nature",
            Skill::Perception => "Perception",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
            Skill::Religion => "Religion",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Survival => "Survival",
        }
    }

    /// All 18 skills in alphabetical order.
    pub fn all() -> [Skill; 18] {
        [
            Skill::Acrobatics,
            Skill::AnimalHandling,
            Skill::Arcana,
            Skill::Athletics,
            Skill::Deception,
            Skill::History,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Investigation,
            Skill::Medicine,
            Skill::Nature,
            Skill::Perception,
            Skill::Performance,
            Skill::Persuasion,
            Skill::Religion,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Survival,
        ]
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Skill> {
        let lower = name.trim().to_lowercase();
        Skill::all()
            .into_iter()
            .find(|s| s.name().to_lowercase() == lower)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Proficiency level for a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProficiencyLevel {
    #[default]
    None,
    Proficient,
    Expertise,
}

impl ProficiencyLevel {
    /// How many times the proficiency bonus applies.
    pub fn multiplier(&self) -> i32 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Proficient => 1,
            ProficiencyLevel::Expertise => 2,
        }
    }

    pub fn bonus(&self, proficiency_bonus: i32) -> i32 {
        proficiency_bonus * self.multiplier()
    }
}
