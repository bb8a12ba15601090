//! Combat statistics: armor class, initiative, attacks, saves and skills.

use crate::abilities::{format_signed, modifier, Ability, ProficiencyLevel, Skill};
use crate::character::CharacterSnapshot;
use crate::items::{
    armor_class_for, damage_string, is_shield, weapon_damage_die, weapon_tag, SHIELD_AC,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Armor class with and without the equipped shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClassSummary {
    /// AC from armor (or none) and DEX.
    pub base: i32,
    /// `base` plus the shield bonus, if a shield is equipped.
    pub with_shield: Option<i32>,
}

impl ArmorClassSummary {
    /// The AC in effect.
    pub fn effective(&self) -> i32 {
        self.with_shield.unwrap_or(self.base)
    }
}

impl fmt::Display for ArmorClassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.with_shield {
            Some(shielded) => write!(f, "{} ({} with shield)", self.base, shielded),
            None => write!(f, "{}", self.base),
        }
    }
}

pub fn armor_class(character: &CharacterSnapshot) -> ArmorClassSummary {
    let dex_mod = character.abilities.modifier(Ability::Dexterity);
    let base = armor_class_for(character.equipped.armor.as_deref(), dex_mod);
    let with_shield = non_empty(character.equipped.shield.as_deref()).map(|_| base + SHIELD_AC);
    ArmorClassSummary { base, with_shield }
}

pub fn initiative(character: &CharacterSnapshot) -> i32 {
    character.abilities.modifier(Ability::Dexterity)
}

/// 10 + WIS modifier, plus proficiency when proficient in Perception.
pub fn passive_perception(character: &CharacterSnapshot) -> i32 {
    let proficient =
        character.proficiencies.skill_level(Skill::Perception) != ProficiencyLevel::None;
    let pb = if proficient {
        character.proficiency_bonus()
    } else {
        0
    };
    10 + character.abilities.modifier(Ability::Wisdom) + pb
}

// ============================================================================
// Attacks
// ============================================================================

/// Which hand an attack comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackSlot {
    MainHand,
    OffHand,
}

/// A weapon attack line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub slot: AttackSlot,
    pub name: String,
    pub attack_bonus: i32,
    /// Damage dice with modifier, e.g. `1d8+3`.
    pub damage: String,
    pub ability: Ability,
}

impl fmt::Display for Attack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} to hit, {}",
            self.name,
            format_signed(self.attack_bonus),
            self.damage
        )
    }
}

/// Attacks from equipped weapons, main hand first.
///
/// The off hand attacks with STR and adds no ability modifier to damage. An
/// off-hand shield is not an attack.
pub fn attacks(character: &CharacterSnapshot) -> Vec<Attack> {
    let pb = character.proficiency_bonus();
    let mut attacks = Vec::new();

    if let Some(name) = non_empty(character.equipped.main_hand.as_deref()) {
        let ability = weapon_tag(name).attack_ability(&character.abilities);
        let ability_mod = character.abilities.modifier(ability);
        attacks.push(Attack {
            slot: AttackSlot::MainHand,
            name: name.to_string(),
            attack_bonus: pb + ability_mod,
            damage: damage_string(weapon_damage_die(name), ability_mod),
            ability,
        });
    }

    if let Some(name) = non_empty(character.equipped.off_hand.as_deref()) {
        if !is_shield(name) {
            attacks.push(Attack {
                slot: AttackSlot::OffHand,
                name: name.to_string(),
                attack_bonus: pb + character.abilities.modifier(Ability::Strength),
                damage: damage_string(weapon_damage_die(name), 0),
                ability: Ability::Strength,
            });
        }
    }

    attacks
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

// ============================================================================
// Saves and skills
// ============================================================================

/// Saving throw bonus for an ability score.
pub fn save_bonus(character: &CharacterSnapshot, ability: Ability, score: i32) -> i32 {
    let pb = if character.proficiencies.is_save_proficient(ability) {
        character.proficiency_bonus()
    } else {
        0
    };
    modifier(score) + pb
}

/// Skill bonus given the governing ability's score.
pub fn skill_bonus(character: &CharacterSnapshot, skill: Skill, score: i32) -> i32 {
    let level = character.proficiencies.skill_level(skill);
    modifier(score) + level.bonus(character.proficiency_bonus())
}
