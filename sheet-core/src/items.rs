//! Armor and weapon classification from free-text item names.
//!
//! Equipped items are stored as whatever the player typed ("+1 Studded
//! Leather", "Longsword of Warning"), so classification is a list of ordered
//! substring rules over the lower-cased name. The first matching rule wins.

use crate::abilities::{format_signed, Ability, AbilityScores};
use serde::{Deserialize, Serialize};

// ============================================================================
// Armor
// ============================================================================

/// Armor weight category, which decides how much DEX applies to AC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
}

impl ArmorCategory {
    /// The part of a DEX modifier this category allows.
    pub fn dex_contribution(&self, dex_mod: i32) -> i32 {
        match self {
            ArmorCategory::Light => dex_mod,
            ArmorCategory::Medium => dex_mod.min(2),
            ArmorCategory::Heavy => 0,
        }
    }
}

/// One armor matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorRule {
    pub pattern: &'static str,
    pub category: ArmorCategory,
    pub base_ac: i32,
}

const fn armor(pattern: &'static str, category: ArmorCategory, base_ac: i32) -> ArmorRule {
    ArmorRule {
        pattern,
        category,
        base_ac,
    }
}

/// Armor rules in match order. "studded" precedes "leather" and
/// "breastplate"/"half plate" precede "plate".
pub const ARMOR_RULES: &[ArmorRule] = &[
    armor("studded", ArmorCategory::Light, 12),
    armor("padded", ArmorCategory::Light, 11),
    armor("leather", ArmorCategory::Light, 11),
    armor("hide", ArmorCategory::Medium, 12),
    armor("chain shirt", ArmorCategory::Medium, 13),
    armor("scale", ArmorCategory::Medium, 14),
    armor("breastplate", ArmorCategory::Medium, 14),
    armor("half plate", ArmorCategory::Medium, 15),
    armor("ring mail", ArmorCategory::Heavy, 14),
    armor("chain mail", ArmorCategory::Heavy, 16),
    armor("splint", ArmorCategory::Heavy, 17),
    armor("plate", ArmorCategory::Heavy, 18),
];

/// AC without armor, before DEX.
pub const UNARMORED_AC: i32 = 10;

/// Bonus AC from an equipped shield.
pub const SHIELD_AC: i32 = 2;

/// Classify an armor name. Unrecognized names return `None`.
pub fn classify_armor(name: &str) -> Option<&'static ArmorRule> {
    let lower = name.to_lowercase();
    ARMOR_RULES.iter().find(|rule| lower.contains(rule.pattern))
}

/// Magic bonus from a `+N` token (N in 1-3) anywhere in an item name.
pub fn enchantment_bonus(name: &str) -> i32 {
    let chars: Vec<char> = name.chars().collect();
    chars
        .windows(2)
        .enumerate()
        .find_map(|(i, pair)| {
            let followed_by_digit = chars.get(i + 2).is_some_and(|c| c.is_ascii_digit());
            match (pair[0], pair[1].to_digit(10)) {
                ('+', Some(n @ 1..=3)) if !followed_by_digit => i32::try_from(n).ok(),
                _ => None,
            }
        })
        .unwrap_or(0)
}

/// AC from worn armor (or none) before any shield.
///
/// Unknown armor counts as unarmored but keeps its enchantment bonus.
pub fn armor_class_for(armor: Option<&str>, dex_mod: i32) -> i32 {
    let Some(name) = armor.map(str::trim).filter(|n| !n.is_empty()) else {
        return UNARMORED_AC + dex_mod;
    };

    let base = match classify_armor(name) {
        Some(rule) => rule.base_ac + rule.category.dex_contribution(dex_mod),
        None => UNARMORED_AC + dex_mod,
    };
    base + enchantment_bonus(name)
}

/// Whether an item name is a shield.
pub fn is_shield(name: &str) -> bool {
    name.to_lowercase().contains("shield")
}

// ============================================================================
// Weapons
// ============================================================================

/// How a weapon picks its attack ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponTag {
    /// Better of STR and DEX.
    Finesse,
    /// DEX.
    Ranged,
    /// STR.
    Melee,
}

impl WeaponTag {
    /// Ability used for attack and damage rolls.
    pub fn attack_ability(&self, scores: &AbilityScores) -> Ability {
        match self {
            WeaponTag::Finesse => {
                if scores.modifier(Ability::Dexterity) > scores.modifier(Ability::Strength) {
                    Ability::Dexterity
                } else {
                    Ability::Strength
                }
            }
            WeaponTag::Ranged => Ability::Dexterity,
            WeaponTag::Melee => Ability::Strength,
        }
    }
}

const FINESSE_PATTERNS: &[&str] = &["rapier", "dagger", "shortsword", "scimitar", "whip"];
const RANGED_PATTERNS: &[&str] = &["bow", "crossbow", "dart", "sling"];

/// Damage dice rules in match order.
pub const WEAPON_DICE: &[(&[&str], &str)] = &[
    (&["greatsword", "maul"], "2d6"),
    (&["greataxe"], "1d12"),
    (&["longsword", "warhammer", "battleaxe", "rapier"], "1d8"),
    (&["dagger"], "1d4"),
    (&["shortsword", "scimitar", "quarterstaff", "spear"], "1d6"),
    (&["heavy crossbow"], "1d10"),
    (&["light crossbow"], "1d6"),
    (&["longbow"], "1d8"),
    (&["shortbow"], "1d6"),
];

/// Damage die for unrecognized weapons.
pub const DEFAULT_WEAPON_DIE: &str = "1d6";

pub fn weapon_tag(name: &str) -> WeaponTag {
    let lower = name.to_lowercase();
    if FINESSE_PATTERNS.iter().any(|p| lower.contains(p)) {
        WeaponTag::Finesse
    } else if RANGED_PATTERNS.iter().any(|p| lower.contains(p)) {
        WeaponTag::Ranged
    } else {
        WeaponTag::Melee
    }
}

pub fn weapon_damage_die(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    WEAPON_DICE
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(_, die)| *die)
        .unwrap_or(DEFAULT_WEAPON_DIE)
}

/// Damage string such as `1d8+3` or `1d6-1`. The modifier is always shown.
pub fn damage_string(die: &str, modifier: i32) -> String {
    format!("{die}{}", format_signed(modifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_armor_order() {
        assert_eq!(classify_armor("Studded Leather").unwrap().base_ac, 12);
        assert_eq!(classify_armor("Leather Armor").unwrap().base_ac, 11);
        assert_eq!(classify_armor("Half Plate").unwrap().base_ac, 15);
        assert_eq!(classify_armor("Breastplate").unwrap().base_ac, 14);
        assert_eq!(classify_armor("Plate Armor").unwrap().base_ac, 18);
        assert_eq!(
            classify_armor("Chain Shirt").unwrap().category,
            ArmorCategory::Medium
        );
        assert_eq!(
            classify_armor("Chain Mail").unwrap().category,
            ArmorCategory::Heavy
        );
        assert!(classify_armor("Robes").is_none());
    }

    #[test]
    fn test_armor_class_dex_policy() {
        assert_eq!(armor_class_for(None, 2), 12);
        assert_eq!(armor_class_for(Some("Leather"), 4), 15);
        assert_eq!(armor_class_for(Some("Scale Mail"), 4), 16);
        assert_eq!(armor_class_for(Some("Hide"), -1), 11);
        assert_eq!(armor_class_for(Some("Chain Mail"), 5), 16);
        assert_eq!(armor_class_for(Some("Chain Mail"), -2), 16);
    }

    #[test]
    fn test_enchantment_bonus() {
        assert_eq!(enchantment_bonus("+1 Studded Leather"), 1);
        assert_eq!(enchantment_bonus("Plate Armor +3"), 3);
        assert_eq!(enchantment_bonus("Leather"), 0);
        assert_eq!(enchantment_bonus("Leather +4"), 0);
        assert_eq!(enchantment_bonus("Leather +10"), 0);
        assert_eq!(armor_class_for(Some("+1 Studded Leather"), 3), 16);
    }

    #[test]
    fn test_unknown_armor_keeps_bonus() {
        assert_eq!(armor_class_for(Some("Robe of Stars"), 2), 12);
        assert_eq!(armor_class_for(Some("Bracers +2"), 2), 14);
        assert_eq!(armor_class_for(Some("   "), 1), 11);
    }

    #[test]
    fn test_weapon_dice() {
        assert_eq!(weapon_damage_die("Greatsword"), "2d6");
        assert_eq!(weapon_damage_die("Maul"), "2d6");
        assert_eq!(weapon_damage_die("Greataxe"), "1d12");
        assert_eq!(weapon_damage_die("Rapier"), "1d8");
        assert_eq!(weapon_damage_die("Dagger"), "1d4");
        assert_eq!(weapon_damage_die("Heavy Crossbow"), "1d10");
        assert_eq!(weapon_damage_die("Light Crossbow"), "1d6");
        assert_eq!(weapon_damage_die("Longbow"), "1d8");
        assert_eq!(weapon_damage_die("Frying Pan"), "1d6");
    }

    #[test]
    fn test_weapon_tags() {
        assert_eq!(weapon_tag("Rapier"), WeaponTag::Finesse);
        assert_eq!(weapon_tag("Whip"), WeaponTag::Finesse);
        assert_eq!(weapon_tag("Longbow"), WeaponTag::Ranged);
        assert_eq!(weapon_tag("Sling"), WeaponTag::Ranged);
        assert_eq!(weapon_tag("Longsword"), WeaponTag::Melee);
    }

    #[test]
    fn test_finesse_picks_better_ability() {
        let dex = AbilityScores::new(10, 18, 10, 10, 10, 10);
        let str_ = AbilityScores::new(16, 16, 10, 10, 10, 10);
        assert_eq!(WeaponTag::Finesse.attack_ability(&dex), Ability::Dexterity);
        assert_eq!(WeaponTag::Finesse.attack_ability(&str_), Ability::Strength);
        assert_eq!(WeaponTag::Ranged.attack_ability(&str_), Ability::Dexterity);
    }

    #[test]
    fn test_damage_string() {
        assert_eq!(damage_string("1d8", 3), "1d8+3");
        assert_eq!(damage_string("1d8", 0), "1d8+0");
        assert_eq!(damage_string("2d6", -1), "2d6-1");
    }

    #[test]
    fn test_is_shield() {
        assert!(is_shield("Shield"));
        assert!(is_shield("+1 Shield of Faith"));
        assert!(!is_shield("Dagger"));
    }
}
