//! Spellcasting derivation.
//!
//! Every function here takes the character's classes plus whatever catalog
//! overrides were resolved for them. An override field, when present, beats
//! the built-in table for that class.

use crate::abilities::{Ability, AbilityScores};
use crate::character::{ClassLevel, SlotState, SpellBook};
use crate::class_data::{
    scaled_cantrips, table_value, KnownClass, ThirdCaster, MULTICLASS_SLOTS, PACT_SLOTS,
};
use crate::progression::{
    progression_value, CasterProgression, ClassProgression, ProgressionOverrides,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether any class is in the core spellcasting set.
pub fn is_spellcaster(classes: &[ClassLevel]) -> bool {
    classes
        .iter()
        .filter_map(|c| KnownClass::from_name(&c.class_name))
        .any(|c| c.is_spellcasting())
}

/// Spellcasting ability of the primary class.
pub fn spellcasting_ability(
    classes: &[ClassLevel],
    overrides: &ProgressionOverrides,
) -> Option<Ability> {
    let primary = classes.first()?;
    class_spellcasting_ability(primary, overrides.for_class(primary))
}

/// Spellcasting ability of one class: the override, then Eldritch Knight
/// and Arcane Trickster (INT), then the class table.
pub fn class_spellcasting_ability(
    class: &ClassLevel,
    progression: Option<&ClassProgression>,
) -> Option<Ability> {
    if let Some(ability) = progression.and_then(|p| p.spellcasting_ability) {
        return Some(ability);
    }
    if ThirdCaster::detect(class).is_some() {
        return Some(Ability::Intelligence);
    }
    KnownClass::from_name(&class.class_name).and_then(|c| c.data().spellcasting_ability)
}

/// Save DC for spells: `8 + PB + modifier`, or 10 with no casting ability.
pub fn spell_save_dc(
    ability: Option<Ability>,
    scores: &AbilityScores,
    proficiency_bonus: i32,
) -> i32 {
    match ability {
        Some(ability) => 8 + proficiency_bonus + scores.modifier(ability),
        None => 10,
    }
}

/// Spell attack bonus: `PB + modifier`, or 0 with no casting ability.
pub fn spell_attack_bonus(
    ability: Option<Ability>,
    scores: &AbilityScores,
    proficiency_bonus: i32,
) -> i32 {
    match ability {
        Some(ability) => proficiency_bonus + scores.modifier(ability),
        None => 0,
    }
}

// ============================================================================
// Caster level and slots
// ============================================================================

/// How a class progresses as a caster.
///
/// A catalog `casterProgression` wins. Otherwise third-caster subclasses are
/// detected by name before the class table is consulted.
pub fn caster_progression(
    class: &ClassLevel,
    progression: Option<&ClassProgression>,
) -> CasterProgression {
    if let Some(caster) = progression.and_then(|p| p.caster_progression) {
        return caster;
    }
    if ThirdCaster::detect(class).is_some() {
        return CasterProgression::Third;
    }
    KnownClass::from_name(&class.class_name)
        .map(|c| c.data().caster)
        .unwrap_or(CasterProgression::None)
}

/// Combined caster level for the multiclass slot table. Pact casters add
/// nothing.
pub fn multiclass_caster_level(classes: &[ClassLevel], overrides: &ProgressionOverrides) -> i32 {
    classes
        .iter()
        .map(|c| caster_progression(c, overrides.for_class(c)).caster_levels(c.level))
        .sum()
}

/// Highest spell level castable from the shared slot table.
pub fn max_spell_level(caster_level: i32) -> i32 {
    match caster_level {
        l if l <= 0 => 0,
        l if l >= 17 => 9,
        l => (l + 1) / 2,
    }
}

/// Pact Magic slots for a warlock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PactSlots {
    pub count: u32,
    /// All pact slots are this spell level.
    pub level: u8,
}

pub fn pact_slots(warlock_level: i32) -> Option<PactSlots> {
    if warlock_level < 1 {
        return None;
    }
    let index = usize::try_from(warlock_level.min(20) - 1).ok()?;
    PACT_SLOTS
        .get(index)
        .map(|&(count, level)| PactSlots { count, level })
}

/// Spell slots by level, with Pact Magic folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellSlotTable {
    /// Slots per spell level 1-9, including any pact slots.
    pub combined: [u32; 9],
    /// The Pact Magic share of `combined`.
    pub pact: Option<PactSlots>,
}

impl SpellSlotTable {
    /// Combined slots at a spell level (1-9).
    pub fn get(&self, spell_level: u8) -> u32 {
        spell_level
            .checked_sub(1)
            .and_then(|i| self.combined.get(usize::from(i)))
            .copied()
            .unwrap_or(0)
    }

    /// Slots from the multiclass table only, without pact slots.
    pub fn standard(&self) -> [u32; 9] {
        let mut standard = self.combined;
        if let Some(pact) = self.pact {
            if let Some(slot) = pact
                .level
                .checked_sub(1)
                .and_then(|i| standard.get_mut(usize::from(i)))
            {
                *slot = slot.saturating_sub(pact.count);
            }
        }
        standard
    }

    pub fn total(&self) -> u32 {
        self.combined.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Highest spell level with at least one slot, or 0.
    pub fn highest_level(&self) -> i32 {
        self.combined
            .iter()
            .rposition(|&n| n > 0)
            .and_then(|i| i32::try_from(i + 1).ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for SpellSlotTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .combined
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(i, n)| format!("{}:{}", i + 1, n))
            .collect();
        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

/// Slot table for a set of classes.
///
/// Pact slots are added to the bucket of their slot level, so a Warlock 3 /
/// Wizard 3 has four 1st and four 2nd level slots.
pub fn spell_slots(classes: &[ClassLevel], overrides: &ProgressionOverrides) -> SpellSlotTable {
    let caster_level = multiclass_caster_level(classes, overrides);
    let mut combined = [0u32; 9];
    if caster_level > 0 {
        let row = usize::try_from(caster_level.min(20) - 1).unwrap_or(0);
        combined = MULTICLASS_SLOTS[row];
    }

    let warlock_level: i32 = classes
        .iter()
        .filter(|c| caster_progression(c, overrides.for_class(c)) == CasterProgression::Pact)
        .map(|c| c.level)
        .sum();
    let pact = pact_slots(warlock_level);
    if let Some(pact) = pact {
        if let Some(slot) = pact
            .level
            .checked_sub(1)
            .and_then(|i| combined.get_mut(usize::from(i)))
        {
            *slot += pact.count;
        }
    }

    SpellSlotTable { combined, pact }
}

// ============================================================================
// Known-spell limits
// ============================================================================

/// How many spells a class may know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellLimit {
    Known(u32),
    /// Prepares from the full class list; no learned-spell cap.
    Unlimited,
}

impl SpellLimit {
    /// Combine two class limits. Any unlimited class makes the whole
    /// character unlimited.
    pub fn combine(self, other: SpellLimit) -> SpellLimit {
        match (self, other) {
            (SpellLimit::Known(a), SpellLimit::Known(b)) => SpellLimit::Known(a + b),
            _ => SpellLimit::Unlimited,
        }
    }
}

impl fmt::Display for SpellLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellLimit::Known(n) => write!(f, "{n}"),
            SpellLimit::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Cantrips known for one class.
pub fn cantrips_known(class: &ClassLevel, progression: Option<&ClassProgression>) -> u32 {
    if let Some(n) = progression
        .and_then(|p| p.cantrip_progression.as_deref())
        .and_then(|table| progression_value(table, class.level))
    {
        return n;
    }
    if let Some(third) = ThirdCaster::detect(class) {
        return third.cantrips(class.level);
    }
    KnownClass::from_name(&class.class_name)
        .and_then(|c| c.data().base_cantrips)
        .map(|base| scaled_cantrips(base, class.level))
        .unwrap_or(0)
}

/// Spells known for one class.
pub fn spells_known(class: &ClassLevel, progression: Option<&ClassProgression>) -> SpellLimit {
    if let Some(n) = progression
        .and_then(|p| p.spells_known_progression.as_deref())
        .and_then(|table| progression_value(table, class.level))
    {
        return SpellLimit::Known(n);
    }
    if let Some(third) = ThirdCaster::detect(class) {
        return SpellLimit::Known(third.spells_known(class.level));
    }
    if let Some(table) = KnownClass::from_name(&class.class_name)
        .and_then(|c| c.data().spells_known)
    {
        return SpellLimit::Known(table_value(table, class.level));
    }
    if prepares_spells(class, progression) {
        SpellLimit::Unlimited
    } else {
        SpellLimit::Known(0)
    }
}

/// Whether a class prepares from its whole list instead of learning spells.
///
/// True for the full-list classes, and for any other casting class that has
/// no spells-known table (an Artificer backed by catalog data, for one).
pub fn prepares_spells(class: &ClassLevel, progression: Option<&ClassProgression>) -> bool {
    let has_known_override = progression
        .and_then(|p| p.spells_known_progression.as_deref())
        .is_some_and(|table| !table.is_empty());
    if has_known_override || ThirdCaster::detect(class).is_some() {
        return false;
    }
    if let Some(data) = KnownClass::from_name(&class.class_name).map(|c| c.data()) {
        if data.spells_known.is_some() {
            return false;
        }
        if data.full_list {
            return true;
        }
    }
    caster_progression(class, progression) != CasterProgression::None
}

/// Cantrip limit across all classes.
pub fn total_cantrips_known(classes: &[ClassLevel], overrides: &ProgressionOverrides) -> u32 {
    classes
        .iter()
        .map(|c| cantrips_known(c, overrides.for_class(c)))
        .sum()
}

/// Spells-known limit across all classes.
pub fn total_spells_known(
    classes: &[ClassLevel],
    overrides: &ProgressionOverrides,
) -> SpellLimit {
    classes
        .iter()
        .map(|c| spells_known(c, overrides.for_class(c)))
        .fold(SpellLimit::Known(0), SpellLimit::combine)
}

pub fn is_at_cantrip_limit(count: usize, limit: u32) -> bool {
    u32::try_from(count).map_or(true, |count| count >= limit)
}

/// Never true for an unlimited caster.
pub fn is_at_spell_limit(count: usize, limit: SpellLimit) -> bool {
    match limit {
        SpellLimit::Known(limit) => u32::try_from(count).map_or(true, |count| count >= limit),
        SpellLimit::Unlimited => false,
    }
}

// ============================================================================
// Prepared spells
// ============================================================================

/// Spells a preparing class may have prepared: casting modifier plus class
/// level, at least 1. `None` for classes that learn spells instead.
pub fn max_prepared_spells(
    class: &ClassLevel,
    progression: Option<&ClassProgression>,
    scores: &AbilityScores,
) -> Option<u32> {
    if !prepares_spells(class, progression) {
        return None;
    }
    let ability_mod = class_spellcasting_ability(class, progression)
        .map(|a| scores.modifier(a))
        .unwrap_or(0);
    let limit = ability_mod.saturating_add(class.level).max(1);
    Some(u32::try_from(limit).unwrap_or(1))
}

/// Prepared-spell limit across all preparing classes, or `None` if no class
/// prepares.
pub fn total_prepared_limit(
    classes: &[ClassLevel],
    overrides: &ProgressionOverrides,
    scores: &AbilityScores,
) -> Option<u32> {
    classes
        .iter()
        .filter_map(|c| max_prepared_spells(c, overrides.for_class(c), scores))
        .reduce(u32::saturating_add)
}

/// Prepared spells that count against the limit. Cantrips never do.
pub fn prepared_spell_count(spells: &SpellBook) -> usize {
    spells
        .prepared_spells
        .iter()
        .filter(|prepared| {
            !spells.cantrips.iter().any(|cantrip| {
                cantrip.name.trim().eq_ignore_ascii_case(prepared.name.trim())
                    && cantrip.source.trim().eq_ignore_ascii_case(prepared.source.trim())
            })
        })
        .count()
}

/// Never true when there is no prepared-spell limit.
pub fn is_at_prepared_limit(count: usize, limit: Option<u32>) -> bool {
    match limit {
        Some(limit) => u32::try_from(count).map_or(true, |count| count >= limit),
        None => false,
    }
}

// ============================================================================
// Slot usage
// ============================================================================

/// Available and remaining slots at one spell level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotUsage {
    pub level: u8,
    pub max: u32,
    pub current: u32,
}

/// Merge the computed slot table with persisted slot counters.
///
/// `max` always comes from the computed table. Persisted `current` values
/// are clamped into `0..=max`; levels with nothing persisted are full.
pub fn slot_usage(
    table: &SpellSlotTable,
    persisted: &BTreeMap<u8, SlotState>,
) -> Vec<SlotUsage> {
    (1u8..=9)
        .filter_map(|level| {
            let max = table.get(level);
            if max == 0 {
                return None;
            }
            let current = persisted
                .get(&level)
                .map(|state| u32::try_from(state.current.max(0)).unwrap_or(0).min(max))
                .unwrap_or(max);
            Some(SlotUsage {
                level,
                max,
                current,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::SpellReference;

    fn none() -> ProgressionOverrides {
        ProgressionOverrides::new()
    }

    #[test]
    fn test_is_spellcaster() {
        assert!(is_spellcaster(&[ClassLevel::new("Wizard", 1)]));
        assert!(is_spellcaster(&[
            ClassLevel::new("Fighter", 5),
            ClassLevel::new("warlock", 1)
        ]));
        assert!(!is_spellcaster(&[ClassLevel::new("Barbarian", 5)]));
        assert!(!is_spellcaster(&[]));
    }

    #[test]
    fn test_spellcasting_ability_from_primary_class() {
        let classes = [ClassLevel::new("Cleric", 3), ClassLevel::new("Wizard", 2)];
        assert_eq!(spellcasting_ability(&classes, &none()), Some(Ability::Wisdom));

        let ek = [ClassLevel::new("Fighter", 3).with_subclass("Eldritch Knight", "PHB")];
        assert_eq!(spellcasting_ability(&ek, &none()), Some(Ability::Intelligence));

        assert_eq!(spellcasting_ability(&[ClassLevel::new("Monk", 3)], &none()), None);
        assert_eq!(spellcasting_ability(&[], &none()), None);
    }

    #[test]
    fn test_spellcasting_ability_override_wins() {
        let classes = [ClassLevel::new("Artificer", 3).with_source("TCE")];
        let overrides = none().with(
            "Artificer",
            "TCE",
            ClassProgression::new().with_ability(Ability::Intelligence),
        );
        assert_eq!(spellcasting_ability(&classes, &overrides), Some(Ability::Intelligence));
    }

    #[test]
    fn test_dc_and_attack() {
        let scores = AbilityScores::new(10, 10, 10, 18, 10, 10);
        assert_eq!(spell_save_dc(Some(Ability::Intelligence), &scores, 3), 15);
        assert_eq!(spell_attack_bonus(Some(Ability::Intelligence), &scores, 3), 7);
        assert_eq!(spell_save_dc(None, &scores, 3), 10);
        assert_eq!(spell_attack_bonus(None, &scores, 3), 0);
    }

    #[test]
    fn test_multiclass_caster_level() {
        let classes = [ClassLevel::new("Paladin", 4), ClassLevel::new("Sorcerer", 3)];
        assert_eq!(multiclass_caster_level(&classes, &none()), 5);

        let third = [
            ClassLevel::new("Fighter", 7).with_subclass("Eldritch Knight", "PHB"),
            ClassLevel::new("Wizard", 1),
        ];
        assert_eq!(multiclass_caster_level(&third, &none()), 3);

        let warlock = [ClassLevel::new("Warlock", 5)];
        assert_eq!(multiclass_caster_level(&warlock, &none()), 0);
    }

    #[test]
    fn test_caster_level_uses_override() {
        let classes = [ClassLevel::new("Artificer", 6).with_source("TCE")];
        assert_eq!(multiclass_caster_level(&classes, &none()), 0);

        let overrides = none().with(
            "Artificer",
            "TCE",
            ClassProgression::new().with_caster(CasterProgression::Half),
        );
        assert_eq!(multiclass_caster_level(&classes, &overrides), 3);
    }

    #[test]
    fn test_max_spell_level() {
        let expected = [
            (0, 0),
            (1, 1),
            (2, 1),
            (3, 2),
            (4, 2),
            (5, 3),
            (6, 3),
            (7, 4),
            (9, 5),
            (11, 6),
            (13, 7),
            (15, 8),
            (16, 8),
            (17, 9),
            (20, 9),
            (-1, 0),
        ];
        for (caster_level, spell_level) in expected {
            assert_eq!(max_spell_level(caster_level), spell_level, "caster level {caster_level}");
        }
    }

    #[test]
    fn test_spell_slots_standard_table() {
        let classes = [ClassLevel::new("Paladin", 4), ClassLevel::new("Sorcerer", 3)];
        let table = spell_slots(&classes, &none());
        assert_eq!(table.combined, [4, 3, 2, 0, 0, 0, 0, 0, 0]);
        assert!(table.pact.is_none());
        assert_eq!(table.highest_level(), 3);
        assert_eq!(table.to_string(), "1:4 2:3 3:2");
    }

    #[test]
    fn test_pact_magic_is_added() {
        let classes = [ClassLevel::new("Warlock", 3), ClassLevel::new("Wizard", 3)];
        let table = spell_slots(&classes, &none());
        assert_eq!(table.pact, Some(PactSlots { count: 2, level: 2 }));
        assert_eq!(table.get(1), 4);
        assert_eq!(table.get(2), 4);
        assert_eq!(table.standard()[1], 2);
    }

    #[test]
    fn test_pure_warlock_slots() {
        let table = spell_slots(&[ClassLevel::new("Warlock", 11)], &none());
        assert_eq!(table.get(5), 3);
        assert_eq!(table.total(), 3);
        assert_eq!(table.highest_level(), 5);
        assert_eq!(table.standard(), [0; 9]);
    }

    #[test]
    fn test_non_caster_has_no_slots() {
        let table = spell_slots(&[ClassLevel::new("Barbarian", 20)], &none());
        assert!(table.is_empty());
        assert_eq!(table.to_string(), "none");
    }

    #[test]
    fn test_cantrips_fallback() {
        assert_eq!(cantrips_known(&ClassLevel::new("Wizard", 1), None), 3);
        assert_eq!(cantrips_known(&ClassLevel::new("Wizard", 10), None), 5);
        assert_eq!(cantrips_known(&ClassLevel::new("Sorcerer", 4), None), 5);
        assert_eq!(cantrips_known(&ClassLevel::new("Warlock", 1), None), 2);
        assert_eq!(cantrips_known(&ClassLevel::new("Paladin", 5), None), 0);
        assert_eq!(cantrips_known(&ClassLevel::new("Fighter", 5), None), 0);
    }

    #[test]
    fn test_override_array_wins_then_falls_back() {
        let bard = ClassLevel::new("Bard", 3);
        let progression = ClassProgression::new()
            .with_cantrips(vec![5, 5, 6])
            .with_spells_known(vec![1, 1, 1]);

        assert_eq!(cantrips_known(&bard, Some(&progression)), 6);
        assert_eq!(spells_known(&bard, Some(&progression)), SpellLimit::Known(1));

        assert_eq!(cantrips_known(&bard, None), 2);
        assert_eq!(spells_known(&bard, None), SpellLimit::Known(6));
    }

    #[test]
    fn test_short_override_array_reuses_last_entry() {
        let sorcerer = ClassLevel::new("Sorcerer", 12);
        let progression = ClassProgression::new().with_cantrips(vec![4, 4, 4, 5]);
        assert_eq!(cantrips_known(&sorcerer, Some(&progression)), 5);
    }

    #[test]
    fn test_full_list_casters_are_unlimited() {
        for level in 1..=20 {
            let wizard = ClassLevel::new("Wizard", level);
            let limit = spells_known(&wizard, None);
            assert_eq!(limit, SpellLimit::Unlimited);
            assert!(!is_at_spell_limit(1000, limit));
        }
        assert_eq!(spells_known(&ClassLevel::new("Paladin", 2), None), SpellLimit::Unlimited);
    }

    #[test]
    fn test_spells_known_tables() {
        assert_eq!(spells_known(&ClassLevel::new("Sorcerer", 1), None), SpellLimit::Known(2));
        assert_eq!(spells_known(&ClassLevel::new("Ranger", 1), None), SpellLimit::Known(0));
        assert_eq!(spells_known(&ClassLevel::new("Ranger", 2), None), SpellLimit::Known(2));
        assert_eq!(spells_known(&ClassLevel::new("Monk", 10), None), SpellLimit::Known(0));
        assert_eq!(spells_known(&ClassLevel::new("Homebrew", 10), None), SpellLimit::Known(0));
        let at = ClassLevel::new("Rogue", 3).with_subclass("Arcane Trickster", "PHB");
        assert_eq!(spells_known(&at, None), SpellLimit::Known(3));
    }

    #[test]
    fn test_character_limits() {
        let classes = [ClassLevel::new("Bard", 2), ClassLevel::new("Sorcerer", 1)];
        assert_eq!(total_cantrips_known(&classes, &none()), 6);
        assert_eq!(total_spells_known(&classes, &none()), SpellLimit::Known(7));

        let with_cleric = [ClassLevel::new("Bard", 2), ClassLevel::new("Cleric", 1)];
        assert_eq!(total_spells_known(&with_cleric, &none()), SpellLimit::Unlimited);
    }

    #[test]
    fn test_limit_checks() {
        assert!(is_at_cantrip_limit(3, 3));
        assert!(!is_at_cantrip_limit(2, 3));
        assert!(is_at_spell_limit(6, SpellLimit::Known(6)));
        assert!(!is_at_spell_limit(5, SpellLimit::Known(6)));
    }

    #[test]
    fn test_catalog_backed_artificer_prepares() {
        let artificer = ClassLevel::new("Artificer", 5).with_source("TCE");
        assert_eq!(spells_known(&artificer, None), SpellLimit::Known(0));
        assert!(!prepares_spells(&artificer, None));

        let progression = ClassProgression::new()
            .with_caster(CasterProgression::Half)
            .with_ability(Ability::Intelligence);
        assert!(prepares_spells(&artificer, Some(&progression)));
        let limit = spells_known(&artificer, Some(&progression));
        assert_eq!(limit, SpellLimit::Unlimited);
        assert!(!is_at_spell_limit(40, limit));

        // A known-spells array still caps it.
        let capped = progression.with_spells_known(vec![4; 20]);
        assert!(!prepares_spells(&artificer, Some(&capped)));
        assert_eq!(spells_known(&artificer, Some(&capped)), SpellLimit::Known(4));
    }

    #[test]
    fn test_max_prepared_spells() {
        let scores = AbilityScores::new(10, 10, 10, 18, 8, 14);
        assert_eq!(max_prepared_spells(&ClassLevel::new("Wizard", 5), None, &scores), Some(9));
        assert_eq!(max_prepared_spells(&ClassLevel::new("Paladin", 2), None, &scores), Some(4));
        // WIS 8 at level 1 would be 0; the floor is 1.
        assert_eq!(max_prepared_spells(&ClassLevel::new("Cleric", 1), None, &scores), Some(1));
        assert_eq!(max_prepared_spells(&ClassLevel::new("Sorcerer", 5), None, &scores), None);
        assert_eq!(max_prepared_spells(&ClassLevel::new("Fighter", 5), None, &scores), None);
        let ek = ClassLevel::new("Fighter", 3).with_subclass("Eldritch Knight", "PHB");
        assert_eq!(max_prepared_spells(&ek, None, &scores), None);
    }

    #[test]
    fn test_max_prepared_spells_huge_level() {
        let scores = AbilityScores::new(10, 10, 10, 20, 10, 10);
        let wizard = ClassLevel::new("Wizard", i32::MAX);
        assert_eq!(max_prepared_spells(&wizard, None, &scores), Some(i32::MAX as u32));
    }

    #[test]
    fn test_prepared_limit_across_classes() {
        let scores = AbilityScores::new(10, 10, 10, 16, 14, 10);
        let classes = [
            ClassLevel::new("Wizard", 3),
            ClassLevel::new("Cleric", 2),
            ClassLevel::new("Bard", 1),
        ];
        assert_eq!(total_prepared_limit(&classes, &none(), &scores), Some(6 + 4));
        let learners = [ClassLevel::new("Bard", 3), ClassLevel::new("Warlock", 2)];
        assert_eq!(total_prepared_limit(&learners, &none(), &scores), None);
    }

    #[test]
    fn test_prepared_count_skips_cantrips() {
        let spells = SpellBook {
            cantrips: vec![SpellReference::new("Light", "PHB")],
            prepared_spells: vec![
                SpellReference::new("light", "phb"),
                SpellReference::new("Bless", "PHB"),
                SpellReference::new("Light", "XPHB"),
            ],
            ..SpellBook::default()
        };
        assert_eq!(prepared_spell_count(&spells), 2);
    }

    #[test]
    fn test_prepared_limit_checks() {
        assert!(is_at_prepared_limit(4, Some(4)));
        assert!(!is_at_prepared_limit(3, Some(4)));
        assert!(!is_at_prepared_limit(usize::MAX, None));
    }

    #[test]
    fn test_slot_usage() {
        let table = spell_slots(&[ClassLevel::new("Wizard", 3)], &none());
        let mut persisted = BTreeMap::new();
        persisted.insert(1, SlotState { max: 4, current: 1 });
        persisted.insert(2, SlotState { max: 2, current: 7 });
        persisted.insert(5, SlotState { max: 1, current: 1 });

        let usage = slot_usage(&table, &persisted);
        assert_eq!(
            usage,
            vec![
                SlotUsage { level: 1, max: 4, current: 1 },
                SlotUsage { level: 2, max: 2, current: 2 },
            ]
        );
    }

    #[test]
    fn test_slot_usage_defaults_to_full() {
        let table = spell_slots(&[ClassLevel::new("Cleric", 1)], &none());
        let usage = slot_usage(&table, &BTreeMap::new());
        assert_eq!(usage, vec![SlotUsage { level: 1, max: 2, current: 2 }]);
    }
}
