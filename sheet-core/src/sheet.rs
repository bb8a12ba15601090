//! The full derived character sheet.
//!
//! [`derive_sheet`] is the single entry point every view uses. It is pure:
//! the same snapshot and overrides always give the same sheet.

use crate::abilities::{format_signed, modifier, Ability, ProficiencyLevel, Skill};
use crate::character::{CharacterId, CharacterSnapshot};
use crate::combat::{self, ArmorClassSummary, Attack};
use crate::progression::ProgressionOverrides;
use crate::spellcasting::{self, SlotUsage, SpellLimit, SpellSlotTable};
use crate::vitals::{self, Vitals};
use serde::{Deserialize, Serialize};

/// One row of the ability block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityLine {
    pub ability: Ability,
    pub score: i32,
    pub modifier: i32,
    pub save_bonus: i32,
    pub save_proficient: bool,
}

impl AbilityLine {
    /// e.g. `STR 16 (+3)`.
    pub fn display(&self) -> String {
        format!(
            "{} {} ({})",
            self.ability.abbreviation(),
            self.score,
            format_signed(self.modifier)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLine {
    pub skill: Skill,
    pub ability: Ability,
    pub bonus: i32,
    pub proficiency: ProficiencyLevel,
}

/// Spellcasting block, present only for casters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellcastingSummary {
    pub ability: Option<Ability>,
    pub save_dc: i32,
    pub attack_bonus: i32,
    pub caster_level: i32,
    /// Highest spell level from either the shared table or Pact Magic.
    pub max_spell_level: i32,
    pub slots: SpellSlotTable,
    pub slot_usage: Vec<SlotUsage>,
    pub cantrips_known: u32,
    pub cantrip_count: usize,
    pub at_cantrip_limit: bool,
    pub spells_known: SpellLimit,
    pub spell_count: usize,
    pub at_spell_limit: bool,
    /// `None` when no class prepares spells.
    pub prepared_limit: Option<u32>,
    /// Prepared spells, not counting cantrips.
    pub prepared_count: usize,
    pub at_prepared_limit: bool,
}

/// Every derived value for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedSheet {
    pub character_id: CharacterId,
    pub name: String,
    /// e.g. `Paladin 4 / Sorcerer 3`.
    pub classes: String,
    pub total_level: i32,
    pub proficiency_bonus: i32,
    pub abilities: Vec<AbilityLine>,
    pub skills: Vec<SkillLine>,
    pub armor_class: ArmorClassSummary,
    pub initiative: i32,
    pub passive_perception: i32,
    pub attacks: Vec<Attack>,
    pub vitals: Vitals,
    pub spellcasting: Option<SpellcastingSummary>,
}

impl DerivedSheet {
    pub fn ability(&self, ability: Ability) -> Option<&AbilityLine> {
        self.abilities.iter().find(|line| line.ability == ability)
    }

    pub fn skill(&self, skill: Skill) -> Option<&SkillLine> {
        self.skills.iter().find(|line| line.skill == skill)
    }
}

pub fn derive_sheet(
    snapshot: &CharacterSnapshot,
    overrides: &ProgressionOverrides,
) -> DerivedSheet {
    let scores = &snapshot.abilities;

    let abilities = Ability::all()
        .into_iter()
        .map(|ability| {
            let score = scores.get(ability);
            AbilityLine {
                ability,
                score,
                modifier: modifier(score),
                save_bonus: combat::save_bonus(snapshot, ability, score),
                save_proficient: snapshot.proficiencies.is_save_proficient(ability),
            }
        })
        .collect();

    let skills = Skill::all()
        .into_iter()
        .map(|skill| SkillLine {
            skill,
            ability: skill.ability(),
            bonus: combat::skill_bonus(snapshot, skill, scores.get(skill.ability())),
            proficiency: snapshot.proficiencies.skill_level(skill),
        })
        .collect();

    DerivedSheet {
        character_id: snapshot.id,
        name: snapshot.name.clone(),
        classes: vitals::class_summary(&snapshot.classes),
        total_level: snapshot.total_level(),
        proficiency_bonus: snapshot.proficiency_bonus(),
        abilities,
        skills,
        armor_class: combat::armor_class(snapshot),
        initiative: combat::initiative(snapshot),
        passive_perception: combat::passive_perception(snapshot),
        attacks: combat::attacks(snapshot),
        vitals: vitals::vitals(&snapshot.classes, scores.modifier(Ability::Constitution)),
        spellcasting: spellcasting_summary(snapshot, overrides),
    }
}

fn spellcasting_summary(
    snapshot: &CharacterSnapshot,
    overrides: &ProgressionOverrides,
) -> Option<SpellcastingSummary> {
    let classes = &snapshot.classes;
    let caster_level = spellcasting::multiclass_caster_level(classes, overrides);
    if !spellcasting::is_spellcaster(classes) && caster_level <= 0 {
        return None;
    }

    let pb = snapshot.proficiency_bonus();
    let ability = spellcasting::spellcasting_ability(classes, overrides);
    let slots = spellcasting::spell_slots(classes, overrides);
    let cantrips_known = spellcasting::total_cantrips_known(classes, overrides);
    let spells_known = spellcasting::total_spells_known(classes, overrides);
    let cantrip_count = snapshot.spells.cantrips.len();
    let spell_count = snapshot.spells.known_spells.len();
    let prepared_limit =
        spellcasting::total_prepared_limit(classes, overrides, &snapshot.abilities);
    let prepared_count = spellcasting::prepared_spell_count(&snapshot.spells);

    Some(SpellcastingSummary {
        ability,
        save_dc: spellcasting::spell_save_dc(ability, &snapshot.abilities, pb),
        attack_bonus: spellcasting::spell_attack_bonus(ability, &snapshot.abilities, pb),
        caster_level,
        max_spell_level: spellcasting::max_spell_level(caster_level).max(slots.highest_level()),
        slot_usage: spellcasting::slot_usage(&slots, &snapshot.spells.spell_slots),
        slots,
        cantrips_known,
        cantrip_count,
        at_cantrip_limit: spellcasting::is_at_cantrip_limit(cantrip_count, cantrips_known),
        spells_known,
        spell_count,
        at_spell_limit: spellcasting::is_at_spell_limit(spell_count, spells_known),
        prepared_limit,
        prepared_count,
        at_prepared_limit: spellcasting::is_at_prepared_limit(prepared_count, prepared_limit),
    })
}
