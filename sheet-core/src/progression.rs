//! Per-class progression data supplied by the catalog.
//!
//! A [`ClassProgression`] is the subset of a catalog class record the
//! spellcasting rules care about. When a field is present it overrides the
//! built-in tables in [`crate::class_data`].

use crate::abilities::Ability;
use crate::character::ClassLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// How a class contributes to the multiclass caster level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasterProgression {
    Full,
    Half,
    Third,
    /// Pact Magic. Tracked separately from the shared slot table.
    Pact,
    None,
}

impl CasterProgression {
    /// Parse a catalog `casterProgression` value.
    ///
    /// Returns `None` for values this engine has no rule for.
    pub fn from_catalog(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "full" => Some(CasterProgression::Full),
            "1/2" | "half" | "artificer" => Some(CasterProgression::Half),
            "1/3" | "third" => Some(CasterProgression::Third),
            "pact" => Some(CasterProgression::Pact),
            "none" => Some(CasterProgression::None),
            _ => None,
        }
    }

    /// Caster levels contributed by `level` levels in a class with this
    /// progression.
    pub fn caster_levels(&self, level: i32) -> i32 {
        let level = level.max(0);
        match self {
            CasterProgression::Full => level,
            CasterProgression::Half => level / 2,
            CasterProgression::Third => level / 3,
            CasterProgression::Pact | CasterProgression::None => 0,
        }
    }
}

// ============================================================================
// Catalog records
// ============================================================================

/// Raw shape of a catalog class record. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassRecord {
    #[serde(default)]
    cantrip_progression: Option<Vec<u32>>,
    #[serde(default)]
    spells_known_progression: Option<Vec<u32>>,
    #[serde(default)]
    caster_progression: Option<String>,
    #[serde(default)]
    spellcasting_ability: Option<String>,
}

/// Catalog overrides for one class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassProgression {
    /// Cantrips known, indexed by class level minus one.
    pub cantrip_progression: Option<Vec<u32>>,
    /// Spells known, indexed by class level minus one.
    pub spells_known_progression: Option<Vec<u32>>,
    pub caster_progression: Option<CasterProgression>,
    pub spellcasting_ability: Option<Ability>,
}

impl ClassProgression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog class record.
    ///
    /// Fails only when a known field has the wrong shape. Unrecognized
    /// `casterProgression` or `spellcastingAbility` strings are treated as
    /// absent.
    pub fn from_record(record: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw = ClassRecord::deserialize(record)?;
        Ok(Self {
            cantrip_progression: raw.cantrip_progression.filter(|p| !p.is_empty()),
            spells_known_progression: raw.spells_known_progression.filter(|p| !p.is_empty()),
            caster_progression: raw
                .caster_progression
                .as_deref()
                .and_then(CasterProgression::from_catalog),
            spellcasting_ability: raw
                .spellcasting_ability
                .as_deref()
                .and_then(|a| a.parse().ok()),
        })
    }

    pub fn with_cantrips(mut self, progression: Vec<u32>) -> Self {
        self.cantrip_progression = Some(progression);
        self
    }

    pub fn with_spells_known(mut self, progression: Vec<u32>) -> Self {
        self.spells_known_progression = Some(progression);
        self
    }

    pub fn with_caster(mut self, caster: CasterProgression) -> Self {
        self.caster_progression = Some(caster);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.spellcasting_ability = Some(ability);
        self
    }
}

/// Look up a progression array entry for a class level.
///
/// The index is `min(level, len) - 1` clamped into the array, so levels past
/// the end of a short array reuse its last entry. Empty arrays yield `None`.
pub fn progression_value(progression: &[u32], level: i32) -> Option<u32> {
    let len = progression.len();
    if len == 0 {
        return None;
    }
    let level = usize::try_from(level.max(1)).unwrap_or(1);
    let index = level.min(len) - 1;
    progression.get(index).copied()
}

// ============================================================================
// Keys and override sets
// ============================================================================

/// A `(name, source)` catalog key compared case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogKey {
    pub name: String,
    pub source: String,
}

impl CatalogKey {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Key for a character's class.
    pub fn for_class(class: &ClassLevel) -> Self {
        Self::new(class.class_name.trim(), class.class_source.trim())
    }

    fn normalized(&self) -> (String, String) {
        (self.name.trim().to_lowercase(), self.source.trim().to_lowercase())
    }
}

impl PartialEq for CatalogKey {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for CatalogKey {}

impl Hash for CatalogKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.name, self.source)
    }
}

/// Resolved catalog overrides for a set of classes.
///
/// Classes without an entry use the built-in tables.
#[derive(Debug, Clone, Default)]
pub struct ProgressionOverrides {
    entries: HashMap<CatalogKey, ClassProgression>,
}

impl ProgressionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: CatalogKey, progression: ClassProgression) {
        self.entries.insert(key, progression);
    }

    pub fn with(mut self, name: &str, source: &str, progression: ClassProgression) -> Self {
        self.insert(CatalogKey::new(name, source), progression);
        self
    }

    /// Override for a character's class, if one was resolved.
    pub fn for_class(&self, class: &ClassLevel) -> Option<&ClassProgression> {
        self.entries.get(&CatalogKey::for_class(class))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_caster_progression_from_catalog() {
        assert_eq!(CasterProgression::from_catalog("full"), Some(CasterProgression::Full));
        assert_eq!(CasterProgression::from_catalog("1/2"), Some(CasterProgression::Half));
        assert_eq!(CasterProgression::from_catalog("artificer"), Some(CasterProgression::Half));
        assert_eq!(CasterProgression::from_catalog("1/3"), Some(CasterProgression::Third));
        assert_eq!(CasterProgression::from_catalog("Pact"), Some(CasterProgression::Pact));
        assert_eq!(CasterProgression::from_catalog("quarter"), None);
    }

    #[test]
    fn test_caster_levels() {
        assert_eq!(CasterProgression::Full.caster_levels(7), 7);
        assert_eq!(CasterProgression::Half.caster_levels(5), 2);
        assert_eq!(CasterProgression::Third.caster_levels(8), 2);
        assert_eq!(CasterProgression::Pact.caster_levels(10), 0);
        assert_eq!(CasterProgression::Full.caster_levels(-2), 0);
    }

    #[test]
    fn test_from_record() {
        let record = json!({
            "name": "Sorcerer",
            "source": "PHB",
            "hd": { "number": 1, "faces": 6 },
            "casterProgression": "full",
            "spellcastingAbility": "cha",
            "cantripProgression": [4, 4, 4, 5],
            "spellsKnownProgression": [2, 3, 4, 5]
        });

        let progression = ClassProgression::from_record(&record).unwrap();
        assert_eq!(progression.caster_progression, Some(CasterProgression::Full));
        assert_eq!(progression.spellcasting_ability, Some(Ability::Charisma));
        assert_eq!(progression.cantrip_progression, Some(vec![4, 4, 4, 5]));
    }

    #[test]
    fn test_from_record_empty_arrays_are_absent() {
        let record = json!({ "cantripProgression": [], "spellsKnownProgression": [] });
        let progression = ClassProgression::from_record(&record).unwrap();
        assert!(progression.cantrip_progression.is_none());
        assert!(progression.spells_known_progression.is_none());
    }

    #[test]
    fn test_from_record_rejects_wrong_shape() {
        let record = json!({ "cantripProgression": "lots" });
        assert!(ClassProgression::from_record(&record).is_err());
    }

    #[test]
    fn test_progression_value_indexing() {
        let table = [2, 2, 3, 4];
        assert_eq!(progression_value(&table, 1), Some(2));
        assert_eq!(progression_value(&table, 3), Some(3));
        assert_eq!(progression_value(&table, 9), Some(4));
        assert_eq!(progression_value(&table, 0), Some(2));
        assert_eq!(progression_value(&[], 5), None);
    }

    #[test]
    fn test_catalog_key_is_case_insensitive() {
        let mut overrides = ProgressionOverrides::new();
        overrides.insert(
            CatalogKey::new("Wizard", "PHB"),
            ClassProgression::new().with_caster(CasterProgression::Full),
        );

        let class = ClassLevel::new("wizard", 3).with_source("phb");
        assert!(overrides.for_class(&class).is_some());
        assert_eq!(CatalogKey::new("Bard", "PHB"), CatalogKey::new(" bard", "phb "));
    }
}
