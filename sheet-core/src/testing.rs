//! Testing utilities for the sheet engine.
//!
//! This module provides tools for integration testing:
//! - `MockCatalog` for deterministic catalog lookups without a network
//! - Snapshot fixtures for common character builds
//! - Catalog record fixtures in the catalog's wire format

use crate::abilities::AbilityScores;
use crate::character::{CharacterSnapshot, ClassLevel, Proficiencies};
use async_trait::async_trait;
use catalog::{Catalog, EntityKind, MemoryCatalog};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A catalog that returns scripted records and counts lookups.
///
/// Use this to observe caching and coalescing, and to inject slow or failing
/// lookups.
#[derive(Default)]
pub struct MockCatalog {
    /// Records served by the mock.
    records: MemoryCatalog,
    /// Number of lookups received, including failed ones.
    calls: AtomicUsize,
    /// Delay applied to every lookup.
    latency: Option<Duration>,
    /// Fail every lookup with a network error.
    fail: bool,
}

impl MockCatalog {
    /// Create an empty mock. Every lookup answers "not found".
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class record.
    pub fn with_class(mut self, name: &str, source: &str, record: serde_json::Value) -> Self {
        self.records = self.records.with_entry(EntityKind::Class, name, source, record);
        self
    }

    /// Delay every lookup.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every lookup fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// How many lookups the mock has received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn lookup(
        &self,
        kind: EntityKind,
        name: &str,
        source: &str,
    ) -> Result<Option<serde_json::Value>, catalog::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail {
            return Err(catalog::Error::Network(format!(
                "mock catalog unavailable for {kind} {name} ({source})"
            )));
        }

        self.records.lookup(kind, name, source).await
    }
}

// ============================================================================
// Catalog record fixtures
// ============================================================================

/// Wizard class record with full-caster progression and cantrip table.
pub fn wizard_record() -> serde_json::Value {
    json!({
        "name": "Wizard",
        "source": "PHB",
        "hd": { "number": 1, "faces": 6 },
        "spellcastingAbility": "int",
        "casterProgression": "full",
        "cantripProgression": [3, 3, 3, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5]
    })
}

/// Artificer class record. Without it, the engine treats Artificer as a
/// non-caster.
pub fn artificer_record() -> serde_json::Value {
    json!({
        "name": "Artificer",
        "source": "TCE",
        "hd": { "number": 1, "faces": 8 },
        "spellcastingAbility": "int",
        "casterProgression": "artificer",
        "cantripProgression": [2, 2, 2, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4]
    })
}

// ============================================================================
// Snapshot fixtures
// ============================================================================

/// Level 1 human fighter with chain mail, longsword and shield.
pub fn sample_fighter() -> CharacterSnapshot {
    CharacterSnapshot::new("Roland")
        .with_abilities(AbilityScores::new(16, 14, 15, 10, 12, 8))
        .with_class(ClassLevel::new("Fighter", 1).with_hit_dice("d10", 1))
        .with_proficiencies(
            Proficiencies::new()
                .with_save("Strength")
                .with_save("Constitution")
                .with_skill("Athletics")
                .with_skill("Perception"),
        )
        .with_armor("Chain Mail")
        .with_shield("Shield")
        .with_main_hand("Longsword")
}

/// Level 5 wizard with no armor and a quarterstaff.
pub fn sample_wizard() -> CharacterSnapshot {
    CharacterSnapshot::new("Elara")
        .with_abilities(AbilityScores::new(8, 14, 14, 18, 12, 10))
        .with_class(ClassLevel::new("Wizard", 5).with_hit_dice("d6", 5))
        .with_proficiencies(
            Proficiencies::new()
                .with_save("INT")
                .with_save("WIS")
                .with_skill("Arcana")
                .with_skill("Investigation"),
        )
        .with_main_hand("Quarterstaff")
}

/// Paladin 4 / Sorcerer 3.
pub fn sample_paladin_sorcerer() -> CharacterSnapshot {
    CharacterSnapshot::new("Vex")
        .with_abilities(AbilityScores::new(16, 10, 14, 8, 10, 16))
        .with_class(ClassLevel::new("Paladin", 4).with_hit_dice("d10", 4))
        .with_class(ClassLevel::new("Sorcerer", 3).with_hit_dice("d6", 3))
        .with_proficiencies(Proficiencies::new().with_save("WIS").with_save("CHA"))
        .with_armor("Chain Mail")
        .with_main_hand("Longsword")
}

/// Warlock 3 / Wizard 3.
pub fn sample_warlock_wizard() -> CharacterSnapshot {
    CharacterSnapshot::new("Morrow")
        .with_abilities(AbilityScores::new(8, 14, 12, 16, 10, 16))
        .with_class(ClassLevel::new("Warlock", 3).with_hit_dice("d8", 3))
        .with_class(ClassLevel::new("Wizard", 3).with_hit_dice("d6", 3))
        .with_proficiencies(Proficiencies::new().with_save("WIS").with_save("CHA"))
}
