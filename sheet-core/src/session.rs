//! SheetEngine - the primary public API for deriving character sheets.
//!
//! This module wraps the progression resolver and the pure derivers into a
//! single async interface: resolve catalog overrides for a snapshot's
//! classes, then derive the sheet.

use crate::character::CharacterSnapshot;
use crate::multiclass::{check_prerequisites, Eligibility};
use crate::progression::ProgressionOverrides;
use crate::resolver::{ProgressionResolver, ResolverConfig};
use crate::sheet::{derive_sheet, DerivedSheet};
use catalog::Catalog;
use std::sync::Arc;

/// Derives character sheets using catalog data when it is available.
///
/// Cheap to share: clone the `Arc` it lives in, not the engine. The resolver
/// cache lives as long as the engine.
pub struct SheetEngine {
    resolver: ProgressionResolver,
}

impl SheetEngine {
    /// Create an engine over a catalog.
    pub fn new(catalog: Arc<dyn Catalog>, config: ResolverConfig) -> Self {
        Self {
            resolver: ProgressionResolver::with_config(catalog, config),
        }
    }

    /// Create an engine with configuration from the environment.
    pub fn from_env(catalog: Arc<dyn Catalog>) -> Self {
        Self::new(catalog, ResolverConfig::from_env())
    }

    pub fn resolver(&self) -> &ProgressionResolver {
        &self.resolver
    }

    /// Catalog overrides for a snapshot's classes.
    pub async fn overrides(&self, snapshot: &CharacterSnapshot) -> ProgressionOverrides {
        self.resolver.resolve_for_classes(&snapshot.classes).await
    }

    /// Resolve overrides and derive the full sheet.
    pub async fn derive(&self, snapshot: &CharacterSnapshot) -> DerivedSheet {
        let overrides = self.overrides(snapshot).await;
        tracing::debug!(
            character = %snapshot.id,
            classes = snapshot.classes.len(),
            overrides = overrides.len(),
            "deriving sheet"
        );
        derive_sheet(snapshot, &overrides)
    }

    /// Whether the character may take levels in `class_name`.
    pub fn can_multiclass_into(
        &self,
        snapshot: &CharacterSnapshot,
        class_name: &str,
    ) -> Eligibility {
        check_prerequisites(class_name, &snapshot.abilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{Ability, AbilityScores};
    use crate::character::{ClassLevel, SpellReference};
    use crate::spellcasting::SpellLimit;
    use crate::testing::{artificer_record, sample_wizard, MockCatalog};

    #[tokio::test]
    async fn test_derive_without_catalog_data() {
        let engine = SheetEngine::new(Arc::new(MockCatalog::new()), ResolverConfig::default());
        let sheet = engine.derive(&sample_wizard()).await;

        assert_eq!(sheet.total_level, 5);
        assert_eq!(sheet.spellcasting.unwrap().caster_level, 5);
    }

    #[tokio::test]
    async fn test_derive_uses_catalog_overrides() {
        let catalog =
            Arc::new(MockCatalog::new().with_class("Artificer", "TCE", artificer_record()));
        let engine = SheetEngine::new(catalog.clone(), ResolverConfig::default());

        let snapshot = CharacterSnapshot::new("Tink")
            .with_abilities(AbilityScores::new(8, 14, 14, 16, 12, 10))
            .with_class(ClassLevel::new("Artificer", 4).with_source("TCE"));

        let sheet = engine.derive(&snapshot).await;
        let spells = sheet.spellcasting.unwrap();
        assert_eq!(spells.ability, Some(Ability::Intelligence));
        assert_eq!(spells.caster_level, 2);
        assert_eq!(spells.cantrips_known, 2);
        assert_eq!(spells.save_dc, 13);

        engine.derive(&snapshot).await;
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_catalog_artificer_prepares_spells() {
        let catalog =
            Arc::new(MockCatalog::new().with_class("Artificer", "TCE", artificer_record()));
        let engine = SheetEngine::new(catalog, ResolverConfig::default());

        let mut snapshot = CharacterSnapshot::new("Tink")
            .with_abilities(AbilityScores::new(8, 14, 14, 16, 12, 10))
            .with_class(ClassLevel::new("Artificer", 5).with_source("TCE"));
        snapshot.spells.known_spells = vec![
            SpellReference::new("Cure Wounds", "PHB"),
            SpellReference::new("Faerie Fire", "PHB"),
        ];
        snapshot.spells.prepared_spells = snapshot.spells.known_spells.clone();

        let spells = engine.derive(&snapshot).await.spellcasting.unwrap();
        assert_eq!(spells.spells_known, SpellLimit::Unlimited);
        assert!(!spells.at_spell_limit);
        assert_eq!(spells.prepared_limit, Some(3 + 5));
        assert_eq!(spells.prepared_count, 2);
        assert!(!spells.at_prepared_limit);
    }

    #[test]
    fn test_can_multiclass_into() {
        let engine = SheetEngine::new(Arc::new(MockCatalog::new()), ResolverConfig::default());
        let wizard = sample_wizard();
        assert!(!engine.can_multiclass_into(&wizard, "Barbarian").is_eligible());
        assert!(engine.can_multiclass_into(&wizard, "Artificer").is_eligible());
    }
}
