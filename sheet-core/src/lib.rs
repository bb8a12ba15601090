//! D&D 5e character mechanics engine.
//!
//! This crate provides:
//! - Ability, proficiency and skill arithmetic
//! - Armor class, initiative and weapon attacks from free-text equipment
//! - Spellcasting derivation for single and multiclass characters,
//!   including Pact Magic and known-spell limits
//! - Cached, single-flight resolution of class data from a rules catalog
//!
//! # Quick Start
//!
//! ```ignore
//! use sheet_core::{CharacterSnapshot, ResolverConfig, SheetEngine};
//! use catalog::HttpCatalog;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Arc::new(HttpCatalog::from_env()?);
//!     let engine = SheetEngine::new(catalog, ResolverConfig::from_env());
//!
//!     let snapshot: CharacterSnapshot =
//!         serde_json::from_str(&std::fs::read_to_string("elara.json")?)?;
//!     let sheet = engine.derive(&snapshot).await;
//!
//!     println!("{} - AC {}", sheet.name, sheet.armor_class);
//!     Ok(())
//! }
//! ```

pub mod abilities;
pub mod character;
pub mod class_data;
pub mod combat;
pub mod items;
pub mod multiclass;
pub mod progression;
pub mod resolver;
pub mod session;
pub mod sheet;
pub mod spellcasting;
pub mod testing;
pub mod vitals;

// Primary public API
pub use abilities::{Ability, AbilityScores, ProficiencyLevel, Skill};
pub use character::{CharacterId, CharacterSnapshot, ClassLevel, Proficiencies, SpellReference};
pub use progression::{CasterProgression, CatalogKey, ClassProgression, ProgressionOverrides};
pub use resolver::{ProgressionResolver, ResolveError, ResolverConfig};
pub use session::SheetEngine;
pub use sheet::{derive_sheet, DerivedSheet};
pub use spellcasting::{SpellLimit, SpellSlotTable};
pub use testing::MockCatalog;
