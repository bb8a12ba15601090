//! Multiclass ability score prerequisites.

use crate::abilities::{Ability, AbilityScores};
use crate::class_data::{KnownClass, Prerequisite, MULTICLASS_MINIMUM};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ability score below the multiclass minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetRequirement {
    /// Abilities that would satisfy the requirement. More than one means any
    /// of them would do.
    pub abilities: Vec<Ability>,
    pub minimum: i32,
}

impl fmt::Display for UnmetRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.abilities.iter().map(|a| a.abbreviation()).collect();
        write!(f, "{} {}", names.join(" or "), self.minimum)
    }
}

/// Result of checking whether a character may take levels in a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub class_name: String,
    pub unmet: Vec<UnmetRequirement>,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        self.unmet.is_empty()
    }
}

/// Check the ability score prerequisites for a class.
///
/// Classes without a built-in prerequisite are always eligible.
pub fn check_prerequisites(class_name: &str, scores: &AbilityScores) -> Eligibility {
    let meets = |ability: &Ability| scores.get(*ability) >= MULTICLASS_MINIMUM;

    let unmet = match KnownClass::from_name(class_name).map(|c| c.data().prerequisite) {
        Some(Prerequisite::All(abilities)) => abilities
            .iter()
            .filter(|a| !meets(*a))
            .map(|a| UnmetRequirement {
                abilities: vec![*a],
                minimum: MULTICLASS_MINIMUM,
            })
            .collect(),
        Some(Prerequisite::Any(abilities)) if !abilities.iter().any(meets) => {
            vec![UnmetRequirement {
                abilities: abilities.to_vec(),
                minimum: MULTICLASS_MINIMUM,
            }]
        }
        _ => Vec::new(),
    };

    Eligibility {
        class_name: class_name.to_string(),
        unmet,
    }
}
