//! Hit points and hit dice.

use crate::character::ClassLevel;
use crate::class_data::{KnownClass, DEFAULT_HIT_DIE};
use serde::{Deserialize, Serialize};

/// Hit die size for a class.
///
/// The stored `hit_dice_type` ("d10", "1d10" or "10") wins; otherwise the
/// class table is used.
pub fn hit_die(class: &ClassLevel) -> i32 {
    parse_hit_die(&class.hit_dice_type).unwrap_or_else(|| {
        KnownClass::from_name(&class.class_name)
            .map(|c| c.data().hit_die)
            .unwrap_or(DEFAULT_HIT_DIE)
    })
}

fn parse_hit_die(text: &str) -> Option<i32> {
    let text = text.trim().to_lowercase();
    let faces = match text.split_once('d') {
        Some((_, faces)) => faces,
        None => text.as_str(),
    };
    faces.trim().parse::<i32>().ok().filter(|f| *f > 0)
}

/// Maximum hit points using average rolls after first level.
///
/// The primary class's first level gives the full die. Every other level
/// gives `die / 2 + 1`. CON applies per level. The total is at least 1 when
/// the character has any levels.
pub fn max_hit_points(classes: &[ClassLevel], con_mod: i32) -> i32 {
    if classes.iter().all(|c| c.level <= 0) {
        return 0;
    }

    let con_mod = i64::from(con_mod);
    let total: i64 = classes
        .iter()
        .enumerate()
        .filter(|(_, class)| class.level > 0)
        .map(|(index, class)| {
            let levels = i64::from(class.level);
            let die = i64::from(hit_die(class));
            let average = die / 2 + 1;
            if index == 0 {
                die + (levels - 1) * average + levels * con_mod
            } else {
                levels * (average + con_mod)
            }
        })
        .fold(0, i64::saturating_add);
    i32::try_from(total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)))
        .unwrap_or(i32::MAX)
        .max(1)
}

/// Hit dice pools across all classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDiceSummary {
    /// e.g. `5d10 + 3d8`.
    pub dice: String,
    pub total: i32,
    pub remaining: i32,
}

pub fn hit_dice_summary(classes: &[ClassLevel]) -> HitDiceSummary {
    let dice = classes
        .iter()
        .filter(|c| c.level > 0)
        .map(|c| format!("{}d{}", c.level, hit_die(c)))
        .collect::<Vec<_>>()
        .join(" + ");
    HitDiceSummary {
        dice,
        total: classes.iter().map(|c| c.level.max(0)).sum(),
        remaining: classes
            .iter()
            .map(|c| c.hit_dice_remaining.clamp(0, c.level.max(0)))
            .sum(),
    }
}

/// Display form such as `Fighter (Champion) 3 / Wizard 2`.
pub fn class_summary(classes: &[ClassLevel]) -> String {
    classes
        .iter()
        .map(|c| match &c.subclass_name {
            Some(sub) if !sub.trim().is_empty() => {
                format!("{} ({}) {}", c.class_name, sub, c.level)
            }
            _ => format!("{} {}", c.class_name, c.level),
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Hit points and hit dice together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub max_hit_points: i32,
    pub hit_dice: HitDiceSummary,
}

pub fn vitals(classes: &[ClassLevel], con_mod: i32) -> Vitals {
    Vitals {
        max_hit_points: max_hit_points(classes, con_mod),
        hit_dice: hit_dice_summary(classes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_die_parsing() {
        let class = ClassLevel::new("Wizard", 1);
        assert_eq!(hit_die(&class), 6);
        assert_eq!(hit_die(&class.clone().with_hit_dice("d10", 1)), 10);
        assert_eq!(hit_die(&class.clone().with_hit_dice("1d12", 1)), 12);
        assert_eq!(hit_die(&class.clone().with_hit_dice("8", 1)), 8);
        assert_eq!(hit_die(&class.with_hit_dice("dx", 1)), 6);
        assert_eq!(hit_die(&ClassLevel::new("Blood Hunter", 1)), 8);
    }

    #[test]
    fn test_single_class_hit_points() {
        // 10 + 2, then (6 + 2) x 4
        let classes = [ClassLevel::new("Fighter", 5)];
        assert_eq!(max_hit_points(&classes, 2), 44);
    }

    #[test]
    fn test_multiclass_hit_points() {
        // Fighter: 10 + 6 + 6; Wizard: 4 + 4; CON +1 per level
        let classes = [ClassLevel::new("Fighter", 3), ClassLevel::new("Wizard", 2)];
        assert_eq!(max_hit_points(&classes, 1), 35);
    }

    #[test]
    fn test_hit_points_floor() {
        let classes = [ClassLevel::new("Wizard", 1)];
        assert_eq!(max_hit_points(&classes, -5), 1);
        assert_eq!(max_hit_points(&[], 3), 0);
    }

    #[test]
    fn test_hit_points_at_extreme_levels() {
        let classes = [ClassLevel::new("Barbarian", i32::MAX)];
        assert_eq!(max_hit_points(&classes, 5), i32::MAX);
        let frail = [ClassLevel::new("Wizard", i32::MAX)];
        assert_eq!(max_hit_points(&frail, -5), 1);

        let multiclass = [
            ClassLevel::new("Fighter", 1_000_000),
            ClassLevel::new("Wizard", 1_000_000),
        ];
        assert_eq!(max_hit_points(&multiclass, 0), 10 + 999_999 * 6 + 1_000_000 * 4);
    }

    #[test]
    fn test_hit_dice_summary() {
        let classes = [
            ClassLevel::new("Paladin", 5).with_hit_dice("d10", 3),
            ClassLevel::new("Bard", 3),
        ];
        let summary = hit_dice_summary(&classes);
        assert_eq!(summary.dice, "5d10 + 3d8");
        assert_eq!(summary.total, 8);
        assert_eq!(summary.remaining, 6);
    }

    #[test]
    fn test_class_summary() {
        let classes = [
            ClassLevel::new("Fighter", 3).with_subclass("Champion", "PHB"),
            ClassLevel::new("Wizard", 2),
        ];
        assert_eq!(class_summary(&classes), "Fighter (Champion) 3 / Wizard 2");
    }
}
