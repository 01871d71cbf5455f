//! XP awards and level lookup.
//!
//! The award uses a single category multiplier: questions are scanned in
//! catalog order and the first chosen option carrying an `xp_multiplier`
//! decides it. With the default catalog that order is public transport (x2),
//! e-waste recycled (x5), energy saving (x4), plastic avoided (x3), falling
//! back to x1.5 when none apply.

use serde::Serialize;

use super::answers::AnswerSet;
use crate::catalog::{Catalog, Level};

pub fn award_xp(catalog: &Catalog, carbon_saved: f64, answers: &AnswerSet) -> u64 {
    let multiplier = catalog
        .questions
        .iter()
        .filter_map(|question| answers.selected(question))
        .find_map(|option| option.xp_multiplier)
        .unwrap_or(catalog.default_xp_multiplier);
    (carbon_saved.max(0.0) * multiplier).floor() as u64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelState {
    pub current: Level,
    /// `None` at the top of the table.
    pub next: Option<Level>,
    /// Percent of the way to `next`, in `[0, 100]`.
    pub progress: f64,
    pub xp_into_level: u64,
    pub xp_for_next: u64,
}

/// Level reached with `total_xp`.
///
/// `levels` must be non-empty and ascending with the first entry at 0 XP,
/// which catalog validation guarantees.
pub fn level_for(levels: &[Level], total_xp: u64) -> LevelState {
    let index = levels
        .iter()
        .rposition(|level| level.xp_needed <= total_xp)
        .unwrap_or(0);
    let current = levels[index].clone();
    let next = levels.get(index + 1).cloned();
    let xp_into_level = total_xp.saturating_sub(current.xp_needed);

    match next {
        Some(next) => {
            let xp_for_next = next.xp_needed - current.xp_needed;
            let progress = (xp_into_level as f64 / xp_for_next as f64 * 100.0).clamp(0.0, 100.0);
            LevelState {
                current,
                next: Some(next),
                progress,
                xp_into_level,
                xp_for_next,
            }
        }
        None => LevelState {
            current,
            next: None,
            progress: 100.0,
            xp_into_level,
            xp_for_next: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, Dimension};

    fn picks(catalog: &Catalog, choices: &[(Dimension, &str)]) -> AnswerSet {
        let mut answers = AnswerSet::new(catalog);
        for (dimension, label) in choices {
            answers.choices.insert(*dimension, label.to_string());
        }
        answers
    }

    #[test]
    fn default_multiplier_for_car_trip() {
        let catalog = default_catalog().unwrap();
        let answers = picks(
            &catalog,
            &[
                (Dimension::Transport, "Car"),
                (Dimension::Vegetarian, "No"),
                (Dimension::EWaste, "No"),
                (Dimension::Energy, "No"),
                (Dimension::Plastic, "No"),
            ],
        );
        assert_eq!(award_xp(&catalog, 6.5017336, &answers), 9);
    }

    #[test]
    fn ewaste_outranks_energy_and_plastic() {
        let catalog = default_catalog().unwrap();
        let answers = picks(
            &catalog,
            &[
                (Dimension::Transport, "Bike"),
                (Dimension::Vegetarian, "Yes"),
                (Dimension::EWaste, "Yes, recycled or donated"),
                (Dimension::Energy, "Yes"),
                (Dimension::Plastic, "Yes"),
            ],
        );
        assert_eq!(award_xp(&catalog, 4.5, &answers), 22);
    }

    #[test]
    fn transit_outranks_everything() {
        let catalog = default_catalog().unwrap();
        let answers = picks(
            &catalog,
            &[
                (Dimension::Transport, "Train"),
                (Dimension::EWaste, "Yes, recycled or donated"),
                (Dimension::Energy, "Yes"),
            ],
        );
        assert_eq!(award_xp(&catalog, 3.0, &answers), 6);
    }

    #[test]
    fn energy_then_plastic() {
        let catalog = default_catalog().unwrap();
        let energy = picks(&catalog, &[(Dimension::Energy, "Yes"), (Dimension::Plastic, "Yes")]);
        assert_eq!(award_xp(&catalog, 1.5, &energy), 6);
        let plastic = picks(&catalog, &[(Dimension::Energy, "No"), (Dimension::Plastic, "Yes")]);
        assert_eq!(award_xp(&catalog, 0.3, &plastic), 0);
        assert_eq!(award_xp(&catalog, 1.0, &plastic), 3);
    }

    #[test]
    fn level_one_at_zero_xp() {
        let catalog = default_catalog().unwrap();
        let state = level_for(&catalog.levels, 0);
        assert_eq!(state.current.level, 1);
        assert_eq!(state.current.label, "Seedling");
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.xp_for_next, 10);
    }

    #[test]
    fn progress_between_thresholds() {
        let catalog = default_catalog().unwrap();
        let state = level_for(&catalog.levels, 30);
        assert_eq!(state.current.level, 3);
        assert_eq!(state.next.as_ref().map(|l| l.level), Some(4));
        assert_eq!(state.xp_into_level, 5);
        assert_eq!(state.xp_for_next, 25);
        assert!((state.progress - 20.0).abs() < 1e-9);
    }

    #[test]
    fn top_level_saturates() {
        let catalog = default_catalog().unwrap();
        let state = level_for(&catalog.levels, 10_000);
        assert_eq!(state.current.level, 8);
        assert!(state.next.is_none());
        assert_eq!(state.progress, 100.0);
    }

    #[test]
    fn level_is_monotone_in_xp() {
        let catalog = default_catalog().unwrap();
        let mut previous = level_for(&catalog.levels, 0).current.level;
        for xp in 1..=600 {
            let state = level_for(&catalog.levels, xp);
            assert!(state.current.level >= previous);
            assert!((0.0..=100.0).contains(&state.progress));
            previous = state.current.level;
        }
    }
}
