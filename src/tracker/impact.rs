use serde::Serialize;
use std::collections::BTreeMap;

use super::answers::AnswerSet;
use crate::catalog::{AuxKind, Catalog, Dimension, Question, QuestionOption};

pub const KM_PER_MILE: f64 = 1.60934;

/// CO₂ one tree absorbs in a day, in kg.
pub const TREE_KG_PER_DAY: f64 = 0.057;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactBreakdown {
    per_dimension: BTreeMap<Dimension, f64>,
}

impl ImpactBreakdown {
    pub fn get(&self, dimension: Dimension) -> f64 {
        self.per_dimension.get(&dimension).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        Dimension::ALL
            .iter()
            .map(|d| self.get(*d))
            .sum::<f64>()
            .max(0.0)
    }

    /// Per-dimension savings in question order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

pub fn compute_impact(catalog: &Catalog, answers: &AnswerSet) -> ImpactBreakdown {
    let per_dimension = catalog
        .questions
        .iter()
        .map(|question| {
            let saved = answers
                .selected(question)
                .map(|option| option_impact(question, option, answers))
                .unwrap_or(0.0);
            (question.name, saved.max(0.0))
        })
        .collect();
    ImpactBreakdown { per_dimension }
}

fn option_impact(question: &Question, option: &QuestionOption, answers: &AnswerSet) -> f64 {
    let units = match answers.aux_amount(question, option) {
        Some((AuxKind::Distance, miles)) if miles > 0.0 => miles * KM_PER_MILE,
        Some((AuxKind::Distance, _)) => 0.0,
        Some((_, count)) => count,
        None => 1.0,
    };
    option.saved_kg * option.weight * units
}

/// Trees needed to absorb `carbon_saved` kg in one day.
pub fn tree_equivalent(carbon_saved: f64) -> u64 {
    (carbon_saved.max(0.0) / TREE_KG_PER_DAY).ceil() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    fn answers(catalog: &Catalog, picks: &[(Dimension, &str)]) -> AnswerSet {
        let mut answers = AnswerSet::new(catalog);
        for (dimension, label) in picks {
            answers.choices.insert(*dimension, label.to_string());
        }
        answers
    }

    fn all_no(catalog: &Catalog, transport: &str) -> AnswerSet {
        answers(
            catalog,
            &[
                (Dimension::Transport, transport),
                (Dimension::Vegetarian, "No"),
                (Dimension::EWaste, "No"),
                (Dimension::Energy, "No"),
                (Dimension::Plastic, "No"),
            ],
        )
    }

    #[test]
    fn car_distance_is_converted_to_km() {
        let catalog = default_catalog().unwrap();
        let mut set = all_no(&catalog, "Car");
        set.distance_miles = 10.0;

        let impact = compute_impact(&catalog, &set);
        assert!((impact.get(Dimension::Transport) - 6.502).abs() < 1e-3);
        assert!((impact.total() - 6.502).abs() < 1e-3);
    }

    #[test]
    fn transit_factors_are_weighted() {
        let catalog = default_catalog().unwrap();
        let mut bus = all_no(&catalog, "Bus");
        bus.distance_miles = 10.0;
        let expected = 0.101 * 0.5 * 16.0934;
        assert!((compute_impact(&catalog, &bus).total() - expected).abs() < 1e-9);

        let mut train = all_no(&catalog, "Train");
        train.distance_miles = 10.0;
        let expected = 0.041 * 0.3 * 16.0934;
        assert!((compute_impact(&catalog, &train).total() - expected).abs() < 1e-9);
    }

    #[test]
    fn active_travel_saves_nothing_directly() {
        let catalog = default_catalog().unwrap();
        for mode in ["Bike", "Walk", "Didn't go anywhere"] {
            let mut set = all_no(&catalog, mode);
            set.distance_miles = 25.0;
            assert_eq!(compute_impact(&catalog, &set).total(), 0.0, "{mode}");
        }
    }

    #[test]
    fn zero_distance_means_zero_transport() {
        let catalog = default_catalog().unwrap();
        let set = all_no(&catalog, "Car");
        assert_eq!(compute_impact(&catalog, &set).get(Dimension::Transport), 0.0);
    }

    #[test]
    fn green_choices_sum_per_dimension() {
        let catalog = default_catalog().unwrap();
        let mut set = answers(
            &catalog,
            &[
                (Dimension::Transport, "Bike"),
                (Dimension::Vegetarian, "Yes"),
                (Dimension::EWaste, "Yes, recycled or donated"),
                (Dimension::Energy, "Yes"),
                (Dimension::Plastic, "Yes"),
            ],
        );
        let impact = compute_impact(&catalog, &set);
        assert!((impact.total() - 4.5).abs() < 1e-9);

        set.vegetarian_meals = 3;
        set.devices_recycled = 4;
        let impact = compute_impact(&catalog, &set);
        assert!((impact.get(Dimension::Vegetarian) - 7.5).abs() < 1e-9);
        assert!((impact.get(Dimension::EWaste) - 2.0).abs() < 1e-9);
        let sum: f64 = impact.iter().map(|(_, kg)| kg).sum();
        assert!((impact.total() - sum).abs() < 1e-9);
    }

    #[test]
    fn unanswered_questions_count_as_zero() {
        let catalog = default_catalog().unwrap();
        let impact = compute_impact(&catalog, &AnswerSet::new(&catalog));
        assert!(impact.iter().all(|(_, kg)| kg == 0.0));
        assert_eq!(impact.total(), 0.0);
    }

    #[test]
    fn computing_twice_gives_the_same_breakdown() {
        let catalog = default_catalog().unwrap();
        let mut set = all_no(&catalog, "Train");
        set.distance_miles = 42.0;
        assert_eq!(compute_impact(&catalog, &set), compute_impact(&catalog, &set));
    }

    #[test]
    fn tree_equivalent_rounds_up() {
        assert_eq!(tree_equivalent(0.0), 0);
        assert_eq!(tree_equivalent(0.01), 1);
        assert_eq!(tree_equivalent(4.5), 79);
    }
}
