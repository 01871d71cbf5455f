use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{AuxKind, Catalog, Dimension, Question, QuestionOption};

/// One day's responses: chosen labels plus the numeric follow-ups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSet {
    #[serde(default)]
    pub choices: BTreeMap<Dimension, String>,
    #[serde(default)]
    pub distance_miles: f64,
    #[serde(default = "one")]
    pub vegetarian_meals: u32,
    #[serde(default = "one", rename = "eWasteRecycleCount")]
    pub devices_recycled: u32,
}

fn one() -> u32 {
    1
}

impl Default for AnswerSet {
    fn default() -> Self {
        AnswerSet {
            choices: BTreeMap::new(),
            distance_miles: 0.0,
            vegetarian_meals: 1,
            devices_recycled: 1,
        }
    }
}

impl AnswerSet {
    /// Empty answers with every aux input at its catalog default.
    pub fn new(catalog: &Catalog) -> Self {
        let mut answers = AnswerSet::default();
        for question in &catalog.questions {
            if let Some(aux) = &question.aux {
                answers.set_aux(aux.kind, aux.default);
            }
        }
        answers
    }

    pub fn choice(&self, dimension: Dimension) -> Option<&str> {
        self.choices.get(&dimension).map(String::as_str)
    }

    /// The catalog option picked for `question`, if any.
    pub fn selected<'c>(&self, question: &'c Question) -> Option<&'c QuestionOption> {
        self.choice(question.name)
            .and_then(|label| question.option(label))
    }

    pub fn aux(&self, kind: AuxKind) -> f64 {
        match kind {
            AuxKind::Distance => self.distance_miles,
            AuxKind::Meals => f64::from(self.vegetarian_meals),
            AuxKind::Devices => f64::from(self.devices_recycled),
        }
    }

    pub fn set_aux(&mut self, kind: AuxKind, value: f64) {
        let value = value.max(0.0);
        match kind {
            AuxKind::Distance => self.distance_miles = value,
            AuxKind::Meals => self.vegetarian_meals = value.round() as u32,
            AuxKind::Devices => self.devices_recycled = value.round() as u32,
        }
    }

    /// The aux quantity that applies to `option`, in the input's own unit.
    ///
    /// `None` when the option is flat (no numeric follow-up).
    pub fn aux_amount(&self, question: &Question, option: &QuestionOption) -> Option<(AuxKind, f64)> {
        if !option.uses_aux {
            return None;
        }
        question
            .aux
            .as_ref()
            .map(|aux| (aux.kind, self.aux(aux.kind)))
    }
}
