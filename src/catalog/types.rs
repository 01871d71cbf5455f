use std::fmt;

use serde::{Deserialize, Serialize};

/// The five tracked lifestyle categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Transport,
    Vegetarian,
    EWaste,
    Energy,
    Plastic,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Transport,
        Dimension::Vegetarian,
        Dimension::EWaste,
        Dimension::Energy,
        Dimension::Plastic,
    ];

    /// Key used in the persisted `formData` map.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Transport => "transport",
            Dimension::Vegetarian => "vegetarian",
            Dimension::EWaste => "eWaste",
            Dimension::Energy => "energy",
            Dimension::Plastic => "plastic",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Transport => "Transport",
            Dimension::Vegetarian => "Vegetarian Meals",
            Dimension::EWaste => "E-Waste",
            Dimension::Energy => "Energy",
            Dimension::Plastic => "Plastic",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Links a quest to the answer that feeds its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestKey {
    BikeMiles,
    WalkMiles,
    RecycledDevices,
    EnergySaves,
    PlasticAvoided,
    /// Placeholder quest; no answer ever advances it.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuxKind {
    Distance,
    Meals,
    Devices,
}

/// Numeric follow-up shown once an option with `uses_aux` is picked.
#[derive(Debug, Clone, Deserialize)]
pub struct AuxInput {
    pub kind: AuxKind,
    pub prompt: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Advancing is blocked while the value is zero.
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionOption {
    pub label: String,
    /// Kilograms of CO₂ saved per unit (km, meal, device) or flat when no aux input applies.
    #[serde(default)]
    pub saved_kg: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub uses_aux: bool,
    #[serde(default)]
    pub aux_max: Option<f64>,
    /// Overrides `AuxInput::required` for this option.
    #[serde(default)]
    pub aux_required: Option<bool>,
    #[serde(default)]
    pub xp_multiplier: Option<f64>,
    #[serde(default)]
    pub advances: Option<QuestKey>,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub name: Dimension,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub aux: Option<AuxInput>,
}

impl Question {
    pub fn option(&self, label: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.label == label)
    }

    /// Upper bound of the aux input once `option` is chosen.
    pub fn aux_max_for(&self, option: &QuestionOption) -> Option<f64> {
        self.aux.as_ref().map(|aux| option.aux_max.unwrap_or(aux.max))
    }

    /// Whether a non-zero aux value must be entered before advancing past `option`.
    pub fn aux_required_for(&self, option: &QuestionOption) -> bool {
        option.uses_aux
            && self
                .aux
                .as_ref()
                .is_some_and(|aux| option.aux_required.unwrap_or(aux.required))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub level: u32,
    #[serde(rename = "xpNeeded", alias = "xp_needed")]
    pub xp_needed: u64,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestTemplate {
    pub id: u32,
    pub description: String,
    pub target: f64,
    pub key: QuestKey,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub questions: Vec<Question>,
    pub levels: Vec<Level>,
    pub quests: Vec<QuestTemplate>,
    /// Quest ids active on first run.
    pub initial_quests: Vec<u32>,
    /// Replacement draw order.
    pub quest_pool: Vec<u32>,
    pub fallback_quest: u32,
    pub default_xp_multiplier: f64,
}

impl Catalog {
    pub fn question(&self, dimension: Dimension) -> Option<&Question> {
        self.questions.iter().find(|q| q.name == dimension)
    }

    pub fn quest_template(&self, id: u32) -> Option<&QuestTemplate> {
        self.quests.iter().find(|q| q.id == id)
    }
}
