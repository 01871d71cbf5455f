pub mod loader;
pub mod types;

pub use loader::{check_capacity, default_catalog, load_catalog};
pub use types::{AuxKind, Catalog, Dimension, Level, Question, QuestionOption, QuestKey};
