use chrono::Duration;
use thiserror::Error;

use super::gate::format_countdown;
use crate::catalog::Dimension;

/// Input problems that block advancing. Nothing is mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("please select an option for {0}")]
    NoOptionSelected(Dimension),
    #[error("please enter how much applies for {0}")]
    AuxValueRequired(Dimension),
    #[error("{question} has no option {label:?}")]
    UnknownOption { question: Dimension, label: String },
    #[error("the catalog has no {0} question")]
    UnknownQuestion(Dimension),
    #[error("{0} takes no numeric input")]
    NoAuxInput(Dimension),
    #[error("{value} is outside {min}..={max} for {question}")]
    AuxOutOfRange {
        question: Dimension,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("you've already completed today's log, come back in {}", format_countdown(.remaining))]
    CooldownActive { remaining: Duration },
    #[error("today's quiz is finished, restart to begin a new log")]
    QuizFinished,
}
