//! Session controller.
//!
//! `Session` owns the working copy of every piece of tracker state and is the
//! only writer to the store. Each operation validates first and commits
//! afterwards, so a rejected call leaves both memory and disk untouched.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::answers::AnswerSet;
use super::error::{TrackerError, ValidationError};
use super::gate::{default_cooldown, GateState, SubmissionGate};
use super::history::DailyLogEntry;
use super::impact::{compute_impact, tree_equivalent, ImpactBreakdown};
use super::quests::{Quest, QuestTracker, DEFAULT_ACTIVE_QUESTS};
use super::xp::{award_xp, level_for, LevelState};
use crate::catalog::{AuxKind, Catalog, Dimension, Question};
use crate::storage::{self, keys, Store};

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub cooldown: Duration,
    pub active_quests: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            cooldown: default_cooldown(),
            active_quests: DEFAULT_ACTIVE_QUESTS,
        }
    }
}

/// Everything a scored submission produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub breakdown: ImpactBreakdown,
    pub carbon_saved: f64,
    pub xp_gained: u64,
    pub total_xp: u64,
    pub level: LevelState,
    pub leveled_up: bool,
    pub completed_quests: Vec<Quest>,
    pub trees: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Moved to the question at this index.
    Moved(usize),
    Submitted(Box<Submission>),
}

pub struct Session<S: Store> {
    catalog: Catalog,
    settings: SessionSettings,
    store: S,
    current_index: usize,
    answers: AnswerSet,
    /// Set once today's quiz has been scored; the result view shows while present.
    carbon_saved: Option<f64>,
    total_xp: u64,
    quests: Vec<Quest>,
    daily_logs: Vec<DailyLogEntry>,
    gate: SubmissionGate,
}

impl<S: Store> Session<S> {
    /// Restores state from `store`, falling back to defaults for missing or malformed keys.
    pub fn open(catalog: Catalog, store: S, settings: SessionSettings) -> Self {
        let tracker = QuestTracker::new(&catalog, settings.active_quests);
        let quests = match storage::read_json::<Vec<Quest>, _>(&store, keys::QUESTS) {
            Some(stored) => tracker.normalize(stored),
            None => tracker.initial_quests(),
        };

        let total_xp = storage::read_value(&store, keys::TOTAL_XP).unwrap_or(0);
        let daily_logs = storage::read_json(&store, keys::DAILY_LOGS).unwrap_or_default();
        let last_completed = storage::read_value(&store, keys::LAST_COMPLETED);

        let mut answers = AnswerSet::new(&catalog);
        if let Some(choices) =
            storage::read_json::<BTreeMap<Dimension, String>, _>(&store, keys::FORM_DATA)
        {
            answers.choices = choices;
        }
        if let Some(miles) = storage::read_value(&store, keys::DISTANCE_MILES) {
            answers.set_aux(AuxKind::Distance, miles);
        }
        if let Some(meals) = storage::read_value(&store, keys::VEGETARIAN_MEALS) {
            answers.set_aux(AuxKind::Meals, meals);
        }
        if let Some(devices) = storage::read_value(&store, keys::EWASTE_COUNT) {
            answers.set_aux(AuxKind::Devices, devices);
        }

        let last_index = catalog.questions.len().saturating_sub(1);
        let current_index = storage::read_value::<usize, _>(&store, keys::CURRENT_INDEX)
            .unwrap_or(0)
            .min(last_index);
        let carbon_saved = storage::read_value::<f64, _>(&store, keys::CARBON_SAVED);

        let mut session = Session {
            settings,
            store,
            current_index,
            answers,
            carbon_saved,
            total_xp,
            quests,
            daily_logs,
            gate: SubmissionGate::new(settings.cooldown, last_completed),
            catalog,
        };
        session.clamp_restored_aux();
        info!(
            total_xp = session.total_xp,
            logs = session.daily_logs.len(),
            resumed_at = session.current_index,
            "session opened"
        );
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.catalog.questions[self.current_index]
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.catalog.questions.len()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    pub fn level(&self) -> LevelState {
        level_for(&self.catalog.levels, self.total_xp)
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn daily_logs(&self) -> &[DailyLogEntry] {
        &self.daily_logs
    }

    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.gate.last_completed_at()
    }

    pub fn gate_state(&self, now: DateTime<Utc>) -> GateState {
        self.gate.state(now)
    }

    /// Time left before the next scored submission; `None` when one is allowed now.
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.gate.remaining(now)
    }

    /// Saved kg of the finished quiz; `Some` while the result view is showing.
    pub fn carbon_saved(&self) -> Option<f64> {
        self.carbon_saved
    }

    /// Breakdown of the current answers, recomputed on demand.
    pub fn breakdown(&self) -> ImpactBreakdown {
        compute_impact(&self.catalog, &self.answers)
    }

    pub fn select_option(&mut self, question: Dimension, label: &str) -> Result<(), TrackerError> {
        self.ensure_answering()?;
        let q = self
            .catalog
            .question(question)
            .ok_or(ValidationError::UnknownQuestion(question))?;
        if q.option(label).is_none() {
            return Err(ValidationError::UnknownOption {
                question,
                label: label.to_string(),
            }
            .into());
        }

        let changed = self.answers.choice(question) != Some(label);
        if changed {
            if let Some(aux) = &q.aux {
                self.answers.set_aux(aux.kind, aux.default);
            }
        }
        self.answers.choices.insert(question, label.to_string());
        debug!(%question, label, "option selected");
        self.save_snapshot();
        Ok(())
    }

    pub fn set_aux_value(&mut self, question: Dimension, value: f64) -> Result<(), TrackerError> {
        self.ensure_answering()?;
        let q = self
            .catalog
            .question(question)
            .ok_or(ValidationError::UnknownQuestion(question))?;
        let aux = q.aux.as_ref().ok_or(ValidationError::NoAuxInput(question))?;
        let max = self
            .answers
            .selected(q)
            .and_then(|option| q.aux_max_for(option))
            .unwrap_or(aux.max);
        if !value.is_finite() || value < aux.min || value > max {
            return Err(ValidationError::AuxOutOfRange {
                question,
                value,
                min: aux.min,
                max,
            }
            .into());
        }

        self.answers.set_aux(aux.kind, value);
        self.save_snapshot();
        Ok(())
    }

    /// Valid range of the aux input for the current choice of `question`.
    pub fn aux_range(&self, question: Dimension) -> Option<(f64, f64)> {
        let q = self.catalog.question(question)?;
        let aux = q.aux.as_ref()?;
        let max = self
            .answers
            .selected(q)
            .and_then(|option| q.aux_max_for(option))
            .unwrap_or(aux.max);
        Some((aux.min, max))
    }

    /// Whether the numeric follow-up applies to the current choice of `question`.
    pub fn aux_applies(&self, question: &Question) -> bool {
        question.aux.is_some()
            && self
                .answers
                .selected(question)
                .is_some_and(|option| option.uses_aux)
    }

    /// Moves to the next question, or scores the quiz on the last one.
    pub fn go_next(&mut self, now: DateTime<Utc>) -> Result<Step, TrackerError> {
        self.ensure_answering()?;
        self.validate(self.current_question())?;

        if !self.is_last_question() {
            self.current_index += 1;
            storage::write_value(&mut self.store, keys::CURRENT_INDEX, self.current_index.to_string());
            debug!(index = self.current_index, "advanced");
            return Ok(Step::Moved(self.current_index));
        }

        let submission = self.submit(now)?;
        Ok(Step::Submitted(Box::new(submission)))
    }

    pub fn go_back(&mut self) -> usize {
        if self.carbon_saved.is_none() && self.current_index > 0 {
            self.current_index -= 1;
            storage::write_value(&mut self.store, keys::CURRENT_INDEX, self.current_index.to_string());
        }
        self.current_index
    }

    /// Clears the in-progress quiz. XP, quests, history and cooldown are kept.
    pub fn restart(&mut self) {
        self.current_index = 0;
        self.answers = AnswerSet::new(&self.catalog);
        self.carbon_saved = None;
        for key in keys::SNAPSHOT {
            storage::remove_value(&mut self.store, key);
        }
        debug!("quiz restarted");
    }

    /// Debug/demo bypass of the cooldown; see [`SubmissionGate::advance_day`].
    pub fn advance_day(&mut self) -> Option<DateTime<Utc>> {
        let shifted = self.gate.advance_day()?;
        storage::write_value(&mut self.store, keys::LAST_COMPLETED, shifted.to_rfc3339());
        info!(last_completed = %shifted, "cooldown skipped");
        Some(shifted)
    }

    /// Periodic check. Restarts a finished quiz once the cooldown has expired.
    ///
    /// Returns whether the quiz was reset.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.carbon_saved.is_some() && self.gate.can_submit(now) {
            info!("cooldown over, starting a new day");
            self.restart();
            return true;
        }
        false
    }

    fn submit(&mut self, now: DateTime<Utc>) -> Result<Submission, TrackerError> {
        for question in &self.catalog.questions {
            self.validate(question)?;
        }
        if let Some(remaining) = self.gate.remaining(now) {
            info!(remaining_secs = remaining.num_seconds(), "submission rejected by cooldown");
            return Err(TrackerError::CooldownActive { remaining });
        }

        // Compute everything first, then commit in one go.
        let breakdown = compute_impact(&self.catalog, &self.answers);
        let carbon_saved = breakdown.total();
        let xp_gained = award_xp(&self.catalog, carbon_saved, &self.answers);
        let previous_level = self.level().current.level;
        let total_xp = self.total_xp + xp_gained;
        let level = level_for(&self.catalog.levels, total_xp);
        let update = QuestTracker::new(&self.catalog, self.settings.active_quests)
            .advance(self.quests.clone(), &self.answers);
        let entry = DailyLogEntry {
            date: now,
            carbon_saved,
            xp_gained,
            total_xp_after: total_xp,
            level_at_time: level.current.clone(),
            answers_snapshot: self.answers.clone(),
        };

        self.total_xp = total_xp;
        self.quests = update.active;
        self.daily_logs.push(entry);
        self.gate.record(now);
        self.carbon_saved = Some(carbon_saved);

        // All of these keys land together or not at all.
        if let (Some(quests), Some(logs)) = (
            storage::encode_json(keys::QUESTS, &self.quests),
            storage::encode_json(keys::DAILY_LOGS, &self.daily_logs),
        ) {
            storage::write_values(
                &mut self.store,
                &[
                    (keys::TOTAL_XP, total_xp.to_string()),
                    (keys::QUESTS, quests),
                    (keys::DAILY_LOGS, logs),
                    (keys::LAST_COMPLETED, now.to_rfc3339()),
                    (keys::CARBON_SAVED, carbon_saved.to_string()),
                ],
            );
        }

        for quest in &update.completed {
            info!(id = quest.id, description = %quest.description, "quest completed");
        }
        info!(
            carbon_saved,
            xp_gained,
            total_xp,
            level = level.current.level,
            "daily log submitted"
        );

        Ok(Submission {
            leveled_up: level.current.level > previous_level,
            trees: tree_equivalent(carbon_saved),
            breakdown,
            carbon_saved,
            xp_gained,
            total_xp,
            level,
            completed_quests: update.completed,
        })
    }

    /// Pulls restored aux values back into the range the current choices allow.
    fn clamp_restored_aux(&mut self) {
        for question in &self.catalog.questions {
            let Some(aux) = &question.aux else {
                continue;
            };
            let max = self
                .answers
                .selected(question)
                .and_then(|option| question.aux_max_for(option))
                .unwrap_or(aux.max);
            let value = self.answers.aux(aux.kind);
            let clamped = if value.is_finite() {
                value.clamp(aux.min, max)
            } else {
                aux.default
            };
            if clamped != value {
                warn!(question = %question.name, value, clamped, "restored aux value out of range");
                self.answers.set_aux(aux.kind, clamped);
            }
        }
    }

    fn ensure_answering(&self) -> Result<(), TrackerError> {
        if self.carbon_saved.is_some() {
            return Err(TrackerError::QuizFinished);
        }
        Ok(())
    }

    fn validate(&self, question: &Question) -> Result<(), ValidationError> {
        let option = self
            .answers
            .selected(question)
            .ok_or(ValidationError::NoOptionSelected(question.name))?;
        if question.aux_required_for(option) {
            let amount = self
                .answers
                .aux_amount(question, option)
                .map_or(0.0, |(_, amount)| amount);
            if amount <= 0.0 {
                return Err(ValidationError::AuxValueRequired(question.name));
            }
        }
        Ok(())
    }

    fn save_snapshot(&mut self) {
        storage::write_json(&mut self.store, keys::FORM_DATA, &self.answers.choices);
        storage::write_value(
            &mut self.store,
            keys::DISTANCE_MILES,
            self.answers.distance_miles.to_string(),
        );
        storage::write_value(
            &mut self.store,
            keys::VEGETARIAN_MEALS,
            self.answers.vegetarian_meals.to_string(),
        );
        storage::write_value(
            &mut self.store,
            keys::EWASTE_COUNT,
            self.answers.devices_recycled.to_string(),
        );
        storage::write_value(&mut self.store, keys::CURRENT_INDEX, self.current_index.to_string());
    }
}
