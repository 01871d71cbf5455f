use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::answers::AnswerSet;
use crate::catalog::types::QuestTemplate;
use crate::catalog::{Catalog, QuestKey};

pub const DEFAULT_ACTIVE_QUESTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: u32,
    pub description: String,
    pub progress: f64,
    pub target: f64,
    pub key: QuestKey,
    #[serde(default)]
    pub completed: bool,
}

impl Quest {
    pub fn from_template(template: &QuestTemplate) -> Self {
        Quest {
            id: template.id,
            description: template.description.clone(),
            progress: 0.0,
            target: template.target,
            key: template.key,
            completed: false,
        }
    }

    /// Completion ratio in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.target <= 0.0 {
            return 1.0;
        }
        (self.progress / self.target).clamp(0.0, 1.0)
    }
}

/// Result of feeding one scored submission into the quest set.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestUpdate {
    pub active: Vec<Quest>,
    /// Quests that reached their target this cycle, as they were when evicted.
    pub completed: Vec<Quest>,
}

/// How much `answers` move a quest with `key` forward.
///
/// A quest advances through the chosen option tagged with its key: by the
/// option's aux amount (miles, devices) or by one for flat options.
pub fn progress_increment(catalog: &Catalog, key: QuestKey, answers: &AnswerSet) -> f64 {
    if key == QuestKey::Default {
        return 0.0;
    }
    catalog
        .questions
        .iter()
        .filter_map(|question| answers.selected(question).map(|option| (question, option)))
        .filter(|(_, option)| option.advances == Some(key))
        .map(|(question, option)| {
            answers
                .aux_amount(question, option)
                .map(|(_, amount)| amount)
                .unwrap_or(1.0)
        })
        .sum()
}

pub struct QuestTracker<'a> {
    catalog: &'a Catalog,
    capacity: usize,
}

impl<'a> QuestTracker<'a> {
    pub fn new(catalog: &'a Catalog, capacity: usize) -> Self {
        QuestTracker {
            catalog,
            capacity: capacity.max(1),
        }
    }

    /// Quest set for a first run.
    pub fn initial_quests(&self) -> Vec<Quest> {
        let starting = self
            .catalog
            .initial_quests
            .iter()
            .filter_map(|id| self.catalog.quest_template(*id))
            .map(Quest::from_template)
            .collect();
        self.normalize(starting)
    }

    /// Drops duplicate ids and excess entries, then fills empty slots.
    pub fn normalize(&self, quests: Vec<Quest>) -> Vec<Quest> {
        let mut seen = HashSet::new();
        let mut active: Vec<Quest> = quests
            .into_iter()
            .filter(|quest| seen.insert(quest.id))
            .take(self.capacity)
            .collect();
        while active.len() < self.capacity {
            let quest = self.draw(&mut seen);
            active.push(quest);
        }
        active
    }

    pub fn advance(&self, quests: Vec<Quest>, answers: &AnswerSet) -> QuestUpdate {
        let updated: Vec<Quest> = self
            .normalize(quests)
            .into_iter()
            .map(|mut quest| {
                let increment = progress_increment(self.catalog, quest.key, answers);
                quest.progress = (quest.progress + increment).min(quest.target);
                quest.completed = quest.progress >= quest.target;
                quest
            })
            .collect();

        // Ids of quests finished this cycle stay excluded so they are not redrawn at once.
        let mut excluded: HashSet<u32> = updated.iter().map(|quest| quest.id).collect();
        let mut completed = Vec::new();
        let mut active = Vec::with_capacity(self.capacity);
        for quest in updated {
            if quest.completed {
                completed.push(quest);
                let replacement = self.draw(&mut excluded);
                active.push(replacement);
            } else {
                active.push(quest);
            }
        }

        QuestUpdate { active, completed }
    }

    /// Next pool quest whose id is not in `excluded`, or the fallback quest.
    ///
    /// The drawn id is added to `excluded`.
    fn draw(&self, excluded: &mut HashSet<u32>) -> Quest {
        let from_pool = self
            .catalog
            .quest_pool
            .iter()
            .filter(|id| !excluded.contains(*id))
            .find_map(|id| self.catalog.quest_template(*id));

        let mut quest = match from_pool {
            Some(template) => Quest::from_template(template),
            None => self.fallback(),
        };
        if excluded.contains(&quest.id) {
            // Fallback already active: give the placeholder a fresh id.
            quest.id = excluded.iter().max().map_or(quest.id, |max| max + 1);
        }
        excluded.insert(quest.id);
        quest
    }

    fn fallback(&self) -> Quest {
        match self.catalog.quest_template(self.catalog.fallback_quest) {
            Some(template) => Quest::from_template(template),
            None => Quest {
                id: self.catalog.fallback_quest,
                description: "Keep being sustainable!".to_string(),
                progress: 0.0,
                target: 1.0,
                key: QuestKey::Default,
                completed: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, Dimension};

    fn quest(catalog: &Catalog, id: u32, progress: f64) -> Quest {
        let mut quest = Quest::from_template(catalog.quest_template(id).unwrap());
        quest.progress = progress;
        quest
    }

    fn ids(quests: &[Quest]) -> Vec<u32> {
        quests.iter().map(|q| q.id).collect()
    }

    #[test]
    fn first_run_starts_with_bike_and_recycle() {
        let catalog = default_catalog().unwrap();
        let tracker = QuestTracker::new(&catalog, DEFAULT_ACTIVE_QUESTS);
        let quests = tracker.initial_quests();
        assert_eq!(ids(&quests), vec![1, 2]);
        assert!(quests.iter().all(|q| q.progress == 0.0 && !q.completed));
    }

    #[test]
    fn bike_quest_clamps_and_rotates() {
        let catalog = default_catalog().unwrap();
        let tracker = QuestTracker::new(&catalog, DEFAULT_ACTIVE_QUESTS);
        let mut answers = AnswerSet::new(&catalog);
        answers.choices.insert(Dimension::Transport, "Bike".into());
        answers.distance_miles = 8.0;

        let update = tracker.advance(vec![quest(&catalog, 1, 8.0), quest(&catalog, 2, 0.0)], &answers);

        assert_eq!(update.completed.len(), 1);
        assert_eq!(update.completed[0].id, 1);
        assert_eq!(update.completed[0].progress, 10.0);
        assert!(update.completed[0].completed);
        assert_eq!(ids(&update.active), vec![3, 2]);
        assert_eq!(update.active[0].progress, 0.0);
    }

    #[test]
    fn increments_follow_the_tagged_answer() {
        let catalog = default_catalog().unwrap();
        let mut answers = AnswerSet::new(&catalog);
        answers.choices.insert(Dimension::Transport, "Walk".into());
        answers.distance_miles = 2.0;
        answers.choices.insert(Dimension::EWaste, "Yes, recycled or donated".into());
        answers.devices_recycled = 3;
        answers.choices.insert(Dimension::Energy, "Yes".into());
        answers.choices.insert(Dimension::Plastic, "No".into());

        assert_eq!(progress_increment(&catalog, QuestKey::BikeMiles, &answers), 0.0);
        assert_eq!(progress_increment(&catalog, QuestKey::WalkMiles, &answers), 2.0);
        assert_eq!(progress_increment(&catalog, QuestKey::RecycledDevices, &answers), 3.0);
        assert_eq!(progress_increment(&catalog, QuestKey::EnergySaves, &answers), 1.0);
        assert_eq!(progress_increment(&catalog, QuestKey::PlasticAvoided, &answers), 0.0);
        assert_eq!(progress_increment(&catalog, QuestKey::Default, &answers), 0.0);
    }

    #[test]
    fn unrelated_answers_leave_progress_alone() {
        let catalog = default_catalog().unwrap();
        let tracker = QuestTracker::new(&catalog, DEFAULT_ACTIVE_QUESTS);
        let mut answers = AnswerSet::new(&catalog);
        answers.choices.insert(Dimension::Transport, "Car".into());
        answers.distance_miles = 30.0;

        let update = tracker.advance(vec![quest(&catalog, 1, 4.0), quest(&catalog, 2, 1.0)], &answers);
        assert!(update.completed.is_empty());
        assert_eq!(update.active[0].progress, 4.0);
        assert_eq!(update.active[1].progress, 1.0);
    }

    #[test]
    fn simultaneous_completions_draw_distinct_quests() {
        let catalog = default_catalog().unwrap();
        let tracker = QuestTracker::new(&catalog, DEFAULT_ACTIVE_QUESTS);
        let mut answers = AnswerSet::new(&catalog);
        answers.choices.insert(Dimension::Transport, "Bike".into());
        answers.distance_miles = 10.0;
        answers.choices.insert(Dimension::EWaste, "Yes, recycled or donated".into());
        answers.devices_recycled = 5;

        let update = tracker.advance(tracker.initial_quests(), &answers);
        assert_eq!(update.completed.len(), 2);
        assert_eq!(ids(&update.active), vec![3, 4]);
    }

    #[test]
    fn exhausted_pool_falls_back_to_placeholder() {
        let catalog = default_catalog().unwrap();
        let tracker = QuestTracker::new(&catalog, DEFAULT_ACTIVE_QUESTS);
        let mut answers = AnswerSet::new(&catalog);
        answers.choices.insert(Dimension::Transport, "Walk".into());
        answers.distance_miles = 3.0;
        answers.choices.insert(Dimension::Energy, "Yes".into());

        let quests = vec![quest(&catalog, 3, 0.0), quest(&catalog, 4, 2.0)];
        let update = tracker.advance(quests, &answers);
        assert_eq!(ids(&update.active), vec![5, 99]);
        assert_eq!(update.active[1].key, QuestKey::Default);

        // The placeholder never moves, whatever is answered.
        answers.choices.insert(Dimension::Plastic, "Yes".into());
        let next = tracker.advance(update.active, &answers);
        let placeholder = next.active.iter().find(|q| q.id == 99).unwrap();
        assert_eq!(placeholder.progress, 0.0);
        assert!(!placeholder.completed);
    }

    #[test]
    fn count_stays_constant_without_duplicates() {
        let catalog = default_catalog().unwrap();
        let tracker = QuestTracker::new(&catalog, DEFAULT_ACTIVE_QUESTS);
        let mut answers = AnswerSet::new(&catalog);
        answers.choices.insert(Dimension::Transport, "Walk".into());
        answers.distance_miles = 5.0;
        answers.choices.insert(Dimension::EWaste, "Yes, recycled or donated".into());
        answers.devices_recycled = 10;
        answers.choices.insert(Dimension::Energy, "Yes".into());
        answers.choices.insert(Dimension::Plastic, "Yes".into());

        let mut quests = tracker.initial_quests();
        for _ in 0..20 {
            quests = tracker.advance(quests, &answers).active;
            assert_eq!(quests.len(), DEFAULT_ACTIVE_QUESTS);
            let unique: HashSet<_> = quests.iter().map(|q| q.id).collect();
            assert_eq!(unique.len(), quests.len());
        }
    }

    #[test]
    fn stored_sets_are_normalized() {
        let catalog = default_catalog().unwrap();
        let tracker = QuestTracker::new(&catalog, DEFAULT_ACTIVE_QUESTS);
        let duplicated = vec![quest(&catalog, 2, 1.0), quest(&catalog, 2, 3.0)];
        assert_eq!(ids(&tracker.normalize(duplicated)), vec![2, 3]);

        let crowded = vec![
            quest(&catalog, 1, 0.0),
            quest(&catalog, 2, 0.0),
            quest(&catalog, 3, 0.0),
        ];
        assert_eq!(ids(&tracker.normalize(crowded)), vec![1, 2]);
    }
}
