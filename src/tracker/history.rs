use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;
use crate::catalog::Level;

/// One scored submission. Appended to the history, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogEntry {
    pub date: DateTime<Utc>,
    pub carbon_saved: f64,
    pub xp_gained: u64,
    pub total_xp_after: u64,
    pub level_at_time: Level,
    pub answers_snapshot: AnswerSet,
}

pub fn newest_first(logs: &[DailyLogEntry]) -> impl Iterator<Item = &DailyLogEntry> {
    logs.iter().rev()
}

/// Sum of `carbon_saved` over the whole history.
pub fn lifetime_savings(logs: &[DailyLogEntry]) -> f64 {
    logs.iter().map(|entry| entry.carbon_saved).sum()
}
