//! Daily carbon-saving quiz: impact estimates, XP and levels, rotating quests
//! and a once-a-day submission gate, persisted in a small key-value store.

pub mod catalog;
pub mod config;
pub mod storage;
pub mod tracker;
