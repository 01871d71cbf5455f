use anyhow::{ensure, Context, Result};
use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::{check_capacity, default_catalog, load_catalog, Catalog};
use crate::tracker::gate::{default_cooldown, DEFAULT_COOLDOWN_HOURS};
use crate::tracker::quests::DEFAULT_ACTIVE_QUESTS;
use crate::tracker::SessionSettings;

pub const DEFAULT_CONFIG_FILE: &str = "carbon-quest.toml";
pub const LOG_FILE_NAME: &str = "carbon-quest.log";
pub const MAX_COOLDOWN_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Catalog TOML replacing the built-in questions.
    pub catalog: Option<PathBuf>,
    pub cooldown_hours: i64,
    pub active_quests: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(".carbon-quest"),
            catalog: None,
            cooldown_hours: DEFAULT_COOLDOWN_HOURS,
            active_quests: DEFAULT_ACTIVE_QUESTS,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Reads `path` if it exists, then applies `CARBON_QUEST_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))?
        } else {
            Config::default()
        };
        let config = config.with_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("CARBON_QUEST_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("CARBON_QUEST_LOG") {
            self.log_level = level;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_COOLDOWN_HOURS).contains(&self.cooldown_hours),
            "cooldown_hours must be between 1 and {MAX_COOLDOWN_HOURS}"
        );
        ensure!(self.active_quests > 0, "active_quests must be at least 1");
        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            cooldown: Duration::try_hours(self.cooldown_hours).unwrap_or_else(default_cooldown),
            active_quests: self.active_quests,
        }
    }

    /// The catalog in use, checked against `active_quests`.
    pub fn catalog(&self) -> Result<Catalog> {
        let catalog = match &self.catalog {
            Some(path) => load_catalog(path)?,
            None => default_catalog()?,
        };
        check_capacity(&catalog, self.active_quests)?;
        Ok(catalog)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}
