use anyhow::{bail, ensure, Context, Result};
use std::collections::HashSet;
use std::path::Path;

use super::types::{Catalog, Dimension};

const DEFAULT_CATALOG: &str = include_str!("../../catalog/default.toml");

pub fn default_catalog() -> Result<Catalog> {
    parse_catalog(DEFAULT_CATALOG).context("built-in catalog is invalid")
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    parse_catalog(&content).with_context(|| format!("invalid catalog {}", path.display()))
}

pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let catalog: Catalog = toml::from_str(content)?;
    validate(&catalog)?;
    Ok(catalog)
}

/// Fails when the catalog starts with more quests than `capacity` slots hold.
pub fn check_capacity(catalog: &Catalog, capacity: usize) -> Result<()> {
    ensure!(
        catalog.initial_quests.len() <= capacity,
        "catalog lists {} initial quests but only {capacity} can be active",
        catalog.initial_quests.len()
    );
    Ok(())
}

fn validate(catalog: &Catalog) -> Result<()> {
    for dimension in Dimension::ALL {
        let count = catalog
            .questions
            .iter()
            .filter(|q| q.name == dimension)
            .count();
        ensure!(count == 1, "dimension {dimension} must have exactly one question, found {count}");
    }

    for question in &catalog.questions {
        ensure!(!question.options.is_empty(), "question {} has no options", question.name);
        let mut labels = HashSet::new();
        for option in &question.options {
            ensure!(
                labels.insert(option.label.as_str()),
                "question {} repeats option {:?}",
                question.name,
                option.label
            );
            ensure!(
                option.saved_kg >= 0.0 && option.weight >= 0.0,
                "option {:?} of {} has a negative impact",
                option.label,
                question.name
            );
            if option.uses_aux && question.aux.is_none() {
                bail!("option {:?} uses an aux input but {} has none", option.label, question.name);
            }
        }
        if let Some(aux) = &question.aux {
            ensure!(
                aux.min <= aux.default && aux.default <= aux.max,
                "aux default of {} lies outside [{}, {}]",
                question.name,
                aux.min,
                aux.max
            );
        }
    }

    ensure!(!catalog.levels.is_empty(), "catalog defines no levels");
    ensure!(catalog.levels[0].xp_needed == 0, "first level must need 0 xp");
    ensure!(
        catalog
            .levels
            .windows(2)
            .all(|pair| pair[0].xp_needed < pair[1].xp_needed),
        "level thresholds must be strictly ascending"
    );

    let mut ids = HashSet::new();
    for quest in &catalog.quests {
        ensure!(ids.insert(quest.id), "quest id {} is defined twice", quest.id);
        ensure!(quest.target > 0.0, "quest {} needs a positive target", quest.id);
    }
    for id in catalog
        .initial_quests
        .iter()
        .chain(&catalog.quest_pool)
        .chain(std::iter::once(&catalog.fallback_quest))
    {
        ensure!(ids.contains(id), "quest id {id} is referenced but not defined");
    }
    let initial: HashSet<_> = catalog.initial_quests.iter().collect();
    ensure!(
        initial.len() == catalog.initial_quests.len(),
        "initial quests contain duplicates"
    );

    Ok(())
}
