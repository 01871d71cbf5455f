//! Non-interactive subcommands.

use anyhow::Result;
use chrono::{DateTime, Utc};

use carbon_quest::storage::FileStore;
use carbon_quest::tracker::{format_countdown, lifetime_savings, newest_first, Session};

pub fn status(session: &Session<FileStore>, now: DateTime<Utc>) -> Result<()> {
    let level = session.level();
    println!(
        "Level {}: {} ({} XP)",
        level.current.level,
        level.current.label,
        session.total_xp()
    );
    match &level.next {
        Some(next) => println!(
            "  {:.0}% to {} ({} / {} XP)",
            level.progress, next.label, level.xp_into_level, level.xp_for_next
        ),
        None => println!("  max level reached"),
    }

    println!("Quests:");
    for quest in session.quests() {
        println!(
            "  [{:>3.0}%] {} ({} / {})",
            quest.ratio() * 100.0,
            quest.description,
            quest.progress.floor(),
            quest.target
        );
    }

    match session.cooldown_remaining(now) {
        None => println!("Today's log: ready"),
        Some(remaining) => {
            println!("Today's log: done, next in {}", format_countdown(&remaining))
        }
    }
    println!(
        "Logged {} day(s), {:.2} kg CO₂ saved in total",
        session.daily_logs().len(),
        lifetime_savings(session.daily_logs())
    );
    Ok(())
}

pub fn history(session: &Session<FileStore>, limit: usize) -> Result<()> {
    if session.daily_logs().is_empty() {
        println!("No daily logs yet.");
        return Ok(());
    }
    for log in newest_first(session.daily_logs()).take(limit) {
        println!(
            "{}  saved {:>6.2} kg  +{:<3} XP  total {:<5} {}",
            log.date.to_rfc3339(),
            log.carbon_saved,
            log.xp_gained,
            log.total_xp_after,
            log.level_at_time.label
        );
    }
    Ok(())
}

pub fn next_day(mut session: Session<FileStore>) -> Result<()> {
    match session.advance_day() {
        Some(at) => println!("Cooldown skipped; last log now dated {}", at.to_rfc3339()),
        None => println!("Nothing to skip: no log has been submitted yet."),
    }
    Ok(())
}
