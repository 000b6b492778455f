use agenda_core::error::CoreError;
use agenda_core::models::{Reminder, Termination, UpdateEventData};
use agenda_core::repository::Repository;
use anyhow::{anyhow, Result};
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::commands::add::{build_rule, parse_every};
use crate::commands::conflicts::warn_about_clashes;
use crate::config::Config;
use crate::parser::{parse_date, parse_datetime};
use crate::storage::save_store;
use crate::util::{self, find_event};

pub fn edit_event(repo: &mut impl Repository, command: EditCommand, config: &Config) -> Result<()> {
    let now = util::now();
    let existing = find_event(&*repo, command.id)?.clone();

    let start = command.start.as_deref().map(|s| parse_datetime(s, now)).transpose()?;
    let end = command.end.as_deref().map(|s| parse_datetime(s, now)).transpose()?;

    let reminder = if command.remind_clear {
        Some(None)
    } else {
        command.remind.map(|minutes| Some(Reminder::new(minutes)))
    };

    let touches_rule = command.every.is_some()
        || command.interval.is_some()
        || command.count.is_some()
        || command.until.is_some();

    let recurrence = if command.recurrence_clear {
        Some(None)
    } else if !touches_rule {
        None
    } else if let Some(current) = existing.recurrence() {
        let mut rule = current.clone();
        if let Some(every) = &command.every {
            let (recurrence_type, step) = parse_every(every)?;
            rule.set_recurrence_type(recurrence_type.as_str());
            rule.set_interval(command.interval.unwrap_or(step))?;
        } else if let Some(interval) = command.interval {
            rule.set_interval(interval)?;
        }
        if let Some(count) = command.count {
            rule.set_termination(Termination::Count(count))?;
        }
        if let Some(until) = &command.until {
            rule.set_termination(Termination::Until(parse_date(until, now)?))?;
        }
        Some(Some(rule))
    } else {
        let every = command.every.as_deref().ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "event {} is not recurring; pass --every to make it repeat",
                command.id
            ))
        })?;
        Some(Some(build_rule(
            every,
            command.interval,
            command.count,
            command.until.as_deref(),
            now,
        )?))
    };

    let update_data = UpdateEventData {
        title: command.title,
        description: command.description,
        start,
        end,
        reminder,
        location: command.location,
        category: command.category,
        priority: command.priority,
        recurrence,
        recurrence_type: None,
    };

    let updated = repo
        .update_event(command.id, update_data)?
        .ok_or_else(|| anyhow!("Event with ID '{}' not found.", command.id))?
        .clone();
    save_store(&config.data_file, &*repo)?;

    println!("{} Updated event {}: {}", "✓".green().bold(), updated.id, updated.title);
    warn_about_clashes(&*repo, &updated);
    Ok(())
}
