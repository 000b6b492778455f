use agenda_core::models::{NewEventData, RecurrenceRule, RecurrenceType, Reminder};
use agenda_core::repository::Repository;
use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::commands::conflicts::warn_about_clashes;
use crate::config::Config;
use crate::parser::{parse_date, parse_datetime};
use crate::storage::save_store;
use crate::util::{self, format_datetime};

/// Accepts `daily`, `weekly`, `monthly` (step 1) or an interval code such as `2w`.
pub fn parse_every(every: &str) -> Result<(RecurrenceType, u32)> {
    let recurrence_type = RecurrenceType::parse(every);
    if recurrence_type.advances() {
        return Ok((recurrence_type, 1));
    }
    Ok(RecurrenceRule::parse_interval_code(every)?)
}

/// Builds a validated rule from the recurrence flags shared by `add` and `edit`.
pub fn build_rule(
    every: &str,
    interval: Option<u32>,
    count: Option<u32>,
    until: Option<&str>,
    now: NaiveDateTime,
) -> Result<RecurrenceRule> {
    let (recurrence_type, step) = parse_every(every)?;
    let until = until.map(|date| parse_date(date, now)).transpose()?;
    let rule = RecurrenceRule::from_parts(
        recurrence_type.as_str(),
        interval.unwrap_or(step) as i64,
        count.map(i64::from),
        until,
    )?;
    Ok(rule)
}

pub fn add_event(repo: &mut impl Repository, command: AddCommand, config: &Config) -> Result<()> {
    let now = util::now();
    let start = parse_datetime(&command.start, now)?;
    let end = match &command.end {
        Some(end) => parse_datetime(end, now)?,
        None => start + Duration::minutes(command.duration as i64),
    };

    let recurrence = command
        .every
        .as_deref()
        .map(|every| build_rule(every, command.interval, command.count, command.until.as_deref(), now))
        .transpose()?;

    let data = NewEventData {
        title: command.title,
        description: command.description,
        start,
        end,
        reminder: command.remind.or(config.default_reminder_minutes).map(Reminder::new),
        location: command.location,
        category: command.category,
        priority: command.priority,
        recurrence,
    };

    let added = repo.create_event(data).clone();
    save_store(&config.data_file, &*repo)?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    let kind = if added.is_recurring() { "recurring event" } else { "event" };
    println!(
        "{} Created {}: {}",
        "✓".style(success_style),
        kind,
        added.title.bright_white().bold()
    );
    println!("  {} Event ID: {}", "→".style(info_style), added.id.to_string().yellow());
    println!(
        "  {} When: {} to {}",
        "→".style(info_style),
        format_datetime(added.start).cyan(),
        format_datetime(added.end).cyan()
    );
    if let Some(rule) = added.recurrence() {
        println!("  {} Repeats: {}", "→".style(info_style), rule);
    }
    if let Some(reminder) = added.reminder {
        println!("  {} Reminder: {}", "→".style(info_style), reminder);
    }

    warn_about_clashes(&*repo, &added);
    Ok(())
}
