use agenda_core::conflict::Clash;
use agenda_core::models::{Event, Priority};
use chrono::{Local, NaiveDateTime, TimeZone};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};

use crate::util::format_datetime;

/// Relative wording such as "in 2 days", computed against the local clock.
fn relative(moment: NaiveDateTime) -> String {
    match Local.from_local_datetime(&moment).earliest() {
        Some(local) => local.humanize(),
        None => String::new(),
    }
}

fn title_cell(event: &Event) -> Cell {
    let mut display_title = String::new();
    if event.has_recurring_origin() {
        display_title.push('↻');
        display_title.push(' ');
    }
    display_title.push_str(&event.title);

    let cell = Cell::new(display_title);
    match event.priority {
        Priority::High => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        Priority::Medium => cell,
        Priority::Low => cell.fg(Color::DarkGrey),
    }
}

fn start_cell(event: &Event, now: NaiveDateTime) -> Cell {
    let text = format!("{} ({})", format_datetime(event.start), relative(event.start));
    if event.end < now {
        Cell::new(text).fg(Color::DarkGrey)
    } else if event.start.date() == now.date() {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text)
    }
}

pub fn display_events(events: &[Event], now: NaiveDateTime) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Start", "End", "Repeats", "Category", "Priority", "Reminder"]);

    for event in events {
        let mut row = Row::new();
        row.add_cell(Cell::new(event.id));
        row.add_cell(title_cell(event));
        row.add_cell(start_cell(event, now));
        row.add_cell(Cell::new(format_datetime(event.end)));
        row.add_cell(Cell::new(
            event
                .recurrence()
                .map(|rule| rule.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ));
        row.add_cell(Cell::new(&event.category));
        row.add_cell(Cell::new(event.priority));
        row.add_cell(Cell::new(
            event
                .reminder
                .map(|reminder| reminder.display_text())
                .unwrap_or_else(|| "None".to_string()),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_event_detail(event: &Event, occurrences: &[Event]) {
    let mut table = Table::new();
    table.add_row(vec![Cell::new("ID"), Cell::new(event.id)]);
    table.add_row(vec![Cell::new("Title"), Cell::new(&event.title)]);
    if !event.description.is_empty() {
        table.add_row(vec![Cell::new("Description"), Cell::new(&event.description)]);
    }
    table.add_row(vec![Cell::new("Start"), Cell::new(format_datetime(event.start))]);
    table.add_row(vec![Cell::new("End"), Cell::new(format_datetime(event.end))]);
    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(format!("{} minutes", event.duration_minutes())),
    ]);
    if !event.location.is_empty() {
        table.add_row(vec![Cell::new("Location"), Cell::new(&event.location)]);
    }
    table.add_row(vec![Cell::new("Category"), Cell::new(&event.category)]);
    table.add_row(vec![Cell::new("Priority"), Cell::new(event.priority)]);
    if let Some(reminder) = event.reminder {
        table.add_row(vec![Cell::new("Reminder"), Cell::new(reminder.display_text())]);
    }
    if let Some(rule) = event.recurrence() {
        let repeats = match rule.interval_code() {
            Some(code) => format!("{} [{}]", rule, code),
            None => rule.to_string(),
        };
        table.add_row(vec![Cell::new("Repeats"), Cell::new(repeats)]);
    }
    println!("{table}");

    if event.is_recurring() {
        let mut occurrence_table = Table::new();
        occurrence_table.set_header(vec!["#", "Start", "End"]);
        for occurrence in occurrences {
            occurrence_table.add_row(vec![
                Cell::new(occurrence.occurrence.unwrap_or(1)),
                Cell::new(format_datetime(occurrence.start)),
                Cell::new(format_datetime(occurrence.end)),
            ]);
        }
        println!("{occurrence_table}");
    }
}

pub fn display_clashes(clashes: &[Clash<'_>]) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Clashes with", "Overlap"]);

    for clash in clashes {
        table.add_row(vec![
            Cell::new(clash.event.id),
            Cell::new(&clash.event.title),
            Cell::new(format!(
                "{} - {} vs {} - {}",
                format_datetime(clash.candidate_span.start),
                format_datetime(clash.candidate_span.end),
                format_datetime(clash.existing_span.start),
                format_datetime(clash.existing_span.end),
            ))
            .fg(Color::Red),
        ]);
    }

    println!("{table}");
}
