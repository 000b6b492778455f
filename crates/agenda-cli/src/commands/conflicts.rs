use agenda_core::models::Event;
use agenda_core::repository::Repository;
use anyhow::Result;
use owo_colors::{OwoColorize, Style};

use crate::cli::ConflictsCommand;
use crate::util::{find_event, format_datetime};
use crate::views::table::display_clashes;

/// Prints a warning for every stored event that overlaps `event`.
pub fn warn_about_clashes(repo: &impl Repository, event: &Event) {
    let clashes = repo.find_clash_details(event);
    if clashes.is_empty() {
        return;
    }

    let warning_style = Style::new().yellow().bold();
    println!(
        "{} Warning: '{}' clashes with {} other event(s):",
        "!".style(warning_style),
        event.title,
        clashes.len()
    );
    for clash in &clashes {
        println!(
            "   {} #{} {} at {}",
            "•".bright_black(),
            clash.event.id,
            clash.event.title,
            format_datetime(clash.existing_span.start)
        );
    }
}

pub fn show_conflicts(repo: &impl Repository, command: ConflictsCommand) -> Result<()> {
    if let Some(id) = command.id {
        let event = find_event(repo, id)?;
        let clashes = repo.find_clash_details(event);
        if clashes.is_empty() {
            println!("No conflicts found for event {}.", id);
        } else {
            println!("Event #{} '{}' clashes with:", event.id, event.title);
            display_clashes(&clashes);
        }
        return Ok(());
    }

    let conflicting = repo.find_all_conflicting();
    if conflicting.is_empty() {
        println!("No conflicts found.");
        return Ok(());
    }

    println!("{} conflicting event(s):", conflicting.len().to_string().red().bold());
    for event in conflicting {
        println!("\n#{} {}", event.id, event.title.bright_white().bold());
        display_clashes(&repo.find_clash_details(event));
    }
    Ok(())
}
