use agenda_core::notification::{format_until, pending_notices};
use agenda_core::repository::Repository;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli::RemindCommand;
use crate::config::Config;
use crate::util::{self, format_datetime};

pub fn show_reminders(repo: &impl Repository, command: RemindCommand, config: &Config) -> Result<()> {
    let now = util::now();
    let expanded = repo.all_expanded();
    let window = command.window.unwrap_or(config.notify_window_hours);
    let notices = pending_notices(&expanded, now, window);

    if notices.is_empty() {
        println!("No upcoming reminders.");
        return Ok(());
    }

    println!("{}", "Upcoming event reminders".bold());
    for notice in notices {
        println!(
            "[*] {} is coming soon in {} ({})",
            notice.event.title.bright_white().bold(),
            format_until(notice.minutes_until).yellow(),
            format_datetime(notice.event.start)
        );
        if let Some(reminder) = notice.event.reminder {
            println!("    Reminder: {}", reminder.display_text());
        }
    }
    Ok(())
}
