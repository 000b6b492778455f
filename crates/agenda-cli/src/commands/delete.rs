use agenda_core::repository::Repository;
use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::cli::DeleteCommand;
use crate::config::Config;
use crate::storage::save_store;
use crate::util::find_event;

pub fn delete_event(repo: &mut impl Repository, command: DeleteCommand, config: &Config) -> Result<()> {
    let title = find_event(&*repo, command.id)?.title.clone();

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete event '{}'?", title))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_event(command.id);
    save_store(&config.data_file, &*repo)?;
    println!("{} Deleted event {}: {}", "✓".green().bold(), command.id, title);
    Ok(())
}
