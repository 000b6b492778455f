use agenda_core::repository::Repository;
use anyhow::Result;

use crate::cli::ListCommand;
use crate::util;
use crate::views::table::display_events;

pub fn list_events(repo: &impl Repository, command: ListCommand) -> Result<()> {
    let events = if command.raw {
        repo.all_raw().to_vec()
    } else {
        repo.all_expanded()
    };

    display_events(&events, util::now());
    Ok(())
}
