use agenda_core::repository::EventStore;
use anyhow::Result;

use crate::cli::ShowCommand;
use crate::util::find_event;
use crate::views::table::display_event_detail;

pub fn show_event(store: &EventStore, command: ShowCommand) -> Result<()> {
    let event = find_event(store, command.id)?;
    let occurrences = store.expander().expand(event);
    display_event_detail(event, &occurrences);
    Ok(())
}
