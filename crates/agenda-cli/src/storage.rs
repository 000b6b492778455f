use agenda_core::models::Event;
use agenda_core::recurrence::OccurrenceExpander;
use agenda_core::repository::{EventStore, Repository};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Builds a store from the JSON event file. A missing file gives an empty store.
pub fn load_store(path: &Path, expander: OccurrenceExpander) -> Result<EventStore> {
    let mut store = EventStore::new(expander);
    if !path.exists() {
        debug!(path = %path.display(), "no event file yet");
        return Ok(store);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file '{}'", path.display()))?;
    let events: Vec<Event> = if contents.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse event file '{}'", path.display()))?
    };

    let max_id = events.iter().map(|event| event.id).max().unwrap_or(0);
    for event in events {
        store.add_event(event);
    }
    let next_id = max_id.checked_add(1).with_context(|| {
        format!(
            "Event id {} in '{}' leaves no room for new ids",
            max_id,
            path.display()
        )
    })?;
    store.set_next_id(next_id);

    debug!(path = %path.display(), events = store.len(), "event file loaded");
    Ok(store)
}

/// Writes the stored (unexpanded) events as a JSON array.
pub fn save_store(path: &Path, store: &impl Repository) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(store.all_raw())?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write event file '{}'", path.display()))?;

    debug!(path = %path.display(), events = store.all_raw().len(), "event file saved");
    Ok(())
}
