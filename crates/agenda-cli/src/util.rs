use agenda_core::models::{Event, EventId};
use agenda_core::repository::Repository;
use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime};

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn find_event(repo: &impl Repository, id: EventId) -> Result<&Event> {
    repo.find_event_by_id(id)
        .ok_or_else(|| anyhow!("Event with ID '{}' not found.", id))
}

pub fn format_datetime(moment: NaiveDateTime) -> String {
    moment.format("%Y-%m-%d %H:%M").to_string()
}
