use tracing::{debug, warn};

use crate::conflict::{self, Clash};
use crate::error::CoreError;
use crate::models::{Event, EventId, NewEventData, UpdateEventData, DEFAULT_CATEGORY};
use crate::query::Query;
use crate::recurrence::OccurrenceExpander;

/// Operations every event store offers to its collaborators (loaders, savers, views).
///
/// Stores hold raw events only. Occurrences are produced on demand by `all_expanded` and are
/// never stored, so there is nothing to cascade when an event is deleted.
pub trait Repository {
    // Id management
    fn generate_id(&mut self) -> EventId;
    fn set_next_id(&mut self, id: EventId);

    // Raw events
    fn add_event(&mut self, event: Event);
    fn create_event(&mut self, data: NewEventData) -> &Event;
    fn find_event_by_id(&self, id: EventId) -> Option<&Event>;
    fn find_event_by_id_mut(&mut self, id: EventId) -> Option<&mut Event>;
    fn update_event(&mut self, id: EventId, data: UpdateEventData) -> Result<Option<&Event>, CoreError>;
    fn delete_event(&mut self, id: EventId) -> bool;
    fn all_raw(&self) -> &[Event];

    // Derived views
    fn all_expanded(&self) -> Vec<Event>;
    fn find_clashes(&self, candidate: &Event) -> Vec<&Event>;
    fn find_clash_details(&self, candidate: &Event) -> Vec<Clash<'_>>;
    fn find_all_conflicting(&self) -> Vec<&Event>;
    fn search(&self, query: &Query) -> Vec<Event>;
}

/// In-memory event store.
///
/// Single-owner and not synchronized; a concurrent host should put the whole store behind
/// one lock.
#[derive(Debug, Clone)]
pub struct EventStore {
    events: Vec<Event>,
    next_id: EventId,
    expander: OccurrenceExpander,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(OccurrenceExpander::with_defaults())
    }
}

impl EventStore {
    pub fn new(expander: OccurrenceExpander) -> Self {
        Self {
            events: Vec::new(),
            next_id: 1,
            expander,
        }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn expander(&self) -> &OccurrenceExpander {
        &self.expander
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The id `generate_id` will hand out next.
    pub fn next_id(&self) -> EventId {
        self.next_id
    }
}

impl Repository for EventStore {
    /// Returns the current counter value, then increments it. The counter stops at
    /// `EventId::MAX`, so an exhausted store keeps handing out that id.
    fn generate_id(&mut self) -> EventId {
        let id = self.next_id;
        match self.next_id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => warn!(id, "event id counter exhausted"),
        }
        id
    }

    fn set_next_id(&mut self, id: EventId) {
        debug!(next_id = id, "id counter reset");
        self.next_id = id;
    }

    /// Appends without checking for an existing event with the same id.
    fn add_event(&mut self, event: Event) {
        debug!(event_id = event.id, recurring = event.is_recurring(), "event added");
        self.events.push(event);
    }

    /// Assigns the next id and fills unset metadata with its defaults.
    fn create_event(&mut self, data: NewEventData) -> &Event {
        let id = self.generate_id();
        let mut event = Event::new(
            id,
            data.title,
            data.description.unwrap_or_default(),
            data.start,
            data.end,
        );
        event.reminder = data.reminder;
        event.location = data.location.unwrap_or_default();
        event.category = data.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        event.priority = data.priority.unwrap_or_default();
        event.recurrence = data.recurrence;

        self.add_event(event);
        let index = self.events.len() - 1;
        &self.events[index]
    }

    /// First match in insertion order.
    fn find_event_by_id(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    fn find_event_by_id_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|event| event.id == id)
    }

    /// Applies every field present in `data` to the first event with `id`.
    ///
    /// Validation happens before any field is written, so a failed update leaves the event
    /// untouched. Returns `Ok(None)` when no event has the id.
    fn update_event(&mut self, id: EventId, data: UpdateEventData) -> Result<Option<&Event>, CoreError> {
        let Some(event) = self.events.iter_mut().find(|event| event.id == id) else {
            return Ok(None);
        };

        let mut recurrence = match data.recurrence {
            Some(replacement) => replacement,
            None => event.recurrence.clone(),
        };
        if let Some(recurrence_type) = data.recurrence_type {
            match recurrence.as_mut() {
                Some(rule) => rule.set_recurrence_type(&recurrence_type),
                None => {
                    return Err(CoreError::InvalidInput(format!(
                        "event {} is not recurring; cannot set recurrence type '{}'",
                        id, recurrence_type
                    )))
                }
            }
        }

        if let Some(title) = data.title {
            event.title = title;
        }
        if let Some(description) = data.description {
            event.description = description;
        }
        if let Some(start) = data.start {
            event.start = start;
        }
        if let Some(end) = data.end {
            event.end = end;
        }
        if let Some(reminder) = data.reminder {
            event.reminder = reminder;
        }
        if let Some(location) = data.location {
            event.location = location;
        }
        if let Some(category) = data.category {
            event.category = category;
        }
        if let Some(priority) = data.priority {
            event.priority = priority;
        }
        event.recurrence = recurrence;

        debug!(event_id = id, "event updated");
        Ok(Some(event))
    }

    /// Removes the first event with `id`; `false` when there was none.
    fn delete_event(&mut self, id: EventId) -> bool {
        match self.events.iter().position(|event| event.id == id) {
            Some(index) => {
                self.events.remove(index);
                debug!(event_id = id, "event deleted");
                true
            }
            None => false,
        }
    }

    fn all_raw(&self) -> &[Event] {
        &self.events
    }

    fn all_expanded(&self) -> Vec<Event> {
        self.expander.expand_all(&self.events)
    }

    fn find_clashes(&self, candidate: &Event) -> Vec<&Event> {
        conflict::find_clashes(candidate, &self.events)
    }

    fn find_clash_details(&self, candidate: &Event) -> Vec<Clash<'_>> {
        conflict::find_clash_details(candidate, &self.events)
    }

    fn find_all_conflicting(&self) -> Vec<&Event> {
        conflict::find_all_conflicting(&self.events)
    }

    /// Matches against the expanded set so every occurrence is judged on its own dates.
    fn search(&self, query: &Query) -> Vec<Event> {
        self.all_expanded()
            .into_iter()
            .filter(|event| query.matches(event))
            .collect()
    }
}
