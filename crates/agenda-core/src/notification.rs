use chrono::{Duration, NaiveDateTime};

use crate::models::Event;

/// An event worth telling the user about, with the whole minutes left until it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice<'a> {
    pub event: &'a Event,
    pub minutes_until: i64,
}

/// Events whose reminder window contains `now`.
pub fn due_reminders(events: &[Event], now: NaiveDateTime) -> Vec<&Event> {
    events.iter().filter(|event| event.reminder_due(now)).collect()
}

/// Events without a reminder that start after `now` and no more than `hours` hours ahead.
pub fn upcoming_within(events: &[Event], now: NaiveDateTime, hours: u32) -> Vec<&Event> {
    let horizon = now + Duration::hours(hours as i64);
    events
        .iter()
        .filter(|event| is_upcoming(event, now, horizon))
        .collect()
}

fn is_upcoming(event: &Event, now: NaiveDateTime, horizon: NaiveDateTime) -> bool {
    event.reminder.is_none() && event.start > now && event.start <= horizon
}

/// Everything the reminder command shows, in list order: the union of `due_reminders` and
/// `upcoming_within`. The two never overlap since one needs a reminder and the other none.
pub fn pending_notices(events: &[Event], now: NaiveDateTime, window_hours: u32) -> Vec<Notice<'_>> {
    let horizon = now + Duration::hours(window_hours as i64);
    events
        .iter()
        .filter(|event| event.reminder_due(now) || is_upcoming(event, now, horizon))
        .map(|event| Notice {
            event,
            minutes_until: (event.start - now).num_minutes(),
        })
        .collect()
}

/// Coarse "in N units" wording for a number of minutes.
pub fn format_until(minutes: i64) -> String {
    fn plural(count: i64, unit: &str) -> String {
        if count == 1 {
            format!("{} {}", count, unit)
        } else {
            format!("{} {}s", count, unit)
        }
    }

    match minutes {
        m if m < 1 => "moments".to_string(),
        m if m < 60 => plural(m, "minute"),
        m if m < 1440 => plural(m / 60, "hour"),
        m => plural(m / 1440, "day"),
    }
}
