//! Read-only aggregates over an event list.
//!
//! Callers pass the expanded list (see [`crate::repository::Repository::all_expanded`]) so a
//! recurring event counts once per occurrence. Nothing is cached; every function walks the
//! list again.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::models::Event;

/// Weekdays in reporting order.
pub const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar month key for the month distribution. Displays as `Jan 2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(moment: NaiveDateTime) -> Self {
        Self {
            year: moment.year(),
            month: moment.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???");
        write!(f, "{} {}", name, self.year)
    }
}

fn week_index(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

/// Index and value of the first maximum, `None` when every count is zero.
fn first_max(counts: &[usize]) -> Option<(usize, usize)> {
    counts
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, count)| match best {
            Some((_, top)) if count <= top => best,
            _ if count == 0 => best,
            _ => Some((index, count)),
        })
}

pub fn total(events: &[Event]) -> usize {
    events.len()
}

pub fn with_reminder_count(events: &[Event]) -> usize {
    events.iter().filter(|e| e.reminder.is_some()).count()
}

/// Events that are, or were expanded from, recurring events.
pub fn recurring_origin_count(events: &[Event]) -> usize {
    events.iter().filter(|e| e.has_recurring_origin()).count()
}

/// Events starting strictly after `now`.
pub fn upcoming_count(events: &[Event], now: NaiveDateTime) -> usize {
    events.iter().filter(|e| e.start > now).count()
}

/// Events that ended strictly before `now`.
pub fn past_count(events: &[Event], now: NaiveDateTime) -> usize {
    events.iter().filter(|e| e.end < now).count()
}

/// Start counts per weekday, Sunday first.
pub fn events_by_weekday(events: &[Event]) -> [(Weekday, usize); 7] {
    let mut counts = [0usize; 7];
    for event in events {
        counts[week_index(event.start.weekday())] += 1;
    }
    let mut result = WEEK_ORDER.map(|day| (day, 0));
    for (slot, count) in result.iter_mut().zip(counts) {
        slot.1 = count;
    }
    result
}

/// Weekday with the most starts; ties go to the earlier day in Sunday..Saturday order.
pub fn busiest_weekday(events: &[Event]) -> Option<(Weekday, usize)> {
    let counts: Vec<usize> = events_by_weekday(events).iter().map(|(_, c)| *c).collect();
    first_max(&counts).map(|(index, count)| (WEEK_ORDER[index], count))
}

/// Start counts per hour of day, index 0 to 23.
pub fn events_by_hour(events: &[Event]) -> [usize; 24] {
    let mut counts = [0usize; 24];
    for event in events {
        counts[event.start.hour() as usize] += 1;
    }
    counts
}

/// Hour (0-23) with the most starts; ties go to the lowest hour.
pub fn busiest_hour(events: &[Event]) -> Option<(u32, usize)> {
    first_max(&events_by_hour(events)).map(|(hour, count)| (hour as u32, count))
}

/// Month distribution in the order each month is first seen.
pub fn events_by_month(events: &[Event]) -> Vec<(YearMonth, usize)> {
    let mut months: Vec<(YearMonth, usize)> = Vec::new();
    for event in events {
        let key = YearMonth::of(event.start);
        match months.iter_mut().find(|(month, _)| *month == key) {
            Some((_, count)) => *count += 1,
            None => months.push((key, 1)),
        }
    }
    months
}

/// `count / weeks`, where weeks is the inclusive day span between the earliest and latest
/// start divided by seven, never below one.
pub fn average_events_per_week(events: &[Event]) -> f64 {
    let (Some(earliest), Some(latest)) = (
        events.iter().map(|e| e.start.date()).min(),
        events.iter().map(|e| e.start.date()).max(),
    ) else {
        return 0.0;
    };

    let span_days = ((latest - earliest).num_days() + 1).max(1);
    let weeks = (span_days as f64 / 7.0).max(1.0);
    events.len() as f64 / weeks
}

pub fn average_duration_minutes(events: &[Event]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    let total: i64 = events.iter().map(Event::duration_minutes).sum();
    total as f64 / events.len() as f64
}

/// Longest event by duration, first one on ties.
pub fn longest_event(events: &[Event]) -> Option<&Event> {
    events.iter().fold(None, |best: Option<&Event>, event| match best {
        Some(top) if event.duration_minutes() <= top.duration_minutes() => best,
        _ => Some(event),
    })
}

/// Every aggregate computed at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub upcoming: usize,
    pub past: usize,
    pub recurring: usize,
    pub with_reminder: usize,
    pub busiest_weekday: Option<(Weekday, usize)>,
    pub busiest_hour: Option<(u32, usize)>,
    pub by_weekday: Vec<(Weekday, usize)>,
    pub by_month: Vec<(YearMonth, usize)>,
    pub average_per_week: f64,
    pub average_duration_minutes: f64,
    /// Title and duration in minutes
    pub longest: Option<(String, i64)>,
}

impl Summary {
    pub fn compute(events: &[Event], now: NaiveDateTime) -> Self {
        Self {
            total: total(events),
            upcoming: upcoming_count(events, now),
            past: past_count(events, now),
            recurring: recurring_origin_count(events),
            with_reminder: with_reminder_count(events),
            busiest_weekday: busiest_weekday(events),
            busiest_hour: busiest_hour(events),
            by_weekday: events_by_weekday(events).to_vec(),
            by_month: events_by_month(events),
            average_per_week: average_events_per_week(events),
            average_duration_minutes: average_duration_minutes(events),
            longest: longest_event(events).map(|e| (e.title.clone(), e.duration_minutes())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No events to analyze.");
        }

        writeln!(f, "EVENT STATISTICS")?;
        writeln!(f, "{}", "=".repeat(48))?;
        writeln!(f)?;

        writeln!(f, "Overview:")?;
        writeln!(f, "   Total events:          {}", self.total)?;
        writeln!(f, "   Upcoming events:       {}", self.upcoming)?;
        writeln!(f, "   Past events:           {}", self.past)?;
        writeln!(f, "   Recurring events:      {}", self.recurring)?;
        writeln!(f, "   Events with reminders: {}", self.with_reminder)?;
        writeln!(f)?;

        if let Some((day, count)) = self.busiest_weekday {
            writeln!(f, "Busiest day of week: {} ({} events)", day, count)?;
        }
        if let Some((hour, count)) = self.busiest_hour {
            writeln!(f, "Busiest hour of day: {:02}:00 ({} events)", hour, count)?;
        }
        writeln!(f)?;

        writeln!(f, "Events by day of week:")?;
        for (day, count) in &self.by_weekday {
            writeln!(f, "   {:<4} {:>3} {}", day.to_string(), count, "#".repeat((*count).min(50)))?;
        }
        writeln!(f)?;

        writeln!(f, "Averages:")?;
        writeln!(f, "   Events per week:  {:.2}", self.average_per_week)?;
        writeln!(f, "   Event duration:   {:.1} minutes", self.average_duration_minutes)?;
        writeln!(f)?;

        writeln!(f, "Events by month:")?;
        for (month, count) in &self.by_month {
            writeln!(f, "   {:<9} {:>3}", month.to_string(), count)?;
        }

        if let Some((title, minutes)) = &self.longest {
            writeln!(f)?;
            writeln!(f, "Longest event: {} ({} minutes)", title, minutes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecurrenceRule, RecurrenceType, Termination};
    use crate::recurrence::OccurrenceExpander;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn event(title: &str, start: NaiveDateTime, minutes: i64) -> Event {
        Event::new(1, title, "", start, start + chrono::Duration::minutes(minutes))
    }

    mod empty_tests {
        use super::*;

        #[test]
        fn test_empty_list() {
            let now = at(1, 1, 0);
            assert_eq!(total(&[]), 0);
            assert_eq!(with_reminder_count(&[]), 0);
            assert_eq!(recurring_origin_count(&[]), 0);
            assert_eq!(upcoming_count(&[], now), 0);
            assert_eq!(past_count(&[], now), 0);
            assert_eq!(average_events_per_week(&[]), 0.0);
            assert_eq!(average_duration_minutes(&[]), 0.0);
            assert!(busiest_weekday(&[]).is_none());
            assert!(busiest_hour(&[]).is_none());
            assert!(longest_event(&[]).is_none());
            assert!(events_by_month(&[]).is_empty());
            assert!(events_by_weekday(&[]).iter().all(|(_, c)| *c == 0));
        }

        #[test]
        fn test_empty_report() {
            let summary = Summary::compute(&[], at(1, 1, 0));
            assert!(summary.is_empty());
            assert_eq!(summary.to_string(), "No events to analyze.\n");
        }
    }

    mod count_tests {
        use super::*;

        #[test]
        fn test_upcoming_and_past() {
            let now = at(3, 10, 12);
            let events = vec![
                event("past", at(3, 9, 9), 60),
                event("ongoing", at(3, 10, 11), 120),
                event("future", at(3, 11, 9), 60),
            ];
            assert_eq!(upcoming_count(&events, now), 1);
            assert_eq!(past_count(&events, now), 1);
        }

        #[test]
        fn test_recurring_origin_counts_occurrences() {
            let rule = RecurrenceRule::new(RecurrenceType::Daily, 1, Termination::Count(3)).unwrap();
            let raw = vec![
                event("plain", at(1, 1, 9), 30),
                event("standup", at(1, 2, 9), 15).with_recurrence(rule),
            ];
            let expanded = OccurrenceExpander::with_defaults().expand_all(&raw);
            assert_eq!(total(&expanded), 4);
            assert_eq!(recurring_origin_count(&expanded), 3);
        }

        #[test]
        fn test_with_reminder() {
            let events = vec![
                event("a", at(1, 1, 9), 30).with_reminder(10),
                event("b", at(1, 1, 10), 30),
            ];
            assert_eq!(with_reminder_count(&events), 1);
        }
    }

    mod busiest_tests {
        use super::*;

        #[test]
        fn test_busiest_weekday() {
            // 2024-01-01 is a Monday
            let events = vec![
                event("mon", at(1, 1, 9), 30),
                event("tue", at(1, 2, 9), 30),
                event("tue", at(1, 9, 9), 30),
            ];
            assert_eq!(busiest_weekday(&events), Some((Weekday::Tue, 2)));
        }

        #[test]
        fn test_weekday_tie_prefers_sunday_order() {
            // Saturday and Sunday once each
            let events = vec![event("sat", at(1, 6, 9), 30), event("sun", at(1, 7, 9), 30)];
            assert_eq!(busiest_weekday(&events), Some((Weekday::Sun, 1)));
        }

        #[rstest]
        #[case(vec![9, 9, 14], Some((9, 2)))]
        #[case(vec![14, 9], Some((9, 1)))]
        #[case(vec![23, 0, 23, 0], Some((0, 2)))]
        fn test_busiest_hour(#[case] hours: Vec<u32>, #[case] expected: Option<(u32, usize)>) {
            let events: Vec<Event> = hours.iter().map(|h| event("e", at(2, 1, *h), 30)).collect();
            assert_eq!(busiest_hour(&events), expected);
        }

        #[test]
        fn test_weekday_distribution_order() {
            let days: Vec<Weekday> = events_by_weekday(&[]).iter().map(|(d, _)| *d).collect();
            assert_eq!(days, WEEK_ORDER.to_vec());
        }
    }

    mod average_tests {
        use super::*;

        #[test]
        fn test_single_day_counts_as_one_week() {
            let events = vec![event("a", at(1, 1, 9), 30), event("b", at(1, 1, 15), 30)];
            assert_eq!(average_events_per_week(&events), 2.0);
        }

        #[test]
        fn test_two_week_span() {
            // Jan 1 through Jan 14 is 14 days inclusive
            let events = vec![
                event("a", at(1, 1, 9), 30),
                event("b", at(1, 7, 9), 30),
                event("c", at(1, 14, 9), 30),
                event("d", at(1, 14, 10), 30),
            ];
            assert_eq!(average_events_per_week(&events), 2.0);
        }

        #[test]
        fn test_average_duration() {
            let events = vec![event("a", at(1, 1, 9), 30), event("b", at(1, 1, 10), 45)];
            assert_eq!(average_duration_minutes(&events), 37.5);
        }

        #[test]
        fn test_longest_first_on_ties() {
            let events = vec![
                event("short", at(1, 1, 9), 30),
                event("long", at(1, 1, 10), 90),
                event("also long", at(1, 1, 12), 90),
            ];
            assert_eq!(longest_event(&events).map(|e| e.title.as_str()), Some("long"));
        }
    }

    mod month_tests {
        use super::*;

        #[test]
        fn test_first_seen_order() {
            let events = vec![
                event("a", at(3, 1, 9), 30),
                event("b", at(1, 1, 9), 30),
                event("c", at(3, 5, 9), 30),
            ];
            let months: Vec<(String, usize)> = events_by_month(&events)
                .into_iter()
                .map(|(m, c)| (m.to_string(), c))
                .collect();
            assert_eq!(
                months,
                vec![("Mar 2024".to_string(), 2), ("Jan 2024".to_string(), 1)]
            );
        }
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_report_sections() {
            let events = vec![
                event("Planning", at(1, 1, 9), 90).with_reminder(15),
                event("Review", at(1, 2, 9), 30),
            ];
            let report = Summary::compute(&events, at(1, 1, 0)).to_string();

            assert!(report.contains("Total events:          2"));
            assert!(report.contains("Upcoming events:       2"));
            assert!(report.contains("Events with reminders: 1"));
            assert!(report.contains("Busiest day of week: Mon (1 events)"));
            assert!(report.contains("Busiest hour of day: 09:00 (2 events)"));
            assert!(report.contains("Jan 2024"));
            assert!(report.contains("Longest event: Planning (90 minutes)"));
            assert!(report.contains("Event duration:   60.0 minutes"));
        }
    }
}
