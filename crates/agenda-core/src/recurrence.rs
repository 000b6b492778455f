use chrono::{Duration, Months, NaiveDateTime};
use tracing::{debug, trace, warn};

use crate::models::{Event, RecurrenceRule, RecurrenceType, Termination, TimeSpan};

/// Moves `current` forward by one step of the rule.
///
/// Months use calendar arithmetic, clamping to the last day of a shorter month
/// (Jan 31 + 1 month = Feb 29 in a leap year). Unrecognized types do not move at all.
/// Returns `None` only when the result falls outside chrono's representable range.
#[inline]
pub fn advance(
    current: NaiveDateTime,
    recurrence_type: &RecurrenceType,
    interval: u32,
) -> Option<NaiveDateTime> {
    match recurrence_type {
        RecurrenceType::Daily => current.checked_add_signed(Duration::days(interval as i64)),
        RecurrenceType::Weekly => current.checked_add_signed(Duration::weeks(interval as i64)),
        RecurrenceType::Monthly => current.checked_add_months(Months::new(interval)),
        RecurrenceType::Unrecognized(_) => Some(current),
    }
}

/// Generates the time spans of every occurrence of `rule`, starting with `first`.
///
/// # Behavior
/// - The first span is always `first` itself, unchanged
/// - Each later start is the previous start advanced by one step; each end is that start
///   plus the first span's duration in whole minutes
/// - `Count(n)` stops after exactly `n` spans
/// - `Until(date)` stops before the first span whose start date is after `date`
/// - A non-advancing rule under `Until` would never reach the cutoff, so it yields only
///   the first span
pub fn generate_spans(rule: &RecurrenceRule, first: TimeSpan) -> Vec<TimeSpan> {
    let duration = Duration::minutes(first.duration_minutes());
    let termination = rule.termination();

    let mut spans = Vec::new();
    let mut current = first;

    loop {
        match termination {
            Termination::Count(count) => {
                if spans.len() >= count as usize {
                    break;
                }
            }
            Termination::Until(end_date) => {
                if !spans.is_empty() && current.start.date() > end_date {
                    break;
                }
            }
        }

        trace!(start = %current.start, end = %current.end, "occurrence span");
        spans.push(current);

        if let Termination::Until(_) = termination {
            if !rule.recurrence_type().advances() {
                warn!(
                    recurrence_type = %rule.recurrence_type(),
                    "recurrence type does not advance; end-date rule yields a single occurrence"
                );
                break;
            }
        }

        let next = advance(current.start, rule.recurrence_type(), rule.interval())
            .and_then(|start| start.checked_add_signed(duration).map(|end| TimeSpan::new(start, end)));
        match next {
            Some(span) => current = span,
            None => {
                debug!(last = %current.start, "recurrence left the representable date range");
                break;
            }
        }
    }

    spans
}

/// Configuration for occurrence expansion
#[derive(Debug, Clone)]
pub struct ExpansionConfig {
    /// Suffix each occurrence title with " (Occurrence k)"
    pub label_occurrences: bool,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            label_occurrences: true,
        }
    }
}

/// OccurrenceExpander: turns recurring events into their concrete occurrences.
///
/// Responsibilities:
/// 1. Produce one plain event per occurrence span of a recurring event
/// 2. Copy descriptive fields, reminder and id from the origin event
/// 3. Label occurrences so flattened views can tell them apart
///
/// Expansion is pure; nothing is cached and every call builds a fresh list.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceExpander {
    config: ExpansionConfig,
}

impl OccurrenceExpander {
    pub fn new(config: ExpansionConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ExpansionConfig::default())
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: ExpansionConfig) {
        self.config = config;
    }

    /// Expands one event.
    ///
    /// A recurring event becomes its occurrences in generation order. Each occurrence has no
    /// rule, keeps the origin's id and records its 1-based index in `occurrence`. A plain
    /// event comes back as a single clone of itself.
    pub fn expand(&self, event: &Event) -> Vec<Event> {
        let Some(rule) = event.recurrence() else {
            return vec![event.clone()];
        };

        let occurrences: Vec<Event> = generate_spans(rule, event.span())
            .into_iter()
            .enumerate()
            .map(|(index, span)| {
                let number = index as u32 + 1;
                let mut occurrence = event.clone();
                occurrence.recurrence = None;
                occurrence.occurrence = Some(number);
                occurrence.start = span.start;
                occurrence.end = span.end;
                if self.config.label_occurrences {
                    occurrence.title = occurrence_title(&event.title, number);
                }
                occurrence
            })
            .collect();

        debug!(
            event_id = event.id,
            rule = %rule,
            occurrences = occurrences.len(),
            "expanded recurring event"
        );
        occurrences
    }

    /// Expands every event, keeping input order and generation order within each block.
    pub fn expand_all(&self, events: &[Event]) -> Vec<Event> {
        events.iter().flat_map(|event| self.expand(event)).collect()
    }
}

pub fn occurrence_title(title: &str, number: u32) -> String {
    format!("{} (Occurrence {})", title, number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rstest::rstest;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn recurring(rule: RecurrenceRule, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event::new(1, "Standup", "Daily sync", start, end).with_recurrence(rule)
    }

    fn counted(recurrence_type: RecurrenceType, interval: u32, count: u32) -> RecurrenceRule {
        RecurrenceRule::new(recurrence_type, interval, Termination::Count(count)).unwrap()
    }

    mod advance_tests {
        use super::*;

        #[rstest]
        #[case(RecurrenceType::Daily, 1, at(2024, 1, 31, 9, 0))]
        #[case(RecurrenceType::Daily, 3, at(2024, 2, 2, 9, 0))]
        #[case(RecurrenceType::Weekly, 1, at(2024, 2, 6, 9, 0))]
        #[case(RecurrenceType::Weekly, 2, at(2024, 2, 13, 9, 0))]
        #[case(RecurrenceType::Monthly, 1, at(2024, 2, 29, 9, 0))]
        #[case(RecurrenceType::Monthly, 13, at(2025, 2, 28, 9, 0))]
        fn test_advance_from_jan_30(
            #[case] recurrence_type: RecurrenceType,
            #[case] interval: u32,
            #[case] expected: NaiveDateTime,
        ) {
            let start = at(2024, 1, 30, 9, 0);
            assert_eq!(advance(start, &recurrence_type, interval), Some(expected));
        }

        #[test]
        fn test_unrecognized_type_does_not_advance() {
            let start = at(2024, 1, 30, 9, 0);
            let kind = RecurrenceType::Unrecognized("YEARLY".to_string());
            assert_eq!(advance(start, &kind, 5), Some(start));
        }

        #[test]
        fn test_monthly_clamps_to_month_end() {
            assert_eq!(
                advance(at(2023, 1, 31, 8, 0), &RecurrenceType::Monthly, 1),
                Some(at(2023, 2, 28, 8, 0))
            );
            assert_eq!(
                advance(at(2024, 3, 31, 8, 0), &RecurrenceType::Monthly, 1),
                Some(at(2024, 4, 30, 8, 0))
            );
        }
    }

    mod generate_spans_tests {
        use super::*;

        #[test]
        fn test_daily_rolls_over_month() {
            let rule = counted(RecurrenceType::Daily, 1, 3);
            let spans = generate_spans(&rule, TimeSpan::new(at(2024, 1, 30, 9, 0), at(2024, 1, 30, 10, 0)));

            assert_eq!(
                spans,
                vec![
                    TimeSpan::new(at(2024, 1, 30, 9, 0), at(2024, 1, 30, 10, 0)),
                    TimeSpan::new(at(2024, 1, 31, 9, 0), at(2024, 1, 31, 10, 0)),
                    TimeSpan::new(at(2024, 2, 1, 9, 0), at(2024, 2, 1, 10, 0)),
                ]
            );
        }

        #[test]
        fn test_monthly_from_jan_31() {
            let rule = counted(RecurrenceType::Monthly, 1, 2);
            let spans = generate_spans(&rule, TimeSpan::new(at(2024, 1, 31, 9, 0), at(2024, 1, 31, 10, 0)));

            assert_eq!(spans.len(), 2);
            assert_eq!(spans[1].start, at(2024, 2, 29, 9, 0));
            assert_eq!(spans[1].end, at(2024, 2, 29, 10, 0));
        }

        #[test]
        fn test_monthly_steps_from_previous_occurrence() {
            let rule = counted(RecurrenceType::Monthly, 1, 3);
            let spans = generate_spans(&rule, TimeSpan::new(at(2023, 1, 31, 9, 0), at(2023, 1, 31, 10, 0)));

            // Each step advances the previous start, so the clamp to the 28th carries forward
            assert_eq!(spans[1].start, at(2023, 2, 28, 9, 0));
            assert_eq!(spans[2].start, at(2023, 3, 28, 9, 0));
        }

        #[test]
        fn test_until_includes_end_date() {
            let rule = RecurrenceRule::new(
                RecurrenceType::Daily,
                1,
                Termination::Until(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()),
            )
            .unwrap();
            let spans = generate_spans(&rule, TimeSpan::new(at(2024, 1, 10, 23, 0), at(2024, 1, 11, 1, 0)));

            let starts: Vec<_> = spans.iter().map(|s| s.start).collect();
            assert_eq!(
                starts,
                vec![at(2024, 1, 10, 23, 0), at(2024, 1, 11, 23, 0), at(2024, 1, 12, 23, 0)]
            );
        }

        #[test]
        fn test_until_before_start_still_yields_first() {
            let rule = RecurrenceRule::new(
                RecurrenceType::Weekly,
                1,
                Termination::Until(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            )
            .unwrap();
            let first = TimeSpan::new(at(2024, 1, 10, 9, 0), at(2024, 1, 10, 10, 0));
            assert_eq!(generate_spans(&rule, first), vec![first]);
        }

        #[test]
        fn test_unrecognized_type_repeats_same_slot() {
            let rule = counted(RecurrenceType::parse("yearly"), 1, 3);
            let first = TimeSpan::new(at(2024, 1, 10, 9, 0), at(2024, 1, 10, 10, 0));
            assert_eq!(generate_spans(&rule, first), vec![first, first, first]);
        }

        #[test]
        fn test_unrecognized_type_with_end_date_terminates() {
            let rule = RecurrenceRule::new(
                RecurrenceType::parse("hourly"),
                1,
                Termination::Until(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
            )
            .unwrap();
            let first = TimeSpan::new(at(2024, 1, 10, 9, 0), at(2024, 1, 10, 10, 0));
            assert_eq!(generate_spans(&rule, first), vec![first]);
        }

        #[test]
        fn test_huge_count_stops_at_end_of_date_range() {
            use chrono::Datelike;

            let rule = counted(RecurrenceType::Monthly, 1, u32::MAX);
            let first_year = NaiveDate::MAX.year() - 100;
            let spans = generate_spans(
                &rule,
                TimeSpan::new(at(first_year, 1, 15, 9, 0), at(first_year, 1, 15, 10, 0)),
            );

            assert!(spans.len() < u32::MAX as usize);
            assert_eq!(spans.len(), 101 * 12);
            let last = spans[spans.len() - 1].start;
            assert_eq!((last.year(), last.month(), last.day()), (NaiveDate::MAX.year(), 12, 15));
        }

        #[test]
        fn test_inverted_duration_is_reused() {
            let rule = counted(RecurrenceType::Daily, 1, 2);
            let spans = generate_spans(&rule, TimeSpan::new(at(2024, 1, 10, 10, 0), at(2024, 1, 10, 9, 0)));
            assert_eq!(spans[1], TimeSpan::new(at(2024, 1, 11, 10, 0), at(2024, 1, 11, 9, 0)));
        }
    }

    mod occurrence_expander_tests {
        use super::*;

        #[test]
        fn test_expand_labels_and_copies_fields() {
            let mut event = recurring(
                counted(RecurrenceType::Weekly, 1, 2),
                at(2024, 1, 1, 9, 0),
                at(2024, 1, 1, 9, 30),
            )
            .with_reminder(10);
            event.location = "Room 4".to_string();

            let expander = OccurrenceExpander::with_defaults();
            let occurrences = expander.expand(&event);

            assert_eq!(occurrences.len(), 2);
            assert_eq!(occurrences[0].title, "Standup (Occurrence 1)");
            assert_eq!(occurrences[1].title, "Standup (Occurrence 2)");
            for (index, occurrence) in occurrences.iter().enumerate() {
                assert_eq!(occurrence.id, event.id);
                assert!(!occurrence.is_recurring());
                assert_eq!(occurrence.occurrence, Some(index as u32 + 1));
                assert_eq!(occurrence.description, "Daily sync");
                assert_eq!(occurrence.location, "Room 4");
                assert_eq!(occurrence.reminder, event.reminder);
            }
            assert_eq!(occurrences[0].span(), event.span());
            assert_eq!(occurrences[1].start, at(2024, 1, 8, 9, 0));
        }

        #[test]
        fn test_expand_without_labels() {
            let event = recurring(counted(RecurrenceType::Daily, 1, 2), at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0));
            let expander = OccurrenceExpander::new(ExpansionConfig {
                label_occurrences: false,
            });

            let occurrences = expander.expand(&event);
            assert!(occurrences.iter().all(|o| o.title == "Standup"));
        }

        #[test]
        fn test_expand_huge_count_finishes() {
            use chrono::Datelike;

            let year = NaiveDate::MAX.year() - 10;
            let rule = counted(RecurrenceType::Monthly, 1, u32::MAX);
            let event = recurring(rule, at(year, 3, 1, 8, 0), at(year, 3, 1, 9, 0));

            let occurrences = OccurrenceExpander::with_defaults().expand(&event);
            assert_eq!(occurrences.len(), 10 * 12 + 10);
            assert_eq!(occurrences[0].start, event.start);
        }

        #[test]
        fn test_expand_plain_event_returns_itself() {
            let event = Event::new(4, "Dentist", "", at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0));
            let expanded = OccurrenceExpander::with_defaults().expand(&event);
            assert_eq!(expanded, vec![event]);
        }

        #[test]
        fn test_expand_all_preserves_order() {
            let plain_a = Event::new(1, "A", "", at(2024, 1, 5, 9, 0), at(2024, 1, 5, 10, 0));
            let mut rec = recurring(counted(RecurrenceType::Daily, 1, 2), at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0));
            rec.id = 2;
            let plain_b = Event::new(3, "B", "", at(2024, 1, 2, 9, 0), at(2024, 1, 2, 10, 0));

            let expanded = OccurrenceExpander::with_defaults().expand_all(&[plain_a, rec, plain_b]);
            let ids: Vec<_> = expanded.iter().map(|e| (e.id, e.occurrence)).collect();
            assert_eq!(ids, vec![(1, None), (2, Some(1)), (2, Some(2)), (3, None)]);
        }

        #[test]
        fn test_update_config() {
            let mut expander = OccurrenceExpander::with_defaults();
            assert!(expander.config().label_occurrences);
            expander.update_config(ExpansionConfig {
                label_occurrences: false,
            });
            assert!(!expander.config().label_occurrences);
        }
    }

    mod property_tests {
        use super::*;

        fn recurrence_type() -> impl Strategy<Value = RecurrenceType> {
            prop_oneof![
                Just(RecurrenceType::Daily),
                Just(RecurrenceType::Weekly),
                Just(RecurrenceType::Monthly),
                Just(RecurrenceType::Unrecognized("YEARLY".to_string())),
            ]
        }

        proptest! {
            #[test]
            fn count_and_duration_are_preserved(
                kind in recurrence_type(),
                interval in 1u32..6,
                count in 1u32..40,
                day in 1u32..29,
                hour in 0u32..23,
                minutes in 0i64..600,
            ) {
                let start = at(2024, 1, day, hour, 0);
                let end = start + Duration::minutes(minutes);
                let event = recurring(counted(kind, interval, count), start, end);

                let occurrences = OccurrenceExpander::with_defaults().expand(&event);
                prop_assert_eq!(occurrences.len(), count as usize);
                prop_assert_eq!(occurrences[0].span(), event.span());
                for occurrence in &occurrences {
                    prop_assert_eq!(occurrence.duration_minutes(), minutes);
                }
            }

            #[test]
            fn expansion_is_deterministic(
                kind in recurrence_type(),
                interval in 1u32..4,
                count in 1u32..20,
            ) {
                let event = recurring(counted(kind, interval, count), at(2024, 1, 31, 9, 0), at(2024, 1, 31, 10, 0));
                let expander = OccurrenceExpander::with_defaults();
                prop_assert_eq!(expander.expand(&event), expander.expand(&event));
            }
        }
    }
}
