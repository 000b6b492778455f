//! Overlap detection between events, recurring ones included.
//!
//! Every check works on effective time ranges: a plain event occupies its own span, a
//! recurring event occupies one span per occurrence. Stored events are compared against a
//! candidate by id, so an event being edited is never reported as clashing with itself.

use tracing::debug;

use crate::models::{Event, TimeSpan};

/// A stored event that clashes with a candidate, with the first colliding pair of spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clash<'a> {
    pub event: &'a Event,
    /// The candidate's span (one of its occurrences if it recurs)
    pub candidate_span: TimeSpan,
    /// The stored event's span (one of its occurrences if it recurs)
    pub existing_span: TimeSpan,
}

fn first_overlap_between(candidate: &[TimeSpan], existing: &[TimeSpan]) -> Option<(TimeSpan, TimeSpan)> {
    candidate.iter().find_map(|ours| {
        existing
            .iter()
            .find(|theirs| ours.overlaps(theirs))
            .map(|theirs| (*ours, *theirs))
    })
}

/// First pair of overlapping spans between two events, as `(a's span, b's span)`.
///
/// Both sides are expanded when recurring. The search walks `a`'s occurrences in order and,
/// for each, `b`'s occurrences in order, stopping at the first hit.
pub fn first_overlap(a: &Event, b: &Event) -> Option<(TimeSpan, TimeSpan)> {
    first_overlap_between(&a.occurrence_spans(), &b.occurrence_spans())
}

/// Every event in `events` that overlaps `candidate`, with the spans that collide.
///
/// Events sharing the candidate's id are skipped. A recurring stored event appears at most
/// once no matter how many of its occurrences collide. Results follow `events` order.
pub fn find_clash_details<'a>(candidate: &Event, events: &'a [Event]) -> Vec<Clash<'a>> {
    let candidate_spans = candidate.occurrence_spans();

    let clashes: Vec<Clash<'a>> = events
        .iter()
        .filter(|existing| existing.id != candidate.id)
        .filter_map(|existing| {
            first_overlap_between(&candidate_spans, &existing.occurrence_spans()).map(
                |(candidate_span, existing_span)| Clash {
                    event: existing,
                    candidate_span,
                    existing_span,
                },
            )
        })
        .collect();

    debug!(
        candidate_id = candidate.id,
        scanned = events.len(),
        clashes = clashes.len(),
        "clash scan finished"
    );
    clashes
}

/// Every event in `events` that overlaps `candidate`. See [`find_clash_details`].
pub fn find_clashes<'a>(candidate: &Event, events: &'a [Event]) -> Vec<&'a Event> {
    find_clash_details(candidate, events)
        .into_iter()
        .map(|clash| clash.event)
        .collect()
}

/// Every event that clashes with at least one other event of the same set, in set order.
///
/// Equivalent to keeping each event for which `find_clashes(event, events)` is non-empty;
/// occurrence spans are computed once per event instead of once per pair.
pub fn find_all_conflicting(events: &[Event]) -> Vec<&Event> {
    let spans: Vec<Vec<TimeSpan>> = events.iter().map(Event::occurrence_spans).collect();

    let conflicting: Vec<&Event> = events
        .iter()
        .enumerate()
        .filter(|(i, event)| {
            events.iter().enumerate().any(|(j, other)| {
                other.id != event.id && first_overlap_between(&spans[*i], &spans[j]).is_some()
            })
        })
        .map(|(_, event)| event)
        .collect();

    debug!(
        events = events.len(),
        conflicting = conflicting.len(),
        "conflict scan finished"
    );
    conflicting
}
