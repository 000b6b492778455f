use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;
use crate::recurrence;

/// Store-assigned event identifier. Occurrences share the id of the event they were expanded from.
pub type EventId = u32;

pub const DEFAULT_CATEGORY: &str = "General";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid priority: {0}")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
        }
    }
}

/// How long before an event's start its reminder should fire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reminder {
    pub minutes_before: u32,
}

impl Reminder {
    pub fn new(minutes_before: u32) -> Self {
        Self { minutes_before }
    }

    /// Human readable lead time, e.g. "15 minutes before", "2 hours before", "1 day before".
    pub fn display_text(&self) -> String {
        let minutes = self.minutes_before;
        if minutes < 60 {
            format!("{} minutes before", minutes)
        } else if minutes == 1440 {
            "1 day before".to_string()
        } else if minutes % 1440 == 0 {
            format!("{} days before", minutes / 1440)
        } else if minutes % 60 == 0 {
            format!("{} hours before", minutes / 60)
        } else {
            format!("{} minutes before", minutes)
        }
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// A half-open `[start, end)` range of naive local time.
///
/// Nothing guarantees `start < end`; zero-length and inverted spans are carried as given
/// and the overlap predicate is applied to them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSpan {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Strict overlap: spans that merely touch (`a.end == b.start`) do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whole minutes from start to end; negative for inverted spans.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

// ============================================================================
// Recurrence Models
// ============================================================================

/// Unit a recurrence rule advances by.
///
/// Values are normalized to upper-case. Anything other than DAILY/WEEKLY/MONTHLY is kept
/// verbatim as `Unrecognized`; such a rule never advances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Unrecognized(String),
}

impl RecurrenceType {
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_uppercase();
        match normalized.as_str() {
            "DAILY" => RecurrenceType::Daily,
            "WEEKLY" => RecurrenceType::Weekly,
            "MONTHLY" => RecurrenceType::Monthly,
            _ => RecurrenceType::Unrecognized(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecurrenceType::Daily => "DAILY",
            RecurrenceType::Weekly => "WEEKLY",
            RecurrenceType::Monthly => "MONTHLY",
            RecurrenceType::Unrecognized(raw) => raw,
        }
    }

    /// Whether `advance` moves a timestamp forward under this type.
    pub fn advances(&self) -> bool {
        !matches!(self, RecurrenceType::Unrecognized(_))
    }

    fn code_suffix(&self) -> Option<char> {
        match self {
            RecurrenceType::Daily => Some('d'),
            RecurrenceType::Weekly => Some('w'),
            RecurrenceType::Monthly => Some('m'),
            RecurrenceType::Unrecognized(_) => None,
        }
    }
}

impl From<&str> for RecurrenceType {
    fn from(value: &str) -> Self {
        RecurrenceType::parse(value)
    }
}

impl From<String> for RecurrenceType {
    fn from(value: String) -> Self {
        RecurrenceType::parse(&value)
    }
}

impl From<RecurrenceType> for String {
    fn from(value: RecurrenceType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a recurrence stops producing occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Exactly this many occurrences.
    Count(u32),
    /// Occurrences whose start date is on or before this date.
    Until(NaiveDate),
}

/// The `(type, interval, termination)` tuple governing how a recurring event repeats.
///
/// Fields are private so every rule in circulation went through validation: the interval
/// and any occurrence count are positive, and exactly one termination mode is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecurrenceRuleData", into = "RecurrenceRuleData")]
pub struct RecurrenceRule {
    recurrence_type: RecurrenceType,
    interval: u32,
    termination: Termination,
}

impl RecurrenceRule {
    pub fn new(
        recurrence_type: impl Into<RecurrenceType>,
        interval: u32,
        termination: Termination,
    ) -> Result<Self, CoreError> {
        Self::validate_interval(interval as i64)?;
        Self::validate_termination(&termination)?;
        Ok(Self {
            recurrence_type: recurrence_type.into(),
            interval,
            termination,
        })
    }

    /// Builds a rule from loosely typed parts, as they come out of a form or a flat file.
    ///
    /// Exactly one of `occurrences` and `end_date` must be given.
    pub fn from_parts(
        recurrence_type: &str,
        interval: i64,
        occurrences: Option<i64>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, CoreError> {
        Self::validate_interval(interval)?;
        let termination = match (occurrences, end_date) {
            (Some(count), None) => {
                if count <= 0 {
                    return Err(CoreError::InvalidRecurrenceRule(format!(
                        "occurrence count must be positive, got {}",
                        count
                    )));
                }
                let count = u32::try_from(count).map_err(|_| {
                    CoreError::InvalidRecurrenceRule(format!("occurrence count {} is too large", count))
                })?;
                Termination::Count(count)
            }
            (None, Some(date)) => Termination::Until(date),
            (None, None) => {
                return Err(CoreError::InvalidRecurrenceRule(
                    "either an occurrence count or an end date is required".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(CoreError::InvalidRecurrenceRule(
                    "occurrence count and end date are mutually exclusive".to_string(),
                ))
            }
        };
        let interval = u32::try_from(interval).map_err(|_| {
            CoreError::InvalidRecurrenceRule(format!("interval {} is too large", interval))
        })?;
        Self::new(RecurrenceType::parse(recurrence_type), interval, termination)
    }

    /// Parses a compact interval code such as `1d`, `2w` or `1m` into a type and step.
    pub fn parse_interval_code(code: &str) -> Result<(RecurrenceType, u32), CoreError> {
        let code = code.trim().to_lowercase();
        let invalid = || CoreError::InvalidInput(format!("Invalid interval code: '{}'", code));
        let suffix = code.chars().last().ok_or_else(invalid)?;
        let recurrence_type = match suffix {
            'd' => RecurrenceType::Daily,
            'w' => RecurrenceType::Weekly,
            'm' => RecurrenceType::Monthly,
            _ => return Err(invalid()),
        };
        let digits = &code[..code.len() - 1];
        let interval = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| invalid())?
        };
        Self::validate_interval(interval as i64)?;
        Ok((recurrence_type, interval))
    }

    /// Compact form of type and interval (`2w`); `None` for unrecognized types.
    pub fn interval_code(&self) -> Option<String> {
        self.recurrence_type
            .code_suffix()
            .map(|suffix| format!("{}{}", self.interval, suffix))
    }

    pub fn recurrence_type(&self) -> &RecurrenceType {
        &self.recurrence_type
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn occurrences(&self) -> Option<u32> {
        match self.termination {
            Termination::Count(count) => Some(count),
            Termination::Until(_) => None,
        }
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self.termination {
            Termination::Until(date) => Some(date),
            Termination::Count(_) => None,
        }
    }

    /// Re-normalizes to upper-case; unrecognized values are accepted.
    pub fn set_recurrence_type(&mut self, value: &str) {
        self.recurrence_type = RecurrenceType::parse(value);
    }

    pub fn set_interval(&mut self, interval: u32) -> Result<(), CoreError> {
        Self::validate_interval(interval as i64)?;
        self.interval = interval;
        Ok(())
    }

    pub fn set_termination(&mut self, termination: Termination) -> Result<(), CoreError> {
        Self::validate_termination(&termination)?;
        self.termination = termination;
        Ok(())
    }

    fn validate_interval(interval: i64) -> Result<(), CoreError> {
        if interval <= 0 {
            return Err(CoreError::InvalidRecurrenceRule(format!(
                "interval must be positive, got {}",
                interval
            )));
        }
        Ok(())
    }

    fn validate_termination(termination: &Termination) -> Result<(), CoreError> {
        if let Termination::Count(0) = termination {
            return Err(CoreError::InvalidRecurrenceRule(
                "occurrence count must be positive, got 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interval == 1 {
            write!(f, "{}", self.recurrence_type)?;
        } else {
            write!(f, "{} x{}", self.recurrence_type, self.interval)?;
        }
        match self.termination {
            Termination::Count(count) => write!(f, ", {} times", count),
            Termination::Until(date) => write!(f, ", until {}", date),
        }
    }
}

/// Flat serialized shape of a [`RecurrenceRule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRuleData {
    pub recurrence_type: String,
    #[serde(default = "default_interval")]
    pub interval: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

fn default_interval() -> i64 {
    1
}

impl TryFrom<RecurrenceRuleData> for RecurrenceRule {
    type Error = CoreError;

    fn try_from(data: RecurrenceRuleData) -> Result<Self, Self::Error> {
        RecurrenceRule::from_parts(&data.recurrence_type, data.interval, data.occurrences, data.end_date)
    }
}

impl From<RecurrenceRule> for RecurrenceRuleData {
    fn from(rule: RecurrenceRule) -> Self {
        Self {
            recurrence_type: rule.recurrence_type.as_str().to_string(),
            interval: rule.interval as i64,
            occurrences: rule.occurrences().map(i64::from),
            end_date: rule.end_date(),
        }
    }
}

// ============================================================================
// Event
// ============================================================================

/// A schedulable item. An event is recurring exactly when it carries a recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Reminder>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default = "default_category", deserialize_with = "null_as_default_category")]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    /// 1-based position within the expansion that produced this event.
    /// Stored events never carry one.
    #[serde(skip)]
    pub occurrence: Option<u32>,
}

impl Event {
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        description: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            start,
            end,
            reminder: None,
            location: String::new(),
            category: default_category(),
            priority: Priority::default(),
            recurrence: None,
            occurrence: None,
        }
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    pub fn with_reminder(mut self, minutes_before: u32) -> Self {
        self.reminder = Some(Reminder::new(minutes_before));
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn recurrence(&self) -> Option<&RecurrenceRule> {
        self.recurrence.as_ref()
    }

    /// True for events produced by expanding a recurring event.
    pub fn is_occurrence(&self) -> bool {
        self.occurrence.is_some()
    }

    /// True when this event is, or was expanded from, a recurring event.
    pub fn has_recurring_origin(&self) -> bool {
        self.is_recurring() || self.is_occurrence()
    }

    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.end)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.span().duration_minutes()
    }

    /// Time ranges this event effectively occupies: its own span for a plain event, one
    /// span per occurrence for a recurring one.
    pub fn occurrence_spans(&self) -> Vec<TimeSpan> {
        match &self.recurrence {
            Some(rule) => recurrence::generate_spans(rule, self.span()),
            None => vec![self.span()],
        }
    }

    /// Whether `now` falls inside the reminder window: the event is still ahead and at most
    /// `minutes_before` whole minutes away.
    pub fn reminder_due(&self, now: NaiveDateTime) -> bool {
        match self.reminder {
            Some(reminder) if self.start > now => {
                (self.start - now).num_minutes() <= reminder.minutes_before as i64
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewEventData {
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub reminder: Option<Reminder>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub recurrence: Option<RecurrenceRule>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub reminder: Option<Option<Reminder>>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    /// Replace or remove the whole rule
    pub recurrence: Option<Option<RecurrenceRule>>,
    /// Change only the type of an existing rule (normalized, unrecognized values kept)
    pub recurrence_type: Option<String>,
}
