//! # Agenda Core Library
//!
//! The scheduling core of a personal event calendar: an in-memory event store, recurrence
//! expansion, conflict detection and statistics. Everything is synchronous and free of I/O;
//! loading, saving and presentation belong to the caller.
//!
//! ## Features
//!
//! - **Recurring Events**: Daily, weekly and monthly rules terminated by an occurrence
//!   count or an end date, expanded on demand into concrete occurrences
//! - **Calendar Arithmetic**: Month steps clamp to the end of shorter months
//! - **Conflict Detection**: Half-open overlap checks that see every occurrence of both sides
//! - **Statistics**: Counts, busiest weekday and hour, averages and distributions
//! - **Search**: Composable filters over the expanded event set
//!
//! ## Core Modules
//!
//! - [`models`]: Events, reminders, recurrence rules and transfer objects
//! - [`repository`]: The event store behind the [`repository::Repository`] trait
//! - [`recurrence`]: Occurrence generation and expansion
//! - [`conflict`]: Overlap detection
//! - [`statistics`]: Aggregates and the summary report
//! - [`notification`]: Reminder windows
//! - [`query`]: Search filters
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use agenda_core::{
//!     models::{NewEventData, RecurrenceRule, Termination},
//!     repository::{EventStore, Repository},
//! };
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let mut store = EventStore::with_defaults();
//!
//! store.create_event(NewEventData {
//!     title: "Standup".to_string(),
//!     start,
//!     end: start + chrono::Duration::minutes(15),
//!     recurrence: Some(RecurrenceRule::new("DAILY", 1, Termination::Count(5)).unwrap()),
//!     ..Default::default()
//! });
//!
//! assert_eq!(store.all_expanded().len(), 5);
//! assert!(store.find_all_conflicting().is_empty());
//! ```

pub mod conflict;
pub mod error;
pub mod models;
pub mod notification;
pub mod query;
pub mod recurrence;
pub mod repository;
pub mod statistics;
