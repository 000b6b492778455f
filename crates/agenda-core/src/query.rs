use chrono::NaiveDate;

use crate::models::{Event, Priority};

#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Filter(Filter),
    Not(Box<Query>),
    Binary {
        op: Operator,
        left: Box<Query>,
        right: Box<Query>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Starts on this date
    OnDate(NaiveDate),
    /// Starts on a date within `[from, to]`
    DateRange(NaiveDate, NaiveDate),
    /// Case-insensitive substring of the title
    TitleContains(String),
    /// Case-insensitive category name
    Category(String),
    Priority(Priority),
    /// Recurring, or expanded from a recurring event
    Recurring,
}

impl Filter {
    pub fn matches(&self, event: &Event) -> bool {
        let date = event.start.date();
        match self {
            Filter::OnDate(day) => date == *day,
            Filter::DateRange(from, to) => *from <= date && date <= *to,
            Filter::TitleContains(text) => event.title.to_lowercase().contains(&text.to_lowercase()),
            Filter::Category(name) => event.category.eq_ignore_ascii_case(name),
            Filter::Priority(priority) => event.priority == *priority,
            Filter::Recurring => event.has_recurring_origin(),
        }
    }
}

impl Query {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Query::Filter(filter) => filter.matches(event),
            Query::Not(inner) => !inner.matches(event),
            Query::Binary { op, left, right } => match op {
                Operator::And => left.matches(event) && right.matches(event),
                Operator::Or => left.matches(event) || right.matches(event),
            },
        }
    }

    pub fn and(self, other: Query) -> Query {
        Query::Binary {
            op: Operator::And,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn or(self, other: Query) -> Query {
        Query::Binary {
            op: Operator::Or,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn negate(self) -> Query {
        Query::Not(Box::new(self))
    }

    /// Conjunction of all filters; `None` when there are none.
    pub fn all(filters: impl IntoIterator<Item = Filter>) -> Option<Query> {
        filters
            .into_iter()
            .map(Query::Filter)
            .reduce(|acc, next| acc.and(next))
    }
}
