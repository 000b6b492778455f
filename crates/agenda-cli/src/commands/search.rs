use agenda_core::error::CoreError;
use agenda_core::query::{Filter, Query};
use agenda_core::repository::Repository;
use anyhow::Result;

use crate::cli::SearchCommand;
use crate::parser::parse_date;
use crate::util;
use crate::views::table::display_events;

/// Turns the search flags into filters, in flag order.
pub fn build_filters(command: SearchCommand) -> Result<Vec<Filter>> {
    let now = util::now();
    let mut filters = Vec::new();

    if let Some(on) = &command.on {
        filters.push(Filter::OnDate(parse_date(on, now)?));
    }
    if let (Some(from), Some(to)) = (&command.from, &command.to) {
        let (from, to) = (parse_date(from, now)?, parse_date(to, now)?);
        if from > to {
            return Err(CoreError::InvalidInput(format!(
                "--from ({}) must not be after --to ({})",
                from, to
            ))
            .into());
        }
        filters.push(Filter::DateRange(from, to));
    }
    if let Some(title) = command.title {
        filters.push(Filter::TitleContains(title));
    }
    if let Some(category) = command.category {
        filters.push(Filter::Category(category));
    }
    if let Some(priority) = command.priority {
        filters.push(Filter::Priority(priority));
    }
    if command.recurring {
        filters.push(Filter::Recurring);
    }
    Ok(filters)
}

pub fn search_events(repo: &impl Repository, command: SearchCommand) -> Result<()> {
    let query = Query::all(build_filters(command)?).ok_or_else(|| {
        CoreError::InvalidInput(
            "give at least one of --on, --from/--to, --title, --category, --priority, --recurring"
                .to_string(),
        )
    })?;

    display_events(&repo.search(&query), util::now());
    Ok(())
}
