use agenda_core::models::{EventId, Priority};
use clap::{Parser, Subcommand};

/// A personal calendar for the terminal: recurring events, clash warnings and statistics
#[derive(Parser, Debug)]
#[command(name = "agenda", author, version, about, long_about = None)]
pub struct Cli {
    /// Print debug logs to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new event
    Add(AddCommand),
    /// List events, with recurring events expanded into occurrences
    List(ListCommand),
    /// Show one event in detail
    Show(ShowCommand),
    /// Edit an event
    Edit(EditCommand),
    /// Delete an event
    Delete(DeleteCommand),
    /// Report overlapping events
    Conflicts(ConflictsCommand),
    /// Print statistics over all occurrences
    Stats,
    /// Search events by date, title, category or priority
    Search(SearchCommand),
    /// Show due reminders and events starting soon
    Remind(RemindCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the event
    pub title: String,
    /// When the event starts (e.g. '2025-03-01 14:00', 'tomorrow 9am')
    #[clap(short, long)]
    pub start: String,
    /// When the event ends
    #[clap(short, long, conflicts_with = "duration")]
    pub end: Option<String>,
    /// Length in minutes, used when --end is not given
    #[clap(long, default_value_t = 60)]
    pub duration: u32,
    /// The description of the event
    #[clap(short, long)]
    pub description: Option<String>,
    #[clap(short, long)]
    pub location: Option<String>,
    #[clap(short, long)]
    pub category: Option<String>,
    /// low, medium or high
    #[clap(short, long)]
    pub priority: Option<Priority>,
    /// Repeat the event: daily, weekly, monthly, or an interval code such as 2w
    #[clap(long)]
    pub every: Option<String>,
    /// Step between occurrences, in units of --every
    #[clap(long, requires = "every")]
    pub interval: Option<u32>,
    /// Number of occurrences
    #[clap(long, requires = "every", conflicts_with = "until")]
    pub count: Option<u32>,
    /// Last date an occurrence may start on
    #[clap(long, requires = "every")]
    pub until: Option<String>,
    /// Remind this many minutes before the start
    #[clap(short, long)]
    pub remind: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Show stored events without expanding recurring ones
    #[clap(long)]
    pub raw: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID of the event to show
    pub id: EventId,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the event to edit
    pub id: EventId,

    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub priority: Option<Priority>,

    #[arg(long)]
    pub remind: Option<u32>,
    #[arg(long, conflicts_with = "remind")]
    pub remind_clear: bool,

    /// Change how a recurring event repeats (daily, weekly, monthly)
    #[arg(long)]
    pub every: Option<String>,
    #[arg(long)]
    pub interval: Option<u32>,
    #[arg(long, conflicts_with = "until")]
    pub count: Option<u32>,
    #[arg(long)]
    pub until: Option<String>,
    /// Turn a recurring event into a one-time event
    #[arg(long, conflicts_with_all = ["every", "interval", "count", "until"])]
    pub recurrence_clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the event to delete
    pub id: EventId,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ConflictsCommand {
    /// Only report clashes with this event
    pub id: Option<EventId>,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchCommand {
    /// Occurrences starting on this date
    #[clap(long, conflicts_with_all = ["from", "to"])]
    pub on: Option<String>,
    /// Occurrences starting on or after this date
    #[clap(long, requires = "to")]
    pub from: Option<String>,
    /// Occurrences starting on or before this date
    #[clap(long, requires = "from")]
    pub to: Option<String>,
    /// Text contained in the title
    #[clap(long)]
    pub title: Option<String>,
    #[clap(long)]
    pub category: Option<String>,
    #[clap(long)]
    pub priority: Option<Priority>,
    /// Only recurring events
    #[clap(long)]
    pub recurring: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RemindCommand {
    /// Look-ahead in hours for events without a reminder
    #[clap(long)]
    pub window: Option<u32>,
}
