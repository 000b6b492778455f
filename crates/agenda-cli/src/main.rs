use agenda_core::error::CoreError;
use agenda_core::recurrence::OccurrenceExpander;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing::warn;

mod cli;
mod commands;
mod config;
mod parser;
mod storage;
mod util;
mod views;

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("agenda_core=debug,agenda=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    let terminal_layer = fmt::layer()
        .with_target(verbose)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(terminal_layer.with_filter(env_filter))
        .init();
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let config = config::Config::new().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable configuration");
        config::Config::default()
    });

    let expander = OccurrenceExpander::new(config.expansion());
    let mut store = match storage::load_store(&config.data_file, expander) {
        Ok(store) => store,
        Err(e) => {
            handle_error(e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_event(&mut store, command, &config),
        cli::Commands::List(command) => commands::list::list_events(&store, command),
        cli::Commands::Show(command) => commands::show::show_event(&store, command),
        cli::Commands::Edit(command) => commands::edit::edit_event(&mut store, command, &config),
        cli::Commands::Delete(command) => {
            commands::delete::delete_event(&mut store, command, &config)
        }
        cli::Commands::Conflicts(command) => {
            commands::conflicts::show_conflicts(&store, command)
        }
        cli::Commands::Stats => commands::stats::show_stats(&store),
        cli::Commands::Search(command) => commands::search::search_events(&store, command),
        cli::Commands::Remind(command) => {
            commands::remind::show_reminders(&store, command, &config)
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.chain().find_map(|cause| cause.downcast_ref::<CoreError>()) {
        Some(CoreError::InvalidRecurrenceRule(s)) => {
            eprintln!(
                "{} Invalid recurrence rule: {}",
                "Error:".style(error_style),
                s.yellow()
            );
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        None => {
            eprintln!("{} {:#}", "Error:".style(error_style), err);
        }
    }
}
