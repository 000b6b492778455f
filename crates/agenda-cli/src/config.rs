use agenda_core::recurrence::ExpansionConfig;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file holding the stored events
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Suffix occurrence titles with " (Occurrence k)"
    #[serde(default = "default_label_occurrences")]
    pub label_occurrences: bool,
    /// Reminder applied by `add` when none is given
    #[serde(default)]
    pub default_reminder_minutes: Option<u32>,
    /// How far ahead `remind` looks for events without a reminder
    #[serde(default = "default_notify_window_hours")]
    pub notify_window_hours: u32,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("agenda.json")
}

fn default_label_occurrences() -> bool {
    true
}

fn default_notify_window_hours() -> u32 {
    24
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            label_occurrences: default_label_occurrences(),
            default_reminder_minutes: None,
            notify_window_hours: default_notify_window_hours(),
        }
    }
}

impl Config {
    /// `agenda.toml` in the working directory, overridden by `AGENDA_*` variables.
    pub fn new() -> Result<Self, figment::Error> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("agenda.toml"))
                .merge(Env::prefixed("AGENDA_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    pub fn expansion(&self) -> ExpansionConfig {
        ExpansionConfig {
            label_occurrences: self.label_occurrences,
        }
    }
}
