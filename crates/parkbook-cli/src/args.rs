use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "parkbook")]
#[command(version, about = "Book Parkhurst community facilities on the Skedda site")]
pub struct Args {
    /// Path to the JSON configuration file
    #[arg(long, global = true, default_value = "config.json")]
    pub config: PathBuf,

    /// Log verbosity
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Submit a booking for a configured facility
    Book(BookArgs),

    /// List the configured facilities
    List,

    /// Check that the configuration file is usable
    Validate,

    /// Print example invocations
    Examples,
}

#[derive(clap::Args)]
pub struct BookArgs {
    /// Facility key from the configuration file (see `parkbook list`)
    pub facility: String,

    /// Slot start time, HH:MM (24-hour clock)
    #[arg(long)]
    pub start: String,

    /// Slot end time, HH:MM (24-hour clock)
    #[arg(long)]
    pub end: String,

    /// Booking date, YYYY-MM-DD
    #[arg(long, conflicts_with = "book_in_advance_days")]
    pub date: Option<String>,

    /// Book this many days from today; without a value the config default
    /// applies, then 15
    #[arg(long, num_args = 0..=1)]
    pub book_in_advance_days: Option<Option<i64>>,

    /// Profile email whose credentials are looked up from the environment
    #[arg(long)]
    pub profile: Option<String>,

    /// Signature to type into the booking form
    #[arg(long)]
    pub signature: Option<String>,

    /// Booking title override (defaults to the buffered time range)
    #[arg(long)]
    pub title: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    pub disable_headless: bool,

    /// Allow a booking date in the past
    #[arg(long)]
    pub force_date: bool,
}
