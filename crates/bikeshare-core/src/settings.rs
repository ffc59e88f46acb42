use clap::Parser;
use std::path::PathBuf;

use crate::models::{City, FilterCriteria, MonthFilter, WeekdayFilter};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore US bikeshare trip data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Explore US bikeshare trip data",
    version
)]
pub struct Settings {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// JSON config file overriding the data directory or per-city sources
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// City to analyse; runs once without prompting
    #[arg(long)]
    pub city: Option<City>,

    /// Month filter used with --city (all, january .. june)
    #[arg(long, default_value = "all", requires = "city")]
    pub month: MonthFilter,

    /// Day filter used with --city (all, monday .. sunday)
    #[arg(long, default_value = "all", requires = "city")]
    pub day: WeekdayFilter,

    /// Print the statistics as JSON (requires --city)
    #[arg(long, requires = "city")]
    pub json: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply derived overrides.
    pub fn load() -> Self {
        Self::from_parsed(Settings::parse())
    }

    /// Same as [`Settings::load`] but over an explicit argument list.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::from_parsed)
    }

    fn from_parsed(mut settings: Settings) -> Self {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Filters for a non-interactive run, present only when `--city` was given.
    pub fn one_shot_criteria(&self) -> Option<FilterCriteria> {
        self.city
            .map(|city| FilterCriteria::new(city, self.month, self.day))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
