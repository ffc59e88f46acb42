use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::BikeshareError;

/// Month names in calendar order; index + 1 is the month number.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Months a user may filter by. The datasets only cover the first half-year.
pub const FILTER_MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

/// Weekdays in Monday-first order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a month number (1-12). Out-of-range numbers yield `None`.
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(idx).copied()
}

/// Full English name of a weekday, e.g. `"Monday"`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── City ──────────────────────────────────────────────────────────────────────

/// Cities with a trip dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase name as typed at the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name of the city's CSV inside the data directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.as_str() == normalised)
            .ok_or_else(|| BikeshareError::InvalidCity(s.trim().to_string()))
    }
}

// ── Filters ───────────────────────────────────────────────────────────────────

/// Month predicate: every month, or a single month from January to June.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    /// Whether a record with the given calendar fields passes this filter.
    pub fn matches(&self, calendar: &CalendarFields) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(m) => calendar.month == m.number_from_month(),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(m) => f.write_str(&m.name().to_lowercase()),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase();
        if normalised == "all" {
            return Ok(MonthFilter::All);
        }
        FILTER_MONTHS
            .into_iter()
            .find(|m| m.name().to_lowercase() == normalised)
            .map(MonthFilter::Only)
            .ok_or_else(|| BikeshareError::InvalidMonth(s.trim().to_string()))
    }
}

/// Day-of-week predicate: every day, or a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekdayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl WeekdayFilter {
    /// Whether a record with the given calendar fields passes this filter.
    pub fn matches(&self, calendar: &CalendarFields) -> bool {
        match self {
            WeekdayFilter::All => true,
            WeekdayFilter::Only(d) => calendar.weekday == *d,
        }
    }
}

impl fmt::Display for WeekdayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekdayFilter::All => f.write_str("all"),
            WeekdayFilter::Only(d) => f.write_str(&weekday_name(*d).to_lowercase()),
        }
    }
}

impl FromStr for WeekdayFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase();
        if normalised == "all" {
            return Ok(WeekdayFilter::All);
        }
        WEEKDAYS
            .into_iter()
            .find(|d| weekday_name(*d).to_lowercase() == normalised)
            .map(WeekdayFilter::Only)
            .ok_or_else(|| BikeshareError::InvalidWeekday(s.trim().to_string()))
    }
}

/// A validated set of filters for one session iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub city: City,
    pub month: MonthFilter,
    pub weekday: WeekdayFilter,
}

impl FilterCriteria {
    pub fn new(city: City, month: MonthFilter, weekday: WeekdayFilter) -> Self {
        Self {
            city,
            month,
            weekday,
        }
    }

    /// Criteria that keep every record of `city`.
    pub fn unfiltered(city: City) -> Self {
        Self::new(city, MonthFilter::All, WeekdayFilter::All)
    }

    /// Both predicates applied together.
    pub fn matches(&self, calendar: &CalendarFields) -> bool {
        self.month.matches(calendar) && self.weekday.matches(calendar)
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "city={}, month={}, day={}",
            self.city, self.month, self.weekday
        )
    }
}

// ── Trip records ──────────────────────────────────────────────────────────────

/// Calendar values derived from a trip's start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    /// Month number, 1-12.
    pub month: u32,
    pub weekday: Weekday,
    /// Hour of day, 0-23.
    pub hour: u32,
}

impl CalendarFields {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        Self {
            month: ts.month(),
            weekday: ts.weekday(),
            hour: ts.hour(),
        }
    }
}

/// One row of a trip dataset.
///
/// Calendar fields are computed once in [`TripRecord::new`] and cannot drift
/// from the start timestamp because neither is mutable after construction.
/// Blank station names are stored as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    start_station: Option<String>,
    end_station: Option<String>,
    duration_secs: f64,
    source_row: Option<usize>,
    user_type: Option<String>,
    gender: Option<String>,
    birth_year: Option<i32>,
    calendar: CalendarFields,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        duration_secs: f64,
    ) -> Self {
        Self {
            calendar: CalendarFields::from_timestamp(&start_time),
            start_time,
            end_time: None,
            start_station: non_blank(start_station.into()),
            end_station: non_blank(end_station.into()),
            duration_secs,
            source_row: None,
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    /// Zero-based position of the row among the data rows of its source file.
    pub fn with_source_row(mut self, row: usize) -> Self {
        self.source_row = Some(row);
        self
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn start_station(&self) -> Option<&str> {
        self.start_station.as_deref()
    }

    pub fn end_station(&self) -> Option<&str> {
        self.end_station.as_deref()
    }

    pub fn source_row(&self) -> Option<usize> {
        self.source_row
    }

    /// Trip length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn user_type(&self) -> Option<&str> {
        self.user_type.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    pub fn calendar(&self) -> &CalendarFields {
        &self.calendar
    }
}

fn non_blank(name: String) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// Optional columns present in a source, decided once from its header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    /// Schema with every optional column present.
    pub fn full() -> Self {
        Self {
            has_gender: true,
            has_birth_year: true,
        }
    }
}

/// How [`Dataset::mode_of`] picks among equally frequent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// The value encountered first while scanning the dataset in order.
    FirstSeen,
    /// The smallest value by its natural ordering.
    Lowest,
}

/// An ordered, in-memory collection of trips for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub city: City,
    pub schema: Schema,
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: City, schema: Schema, records: Vec<TripRecord>) -> Self {
        Self {
            city,
            schema,
            records,
        }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only records for which `keep` returns `true`, preserving order.
    pub fn retain(mut self, keep: impl Fn(&TripRecord) -> bool) -> Self {
        self.records.retain(|r| keep(r));
        self
    }

    /// Occurrences of each key in first-seen order. Rows with no key are skipped.
    fn tally<'a, K, F>(&'a self, key: F) -> Vec<(K, usize)>
    where
        K: Eq + Hash + Clone,
        F: Fn(&'a TripRecord) -> Option<K>,
    {
        let mut positions: HashMap<K, usize> = HashMap::new();
        let mut counts: Vec<(K, usize)> = Vec::new();
        for k in self.records.iter().filter_map(&key) {
            match positions.get(&k) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(k.clone(), counts.len());
                    counts.push((k, 1));
                }
            }
        }
        counts
    }

    /// Counts per key, highest first. Equal counts keep first-seen order.
    pub fn value_counts<'a, K, F>(&'a self, key: F) -> Vec<(K, usize)>
    where
        K: Eq + Hash + Clone,
        F: Fn(&'a TripRecord) -> Option<K>,
    {
        let mut counts = self.tally(key);
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Most frequent key and its count, or `None` when no row yields a key.
    pub fn mode_of<'a, K, F>(&'a self, key: F, tie_break: TieBreak) -> Option<(K, usize)>
    where
        K: Eq + Hash + Ord + Clone,
        F: Fn(&'a TripRecord) -> Option<K>,
    {
        let mut best: Option<(K, usize)> = None;
        for (k, n) in self.tally(key) {
            let replace = match &best {
                None => true,
                Some((bk, bn)) => {
                    n > *bn || (n == *bn && tie_break == TieBreak::Lowest && k < *bk)
                }
            };
            if replace {
                best = Some((k, n));
            }
        }
        best
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
