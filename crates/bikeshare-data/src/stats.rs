//! Descriptive statistics over a filtered [`Dataset`].
//!
//! Each [`Aggregator`] produces a [`StatReport`] whose metrics succeed or fail
//! independently: a metric with no defined value under the current filter
//! carries an [`EmptyDatasetError`] while its siblings still report.

use bikeshare_core::error::EmptyDatasetError;
use bikeshare_core::formatting::round_to;
use bikeshare_core::models::{month_name, weekday_name, Dataset, TieBreak};
use serde::Serialize;

// ── Report types ──────────────────────────────────────────────────────────────

/// A computed statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StatValue {
    Text(String),
    Integer(i64),
    /// Minutes rounded to 2 decimals.
    Minutes(f64),
    /// `(category, count)` pairs, highest count first.
    Counts(Vec<(String, usize)>),
    /// The source has no column for this statistic.
    Unavailable,
}

/// One named statistic inside a report.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Stable identifier, used as the JSON key.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub value: Result<StatValue, EmptyDatasetError>,
}

/// The output of one aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct StatReport {
    pub aggregator: Aggregator,
    pub metrics: Vec<Metric>,
}

impl StatReport {
    fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            metrics: Vec::new(),
        }
    }

    fn push(
        &mut self,
        key: &'static str,
        label: &'static str,
        value: Result<StatValue, EmptyDatasetError>,
    ) {
        self.metrics.push(Metric { key, label, value });
    }

    /// Look up a metric value by key.
    pub fn get(&self, key: &str) -> Option<&Result<StatValue, EmptyDatasetError>> {
        self.metrics.iter().find(|m| m.key == key).map(|m| &m.value)
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// The four statistic groups, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregator {
    TimePattern,
    StationPattern,
    Duration,
    UserDemographics,
}

impl Aggregator {
    pub const ALL: [Aggregator; 4] = [
        Aggregator::TimePattern,
        Aggregator::StationPattern,
        Aggregator::Duration,
        Aggregator::UserDemographics,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Aggregator::TimePattern => "The Most Frequent Times of Travel",
            Aggregator::StationPattern => "The Most Popular Stations and Trip",
            Aggregator::Duration => "Trip Duration",
            Aggregator::UserDemographics => "User Stats",
        }
    }

    /// Stable identifier, used as the JSON key.
    pub fn key(&self) -> &'static str {
        match self {
            Aggregator::TimePattern => "time",
            Aggregator::StationPattern => "stations",
            Aggregator::Duration => "duration",
            Aggregator::UserDemographics => "users",
        }
    }

    pub fn compute(&self, dataset: &Dataset) -> StatReport {
        match self {
            Aggregator::TimePattern => time_stats(dataset),
            Aggregator::StationPattern => station_stats(dataset),
            Aggregator::Duration => trip_duration_stats(dataset),
            Aggregator::UserDemographics => user_stats(dataset),
        }
    }
}

// ── Aggregators ───────────────────────────────────────────────────────────────

/// Most common month (lowest month wins ties), day of week (first seen wins)
/// and start hour (lowest hour wins).
pub fn time_stats(dataset: &Dataset) -> StatReport {
    let mut report = StatReport::new(Aggregator::TimePattern);

    let month = dataset
        .mode_of(|r| Some(r.calendar().month), TieBreak::Lowest)
        .and_then(|(m, _)| month_name(m))
        .map(|name| StatValue::Text(name.to_string()))
        .ok_or_else(|| EmptyDatasetError::new("month"));
    report.push("most_common_month", "Most common month", month);

    let day = dataset
        .mode_of(|r| Some(weekday_name(r.calendar().weekday)), TieBreak::FirstSeen)
        .map(|(d, _)| StatValue::Text(d.to_string()))
        .ok_or_else(|| EmptyDatasetError::new("day of week"));
    report.push("most_common_day", "Most common day of week", day);

    let hour = dataset
        .mode_of(|r| Some(r.calendar().hour), TieBreak::Lowest)
        .map(|(h, _)| StatValue::Integer(i64::from(h)))
        .ok_or_else(|| EmptyDatasetError::new("start hour"));
    report.push("most_common_hour", "Most common start hour", hour);

    report
}

/// Most used start station, end station and start/end pair. First seen wins ties.
///
/// Rows with a missing station are skipped; a pair needs both ends.
pub fn station_stats(dataset: &Dataset) -> StatReport {
    let mut report = StatReport::new(Aggregator::StationPattern);

    let start = dataset
        .mode_of(|r| r.start_station(), TieBreak::FirstSeen)
        .map(|(s, _)| StatValue::Text(s.to_string()))
        .ok_or_else(|| EmptyDatasetError::new("start station"));
    report.push(
        "most_common_start_station",
        "Most commonly used start station",
        start,
    );

    let end = dataset
        .mode_of(|r| r.end_station(), TieBreak::FirstSeen)
        .map(|(s, _)| StatValue::Text(s.to_string()))
        .ok_or_else(|| EmptyDatasetError::new("end station"));
    report.push(
        "most_common_end_station",
        "Most commonly used end station",
        end,
    );

    let trip = dataset
        .mode_of(
            |r| r.start_station().zip(r.end_station()),
            TieBreak::FirstSeen,
        )
        .map(|((from, to), _)| StatValue::Text(format!("{from} to {to}")))
        .ok_or_else(|| EmptyDatasetError::new("trip"));
    report.push(
        "most_frequent_trip",
        "Most frequent combination of start station and end station trip",
        trip,
    );

    report
}

/// Total and mean trip duration in minutes, each rounded to 2 decimals.
///
/// The total of an empty dataset is 0; its mean is undefined.
pub fn trip_duration_stats(dataset: &Dataset) -> StatReport {
    let mut report = StatReport::new(Aggregator::Duration);

    let total_secs: f64 = dataset.records().iter().map(|r| r.duration_secs()).sum();
    report.push(
        "total_travel_time",
        "Total travel time",
        Ok(StatValue::Minutes(round_to(total_secs / 60.0, 2))),
    );

    let mean = if dataset.is_empty() {
        Err(EmptyDatasetError::new("trip duration"))
    } else {
        let mean_minutes = total_secs / 60.0 / dataset.len() as f64;
        Ok(StatValue::Minutes(round_to(mean_minutes, 2)))
    };
    report.push("mean_travel_time", "Mean travel time", mean);

    report
}

/// User type and gender breakdowns plus birth-year extremes and mode.
///
/// Gender and birth-year metrics are gated on the dataset's schema, not on
/// how many rows survived filtering.
pub fn user_stats(dataset: &Dataset) -> StatReport {
    let mut report = StatReport::new(Aggregator::UserDemographics);

    let user_types = dataset.value_counts(|r| r.user_type().map(str::to_string));
    report.push("user_types", "User types", Ok(StatValue::Counts(user_types)));

    let gender = if dataset.schema.has_gender {
        StatValue::Counts(dataset.value_counts(|r| r.gender().map(str::to_string)))
    } else {
        StatValue::Unavailable
    };
    report.push("gender", "Gender", Ok(gender));

    if !dataset.schema.has_birth_year {
        report.push(
            "earliest_birth_year",
            "Earliest year of birth",
            Ok(StatValue::Unavailable),
        );
        report.push(
            "most_recent_birth_year",
            "Most recent year of birth",
            Ok(StatValue::Unavailable),
        );
        report.push(
            "most_common_birth_year",
            "Most common year of birth",
            Ok(StatValue::Unavailable),
        );
        return report;
    }

    let years = || dataset.records().iter().filter_map(|r| r.birth_year());
    let as_value = |y: i32| StatValue::Integer(i64::from(y));

    let earliest = years()
        .min()
        .map(as_value)
        .ok_or_else(|| EmptyDatasetError::new("birth year"));
    report.push("earliest_birth_year", "Earliest year of birth", earliest);

    let latest = years()
        .max()
        .map(as_value)
        .ok_or_else(|| EmptyDatasetError::new("birth year"));
    report.push("most_recent_birth_year", "Most recent year of birth", latest);

    let common = dataset
        .mode_of(|r| r.birth_year(), TieBreak::FirstSeen)
        .map(|(y, _)| as_value(y))
        .ok_or_else(|| EmptyDatasetError::new("birth year"));
    report.push("most_common_birth_year", "Most common year of birth", common);

    report
}

// ── Tests ─────────────────────────────────────────────────────────────────────
