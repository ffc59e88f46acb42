//! CSV loading for city trip datasets.
//!
//! Reads one city's export into a [`Dataset`], deriving calendar fields and
//! the optional-column [`Schema`] as it goes, then applies the requested
//! month and weekday filters.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use bikeshare_core::config::SourceMap;
use bikeshare_core::error::DataSourceError;
use bikeshare_core::models::{City, Dataset, FilterCriteria, Schema, TripRecord};
use bikeshare_core::time_utils::parse_trip_timestamp;
use tracing::debug;

use crate::filter;

const START_TIME: &str = "Start Time";
const END_TIME: &str = "End Time";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const TRIP_DURATION: &str = "Trip Duration";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

// ── DatasetLoader ─────────────────────────────────────────────────────────────

/// Loads and filters city datasets from their configured CSV sources.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    sources: SourceMap,
}

impl DatasetLoader {
    pub fn new(sources: SourceMap) -> Self {
        Self { sources }
    }

    /// Read the city named in `criteria` and keep only matching trips.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Any [`DataSourceError`] raised while resolving or reading the source.
    pub fn load(&self, criteria: &FilterCriteria) -> Result<Dataset, DataSourceError> {
        let path = self.sources.path_for(criteria.city)?;

        let started = Instant::now();
        let dataset = read_city_csv(path, criteria.city)?;
        let loaded = dataset.len();
        let filtered = filter::apply_criteria(dataset, criteria);

        debug!(
            "Loaded {} trips from {}, {} match {} ({:.3}s)",
            loaded,
            path.display(),
            filtered.len(),
            criteria,
            started.elapsed().as_secs_f64()
        );

        Ok(filtered)
    }
}

// ── CSV parsing ───────────────────────────────────────────────────────────────

/// Read every trip in the CSV file at `path`.
///
/// # Errors
///
/// [`DataSourceError::FileRead`] when the file cannot be opened, otherwise
/// whatever [`read_trips`] reports.
pub fn read_city_csv(path: &Path, city: City) -> Result<Dataset, DataSourceError> {
    let file = std::fs::File::open(path).map_err(|source| DataSourceError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_trips(file, city, path)
}

/// Parse trips from any CSV byte stream. `origin` is only used in errors.
///
/// # Errors
///
/// * [`DataSourceError::Csv`] for structural CSV failures.
/// * [`DataSourceError::MissingColumn`] when a required header is absent.
/// * [`DataSourceError::MalformedRecord`] for unparseable field values.
pub fn read_trips<R: Read>(
    input: R,
    city: City,
    origin: &Path,
) -> Result<Dataset, DataSourceError> {
    let csv_err = |source: csv::Error| DataSourceError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = ColumnIndex::resolve(&headers, origin)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(csv_err)?;
        // Header occupies line 1.
        let line = row.position().map_or(i as u64 + 2, |p| p.line());
        let record = columns.parse_row(&row, origin, line)?.with_source_row(i);
        records.push(record);
    }

    Ok(Dataset::new(city, columns.schema(), records))
}

/// Positions of the known columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    start_time: usize,
    end_time: Option<usize>,
    start_station: usize,
    end_station: usize,
    trip_duration: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, origin: &Path) -> Result<Self, DataSourceError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| {
            find(name).ok_or_else(|| DataSourceError::MissingColumn {
                path: origin.to_path_buf(),
                column: name,
            })
        };

        Ok(Self {
            start_time: require(START_TIME)?,
            end_time: find(END_TIME),
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            trip_duration: require(TRIP_DURATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            has_gender: self.gender.is_some(),
            has_birth_year: self.birth_year.is_some(),
        }
    }

    fn parse_row(
        &self,
        row: &csv::StringRecord,
        origin: &Path,
        line: u64,
    ) -> Result<TripRecord, DataSourceError> {
        let field = |idx: usize| row.get(idx).unwrap_or("");
        let malformed = |reason: String| DataSourceError::MalformedRecord {
            path: origin.to_path_buf(),
            line,
            reason,
        };

        let raw_start = field(self.start_time);
        let start_time = parse_trip_timestamp(raw_start)
            .ok_or_else(|| malformed(format!("invalid start time \"{raw_start}\"")))?;

        let end_time = match self.end_time.map(field).map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                parse_trip_timestamp(raw)
                    .ok_or_else(|| malformed(format!("invalid end time \"{raw}\"")))?,
            ),
            _ => None,
        };

        let raw_duration = field(self.trip_duration);
        let duration_secs = parse_duration(raw_duration)
            .ok_or_else(|| malformed(format!("invalid trip duration \"{raw_duration}\"")))?;

        let birth_year = match self.birth_year.map(field) {
            Some(raw) => parse_birth_year(raw)
                .map_err(|()| malformed(format!("invalid birth year \"{raw}\"")))?,
            None => None,
        };

        Ok(TripRecord::new(
            start_time,
            field(self.start_station),
            field(self.end_station),
            duration_secs,
        )
        .with_end_time(end_time)
        .with_user_type(non_blank(field(self.user_type)))
        .with_gender(self.gender.map(field).and_then(non_blank))
        .with_birth_year(birth_year))
    }
}

/// Seconds as a finite, non-negative number. Some exports use decimals.
fn parse_duration(raw: &str) -> Option<f64> {
    let secs: f64 = raw.trim().parse().ok()?;
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

/// Blank cells are missing values; `1985` and `1985.0` are both accepted.
fn parse_birth_year(raw: &str) -> Result<Option<i32>, ()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let year: f64 = trimmed.parse().map_err(|_| ())?;
    if !year.is_finite() || year.fract() != 0.0 || year.abs() > f64::from(i32::MAX) {
        return Err(());
    }
    Ok(Some(year as i32))
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
