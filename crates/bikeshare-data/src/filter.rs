//! Month and weekday narrowing of a loaded [`Dataset`].

use bikeshare_core::models::{Dataset, FilterCriteria, MonthFilter, WeekdayFilter};

/// Keep trips whose derived month and weekday satisfy both predicates.
///
/// Order is preserved and applying the same filters twice is a no-op.
pub fn apply(dataset: Dataset, month: MonthFilter, weekday: WeekdayFilter) -> Dataset {
    let criteria = FilterCriteria::new(dataset.city, month, weekday);
    apply_criteria(dataset, &criteria)
}

/// Keep trips matching `criteria`'s month and weekday.
pub fn apply_criteria(dataset: Dataset, criteria: &FilterCriteria) -> Dataset {
    if criteria.month == MonthFilter::All && criteria.weekday == WeekdayFilter::All {
        return dataset;
    }
    dataset.retain(|r| criteria.matches(r.calendar()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
