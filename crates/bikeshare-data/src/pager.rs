//! Fixed-size windows over a dataset's raw rows.
//!
//! The pager holds no state: callers keep the cursor and decide whether to
//! ask for the next window.

use bikeshare_core::models::{Dataset, Schema, TripRecord};

/// Rows returned per page.
pub const PAGE_SIZE: usize = 5;

/// One window of rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a> {
    pub rows: &'a [TripRecord],
    /// Optional columns of the dataset the rows came from.
    pub schema: Schema,
    /// Position of the first row in `rows` within the dataset.
    pub start: usize,
    /// Cursor to pass to the next call.
    pub next_cursor: usize,
    pub has_more: bool,
}

/// Up to [`PAGE_SIZE`] rows starting at `cursor`.
///
/// A cursor at or beyond the end yields an empty page with `has_more == false`.
pub fn next_page(dataset: &Dataset, cursor: usize) -> Page<'_> {
    let records = dataset.records();
    let start = cursor.min(records.len());
    let end = start.saturating_add(PAGE_SIZE).min(records.len());
    Page {
        rows: &records[start..end],
        schema: dataset.schema,
        start,
        next_cursor: end,
        has_more: end < records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::{City, Schema};
    use chrono::NaiveDate;

    fn dataset(n: usize) -> Dataset {
        let base = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = (0..n)
            .map(|i| {
                let ts = base + chrono::Duration::minutes(i as i64);
                TripRecord::new(ts, format!("station-{i}"), "end", i as f64)
            })
            .collect();
        Dataset::new(City::Chicago, Schema::full(), records)
    }

    #[test]
    fn test_first_page() {
        let ds = dataset(12);
        let page = next_page(&ds, 0);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.start, 0);
        assert_eq!(page.next_cursor, 5);
        assert!(page.has_more);
    }

    #[test]
    fn test_last_partial_page() {
        let ds = dataset(12);
        let page = next_page(&ds, 10);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.next_cursor, 12);
        assert!(!page.has_more);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let ds = dataset(10);
        let page = next_page(&ds, 5);
        assert_eq!(page.rows.len(), 5);
        assert!(!page.has_more);
    }

    #[test]
    fn test_cursor_past_end_is_empty() {
        let ds = dataset(3);
        let page = next_page(&ds, 99);
        assert!(page.rows.is_empty());
        assert_eq!(page.next_cursor, 3);
        assert!(!page.has_more);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = dataset(0);
        let page = next_page(&ds, 0);
        assert!(page.rows.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_pages_concatenate_to_dataset() {
        let ds = dataset(23);
        let mut collected: Vec<TripRecord> = Vec::new();
        let mut cursor = 0;
        loop {
            let page = next_page(&ds, cursor);
            collected.extend_from_slice(page.rows);
            cursor = page.next_cursor;
            if !page.has_more {
                break;
            }
        }
        assert_eq!(collected.as_slice(), ds.records());
    }

    #[test]
    fn test_restart_from_zero() {
        let ds = dataset(7);
        let first = next_page(&ds, 0);
        let second = next_page(&ds, first.next_cursor);
        assert_eq!(second.rows.len(), 2);
        assert_eq!(next_page(&ds, 0), first);
    }
}
