//! Plain-text table of raw trip rows.
//!
//! Columns are padded by display width, not byte length, so station names
//! with accents or wide glyphs stay aligned.

use bikeshare_core::formatting::{format_decimal, pad_right};
use bikeshare_core::models::TripRecord;
use bikeshare_data::pager::Page;
use unicode_width::UnicodeWidthStr;

/// Gap between columns.
const COLUMN_GAP: &str = "  ";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `page` as a header line plus one line per row.
///
/// Gender and birth-year columns appear only when the source has them. The
/// leading column is the row's position in its source file, or its position
/// within the filtered dataset for rows built in memory.
pub fn render_page(page: &Page<'_>) -> String {
    let mut headers = vec![
        "",
        "Start Time",
        "End Time",
        "Start Station",
        "End Station",
        "Trip Duration",
        "User Type",
    ];
    if page.schema.has_gender {
        headers.push("Gender");
    }
    if page.schema.has_birth_year {
        headers.push("Birth Year");
    }

    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| row_cells(page.start + i, r, page))
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().map(|h| h.to_string()), &widths);
    for row in rows {
        push_line(&mut out, row.into_iter(), &widths);
    }
    out
}

fn row_cells(index: usize, record: &TripRecord, page: &Page<'_>) -> Vec<String> {
    let mut cells = vec![
        record.source_row().unwrap_or(index).to_string(),
        record.start_time().format(TIMESTAMP_FORMAT).to_string(),
        record
            .end_time()
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
        record.start_station().unwrap_or("").to_string(),
        record.end_station().unwrap_or("").to_string(),
        format_decimal(record.duration_secs()),
        record.user_type().unwrap_or("").to_string(),
    ];
    if page.schema.has_gender {
        cells.push(record.gender().unwrap_or("").to_string());
    }
    if page.schema.has_birth_year {
        cells.push(record.birth_year().map(|y| y.to_string()).unwrap_or_default());
    }
    cells
}

fn push_line(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| pad_right(&cell, cell.width(), w))
        .collect();
    out.push_str(padded.join(COLUMN_GAP).trim_end());
    out.push('\n');
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::{City, Dataset, Schema};
    use bikeshare_data::pager::next_page;
    use chrono::NaiveDate;

    fn record(station: &str, year: Option<i32>) -> TripRecord {
        let day = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        let ts = day.and_hms_opt(9, 7, 57).unwrap();
        TripRecord::new(ts, station, "Wells St", 776.0)
            .with_end_time(day.and_hms_opt(9, 20, 53))
            .with_user_type(Some("Subscriber".to_string()))
            .with_gender(Some("Male".to_string()))
            .with_birth_year(year)
    }

    #[test]
    fn test_render_page_full_schema() {
        let ds = Dataset::new(
            City::Chicago,
            Schema::full(),
            vec![record("Canal St", Some(1984)), record("Clark St", None)],
        );
        let text = render_page(&next_page(&ds, 0));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Start Station"));
        assert!(lines[0].contains("Birth Year"));
        assert!(lines[0].contains("End Time"));
        assert!(lines[1].starts_with("0  2017-01-01 09:07:57  2017-01-01 09:20:53  Canal St"));
        assert!(lines[1].ends_with("1984"));
        assert!(lines[2].starts_with("1  "));
        // Missing birth year leaves the trailing cell blank.
        assert!(lines[2].ends_with("Male"));
    }

    #[test]
    fn test_render_page_hides_absent_columns() {
        let ds = Dataset::new(City::Washington, Schema::default(), vec![record("A", None)]);
        let text = render_page(&next_page(&ds, 0));
        assert!(!text.contains("Gender"));
        assert!(!text.contains("Birth Year"));
        assert!(!text.contains("Male"));
    }

    #[test]
    fn test_render_page_aligns_wide_characters() {
        let ds = Dataset::new(
            City::Chicago,
            Schema::default(),
            vec![record("Café Ñandú", None), record("Plain", None)],
        );
        let text = render_page(&next_page(&ds, 0));
        let lines: Vec<&str> = text.lines().collect();
        let col = |line: &str| {
            let idx = line.find("Wells St").unwrap();
            line[..idx].width()
        };
        assert_eq!(col(lines[1]), col(lines[2]));
    }

    #[test]
    fn test_render_page_indexes_from_cursor() {
        let records = (0..7).map(|i| record(&format!("S{i}"), None)).collect();
        let ds = Dataset::new(City::Chicago, Schema::default(), records);
        let text = render_page(&next_page(&ds, 5));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("5 "));
        assert!(lines[2].starts_with("6 "));
    }

    #[test]
    fn test_render_page_uses_source_row_and_blank_cells() {
        let ts = NaiveDate::from_ymd_opt(2017, 2, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let rows = vec![
            TripRecord::new(ts, "", "Wells St", 60.0).with_source_row(41),
            TripRecord::new(ts, "Canal St", "Wells St", 60.0).with_source_row(57),
        ];
        let ds = Dataset::new(City::Washington, Schema::default(), rows);
        let text = render_page(&next_page(&ds, 0));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].starts_with("41  2017-02-01 08:00:00"));
        assert!(lines[2].starts_with("57  2017-02-01 08:00:00"));
        // Missing end time and start station render as blank cells.
        let col = |line: &str| line.find("Wells St").unwrap();
        assert_eq!(col(lines[1]), col(lines[2]));
        assert!(!lines[1].contains("Canal St"));
    }

    #[test]
    fn test_render_empty_page_is_header_only() {
        let ds = Dataset::new(City::Chicago, Schema::full(), vec![]);
        let text = render_page(&next_page(&ds, 0));
        assert_eq!(text.lines().count(), 1);
    }
}
