//! Line-oriented console output for reports and raw-row pages.

use std::io::Write;
use std::time::Duration;

use bikeshare_core::error::DataSourceError;
use bikeshare_core::formatting::{format_elapsed, format_minutes};
use bikeshare_core::models::FilterCriteria;
use bikeshare_data::pager::Page;
use bikeshare_data::stats::{Metric, StatReport, StatValue};
use bikeshare_runtime::session::ReportSink;
use tracing::warn;

use crate::table_view::render_page;

/// Width of the separator printed after each section.
pub const SEPARATOR_WIDTH: usize = 40;

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Format one metric as display lines.
///
/// Scalars render as `"Label: value"`; counts render as the label followed by
/// one indented `"category: n"` line each.
pub fn format_metric(metric: &Metric) -> String {
    match &metric.value {
        Err(e) => format!("{}: {}", metric.label, e),
        Ok(StatValue::Text(s)) => format!("{}: {}", metric.label, s),
        Ok(StatValue::Integer(n)) => format!("{}: {}", metric.label, n),
        Ok(StatValue::Minutes(m)) => format!("{}: {}", metric.label, format_minutes(*m)),
        Ok(StatValue::Unavailable) => format!("{}: unavailable", metric.label),
        Ok(StatValue::Counts(counts)) if counts.is_empty() => {
            format!("{}: none", metric.label)
        }
        Ok(StatValue::Counts(counts)) => {
            let mut out = format!("{}:", metric.label);
            for (category, n) in counts {
                out.push_str(&format!("\n  {category}: {n}"));
            }
            out
        }
    }
}

/// Format a report section the way it is printed to the console.
pub fn format_report(report: &StatReport, elapsed: Duration) -> String {
    let mut out = format!("\nCalculating {}...\n\n", report.aggregator.title());
    for metric in &report.metrics {
        out.push_str(&format_metric(metric));
        out.push('\n');
    }
    out.push_str(&format!(
        "\nThis took {} seconds.\n{}\n",
        format_elapsed(elapsed),
        separator()
    ));
    out
}

/// [`ReportSink`] that writes human-readable text.
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            warn!("failed to write output: {}", e);
        }
    }
}

impl<W: Write> ReportSink for ConsoleRenderer<W> {
    fn report(&mut self, report: &StatReport, elapsed: Duration) {
        let text = format_report(report, elapsed);
        self.emit(&text);
    }

    fn page(&mut self, page: &Page<'_>) {
        let text = if page.rows.is_empty() {
            "No rows match the current filters.\n".to_string()
        } else {
            render_page(page)
        };
        self.emit(&text);
    }

    fn end_of_data(&mut self) {
        self.emit("End of data.\n");
    }

    fn load_failed(&mut self, criteria: &FilterCriteria, error: &DataSourceError) {
        let text = format!(
            "\nCould not load data for {}: {}\n{}\n",
            criteria.city,
            error,
            separator()
        );
        self.emit(&text);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::error::EmptyDatasetError;
    use bikeshare_core::models::{City, Dataset, Schema};
    use bikeshare_data::pager::next_page;
    use bikeshare_data::stats::{trip_duration_stats, user_stats};
    use std::path::PathBuf;

    fn metric(label: &'static str, value: Result<StatValue, EmptyDatasetError>) -> Metric {
        Metric {
            key: "k",
            label,
            value,
        }
    }

    fn rendered(renderer: ConsoleRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    // ── format_metric ────────────────────────────────────────────────────────

    #[test]
    fn test_format_metric_scalars() {
        assert_eq!(
            format_metric(&metric("Most common month", Ok(StatValue::Text("June".into())))),
            "Most common month: June"
        );
        assert_eq!(
            format_metric(&metric("Most common start hour", Ok(StatValue::Integer(17)))),
            "Most common start hour: 17"
        );
        assert_eq!(
            format_metric(&metric("Total travel time", Ok(StatValue::Minutes(10.0)))),
            "Total travel time: 10.0 minutes"
        );
    }

    #[test]
    fn test_format_metric_unavailable_and_error() {
        assert_eq!(
            format_metric(&metric("Gender", Ok(StatValue::Unavailable))),
            "Gender: unavailable"
        );
        assert_eq!(
            format_metric(&metric(
                "Mean travel time",
                Err(EmptyDatasetError::new("trip duration"))
            )),
            "Mean travel time: No trip duration data available for the current filter"
        );
    }

    #[test]
    fn test_format_metric_counts() {
        let m = metric(
            "User types",
            Ok(StatValue::Counts(vec![
                ("Subscriber".to_string(), 3),
                ("Customer".to_string(), 1),
            ])),
        );
        assert_eq!(
            format_metric(&m),
            "User types:\n  Subscriber: 3\n  Customer: 1"
        );
        let none = metric("User types", Ok(StatValue::Counts(vec![])));
        assert_eq!(format_metric(&none), "User types: none");
    }

    // ── format_report ────────────────────────────────────────────────────────

    #[test]
    fn test_format_report_layout() {
        let ds = Dataset::new(City::Washington, Schema::default(), vec![]);
        let text = format_report(&user_stats(&ds), Duration::from_millis(20));

        assert!(text.starts_with("\nCalculating User Stats...\n\n"));
        assert!(text.contains("Gender: unavailable\n"));
        assert!(text.contains("\nThis took 0.02 seconds.\n"));
        assert!(text.ends_with(&format!("{}\n", "-".repeat(40))));
    }

    // ── ConsoleRenderer ──────────────────────────────────────────────────────

    #[test]
    fn test_renderer_report_and_end_of_data() {
        let ds = Dataset::new(City::Chicago, Schema::full(), vec![]);
        let mut r = ConsoleRenderer::new(Vec::new());
        r.report(&trip_duration_stats(&ds), Duration::ZERO);
        r.page(&next_page(&ds, 0));
        r.end_of_data();

        let text = rendered(r);
        assert!(text.contains("Calculating Trip Duration..."));
        assert!(text.contains("Total travel time: 0.0 minutes"));
        assert!(text.contains("No rows match the current filters."));
        assert!(text.ends_with("End of data.\n"));
    }

    #[test]
    fn test_renderer_load_failed() {
        let mut r = ConsoleRenderer::new(Vec::new());
        let err = DataSourceError::MissingColumn {
            path: PathBuf::from("chicago.csv"),
            column: "User Type",
        };
        r.load_failed(&FilterCriteria::unfiltered(City::Chicago), &err);
        let text = rendered(r);
        assert!(text.contains("Could not load data for chicago"));
        assert!(text.contains("\"User Type\""));
    }
}
