//! JSON rendering of a one-shot analysis.

use bikeshare_core::formatting::round_to;
use bikeshare_core::models::FilterCriteria;
use bikeshare_runtime::session::TimedReport;
use serde_json::{json, Map, Value};

/// Build the JSON document for `reports` computed over `row_count` rows.
///
/// Metrics appear under `reports.<aggregator>.metrics.<metric>` as the
/// serialized [`StatValue`](bikeshare_data::stats::StatValue), or as
/// `{"error": "..."}` when the metric is undefined for the filter.
pub fn reports_to_json(criteria: &FilterCriteria, row_count: usize, reports: &[TimedReport]) -> Value {
    let mut sections = Map::new();
    for timed in reports {
        let mut metrics = Map::new();
        for metric in &timed.report.metrics {
            let value = match &metric.value {
                Ok(v) => serde_json::to_value(v).unwrap_or(Value::Null),
                Err(e) => json!({ "error": e.to_string() }),
            };
            metrics.insert(metric.key.to_string(), value);
        }
        sections.insert(
            timed.report.aggregator.key().to_string(),
            json!({
                "title": timed.report.aggregator.title(),
                "elapsed_seconds": round_to(timed.elapsed.as_secs_f64(), 2),
                "metrics": metrics,
            }),
        );
    }

    json!({
        "filter": {
            "city": criteria.city.to_string(),
            "month": criteria.month.to_string(),
            "day": criteria.weekday.to_string(),
        },
        "rows": row_count,
        "reports": sections,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
