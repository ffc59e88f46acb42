//! Interactive session controller.
//!
//! Drives one exploration iteration after another: collect filters, load the
//! dataset, run every aggregator, optionally page through raw rows, then ask
//! whether to start over. Input and output sit behind [`CriteriaProvider`] and
//! [`ReportSink`] so the controller itself performs no I/O.

use std::time::{Duration, Instant};

use bikeshare_core::error::DataSourceError;
use bikeshare_core::models::{Dataset, FilterCriteria};
use bikeshare_data::pager::{next_page, Page};
use bikeshare_data::reader::DatasetLoader;
use bikeshare_data::stats::{Aggregator, StatReport};
use tracing::{debug, info, warn};

// ── Seams ─────────────────────────────────────────────────────────────────────

/// Yes/no questions the session asks between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    /// Whether to show the first page of raw rows.
    ViewRawData,
    /// Whether to show the next page of raw rows.
    MoreRows,
    /// Whether to start a new iteration with fresh filters.
    Restart,
}

/// Supplies validated filters and yes/no answers.
pub trait CriteriaProvider {
    /// Next set of filters, or `None` when input is exhausted.
    fn next_criteria(&mut self) -> Option<FilterCriteria>;

    /// Answer to `question`; `false` when input is exhausted.
    fn confirm(&mut self, question: Question) -> bool;
}

/// Receives everything the session produces for display.
pub trait ReportSink {
    fn report(&mut self, report: &StatReport, elapsed: Duration);

    fn page(&mut self, page: &Page<'_>);

    /// Called once the last page has been shown.
    fn end_of_data(&mut self);

    fn load_failed(&mut self, criteria: &FilterCriteria, error: &DataSourceError);
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// A report together with the time it took to compute.
#[derive(Debug, Clone)]
pub struct TimedReport {
    pub report: StatReport,
    pub elapsed: Duration,
}

/// Run every aggregator over `dataset` in display order.
pub fn analyze(dataset: &Dataset) -> Vec<TimedReport> {
    Aggregator::ALL
        .into_iter()
        .map(|agg| {
            let started = Instant::now();
            let report = agg.compute(dataset);
            let elapsed = started.elapsed();
            debug!("{:?} computed in {:?}", agg, elapsed);
            TimedReport { report, elapsed }
        })
        .collect()
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Counters describing a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Iterations started (criteria received).
    pub iterations: usize,
    /// Iterations whose dataset failed to load.
    pub failed_loads: usize,
    /// Raw-row pages shown across all iterations.
    pub pages_shown: usize,
}

/// The filter → load → aggregate → page → restart loop.
pub struct Session<P, S> {
    loader: DatasetLoader,
    provider: P,
    sink: S,
}

impl<P: CriteriaProvider, S: ReportSink> Session<P, S> {
    pub fn new(loader: DatasetLoader, provider: P, sink: S) -> Self {
        Self {
            loader,
            provider,
            sink,
        }
    }

    /// Run iterations until the provider runs dry or the user declines a restart.
    pub fn run(&mut self) -> SessionSummary {
        let mut summary = SessionSummary::default();

        while let Some(criteria) = self.provider.next_criteria() {
            summary.iterations += 1;
            info!("Exploring {}", criteria);

            match self.explore(&criteria) {
                Ok(pages) => summary.pages_shown += pages,
                Err(e) => {
                    warn!("Load failed for {}: {}", criteria, e);
                    summary.failed_loads += 1;
                    self.sink.load_failed(&criteria, &e);
                }
            }

            if !self.provider.confirm(Question::Restart) {
                break;
            }
        }

        info!(
            "Session finished after {} iteration(s)",
            summary.iterations
        );
        summary
    }

    /// Load, report and page one dataset. Returns the number of pages shown.
    ///
    /// # Errors
    ///
    /// Propagates the loader's [`DataSourceError`].
    pub fn explore(&mut self, criteria: &FilterCriteria) -> Result<usize, DataSourceError> {
        let dataset = self.loader.load(criteria)?;

        for timed in analyze(&dataset) {
            self.sink.report(&timed.report, timed.elapsed);
        }

        Ok(self.page_raw_data(&dataset))
    }

    fn page_raw_data(&mut self, dataset: &Dataset) -> usize {
        if !self.provider.confirm(Question::ViewRawData) {
            return 0;
        }

        let mut cursor = 0;
        let mut shown = 0;
        loop {
            let page = next_page(dataset, cursor);
            self.sink.page(&page);
            shown += 1;
            cursor = page.next_cursor;

            if !page.has_more {
                // An empty dataset yields one empty page and no end marker.
                if !page.rows.is_empty() {
                    self.sink.end_of_data();
                }
                break;
            }
            if !self.provider.confirm(Question::MoreRows) {
                break;
            }
        }
        shown
    }

    /// Give back the provider and sink, e.g. to inspect them in tests.
    pub fn into_parts(self) -> (P, S) {
        (self.provider, self.sink)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
