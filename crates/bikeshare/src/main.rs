mod bootstrap;

use std::io::{self, Write};

use anyhow::{Context, Result};
use bikeshare_core::config::ConfigFile;
use bikeshare_core::models::FilterCriteria;
use bikeshare_core::settings::Settings;
use bikeshare_data::reader::DatasetLoader;
use bikeshare_runtime::session::{analyze, ReportSink, Session};
use bikeshare_ui::json::reports_to_json;
use bikeshare_ui::{ConsolePrompter, ConsoleRenderer};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("Bikeshare explorer v{} starting", env!("CARGO_PKG_VERSION"));

    let config = ConfigFile::discover(settings.config.as_deref())?;
    let loader = DatasetLoader::new(config.source_map(&settings.data_dir)?);

    match settings.one_shot_criteria() {
        Some(criteria) => run_once(&loader, &criteria, settings.json),
        None => {
            run_interactive(loader);
            Ok(())
        }
    }
}

/// Load, analyze and print one dataset without prompting.
fn run_once(loader: &DatasetLoader, criteria: &FilterCriteria, json: bool) -> Result<()> {
    tracing::info!("Running one-shot analysis for {}", criteria);

    let dataset = loader
        .load(criteria)
        .with_context(|| format!("loading data for {}", criteria.city))?;
    let reports = analyze(&dataset);

    if json {
        let doc = reports_to_json(criteria, dataset.len(), &reports);
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &doc)?;
        writeln!(stdout)?;
    } else {
        let mut renderer = ConsoleRenderer::new(io::stdout().lock());
        for timed in &reports {
            renderer.report(&timed.report, timed.elapsed);
        }
    }
    Ok(())
}

/// Prompt on stdin until the user declines a restart or input ends.
fn run_interactive(loader: DatasetLoader) {
    let prompter = ConsolePrompter::new(io::stdin().lock(), io::stdout());
    let renderer = ConsoleRenderer::new(io::stdout());

    let summary = Session::new(loader, prompter, renderer).run();
    tracing::info!(
        "Explored {} dataset(s), {} failed to load, {} page(s) of raw data shown",
        summary.iterations,
        summary.failed_loads,
        summary.pages_shown
    );
}
