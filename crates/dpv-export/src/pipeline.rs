//! End-to-end export pipeline: prepare the output directory, regenerate the
//! two key figures when the book is empty, export everything, write the log.

use std::fs;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dpv_charts::{ComparisonChart, DashboardChart, DashboardReport, FigureBook, FigureSpec};
use dpv_core::{AnalysisInputs, ComparisonSelection, DpvError};

use crate::exporter::{export_figures, figure_filename, ExportOutcome};
use crate::log::write_export_log;

/// What the regeneration step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegenerationReport {
    /// Best/worst selection behind the comparison figure, including any
    /// overlap between the two groups.
    pub comparison: ComparisonSelection,
    /// Per-panel outcomes of the dashboard build.
    pub dashboard: DashboardReport,
    /// Filenames written by the regeneration-time saves.
    pub saved: Vec<String>,
}

/// Full record of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Output directory the run wrote into.
    pub output_dir: String,
    /// Timestamp of the run, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Number of figures exported successfully.
    pub exported: usize,
    /// Per-figure outcomes, in book order.
    pub figures: Vec<ExportOutcome>,
    /// Present when the book was empty at entry and the two key figures were
    /// rebuilt.
    pub regeneration: Option<RegenerationReport>,
}

/// Runs the whole export flow against `book`, mutating it when regeneration
/// is needed. Always reaches the log-writing step: figure-level failures are
/// recorded per item, never propagated.
pub fn run_pipeline(
    inputs: &AnalysisInputs<'_>,
    book: &mut FigureBook,
    out_dir: &Path,
) -> Result<ExportReport, DpvError> {
    fs::create_dir_all(out_dir).map_err(|err| {
        DpvError::Export(
            dpv_core::ErrorInfo::new("outdir-create", err.to_string())
                .with_context("dir", out_dir.display().to_string()),
        )
    })?;
    info!(dir = %out_dir.display(), "output directory ready");
    info!(figures = book.len(), "checked figure book");

    let regeneration = if book.is_empty() {
        info!("no figures found, regenerating key visualizations");
        Some(regenerate(inputs, book, out_dir)?)
    } else {
        None
    };

    let figures = export_figures(book, out_dir);
    let exported = figures.iter().filter(|o| o.succeeded()).count();
    let timestamp = Local::now();
    write_export_log(out_dir, &timestamp, &figures)?;
    info!(exported, total = figures.len(), "export complete");

    Ok(ExportReport {
        output_dir: out_dir.display().to_string(),
        timestamp: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        exported,
        figures,
        regeneration,
    })
}

/// Builds the comparison figure and the dashboard, pushes both into the book
/// and writes each one immediately. The immediate saves are best effort; the
/// export pass retries every figure in the book anyway.
fn regenerate(
    inputs: &AnalysisInputs<'_>,
    book: &mut FigureBook,
    out_dir: &Path,
) -> Result<RegenerationReport, DpvError> {
    let comparison = ComparisonChart::build(inputs.summary)?;
    let selection = comparison.selection().clone();
    let dashboard = DashboardChart::build(inputs)?;
    let dashboard_report = dashboard.report();

    let first = book.push(FigureSpec::Comparison(comparison));
    let second = book.push(FigureSpec::Dashboard(dashboard));

    let mut saved = Vec::new();
    for figure in book.figures() {
        if figure.handle() != first && figure.handle() != second {
            continue;
        }
        let filename = figure_filename(figure.handle());
        match figure.spec().render(&out_dir.join(&filename)) {
            Ok(()) => {
                info!(file = %filename, "saved regenerated figure");
                saved.push(filename);
            }
            Err(err) => {
                warn!(file = %filename, error = %err, "failed to save regenerated figure");
            }
        }
    }
    Ok(RegenerationReport {
        comparison: selection,
        dashboard: dashboard_report,
        saved,
    })
}
