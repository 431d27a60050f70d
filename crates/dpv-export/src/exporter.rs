//! Best-effort PNG export of every figure in a book.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use dpv_charts::{FigureBook, FigureHandle};

/// Maps a figure handle to its export filename. Handles 1–5 carry the fixed
/// descriptive names; anything else gets a generic `figure_<n>.png`.
pub fn figure_filename(handle: FigureHandle) -> String {
    match handle.as_raw() {
        1 => "department_performance_comparison.png".to_string(),
        2 => "comprehensive_analysis_dashboard.png".to_string(),
        3 => "seasonal_performance_analysis.png".to_string(),
        4 => "strategic_department_visualization.png".to_string(),
        5 => "additional_analysis.png".to_string(),
        n => format!("figure_{n}.png"),
    }
}

/// Result of exporting a single figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOutcome {
    /// Raw figure handle the outcome belongs to.
    pub handle: u32,
    /// Filename the export targeted, whether or not it succeeded.
    pub filename: String,
    /// Error message when the export failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportOutcome {
    /// Whether the figure was written successfully.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Exports every figure in the book into `out_dir`, in book order.
///
/// A failing figure is recorded and skipped; the remaining figures are still
/// attempted. There is no retry.
pub fn export_figures(book: &FigureBook, out_dir: &Path) -> Vec<ExportOutcome> {
    info!(figures = book.len(), "exporting figures");
    book.figures()
        .iter()
        .map(|figure| {
            let handle = figure.handle();
            let filename = figure_filename(handle);
            let path = out_dir.join(&filename);
            match figure.spec().render(&path) {
                Ok(()) => {
                    info!(file = %filename, "exported figure");
                    ExportOutcome {
                        handle: handle.as_raw(),
                        filename,
                        error: None,
                    }
                }
                Err(err) => {
                    error!(file = %filename, error = %err, "figure export failed");
                    ExportOutcome {
                        handle: handle.as_raw(),
                        filename,
                        error: Some(err.to_string()),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_names_cover_handles_one_through_five() {
        let expected = [
            (1, "department_performance_comparison.png"),
            (2, "comprehensive_analysis_dashboard.png"),
            (3, "seasonal_performance_analysis.png"),
            (4, "strategic_department_visualization.png"),
            (5, "additional_analysis.png"),
        ];
        for (raw, name) in expected {
            assert_eq!(figure_filename(FigureHandle::from_raw(raw)), name);
        }
    }

    #[test]
    fn unmapped_handles_get_generic_names() {
        assert_eq!(figure_filename(FigureHandle::from_raw(6)), "figure_6.png");
        assert_eq!(figure_filename(FigureHandle::from_raw(99)), "figure_99.png");
    }
}
