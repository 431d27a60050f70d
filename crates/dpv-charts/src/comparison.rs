//! Best-versus-worst comparison figure: horizontal bar chart of the selected
//! departments next to a histogram of the full MAE distribution.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::warn;

use dpv_core::stats::histogram;
use dpv_core::{ComparisonSelection, DeptMae, DeptPerformance, DpvError};

use crate::draw::draw_err;
use crate::style::{BEST_GREEN, SKY_BLUE, WORST_RED};

/// Pixel dimensions of the comparison figure at the 300-DPI export scale
/// (16×8 inches).
pub const COMPARISON_SIZE: (u32, u32) = (4800, 2400);

const HISTOGRAM_BINS: usize = 20;

/// Comparison figure content, resolved from the department summary at build
/// time so rendering is a pure drawing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    selection: ComparisonSelection,
    mae_values: Vec<f64>,
}

impl ComparisonChart {
    /// Selects min(15, N) best and worst departments and captures the MAE
    /// distribution. An overlap between the two groups (summaries with fewer
    /// than 30 rows) is surfaced in the selection, not silently ignored.
    pub fn build(summary: &DeptPerformance) -> Result<Self, DpvError> {
        let selection = summary.comparison_selection(15);
        if selection.overlap() > 0 {
            warn!(
                overlap = selection.overlap(),
                total = selection.total,
                "summary has fewer than 30 departments; best and worst groups share rows"
            );
        }
        Ok(Self {
            selection,
            mae_values: summary.mae_values(),
        })
    }

    /// The best/worst selection backing the bar chart.
    pub fn selection(&self) -> &ComparisonSelection {
        &self.selection
    }

    /// Renders the figure as a PNG at `path`.
    pub fn render(&self, path: &Path) -> Result<(), DpvError> {
        let root = BitMapBackend::new(path, COMPARISON_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let halves = root.split_evenly((1, 2));
        self.draw_bars(&halves[0])?;
        self.draw_histogram(&halves[1])?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_bars(&self, area: &DrawingArea<BitMapBackend, Shift>) -> Result<(), DpvError> {
        let bars: Vec<(DeptMae, RGBColor)> = self
            .selection
            .best
            .iter()
            .map(|row| (*row, BEST_GREEN))
            .chain(self.selection.worst.iter().map(|row| (*row, WORST_RED)))
            .collect();
        let x_max = bars
            .iter()
            .map(|(row, _)| row.mae)
            .fold(0.0f64, f64::max)
            .max(1e-6)
            * 1.05;

        let mut chart = ChartBuilder::on(area)
            .caption("Department Performance: Best vs Worst", ("sans-serif", 64))
            .margin(40)
            .x_label_area_size(140)
            .y_label_area_size(320)
            .build_cartesian_2d(0.0..x_max, (0..bars.len()).into_segmented())
            .map_err(draw_err)?;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Mean Absolute Error (MAE)")
            .axis_desc_style(("sans-serif", 48))
            .label_style(("sans-serif", 30))
            .y_labels(bars.len())
            .y_label_formatter(&|y| match y {
                SegmentValue::CenterOf(idx) if *idx < bars.len() => bars[*idx].0.dept.label(),
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(idx, (row, color))| {
                Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(idx)),
                        (row.mae, SegmentValue::Exact(idx + 1)),
                    ],
                    color.filled(),
                )
            }))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_histogram(&self, area: &DrawingArea<BitMapBackend, Shift>) -> Result<(), DpvError> {
        let hist = histogram(&self.mae_values, HISTOGRAM_BINS);
        let x_max = if hist.max > hist.min {
            hist.max
        } else {
            hist.min + 1.0
        };
        let bin_width = (x_max - hist.min) / hist.counts.len() as f64;
        let y_max = hist.peak().max(1) as f64 * 1.1;

        let mut chart = ChartBuilder::on(area)
            .caption("Distribution of Department Performance", ("sans-serif", 64))
            .margin(40)
            .x_label_area_size(140)
            .y_label_area_size(180)
            .build_cartesian_2d(hist.min..x_max, 0.0..y_max)
            .map_err(draw_err)?;
        chart
            .configure_mesh()
            .x_desc("Mean Absolute Error (MAE)")
            .y_desc("Number of Departments")
            .axis_desc_style(("sans-serif", 48))
            .label_style(("sans-serif", 30))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(hist.counts.iter().enumerate().map(|(idx, &count)| {
                let x0 = hist.min + bin_width * idx as f64;
                Rectangle::new(
                    [(x0, 0.0), (x0 + bin_width, count as f64)],
                    SKY_BLUE.mix(0.7).filled(),
                )
            }))
            .map_err(draw_err)?;
        // black bin edges over the fills
        chart
            .draw_series(hist.counts.iter().enumerate().map(|(idx, &count)| {
                let x0 = hist.min + bin_width * idx as f64;
                Rectangle::new(
                    [(x0, 0.0), (x0 + bin_width, count as f64)],
                    BLACK.stroke_width(2),
                )
            }))
            .map_err(draw_err)?;
        Ok(())
    }
}
