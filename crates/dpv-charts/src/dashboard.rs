//! Four-panel analysis dashboard: seasonal heatmap, top-10 departments,
//! performance matrix (with fallbacks) and strategic scatter.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};

use dpv_core::{AnalysisInputs, DeptId, DeptMae, DpvError, StrategicSource};

use crate::draw::{draw_err, draw_placeholder};
use crate::panels::{MatrixPanel, PanelOutcome, PanelStatus, StrategicPanel, StrategicPoint};
use crate::style::{
    green_yellow_red, padded_range, point_radius, red_yellow_blue, scatter_style, unit_scale,
    viridis, LABEL_OFFSETS, LIGHT_CORAL, PX_PER_PT,
};

/// Pixel dimensions of the dashboard at the 300-DPI export scale
/// (16×12 inches).
pub const DASHBOARD_SIZE: (u32, u32) = (4800, 3600);

/// Build-time record of how each dashboard panel was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// One outcome per panel, in panel order.
    pub panels: Vec<PanelOutcome>,
    /// Which priority tier supplied the strategic scatter data.
    pub strategic_source: StrategicSource,
}

/// Dashboard figure content, fully resolved at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardChart {
    heat_depts: Vec<DeptId>,
    heat_periods: Vec<String>,
    heat_values: Vec<Vec<f64>>,
    heat_annotations: Vec<Vec<Option<String>>>,
    top: Vec<DeptMae>,
    matrix: MatrixPanel,
    strategic: StrategicPanel,
    outcomes: Vec<PanelOutcome>,
    strategic_source: StrategicSource,
}

impl DashboardChart {
    /// Resolves all four panels from the input tables. The matrix and
    /// strategic panels degrade instead of failing; their outcomes are
    /// captured in [`DashboardChart::report`].
    pub fn build(inputs: &AnalysisInputs<'_>) -> Result<Self, DpvError> {
        let (matrix, matrix_outcome) = MatrixPanel::resolve(inputs.summary, inputs.matrix);
        let (strategic, strategic_outcome, strategic_source) =
            StrategicPanel::resolve(inputs.revenue_weighted, inputs.strategic_assets);
        let outcomes = vec![
            PanelOutcome {
                panel: "seasonal-heatmap".to_string(),
                status: PanelStatus::Rendered,
            },
            PanelOutcome {
                panel: "top-departments".to_string(),
                status: PanelStatus::Rendered,
            },
            matrix_outcome,
            strategic_outcome,
        ];
        Ok(Self {
            heat_depts: inputs.seasonal.depts().to_vec(),
            heat_periods: inputs.seasonal.periods().to_vec(),
            heat_values: inputs.seasonal.filled(),
            heat_annotations: inputs.seasonal.annotations(),
            top: inputs.summary.best(10),
            matrix,
            strategic,
            outcomes,
            strategic_source,
        })
    }

    /// Per-panel outcomes collected while building the dashboard.
    pub fn report(&self) -> DashboardReport {
        DashboardReport {
            panels: self.outcomes.clone(),
            strategic_source: self.strategic_source,
        }
    }

    /// Renders the 2×2 dashboard as a PNG at `path`.
    pub fn render(&self, path: &Path) -> Result<(), DpvError> {
        let root = BitMapBackend::new(path, DASHBOARD_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let quads = root.split_evenly((2, 2));
        self.draw_heatmap(&quads[0])?;
        self.draw_top_departments(&quads[1])?;
        self.draw_matrix(&quads[2])?;
        self.draw_strategic(&quads[3])?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_heatmap(&self, area: &DrawingArea<BitMapBackend, Shift>) -> Result<(), DpvError> {
        let rows = self.heat_depts.len();
        let cols = self.heat_periods.len();
        if rows == 0 || cols == 0 {
            return draw_placeholder(area, "Seasonal Performance Heatmap", "No seasonal data");
        }
        let flat: Vec<f64> = self.heat_values.iter().flatten().copied().collect();
        let vmin = flat.iter().cloned().fold(f64::INFINITY, f64::min);
        let vmax = flat.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let depts = &self.heat_depts;
        let periods = &self.heat_periods;
        let mut chart = ChartBuilder::on(area)
            .caption("Seasonal Performance Heatmap", ("sans-serif", 56))
            .margin(30)
            .x_label_area_size(110)
            .y_label_area_size(260)
            .build_cartesian_2d((0..cols).into_segmented(), (0..rows).into_segmented())
            .map_err(draw_err)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(cols)
            .y_labels(rows)
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) if *i < cols => periods[*i].clone(),
                _ => String::new(),
            })
            .y_label_formatter(&|y| match y {
                // row 0 of the pivot is drawn at the top
                SegmentValue::CenterOf(i) if *i < rows => depts[rows - 1 - *i].label(),
                _ => String::new(),
            })
            .label_style(("sans-serif", 30))
            .draw()
            .map_err(draw_err)?;

        for (i, row) in self.heat_values.iter().enumerate() {
            let y = rows - 1 - i;
            chart
                .draw_series(row.iter().enumerate().map(|(j, &value)| {
                    let color = red_yellow_blue(unit_scale(value, vmin, vmax));
                    Rectangle::new(
                        [
                            (SegmentValue::Exact(j), SegmentValue::Exact(y)),
                            (SegmentValue::Exact(j + 1), SegmentValue::Exact(y + 1)),
                        ],
                        color.filled(),
                    )
                }))
                .map_err(draw_err)?;
        }

        let annotation = ("sans-serif", 34)
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for (i, row) in self.heat_annotations.iter().enumerate() {
            for (j, text) in row.iter().enumerate() {
                if let Some(text) = text {
                    chart
                        .draw_series(std::iter::once(Text::new(
                            text.clone(),
                            (
                                SegmentValue::CenterOf(j),
                                SegmentValue::CenterOf(rows - 1 - i),
                            ),
                            annotation.clone(),
                        )))
                        .map_err(draw_err)?;
                }
            }
        }
        Ok(())
    }

    fn draw_top_departments(
        &self,
        area: &DrawingArea<BitMapBackend, Shift>,
    ) -> Result<(), DpvError> {
        if self.top.is_empty() {
            return draw_placeholder(
                area,
                "Top 10 Best Performing Departments",
                "No summary data",
            );
        }
        let y_max = self
            .top
            .iter()
            .map(|row| row.mae)
            .fold(0.0f64, f64::max)
            .max(1e-6)
            * 1.1;
        let top = &self.top;
        let mut chart = ChartBuilder::on(area)
            .caption("Top 10 Best Performing Departments", ("sans-serif", 56))
            .margin(30)
            .x_label_area_size(110)
            .y_label_area_size(180)
            .build_cartesian_2d((0..top.len()).into_segmented(), 0.0..y_max)
            .map_err(draw_err)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("MAE")
            .axis_desc_style(("sans-serif", 44))
            .x_labels(top.len())
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) if *i < top.len() => top[*i].dept.label(),
                _ => String::new(),
            })
            .label_style(("sans-serif", 28))
            .draw()
            .map_err(draw_err)?;
        chart
            .draw_series(top.iter().enumerate().map(|(idx, row)| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(idx), 0.0),
                        (SegmentValue::Exact(idx + 1), row.mae),
                    ],
                    LIGHT_CORAL.mix(0.7).filled(),
                )
            }))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_matrix(&self, area: &DrawingArea<BitMapBackend, Shift>) -> Result<(), DpvError> {
        match &self.matrix {
            MatrixPanel::Unavailable { message } => {
                draw_placeholder(area, "Performance Matrix", message)
            }
            MatrixPanel::Normalized {
                depts,
                metrics,
                raw,
                normalized,
            } => {
                let labels: Vec<String> = depts.iter().map(DeptId::label).collect();
                let columns: Vec<String> = metrics
                    .iter()
                    .map(|name| name.chars().take(10).collect())
                    .collect();
                // colors come from the standardized values, clamped to ±2σ
                let colors: Vec<Vec<RGBColor>> = normalized
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|z| green_yellow_red((z.clamp(-2.0, 2.0) + 2.0) / 4.0))
                            .collect()
                    })
                    .collect();
                draw_annotated_matrix(
                    area,
                    "Department Performance Matrix (Top 5 Best vs Worst)",
                    "Key Metrics",
                    "Departments",
                    &columns,
                    &labels,
                    raw,
                    &colors,
                )
            }
            MatrixPanel::RawMae { best, worst } => {
                const RANKS: [&str; 5] = ["1st", "2nd", "3rd", "4th", "5th"];
                let values: Vec<Vec<f64>> = vec![
                    best.iter().map(|row| row.mae).collect(),
                    worst.iter().map(|row| row.mae).collect(),
                ];
                let flat: Vec<f64> = values.iter().flatten().copied().collect();
                let vmin = flat.iter().cloned().fold(f64::INFINITY, f64::min);
                let vmax = flat.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let colors: Vec<Vec<RGBColor>> = values
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|v| green_yellow_red(unit_scale(*v, vmin, vmax)))
                            .collect()
                    })
                    .collect();
                let columns: Vec<String> = (0..best.len().max(worst.len()))
                    .map(|i| {
                        RANKS
                            .get(i)
                            .map(|rank| rank.to_string())
                            .unwrap_or_else(|| format!("{}th", i + 1))
                    })
                    .collect();
                draw_annotated_matrix(
                    area,
                    "Department Performance Comparison (Best vs Worst MAE)",
                    "Department Rank",
                    "Performance Group",
                    &columns,
                    &["Top 5 Best".to_string(), "Top 5 Worst".to_string()],
                    &values,
                    &colors,
                )
            }
        }
    }

    fn draw_strategic(&self, area: &DrawingArea<BitMapBackend, Shift>) -> Result<(), DpvError> {
        match &self.strategic {
            StrategicPanel::Unavailable { message } => {
                draw_placeholder(area, "Strategic Department Analysis", message)
            }
            StrategicPanel::Scatter { source, points } => {
                draw_strategic_scatter(area, *source, points)
            }
        }
    }
}

/// Draws a colored matrix with one numeric annotation per cell. `values`
/// holds the annotation text source, `colors` the per-cell fill; row 0 is
/// drawn at the top.
#[allow(clippy::too_many_arguments)]
fn draw_annotated_matrix(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    columns: &[String],
    row_labels: &[String],
    values: &[Vec<f64>],
    colors: &[Vec<RGBColor>],
) -> Result<(), DpvError> {
    let rows = values.len();
    let cols = columns.len();
    if rows == 0 || cols == 0 {
        return draw_placeholder(area, title, "No matrix data");
    }
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 56))
        .margin(30)
        .x_label_area_size(130)
        .y_label_area_size(260)
        .build_cartesian_2d((0..cols).into_segmented(), (0..rows).into_segmented())
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 44))
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) if *i < cols => columns[*i].clone(),
            _ => String::new(),
        })
        .y_label_formatter(&|y| match y {
            SegmentValue::CenterOf(i) if *i < rows => row_labels[rows - 1 - *i].clone(),
            _ => String::new(),
        })
        .label_style(("sans-serif", 28))
        .draw()
        .map_err(draw_err)?;

    for (i, row) in values.iter().enumerate() {
        let y = rows - 1 - i;
        chart
            .draw_series(row.iter().enumerate().map(|(j, _)| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(j), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(j + 1), SegmentValue::Exact(y + 1)),
                    ],
                    colors[i][j].filled(),
                )
            }))
            .map_err(draw_err)?;
    }

    let annotation = ("sans-serif", 32)
        .into_font()
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (i, row) in values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{value:.1}"),
                    (
                        SegmentValue::CenterOf(j),
                        SegmentValue::CenterOf(rows - 1 - i),
                    ),
                    annotation.clone(),
                )))
                .map_err(draw_err)?;
        }
    }
    Ok(())
}

fn draw_strategic_scatter(
    area: &DrawingArea<BitMapBackend, Shift>,
    source: StrategicSource,
    points: &[StrategicPoint],
) -> Result<(), DpvError> {
    if points.is_empty() {
        return draw_placeholder(area, "Strategic Department Analysis", "No strategic data");
    }
    let mae_min = points.iter().map(|p| p.mae).fold(f64::INFINITY, f64::min);
    let mae_max = points
        .iter()
        .map(|p| p.mae)
        .fold(f64::NEG_INFINITY, f64::max);
    let rev_min = points
        .iter()
        .map(|p| p.revenue_pct)
        .fold(f64::INFINITY, f64::min);
    let rev_max = points
        .iter()
        .map(|p| p.revenue_pct)
        .fold(f64::NEG_INFINITY, f64::max);
    let (x_lo, x_hi) = padded_range(mae_min, mae_max);
    let (y_lo, y_hi) = padded_range(rev_min, rev_max);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Strategic Department Analysis ({})", source.subtitle()),
            ("sans-serif", 56),
        )
        .margin(30)
        .x_label_area_size(130)
        .y_label_area_size(180)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .x_desc("Mean Absolute Error (MAE)")
        .y_desc("Revenue Share (%)")
        .axis_desc_style(("sans-serif", 44))
        .label_style(("sans-serif", 30))
        .draw()
        .map_err(draw_err)?;

    let style = scatter_style(source);
    chart
        .draw_series(points.iter().map(|p| {
            let color = style
                .solid
                .unwrap_or_else(|| viridis(unit_scale(p.revenue_pct, rev_min, rev_max)));
            Circle::new(
                (p.mae, p.revenue_pct),
                point_radius(p.sample_count, style.area_divisor),
                color.mix(style.alpha).filled(),
            )
        }))
        .map_err(draw_err)?;
    chart
        .draw_series(points.iter().map(|p| {
            Circle::new(
                (p.mae, p.revenue_pct),
                point_radius(p.sample_count, style.area_divisor),
                BLACK.stroke_width(2),
            )
        }))
        .map_err(draw_err)?;

    let label_style = ("sans-serif", 30)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (idx, p) in points.iter().enumerate() {
        let (dx, dy) = LABEL_OFFSETS[idx % LABEL_OFFSETS.len()];
        let offset_x = (dx as f64 * PX_PER_PT).round() as i32;
        // screen y grows downward, data offsets are given upward-positive
        let offset_y = (-dy as f64 * PX_PER_PT).round() as i32;
        chart
            .draw_series(std::iter::once(
                EmptyElement::at((p.mae, p.revenue_pct))
                    + Text::new(p.dept.label(), (offset_x, offset_y), label_style.clone()),
            ))
            .map_err(draw_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpv_core::{DeptPerformance, SeasonalPivot};

    fn inputs_fixture() -> (DeptPerformance, SeasonalPivot) {
        let summary = DeptPerformance::new(
            (1..=12)
                .map(|i| DeptMae {
                    dept: DeptId::from_raw(i),
                    mae: i as f64 * 10.0,
                })
                .collect(),
        )
        .unwrap();
        let pivot = SeasonalPivot::new(
            vec![DeptId::from_raw(1), DeptId::from_raw(2)],
            vec!["Q1".into(), "Q2".into()],
            vec![vec![Some(1.5), None], vec![Some(2.5), Some(3.5)]],
        )
        .unwrap();
        (summary, pivot)
    }

    #[test]
    fn build_resolves_all_four_panels() {
        let (summary, pivot) = inputs_fixture();
        let inputs = AnalysisInputs {
            summary: &summary,
            seasonal: &pivot,
            matrix: None,
            revenue_weighted: None,
            strategic_assets: None,
        };
        let dashboard = DashboardChart::build(&inputs).unwrap();
        let report = dashboard.report();
        assert_eq!(report.panels.len(), 4);
        assert_eq!(report.panels[0].panel, "seasonal-heatmap");
        assert_eq!(report.panels[2].panel, "performance-matrix");
        assert_eq!(report.strategic_source, StrategicSource::SampleData);
    }

    #[test]
    fn build_keeps_top_ten_lowest_mae() {
        let (summary, pivot) = inputs_fixture();
        let inputs = AnalysisInputs {
            summary: &summary,
            seasonal: &pivot,
            matrix: None,
            revenue_weighted: None,
            strategic_assets: None,
        };
        let dashboard = DashboardChart::build(&inputs).unwrap();
        assert_eq!(dashboard.top.len(), 10);
        assert_eq!(dashboard.top[0].mae, 10.0);
        assert_eq!(dashboard.top[9].mae, 100.0);
    }

    #[test]
    fn heatmap_values_fill_missing_to_zero() {
        let (summary, pivot) = inputs_fixture();
        let inputs = AnalysisInputs {
            summary: &summary,
            seasonal: &pivot,
            matrix: None,
            revenue_weighted: None,
            strategic_assets: None,
        };
        let dashboard = DashboardChart::build(&inputs).unwrap();
        assert_eq!(dashboard.heat_values[0][1], 0.0);
        // the filled-in gap carries no annotation, real values do
        assert_eq!(dashboard.heat_annotations[0][1], None);
        assert_eq!(dashboard.heat_annotations[0][0], Some("1.5".to_string()));
    }
}
