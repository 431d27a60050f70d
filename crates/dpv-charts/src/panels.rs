//! Data-level resolution for the two dashboard panels that can fall back.
//!
//! Resolution happens at figure build time so that every fallback decision is
//! captured as an explicit [`PanelOutcome`] instead of a swallowed exception.

use serde::{Deserialize, Serialize};
use tracing::warn;

use dpv_core::{
    choose_strategic_source, DeptId, DeptMae, DeptPerformance, DpvError, PerformanceMatrix,
    StrategicSource, StrategicTable,
};

/// How a single dashboard panel ended up being drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelOutcome {
    /// Stable panel identifier (`seasonal-heatmap`, `top-departments`,
    /// `performance-matrix`, `strategic-scatter`).
    pub panel: String,
    /// Build status of the panel.
    pub status: PanelStatus,
}

/// Per-panel best-effort status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail")]
pub enum PanelStatus {
    /// The panel rendered from its primary data.
    Rendered,
    /// The panel rendered from its fallback data.
    Fallback {
        /// Why the primary data could not be used.
        reason: String,
    },
    /// The panel was replaced by a text placeholder.
    Placeholder {
        /// Message shown inside the panel.
        message: String,
    },
}

impl PanelOutcome {
    fn new(panel: &str, status: PanelStatus) -> Self {
        Self {
            panel: panel.to_string(),
            status,
        }
    }
}

/// Resolved content of the performance-matrix panel.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixPanel {
    /// Matrix restricted to the 5 best + 5 worst departments, standardized
    /// per metric for coloring; annotations show the raw values.
    Normalized {
        /// Row axis, best group first.
        depts: Vec<DeptId>,
        /// Metric axis after subsampling.
        metrics: Vec<String>,
        /// Raw values shown as annotations.
        raw: Vec<Vec<f64>>,
        /// Standardized values driving the cell colors.
        normalized: Vec<Vec<f64>>,
    },
    /// Fallback 2×N matrix of raw MAE values for the best and worst groups.
    RawMae {
        /// Lowest-MAE rows, ascending.
        best: Vec<DeptMae>,
        /// Highest-MAE rows, ascending.
        worst: Vec<DeptMae>,
    },
    /// Text placeholder.
    Unavailable {
        /// Message shown inside the panel.
        message: String,
    },
}

impl MatrixPanel {
    /// Resolves the panel content. Never fails: every error path degrades to
    /// the raw-MAE fallback and then to the placeholder.
    pub fn resolve(
        summary: &DeptPerformance,
        matrix: Option<&PerformanceMatrix>,
    ) -> (MatrixPanel, PanelOutcome) {
        const PANEL: &str = "performance-matrix";
        let Some(matrix) = matrix else {
            let message = "Performance Matrix Not Available".to_string();
            return (
                MatrixPanel::Unavailable {
                    message: message.clone(),
                },
                PanelOutcome::new(PANEL, PanelStatus::Placeholder { message }),
            );
        };
        match build_normalized(summary, matrix) {
            Ok(panel) => (panel, PanelOutcome::new(PANEL, PanelStatus::Rendered)),
            Err(err) => {
                let reason = err.to_string();
                warn!(%reason, "performance matrix panel falling back to raw MAE");
                match build_raw_mae(summary) {
                    Ok(panel) => (
                        panel,
                        PanelOutcome::new(PANEL, PanelStatus::Fallback { reason }),
                    ),
                    Err(err) => {
                        let message = format!("Performance Matrix Error Loading Data: {err}");
                        (
                            MatrixPanel::Unavailable {
                                message: message.clone(),
                            },
                            PanelOutcome::new(PANEL, PanelStatus::Placeholder { message }),
                        )
                    }
                }
            }
        }
    }
}

fn build_normalized(
    summary: &DeptPerformance,
    matrix: &PerformanceMatrix,
) -> Result<MatrixPanel, DpvError> {
    let mut depts: Vec<DeptId> = summary.best(5).iter().map(|row| row.dept).collect();
    depts.extend(summary.worst(5).iter().map(|row| row.dept));
    let restricted = matrix.restrict_to(&depts)?.subsample_metrics();
    let raw = restricted.values().to_vec();
    let normalized = dpv_core::stats::standardize_columns(&raw);
    Ok(MatrixPanel::Normalized {
        depts,
        metrics: restricted.metrics().to_vec(),
        raw,
        normalized,
    })
}

fn build_raw_mae(summary: &DeptPerformance) -> Result<MatrixPanel, DpvError> {
    let best = summary.best(5);
    let worst = summary.worst(5);
    if best.is_empty() || worst.is_empty() {
        return Err(DpvError::chart(
            "matrix-fallback-empty",
            "no rows available for the raw MAE fallback",
        ));
    }
    Ok(MatrixPanel::RawMae { best, worst })
}

/// One point of the strategic scatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategicPoint {
    /// Department the point belongs to.
    pub dept: DeptId,
    /// Mean absolute error (x axis).
    pub mae: f64,
    /// Revenue share in percent (y axis).
    pub revenue_pct: f64,
    /// Sample count driving the point size.
    pub sample_count: u32,
}

/// Resolved content of the strategic scatter panel.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategicPanel {
    /// Scatter of MAE against revenue share.
    Scatter {
        /// Which priority tier supplied the data.
        source: StrategicSource,
        /// Points in table order.
        points: Vec<StrategicPoint>,
    },
    /// Text placeholder carrying the error message.
    Unavailable {
        /// Message shown inside the panel.
        message: String,
    },
}

impl StrategicPanel {
    /// Resolves the panel content; any construction error is caught and
    /// becomes a placeholder carrying the message.
    pub fn resolve(
        revenue_weighted: Option<&StrategicTable>,
        strategic_assets: Option<&StrategicTable>,
    ) -> (StrategicPanel, PanelOutcome, StrategicSource) {
        const PANEL: &str = "strategic-scatter";
        match build_scatter(revenue_weighted, strategic_assets) {
            Ok((source, points)) => {
                let status = if source == StrategicSource::SampleData {
                    PanelStatus::Fallback {
                        reason: "no strategic table available, using sample data".to_string(),
                    }
                } else {
                    PanelStatus::Rendered
                };
                (
                    StrategicPanel::Scatter { source, points },
                    PanelOutcome::new(PANEL, status),
                    source,
                )
            }
            Err(err) => {
                let message = format!("Strategic Analysis Error: {err}");
                warn!(error = %err, "strategic panel replaced by placeholder");
                (
                    StrategicPanel::Unavailable {
                        message: message.clone(),
                    },
                    PanelOutcome::new(PANEL, PanelStatus::Placeholder { message }),
                    StrategicSource::SampleData,
                )
            }
        }
    }
}

fn build_scatter(
    revenue_weighted: Option<&StrategicTable>,
    strategic_assets: Option<&StrategicTable>,
) -> Result<(StrategicSource, Vec<StrategicPoint>), DpvError> {
    let (source, table) = choose_strategic_source(revenue_weighted, strategic_assets);
    if table.is_empty() {
        return Err(DpvError::chart(
            "strategic-empty",
            "strategic data source resolved to an empty table",
        ));
    }
    let points = table
        .rows()
        .iter()
        .map(|row| StrategicPoint {
            dept: row.dept,
            mae: row.mae,
            revenue_pct: row.revenue_share * 100.0,
            sample_count: row.sample_count,
        })
        .collect();
    Ok((source, points))
}
