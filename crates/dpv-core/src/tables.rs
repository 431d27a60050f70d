//! Tabular inputs consumed by the figure builders.
//!
//! All tables arrive from upstream analysis steps; this crate never creates
//! or persists them. Constructors validate shape and report coded errors
//! instead of assuming well-formed input.

use serde::{Deserialize, Serialize};

use crate::errors::DpvError;

/// Identifier for a department within the analysis tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeptId(u32);

impl DeptId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Human readable label used on axes and point annotations.
    pub fn label(&self) -> String {
        format!("Dept {}", self.0)
    }
}

/// One row of the department performance summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeptMae {
    /// Department the measurement belongs to.
    pub dept: DeptId,
    /// Mean absolute error for the department.
    pub mae: f64,
}

/// Department performance summary: one row per department with its MAE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeptPerformance {
    rows: Vec<DeptMae>,
}

impl DeptPerformance {
    /// Wraps the provided rows; rejects an empty summary.
    pub fn new(rows: Vec<DeptMae>) -> Result<Self, DpvError> {
        if rows.is_empty() {
            return Err(DpvError::table(
                "summary-empty",
                "department performance summary has no rows",
            ));
        }
        Ok(Self { rows })
    }

    /// Number of departments in the summary.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the summary holds no rows (never true for a constructed value).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in their original order.
    pub fn rows(&self) -> &[DeptMae] {
        &self.rows
    }

    /// MAE values in their original order.
    pub fn mae_values(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.mae).collect()
    }

    /// Rows sorted ascending by MAE. The sort is stable, so ties keep the
    /// order the input arrived in.
    pub fn sorted_by_mae(&self) -> Vec<DeptMae> {
        let mut sorted = self.rows.clone();
        sorted.sort_by(|a, b| a.mae.partial_cmp(&b.mae).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// The `min(n, len)` lowest-MAE rows, ascending.
    pub fn best(&self, n: usize) -> Vec<DeptMae> {
        let sorted = self.sorted_by_mae();
        let take = n.min(sorted.len());
        sorted[..take].to_vec()
    }

    /// The `min(n, len)` highest-MAE rows, still ascending by MAE.
    pub fn worst(&self, n: usize) -> Vec<DeptMae> {
        let sorted = self.sorted_by_mae();
        let skip = sorted.len().saturating_sub(n);
        sorted[skip..].to_vec()
    }

    /// Best/worst selection for the comparison chart.
    pub fn comparison_selection(&self, n: usize) -> ComparisonSelection {
        ComparisonSelection {
            best: self.best(n),
            worst: self.worst(n),
            total: self.len(),
        }
    }
}

/// Best and worst groups selected for the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSelection {
    /// Lowest-MAE rows, ascending.
    pub best: Vec<DeptMae>,
    /// Highest-MAE rows, ascending.
    pub worst: Vec<DeptMae>,
    /// Total number of departments the selection was drawn from.
    pub total: usize,
}

impl ComparisonSelection {
    /// Number of rows that appear in both groups. Non-zero whenever the
    /// summary holds fewer rows than the two groups combined.
    pub fn overlap(&self) -> usize {
        (self.best.len() + self.worst.len()).saturating_sub(self.total)
    }
}

/// Seasonal pivot: departments by time periods, cells optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPivot {
    depts: Vec<DeptId>,
    periods: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl SeasonalPivot {
    /// Wraps the pivot, validating that `cells` is rectangular and matches
    /// the department and period axes.
    pub fn new(
        depts: Vec<DeptId>,
        periods: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, DpvError> {
        if cells.len() != depts.len() {
            return Err(DpvError::table(
                "pivot-shape",
                format!(
                    "seasonal pivot has {} rows but {} departments",
                    cells.len(),
                    depts.len()
                ),
            ));
        }
        if let Some(row) = cells.iter().find(|row| row.len() != periods.len()) {
            return Err(DpvError::table(
                "pivot-shape",
                format!(
                    "seasonal pivot row has {} cells but {} periods",
                    row.len(),
                    periods.len()
                ),
            ));
        }
        Ok(Self {
            depts,
            periods,
            cells,
        })
    }

    /// Department axis, one entry per row.
    pub fn depts(&self) -> &[DeptId] {
        &self.depts
    }

    /// Period axis, one entry per column.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Cell values with missing entries filled to zero for display.
    pub fn filled(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.unwrap_or(0.0)).collect())
            .collect()
    }

    /// Per-cell annotation text (`{:.1}`). A cell whose filled value is
    /// exactly zero carries no annotation, so filled-in gaps stay blank.
    pub fn annotations(&self) -> Vec<Vec<Option<String>>> {
        self.filled()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&value| {
                        if value == 0.0 {
                            None
                        } else {
                            Some(format!("{value:.1}"))
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Performance matrix: departments by arbitrary numeric metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMatrix {
    depts: Vec<DeptId>,
    metrics: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl PerformanceMatrix {
    /// Wraps the matrix, validating that `values` is rectangular and matches
    /// the department and metric axes.
    pub fn new(
        depts: Vec<DeptId>,
        metrics: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<Self, DpvError> {
        if values.len() != depts.len() {
            return Err(DpvError::table(
                "matrix-shape",
                format!(
                    "performance matrix has {} rows but {} departments",
                    values.len(),
                    depts.len()
                ),
            ));
        }
        if let Some(row) = values.iter().find(|row| row.len() != metrics.len()) {
            return Err(DpvError::table(
                "matrix-shape",
                format!(
                    "performance matrix row has {} cells but {} metrics",
                    row.len(),
                    metrics.len()
                ),
            ));
        }
        Ok(Self {
            depts,
            metrics,
            values,
        })
    }

    /// Department axis, one entry per row.
    pub fn depts(&self) -> &[DeptId] {
        &self.depts
    }

    /// Metric axis, one entry per column.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Restricts the matrix to the given departments, in the given order.
    ///
    /// Fails with `matrix-missing-dept` when any requested department is not
    /// present in the matrix index.
    pub fn restrict_to(&self, depts: &[DeptId]) -> Result<PerformanceMatrix, DpvError> {
        let mut rows = Vec::with_capacity(depts.len());
        for dept in depts {
            let idx = self.depts.iter().position(|d| d == dept).ok_or_else(|| {
                DpvError::Table(
                    crate::errors::ErrorInfo::new(
                        "matrix-missing-dept",
                        "department absent from performance matrix",
                    )
                    .with_context("dept", dept.as_raw().to_string()),
                )
            })?;
            rows.push(self.values[idx].clone());
        }
        Ok(PerformanceMatrix {
            depts: depts.to_vec(),
            metrics: self.metrics.clone(),
            values: rows,
        })
    }

    /// Subsamples metric columns when there are more than ten, taking every
    /// k-th column with `k = max(1, metrics / 8)` so roughly eight remain.
    pub fn subsample_metrics(&self) -> PerformanceMatrix {
        if self.metrics.len() <= 10 {
            return self.clone();
        }
        let stride = (self.metrics.len() / 8).max(1);
        let keep: Vec<usize> = (0..self.metrics.len()).step_by(stride).collect();
        PerformanceMatrix {
            depts: self.depts.clone(),
            metrics: keep.iter().map(|&i| self.metrics[i].clone()).collect(),
            values: self
                .values
                .iter()
                .map(|row| keep.iter().map(|&i| row[i]).collect())
                .collect(),
        }
    }
}

/// One row of a strategic analysis table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategicRow {
    /// Department the measurement belongs to.
    pub dept: DeptId,
    /// Mean absolute error for the department.
    pub mae: f64,
    /// Fraction of total revenue attributable to the department.
    pub revenue_share: f64,
    /// Number of samples backing the measurement.
    pub sample_count: u32,
}

/// Strategic table: revenue-weighted analysis or strategic assets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrategicTable {
    rows: Vec<StrategicRow>,
}

impl StrategicTable {
    /// Wraps the provided rows. Unlike the summary, an empty table is legal
    /// here; emptiness only demotes it in the source priority order.
    pub fn new(rows: Vec<StrategicRow>) -> Self {
        Self { rows }
    }

    /// Rows in their original order.
    pub fn rows(&self) -> &[StrategicRow] {
        &self.rows
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `min(n, len)` rows.
    pub fn head(&self, n: usize) -> StrategicTable {
        StrategicTable {
            rows: self.rows[..n.min(self.rows.len())].to_vec(),
        }
    }
}

/// Borrowed bundle of every table a full figure build can consume.
///
/// Optional tables are explicit `Option`s; presence or absence is decided by
/// the caller, never discovered by environment introspection.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInputs<'a> {
    /// Department performance summary, always required.
    pub summary: &'a DeptPerformance,
    /// Seasonal pivot, always required.
    pub seasonal: &'a SeasonalPivot,
    /// Performance matrix, optional.
    pub matrix: Option<&'a PerformanceMatrix>,
    /// Revenue-weighted analysis table, optional.
    pub revenue_weighted: Option<&'a StrategicTable>,
    /// Strategic assets table, optional.
    pub strategic_assets: Option<&'a StrategicTable>,
}

/// Which tier of the priority order supplied the strategic scatter data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategicSource {
    /// Revenue-weighted analysis table, top 15 rows by revenue impact.
    RevenueWeighted,
    /// Strategic assets table.
    StrategicAssets,
    /// Built-in 12-point synthetic sample.
    SampleData,
}

impl StrategicSource {
    /// Subtitle used on the strategic scatter panel.
    pub fn subtitle(&self) -> &'static str {
        match self {
            StrategicSource::RevenueWeighted => "Top 15 by Revenue Impact",
            StrategicSource::StrategicAssets => "Strategic Assets Only",
            StrategicSource::SampleData => "Sample Data - 12 Departments",
        }
    }
}

/// Picks the strategic data source in priority order: revenue-weighted
/// analysis, then strategic assets, then the synthetic sample. A present but
/// empty table is skipped.
pub fn choose_strategic_source(
    revenue_weighted: Option<&StrategicTable>,
    strategic_assets: Option<&StrategicTable>,
) -> (StrategicSource, StrategicTable) {
    if let Some(table) = revenue_weighted {
        if !table.is_empty() {
            return (StrategicSource::RevenueWeighted, table.head(15));
        }
    }
    if let Some(table) = strategic_assets {
        if !table.is_empty() {
            return (StrategicSource::StrategicAssets, table.clone());
        }
    }
    (StrategicSource::SampleData, sample_strategic_table())
}

/// Fixed 12-point sample used when no strategic table is available.
/// Revenue shares are stored as fractions, matching the real tables.
pub fn sample_strategic_table() -> StrategicTable {
    const MAE: [f64; 12] = [
        50.0, 75.0, 100.0, 125.0, 150.0, 200.0, 80.0, 90.0, 110.0, 140.0, 160.0, 180.0,
    ];
    const REVENUE_PCT: [f64; 12] = [
        8.5, 6.2, 4.8, 3.5, 2.1, 1.8, 5.5, 4.2, 3.8, 2.8, 2.3, 1.9,
    ];
    const DEPTS: [u32; 12] = [92, 95, 38, 40, 72, 90, 81, 97, 85, 99, 14, 13];
    const SAMPLES: [u32; 12] = [
        800, 600, 500, 400, 300, 200, 450, 350, 380, 320, 280, 250,
    ];
    StrategicTable::new(
        (0..12)
            .map(|i| StrategicRow {
                dept: DeptId::from_raw(DEPTS[i]),
                mae: MAE[i],
                revenue_share: REVENUE_PCT[i] / 100.0,
                sample_count: SAMPLES[i],
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(maes: &[f64]) -> DeptPerformance {
        DeptPerformance::new(
            maes.iter()
                .enumerate()
                .map(|(i, &mae)| DeptMae {
                    dept: DeptId::from_raw(i as u32 + 1),
                    mae,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn selection_takes_min_n_each_side() {
        let maes: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let sel = summary(&maes).comparison_selection(15);
        assert_eq!(sel.best.len(), 15);
        assert_eq!(sel.worst.len(), 15);
        assert_eq!(sel.overlap(), 0);
        assert_eq!(sel.best[0].mae, 0.0);
        assert_eq!(sel.worst[14].mae, 39.0);
    }

    #[test]
    fn selection_overlaps_below_thirty_rows() {
        let maes: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let sel = summary(&maes).comparison_selection(15);
        assert_eq!(sel.best.len(), 15);
        assert_eq!(sel.worst.len(), 15);
        assert_eq!(sel.overlap(), 10);
    }

    #[test]
    fn selection_shrinks_for_tiny_summaries() {
        let sel = summary(&[3.0, 1.0, 2.0]).comparison_selection(15);
        assert_eq!(sel.best.len(), 3);
        assert_eq!(sel.worst.len(), 3);
        assert_eq!(sel.overlap(), 3);
        assert_eq!(sel.best[0].mae, 1.0);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let table = DeptPerformance::new(vec![
            DeptMae {
                dept: DeptId::from_raw(7),
                mae: 5.0,
            },
            DeptMae {
                dept: DeptId::from_raw(3),
                mae: 5.0,
            },
        ])
        .unwrap();
        let sorted = table.sorted_by_mae();
        assert_eq!(sorted[0].dept.as_raw(), 7);
        assert_eq!(sorted[1].dept.as_raw(), 3);
    }

    #[test]
    fn pivot_fills_missing_cells_to_zero() {
        let pivot = SeasonalPivot::new(
            vec![DeptId::from_raw(1)],
            vec!["Q1".into(), "Q2".into()],
            vec![vec![Some(2.5), None]],
        )
        .unwrap();
        assert_eq!(pivot.filled(), vec![vec![2.5, 0.0]]);
    }

    #[test]
    fn pivot_annotations_skip_exact_zeros_only() {
        let pivot = SeasonalPivot::new(
            vec![DeptId::from_raw(1)],
            vec!["Q1".into(), "Q2".into(), "Q3".into()],
            vec![vec![Some(2.5), None, Some(0.0)]],
        )
        .unwrap();
        // a missing cell and a genuine zero both go unannotated
        assert_eq!(
            pivot.annotations(),
            vec![vec![Some("2.5".to_string()), None, None]]
        );
    }

    #[test]
    fn pivot_rejects_ragged_rows() {
        let err = SeasonalPivot::new(
            vec![DeptId::from_raw(1)],
            vec!["Q1".into(), "Q2".into()],
            vec![vec![Some(2.5)]],
        )
        .unwrap_err();
        assert_eq!(err.info().code, "pivot-shape");
    }

    #[test]
    fn matrix_restriction_reports_missing_dept() {
        let matrix = PerformanceMatrix::new(
            vec![DeptId::from_raw(1)],
            vec!["m".into()],
            vec![vec![1.0]],
        )
        .unwrap();
        let err = matrix.restrict_to(&[DeptId::from_raw(9)]).unwrap_err();
        assert_eq!(err.info().code, "matrix-missing-dept");
        assert_eq!(err.info().context.get("dept").unwrap(), "9");
    }

    #[test]
    fn matrix_subsampling_leaves_small_matrices_alone() {
        let matrix = PerformanceMatrix::new(
            vec![DeptId::from_raw(1)],
            (0..10).map(|i| format!("m{i}")).collect(),
            vec![(0..10).map(|i| i as f64).collect()],
        )
        .unwrap();
        assert_eq!(matrix.subsample_metrics().metrics().len(), 10);
    }

    #[test]
    fn matrix_subsampling_keeps_roughly_eight_metrics() {
        let matrix = PerformanceMatrix::new(
            vec![DeptId::from_raw(1)],
            (0..24).map(|i| format!("m{i}")).collect(),
            vec![(0..24).map(|i| i as f64).collect()],
        )
        .unwrap();
        let slim = matrix.subsample_metrics();
        // stride 3 over 24 columns keeps every third metric
        assert_eq!(slim.metrics().len(), 8);
        assert_eq!(slim.metrics()[1], "m3");
        assert_eq!(slim.values()[0][1], 3.0);
    }

    #[test]
    fn strategic_priority_prefers_revenue_weighted() {
        let revenue = StrategicTable::new(vec![StrategicRow {
            dept: DeptId::from_raw(1),
            mae: 10.0,
            revenue_share: 0.05,
            sample_count: 100,
        }]);
        let assets = StrategicTable::new(vec![StrategicRow {
            dept: DeptId::from_raw(2),
            mae: 20.0,
            revenue_share: 0.02,
            sample_count: 50,
        }]);
        let (source, table) = choose_strategic_source(Some(&revenue), Some(&assets));
        assert_eq!(source, StrategicSource::RevenueWeighted);
        assert_eq!(table.rows()[0].dept.as_raw(), 1);
    }

    #[test]
    fn strategic_priority_skips_empty_revenue_table() {
        let empty = StrategicTable::default();
        let assets = StrategicTable::new(vec![StrategicRow {
            dept: DeptId::from_raw(2),
            mae: 20.0,
            revenue_share: 0.02,
            sample_count: 50,
        }]);
        let (source, table) = choose_strategic_source(Some(&empty), Some(&assets));
        assert_eq!(source, StrategicSource::StrategicAssets);
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn strategic_priority_falls_back_to_sample() {
        let (source, table) = choose_strategic_source(None, None);
        assert_eq!(source, StrategicSource::SampleData);
        assert_eq!(table.rows().len(), 12);
        assert_eq!(table.rows()[0].dept.as_raw(), 92);
        assert!((table.rows()[0].revenue_share - 0.085).abs() < 1e-12);
    }

    #[test]
    fn revenue_weighted_source_is_capped_at_fifteen_rows() {
        let revenue = StrategicTable::new(
            (0..20)
                .map(|i| StrategicRow {
                    dept: DeptId::from_raw(i),
                    mae: i as f64,
                    revenue_share: 0.01,
                    sample_count: 10,
                })
                .collect(),
        );
        let (_, table) = choose_strategic_source(Some(&revenue), None);
        assert_eq!(table.rows().len(), 15);
    }
}
