use std::fs;
use std::path::Path;

use tempfile::tempdir;

use dpv_charts::{ComparisonChart, FigureBook, FigureHandle, FigureSpec};
use dpv_core::{
    AnalysisInputs, DeptId, DeptMae, DeptPerformance, PerformanceMatrix, SeasonalPivot,
    StrategicRow, StrategicTable,
};
use dpv_export::{run_pipeline, EXPORT_LOG_FILENAME};

fn summary() -> DeptPerformance {
    DeptPerformance::new(
        (1..=40)
            .map(|i| DeptMae {
                dept: DeptId::from_raw(i),
                mae: ((i * 13) % 90) as f64 + 1.0,
            })
            .collect(),
    )
    .unwrap()
}

fn seasonal() -> SeasonalPivot {
    SeasonalPivot::new(
        (1..=3).map(DeptId::from_raw).collect(),
        vec!["Q1".into(), "Q2".into(), "Q3".into()],
        vec![
            vec![Some(4.0), None, Some(2.0)],
            vec![Some(1.0), Some(3.0), Some(5.0)],
            vec![None, Some(6.0), Some(7.0)],
        ],
    )
    .unwrap()
}

fn matrix() -> PerformanceMatrix {
    PerformanceMatrix::new(
        (1..=40).map(DeptId::from_raw).collect(),
        (0..12).map(|i| format!("metric_{i}")).collect(),
        (0..40)
            .map(|r| (0..12).map(|c| (r * 12 + c) as f64).collect())
            .collect(),
    )
    .unwrap()
}

fn revenue() -> StrategicTable {
    StrategicTable::new(
        (1..=18)
            .map(|i| StrategicRow {
                dept: DeptId::from_raw(i),
                mae: i as f64 * 7.0,
                revenue_share: 0.09 - i as f64 * 0.002,
                sample_count: 100 + i * 30,
            })
            .collect(),
    )
}

fn assert_files_match_outcomes(out_dir: &Path, report: &dpv_export::ExportReport) {
    for outcome in &report.figures {
        if outcome.succeeded() {
            assert!(
                out_dir.join(&outcome.filename).is_file(),
                "missing exported file {}",
                outcome.filename
            );
        }
    }
}

#[test]
fn empty_book_regenerates_exactly_two_figures() {
    let tmp = tempdir().unwrap();
    let out_dir = tmp.path().join("images");
    let summary = summary();
    let seasonal = seasonal();
    let matrix = matrix();
    let revenue = revenue();
    let inputs = AnalysisInputs {
        summary: &summary,
        seasonal: &seasonal,
        matrix: Some(&matrix),
        revenue_weighted: Some(&revenue),
        strategic_assets: None,
    };
    let mut book = FigureBook::new();
    let report = run_pipeline(&inputs, &mut book, &out_dir).unwrap();

    assert_eq!(book.len(), 2, "regeneration must add exactly two figures");
    assert_eq!(report.figures.len(), 2);
    let regeneration = report.regeneration.as_ref().expect("regeneration ran");
    assert_eq!(regeneration.dashboard.panels.len(), 4);
    assert_eq!(regeneration.comparison.best.len(), 15);
    assert_eq!(regeneration.comparison.overlap(), 0);

    let log = fs::read_to_string(out_dir.join(EXPORT_LOG_FILENAME)).unwrap();
    assert!(log.contains("- department_performance_comparison.png"));
    assert!(log.contains("- comprehensive_analysis_dashboard.png"));
    assert_files_match_outcomes(&out_dir, &report);
}

#[test]
fn populated_book_skips_regeneration() {
    let tmp = tempdir().unwrap();
    let out_dir = tmp.path().join("images");
    let summary = summary();
    let seasonal = seasonal();
    let inputs = AnalysisInputs {
        summary: &summary,
        seasonal: &seasonal,
        matrix: None,
        revenue_weighted: None,
        strategic_assets: None,
    };
    let mut book = FigureBook::new();
    book.push(FigureSpec::Comparison(
        ComparisonChart::build(&summary).unwrap(),
    ));
    let report = run_pipeline(&inputs, &mut book, &out_dir).unwrap();
    assert!(report.regeneration.is_none());
    assert_eq!(book.len(), 1);
    assert_eq!(report.figures.len(), 1);
}

#[test]
fn one_failing_export_does_not_stop_the_rest() {
    let tmp = tempdir().unwrap();
    let out_dir = tmp.path().join("images");
    fs::create_dir_all(&out_dir).unwrap();
    // a directory squatting on the first figure's target path forces that
    // export to fail while leaving the second untouched
    fs::create_dir_all(out_dir.join("department_performance_comparison.png")).unwrap();

    let summary = summary();
    let seasonal = seasonal();
    let inputs = AnalysisInputs {
        summary: &summary,
        seasonal: &seasonal,
        matrix: None,
        revenue_weighted: None,
        strategic_assets: None,
    };
    let chart = ComparisonChart::build(&summary).unwrap();
    let mut book = FigureBook::new();
    book.push(FigureSpec::Comparison(chart.clone()));
    book.push(FigureSpec::Comparison(chart));

    let report = run_pipeline(&inputs, &mut book, &out_dir).unwrap();
    assert_eq!(report.figures.len(), 2);
    assert!(report.figures[0].error.is_some(), "first export must fail");
    assert_eq!(
        report.exported,
        report.figures.iter().filter(|o| o.succeeded()).count()
    );

    // the log still lists every handle that was iterated
    let log = fs::read_to_string(out_dir.join(EXPORT_LOG_FILENAME)).unwrap();
    assert!(log.contains("- department_performance_comparison.png"));
    assert!(log.contains("- comprehensive_analysis_dashboard.png"));
    assert_files_match_outcomes(&out_dir, &report);
}

#[test]
fn unmapped_handles_export_under_generic_names() {
    let tmp = tempdir().unwrap();
    let out_dir = tmp.path().join("images");
    let summary = summary();
    let seasonal = seasonal();
    let inputs = AnalysisInputs {
        summary: &summary,
        seasonal: &seasonal,
        matrix: None,
        revenue_weighted: None,
        strategic_assets: None,
    };
    let mut book = FigureBook::new();
    book.push_with_handle(
        FigureHandle::from_raw(99),
        FigureSpec::Comparison(ComparisonChart::build(&summary).unwrap()),
    );
    let report = run_pipeline(&inputs, &mut book, &out_dir).unwrap();
    assert_eq!(report.figures[0].filename, "figure_99.png");
    let log = fs::read_to_string(out_dir.join(EXPORT_LOG_FILENAME)).unwrap();
    assert!(log.contains("- figure_99.png"));
}

#[test]
fn export_report_serializes_to_json() {
    let tmp = tempdir().unwrap();
    let out_dir = tmp.path().join("images");
    let summary = summary();
    let seasonal = seasonal();
    let inputs = AnalysisInputs {
        summary: &summary,
        seasonal: &seasonal,
        matrix: None,
        revenue_weighted: None,
        strategic_assets: None,
    };
    let mut book = FigureBook::new();
    let report = run_pipeline(&inputs, &mut book, &out_dir).unwrap();
    let json = serde_json::to_string_pretty(&report).unwrap();
    assert!(json.contains("\"figures\""));
    assert!(json.contains("\"regeneration\""));
}
