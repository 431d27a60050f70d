use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::tempdir;

use dpv_charts::{ComparisonChart, DashboardChart};
use dpv_core::{AnalysisInputs, DeptId, DeptMae, DeptPerformance, SeasonalPivot};

fn figure_hash(path: &Path) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(fs::read(path).expect("figure bytes"));
    hasher.finalize().to_vec()
}

fn summary() -> DeptPerformance {
    DeptPerformance::new(
        (1..=40)
            .map(|i| DeptMae {
                dept: DeptId::from_raw(i),
                mae: ((i * 37) % 100) as f64 + 0.5,
            })
            .collect(),
    )
    .unwrap()
}

fn seasonal() -> SeasonalPivot {
    SeasonalPivot::new(
        (1..=4).map(DeptId::from_raw).collect(),
        vec!["Q1".into(), "Q2".into(), "Q3".into(), "Q4".into()],
        (0..4)
            .map(|r| {
                (0..4)
                    .map(|c| if (r + c) % 5 == 0 { None } else { Some((r * 4 + c) as f64) })
                    .collect()
            })
            .collect(),
    )
    .unwrap()
}

#[test]
fn comparison_figure_is_deterministic() {
    let tmp = tempdir().unwrap();
    let chart = ComparisonChart::build(&summary()).unwrap();
    let one = tmp.path().join("one.png");
    let two = tmp.path().join("two.png");
    if let Err(err) = chart.render(&one) {
        // only a drawing-backend failure (fontless environment) may skip the
        // determinism check; anything else is a real defect
        assert_eq!(err.info().code, "draw-failed", "unexpected failure: {err}");
        eprintln!("skipping determinism check, backend unavailable: {err}");
        return;
    }
    chart.render(&two).unwrap();
    assert!(fs::metadata(&one).unwrap().len() > 0);
    assert_eq!(figure_hash(&one), figure_hash(&two), "figure hashes diverged");
}

#[test]
fn dashboard_renders_with_minimal_inputs() {
    let tmp = tempdir().unwrap();
    let summary = summary();
    let seasonal = seasonal();
    let inputs = AnalysisInputs {
        summary: &summary,
        seasonal: &seasonal,
        matrix: None,
        revenue_weighted: None,
        strategic_assets: None,
    };
    let dashboard = DashboardChart::build(&inputs).unwrap();
    assert_eq!(dashboard.report().panels.len(), 4);
    let out = tmp.path().join("dashboard.png");
    match dashboard.render(&out) {
        Ok(()) => assert!(fs::metadata(&out).unwrap().len() > 0),
        Err(err) => {
            assert_eq!(err.info().code, "draw-failed", "unexpected failure: {err}");
            eprintln!("skipping dashboard render check, backend unavailable: {err}");
        }
    }
}
