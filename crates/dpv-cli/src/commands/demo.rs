use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use dpv_charts::FigureBook;
use dpv_core::{
    AnalysisInputs, DeptId, DeptMae, DeptPerformance, PerformanceMatrix, SeasonalPivot,
};
use dpv_export::run_pipeline;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Output directory for the demo figures.
    #[arg(long, default_value = "images")]
    pub out: PathBuf,
}

/// Runs the full pipeline on deterministic synthetic tables and prints the
/// resulting report as JSON. No revenue table is supplied, so the strategic
/// panel falls back to its built-in sample data.
pub fn run(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    let summary = demo_summary()?;
    let seasonal = demo_seasonal()?;
    let matrix = demo_matrix()?;
    let inputs = AnalysisInputs {
        summary: &summary,
        seasonal: &seasonal,
        matrix: Some(&matrix),
        revenue_weighted: None,
        strategic_assets: None,
    };

    let mut book = FigureBook::new();
    let report = run_pipeline(&inputs, &mut book, &args.out)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn demo_summary() -> Result<DeptPerformance, Box<dyn Error>> {
    let rows = (1..=45)
        .map(|i| DeptMae {
            dept: DeptId::from_raw(i),
            mae: 40.0 + ((i * 37) % 113) as f64 * 1.5,
        })
        .collect();
    Ok(DeptPerformance::new(rows)?)
}

fn demo_seasonal() -> Result<SeasonalPivot, Box<dyn Error>> {
    let depts: Vec<DeptId> = (1..=12).map(DeptId::from_raw).collect();
    let periods: Vec<String> = (1..=8).map(|p| format!("2011-{p:02}")).collect();
    let cells = (0..depts.len())
        .map(|r| {
            (0..periods.len())
                .map(|c| {
                    // a few holes so the zero-fill path is visible in the heatmap
                    if (r + c) % 11 == 0 {
                        None
                    } else {
                        Some(20.0 + ((r * 8 + c) * 17 % 140) as f64)
                    }
                })
                .collect()
        })
        .collect();
    Ok(SeasonalPivot::new(depts, periods, cells)?)
}

fn demo_matrix() -> Result<PerformanceMatrix, Box<dyn Error>> {
    let depts: Vec<DeptId> = (1..=45).map(DeptId::from_raw).collect();
    let metrics: Vec<String> = (0..12).map(|m| format!("week_{m}")).collect();
    let values = (0..45usize)
        .map(|r| {
            (0..12usize)
                .map(|c| 30.0 + ((r * 12 + c) * 29 % 210) as f64)
                .collect()
        })
        .collect();
    Ok(PerformanceMatrix::new(depts, metrics, values)?)
}
