use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use dpv_charts::FigureBook;
use dpv_core::AnalysisInputs;
use dpv_export::run_pipeline;

use crate::load;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// CSV with the department performance summary (`dept,mae`).
    #[arg(long)]
    pub summary: PathBuf,
    /// CSV with the seasonal pivot: `dept` column then one column per period.
    #[arg(long)]
    pub seasonal: PathBuf,
    /// Optional CSV with the dept-by-metric performance matrix.
    #[arg(long)]
    pub matrix: Option<PathBuf>,
    /// Optional CSV with the revenue-weighted strategic ranking.
    #[arg(long = "revenue-weighted")]
    pub revenue_weighted: Option<PathBuf>,
    /// Optional CSV with the strategic asset table, used when no
    /// revenue-weighted ranking is supplied.
    #[arg(long = "strategic-assets")]
    pub strategic_assets: Option<PathBuf>,
    /// Output directory for PNGs and the export log.
    #[arg(long, default_value = "images")]
    pub out: PathBuf,
    /// Also write `export_report.json` next to the figures.
    #[arg(long)]
    pub report: bool,
}

pub fn run(args: &ExportArgs) -> Result<(), Box<dyn Error>> {
    let summary = load::load_summary(&args.summary)?;
    let seasonal = load::load_seasonal(&args.seasonal)?;
    let matrix = args.matrix.as_deref().map(load::load_matrix).transpose()?;
    let revenue_weighted = args
        .revenue_weighted
        .as_deref()
        .map(load::load_strategic)
        .transpose()?;
    let strategic_assets = args
        .strategic_assets
        .as_deref()
        .map(load::load_strategic)
        .transpose()?;

    let inputs = AnalysisInputs {
        summary: &summary,
        seasonal: &seasonal,
        matrix: matrix.as_ref(),
        revenue_weighted: revenue_weighted.as_ref(),
        strategic_assets: strategic_assets.as_ref(),
    };

    let mut book = FigureBook::new();
    let report = run_pipeline(&inputs, &mut book, &args.out)?;

    if args.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(args.out.join("export_report.json"), json)?;
    }

    println!(
        "Exported {}/{} figures to {}",
        report.exported,
        report.figures.len(),
        report.output_dir
    );
    Ok(())
}
