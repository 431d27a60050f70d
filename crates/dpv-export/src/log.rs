//! Fixed-format plain-text export log.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};

use dpv_core::DpvError;

use crate::exporter::ExportOutcome;

/// Filename of the export log inside the output directory.
pub const EXPORT_LOG_FILENAME: &str = "export_log.txt";

fn log_err(err: std::io::Error) -> DpvError {
    DpvError::export("log-write", err.to_string())
}

/// Writes `export_log.txt` into `out_dir`.
///
/// The file lists one entry per iterated figure handle, using the same naming
/// lookup whether or not that particular export succeeded; only the exported
/// count distinguishes failures.
pub fn write_export_log(
    out_dir: &Path,
    timestamp: &DateTime<Local>,
    outcomes: &[ExportOutcome],
) -> Result<(), DpvError> {
    let exported = outcomes.iter().filter(|o| o.succeeded()).count();
    let mut file = File::create(out_dir.join(EXPORT_LOG_FILENAME)).map_err(log_err)?;
    writeln!(file, "Walmart Sales Forecast - Image Export Log").map_err(log_err)?;
    writeln!(file, "=========================================").map_err(log_err)?;
    writeln!(file).map_err(log_err)?;
    writeln!(file, "Export Date: {}", timestamp.format("%Y-%m-%d %H:%M:%S")).map_err(log_err)?;
    writeln!(file, "Source Notebook: department-performance-analysis.ipynb").map_err(log_err)?;
    writeln!(file, "Total Figures Exported: {exported}").map_err(log_err)?;
    writeln!(file).map_err(log_err)?;
    writeln!(file, "Exported Files:").map_err(log_err)?;
    for outcome in outcomes {
        writeln!(file, "- {}", outcome.filename).map_err(log_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn log_lists_every_handle_regardless_of_success() {
        let tmp = tempfile::tempdir().unwrap();
        let timestamp = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let outcomes = vec![
            ExportOutcome {
                handle: 1,
                filename: "department_performance_comparison.png".to_string(),
                error: None,
            },
            ExportOutcome {
                handle: 2,
                filename: "comprehensive_analysis_dashboard.png".to_string(),
                error: Some("disk full".to_string()),
            },
        ];
        write_export_log(tmp.path(), &timestamp, &outcomes).unwrap();
        let text = std::fs::read_to_string(tmp.path().join(EXPORT_LOG_FILENAME)).unwrap();
        assert!(text.starts_with("Walmart Sales Forecast - Image Export Log\n"));
        assert!(text.contains("Export Date: 2024-05-01 12:30:00"));
        assert!(text.contains("Source Notebook: department-performance-analysis.ipynb"));
        // only the success is counted, but both files are listed
        assert!(text.contains("Total Figures Exported: 1"));
        assert!(text.contains("- department_performance_comparison.png"));
        assert!(text.contains("- comprehensive_analysis_dashboard.png"));
    }
}
