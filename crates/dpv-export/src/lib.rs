//! Export pipeline for the department performance visuals: conditional
//! regeneration, best-effort PNG export and the plain-text export log.

pub mod exporter;
pub mod log;
pub mod pipeline;

pub use exporter::{export_figures, figure_filename, ExportOutcome};
pub use log::{write_export_log, EXPORT_LOG_FILENAME};
pub use pipeline::{run_pipeline, ExportReport, RegenerationReport};
