#![deny(missing_docs)]
#![doc = "Tables, selections and statistics backing the department performance visuals."]

pub mod errors;
pub mod stats;
pub mod tables;

pub use errors::{DpvError, ErrorInfo};
pub use tables::{
    choose_strategic_source, sample_strategic_table, AnalysisInputs, ComparisonSelection, DeptId, DeptMae,
    DeptPerformance, PerformanceMatrix, SeasonalPivot, StrategicRow, StrategicSource,
    StrategicTable,
};
