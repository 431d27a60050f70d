//! CSV loaders for the analysis tables.
//!
//! Every loader validates its header row and reports coded table errors
//! instead of panicking on malformed input.

use std::path::Path;

use dpv_core::{
    DeptId, DeptMae, DeptPerformance, DpvError, ErrorInfo, PerformanceMatrix, SeasonalPivot,
    StrategicRow, StrategicTable,
};

fn csv_err(code: &str, path: &Path, err: impl std::fmt::Display) -> DpvError {
    DpvError::Table(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, DpvError> {
    csv::Reader::from_path(path).map_err(|err| csv_err("csv-open", path, err))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn parse_dept(field: &str, path: &Path) -> Result<DeptId, DpvError> {
    field
        .trim()
        .parse::<u32>()
        .map(DeptId::from_raw)
        .map_err(|err| csv_err("csv-bad-dept", path, format!("{field:?}: {err}")))
}

fn parse_f64(field: &str, path: &Path) -> Result<f64, DpvError> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|err| csv_err("csv-bad-number", path, format!("{field:?}: {err}")))
}

/// Loads the department performance summary (`dept,mae`).
pub fn load_summary(path: &Path) -> Result<DeptPerformance, DpvError> {
    let mut reader = open(path)?;
    let headers = reader
        .headers()
        .map_err(|err| csv_err("csv-read", path, err))?
        .clone();
    let dept_col = column_index(&headers, "dept")
        .ok_or_else(|| csv_err("summary-missing-column", path, "no `dept` column"))?;
    let mae_col = column_index(&headers, "mae")
        .ok_or_else(|| csv_err("summary-missing-column", path, "no `mae` column"))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| csv_err("csv-read", path, err))?;
        rows.push(DeptMae {
            dept: parse_dept(&record[dept_col], path)?,
            mae: parse_f64(&record[mae_col], path)?,
        });
    }
    DeptPerformance::new(rows)
}

/// Loads the seasonal pivot: first column `dept`, one column per period.
/// Empty cells become missing values.
pub fn load_seasonal(path: &Path) -> Result<SeasonalPivot, DpvError> {
    let mut reader = open(path)?;
    let headers = reader
        .headers()
        .map_err(|err| csv_err("csv-read", path, err))?
        .clone();
    if headers.len() < 2 {
        return Err(csv_err(
            "pivot-missing-column",
            path,
            "expected a `dept` column followed by period columns",
        ));
    }
    let periods: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut depts = Vec::new();
    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| csv_err("csv-read", path, err))?;
        depts.push(parse_dept(&record[0], path)?);
        let mut row = Vec::with_capacity(periods.len());
        for field in record.iter().skip(1) {
            if field.trim().is_empty() {
                row.push(None);
            } else {
                row.push(Some(parse_f64(field, path)?));
            }
        }
        cells.push(row);
    }
    SeasonalPivot::new(depts, periods, cells)
}

/// Loads the performance matrix: first column `dept`, one column per metric.
pub fn load_matrix(path: &Path) -> Result<PerformanceMatrix, DpvError> {
    let mut reader = open(path)?;
    let headers = reader
        .headers()
        .map_err(|err| csv_err("csv-read", path, err))?
        .clone();
    if headers.len() < 2 {
        return Err(csv_err(
            "matrix-missing-column",
            path,
            "expected a `dept` column followed by metric columns",
        ));
    }
    let metrics: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut depts = Vec::new();
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| csv_err("csv-read", path, err))?;
        depts.push(parse_dept(&record[0], path)?);
        let mut row = Vec::with_capacity(metrics.len());
        for field in record.iter().skip(1) {
            row.push(parse_f64(field, path)?);
        }
        values.push(row);
    }
    PerformanceMatrix::new(depts, metrics, values)
}

/// Loads a strategic table (`dept,mae,revenue_share,sample_count`). Revenue
/// shares are fractions, not percentages.
pub fn load_strategic(path: &Path) -> Result<StrategicTable, DpvError> {
    let mut reader = open(path)?;
    let headers = reader
        .headers()
        .map_err(|err| csv_err("csv-read", path, err))?
        .clone();
    let dept_col = column_index(&headers, "dept")
        .ok_or_else(|| csv_err("strategic-missing-column", path, "no `dept` column"))?;
    let mae_col = column_index(&headers, "mae")
        .ok_or_else(|| csv_err("strategic-missing-column", path, "no `mae` column"))?;
    let share_col = column_index(&headers, "revenue_share")
        .ok_or_else(|| csv_err("strategic-missing-column", path, "no `revenue_share` column"))?;
    let count_col = column_index(&headers, "sample_count")
        .ok_or_else(|| csv_err("strategic-missing-column", path, "no `sample_count` column"))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| csv_err("csv-read", path, err))?;
        let sample_count = record[count_col]
            .trim()
            .parse::<u32>()
            .map_err(|err| csv_err("csv-bad-number", path, err))?;
        rows.push(StrategicRow {
            dept: parse_dept(&record[dept_col], path)?,
            mae: parse_f64(&record[mae_col], path)?,
            revenue_share: parse_f64(&record[share_col], path)?,
            sample_count,
        });
    }
    Ok(StrategicTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn summary_loads_and_keeps_input_order() {
        let (_dir, path) = write_csv("dept,mae\n7,12.5\n3,1.25\n");
        let summary = load_summary(&path).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.rows()[0].dept.as_raw(), 7);
        assert_eq!(summary.rows()[1].mae, 1.25);
    }

    #[test]
    fn summary_rejects_missing_mae_column() {
        let (_dir, path) = write_csv("dept,error\n7,12.5\n");
        let err = load_summary(&path).unwrap_err();
        assert_eq!(err.info().code, "summary-missing-column");
    }

    #[test]
    fn seasonal_treats_empty_cells_as_missing() {
        let (_dir, path) = write_csv("dept,Q1,Q2\n1,2.5,\n2,,4.0\n");
        let pivot = load_seasonal(&path).unwrap();
        assert_eq!(pivot.periods(), ["Q1".to_string(), "Q2".to_string()]);
        assert_eq!(pivot.filled(), vec![vec![2.5, 0.0], vec![0.0, 4.0]]);
    }

    #[test]
    fn matrix_requires_numeric_cells() {
        let (_dir, path) = write_csv("dept,m0\n1,oops\n");
        let err = load_matrix(&path).unwrap_err();
        assert_eq!(err.info().code, "csv-bad-number");
    }

    #[test]
    fn strategic_reads_fractional_shares() {
        let (_dir, path) = write_csv(
            "dept,mae,revenue_share,sample_count\n92,50.0,0.085,800\n",
        );
        let table = load_strategic(&path).unwrap();
        assert_eq!(table.rows().len(), 1);
        assert!((table.rows()[0].revenue_share - 0.085).abs() < 1e-12);
        assert_eq!(table.rows()[0].sample_count, 800);
    }
}
