//! Small numeric helpers backing the chart builders.

/// Histogram of a value slice over equal-width bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Lower edge of the first bin.
    pub min: f64,
    /// Upper edge of the last bin.
    pub max: f64,
    /// Per-bin counts, `bins` entries.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Width of a single bin.
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Largest per-bin count, zero for an empty histogram.
    pub fn peak(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bins `values` into `bins` equal-width buckets spanning the observed range.
///
/// Values landing exactly on the upper edge are clamped into the last bin. A
/// degenerate range (all values equal) still produces a single populated bin.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bin_count = bins.max(1);
    if values.is_empty() {
        return Histogram {
            min: 0.0,
            max: 0.0,
            counts: vec![0; bin_count],
        };
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(1e-9);
    let mut counts = vec![0usize; bin_count];
    for value in values {
        let mut idx = ((value - min) / span * bin_count as f64).floor() as usize;
        if idx >= bin_count {
            idx = bin_count - 1;
        }
        counts[idx] += 1;
    }
    Histogram { min, max, counts }
}

/// Arithmetic mean, zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, zero for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standardizes a row-major matrix per column: zero mean, unit variance.
///
/// Columns with zero variance are centered but left unscaled, matching the
/// scaler semantics the normalized heatmap expects.
pub fn standardize_columns(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let cols = first.len();
    let mut means = vec![0.0; cols];
    let mut stds = vec![0.0; cols];
    for col in 0..cols {
        let column: Vec<f64> = rows.iter().map(|row| row[col]).collect();
        means[col] = mean(&column);
        let std = population_std(&column);
        stds[col] = if std > 0.0 { std } else { 1.0 };
    }
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, value)| (value - means[col]) / stds[col])
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let hist = histogram(&values, 4);
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
        // the maximum lands in the last bin rather than overflowing
        assert_eq!(*hist.counts.last().unwrap(), 2);
    }

    #[test]
    fn histogram_degenerate_range() {
        let hist = histogram(&[3.0, 3.0, 3.0], 8);
        assert_eq!(hist.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn standardize_centers_and_scales() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let out = standardize_columns(&rows);
        assert!((out[0][0] + 1.0).abs() < 1e-12);
        assert!((out[1][0] - 1.0).abs() < 1e-12);
        // zero-variance column is centered, not scaled
        assert_eq!(out[0][1], 0.0);
        assert_eq!(out[1][1], 0.0);
    }
}
