//! Column-major matrix data for tests and benchmarks.

use mparena_core::{Precision, RoundingMode};
use mparena_float::BigFloat;

/// The `n×n` identity in column-major order.
pub fn identity(n: usize) -> Vec<f64> {
    let mut data = vec![0.0; n * n];
    for i in 0..n {
        data[i * n + i] = 1.0;
    }
    data
}

/// `rows×cols` matrix whose element `(i, j)` is `i + j·rows + 1`, so the
/// storage order reads `1, 2, 3, …`.
pub fn ramp(rows: usize, cols: usize) -> Vec<f64> {
    (1..=rows * cols).map(|v| v as f64).collect()
}

/// Doubles converted exactly to 53-bit values.
pub fn values(data: &[f64]) -> Vec<BigFloat> {
    data.iter()
        .map(|&v| BigFloat::from_f64(v, Precision::DOUBLE))
        .collect()
}

/// Values rounded to the nearest double.
pub fn doubles(data: &[BigFloat]) -> Vec<f64> {
    data.iter()
        .map(|v| v.to_f64(RoundingMode::NearestEven))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_unit_diagonal() {
        assert_eq!(identity(2), vec![1.0, 0.0, 0.0, 1.0]);
        assert!(identity(0).is_empty());
    }

    #[test]
    fn ramp_counts_in_storage_order() {
        assert_eq!(ramp(2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
