//! Matrix transpose with rounding.

use mparena_core::RoundingMode;
use mparena_float::BigFloat;
use tracing::debug;

use crate::error::KernelError;
use crate::shape::transpose_dims;
use crate::status::{Feedback, StatusReport};
use crate::view::{MatrixView, MatrixViewMut};

/// Write the transpose of `op` into `rop`.
///
/// `rop` is read as an `rop_m × N` column-major matrix and `op` as the
/// `N × rop_m` matrix it transposes, where `N = len / rop_m`. Each value
/// is rounded into the precision already held by its destination slot.
/// Statuses are indexed like `rop`.
///
/// The slices must not overlap; callers holding aliasing ranges pass a
/// snapshot of `op`.
pub fn transpose(
    rop: &mut [BigFloat],
    op: &[BigFloat],
    rnd: RoundingMode,
    rop_m: usize,
    feedback: Feedback,
) -> Result<StatusReport, KernelError> {
    let (m, n) = transpose_dims(rop.len(), op.len(), rop_m)?;
    debug!(m, n, %rnd, "transpose");
    let src = MatrixView::new("op", op, n, m)?;
    let mut dst = MatrixViewMut::new("rop", rop, m, n)?;

    let mut statuses = vec![0; m * n];
    for j in 0..n {
        for i in 0..m {
            statuses[j * m + i] = dst.get_mut(i, j).set(src.get(j, i), rnd).code();
        }
    }
    Ok(StatusReport::from_elements(feedback, statuses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mparena_core::Precision;

    const RN: RoundingMode = RoundingMode::NearestEven;

    fn values(vs: &[f64], prec: Precision) -> Vec<BigFloat> {
        vs.iter().map(|&v| BigFloat::from_f64(v, prec)).collect()
    }

    fn doubles(vs: &[BigFloat]) -> Vec<f64> {
        vs.iter().map(|v| v.to_f64(RN)).collect()
    }

    #[test]
    fn transposes_column_major() {
        // op is 3×2: [[1, 4], [2, 5], [3, 6]].
        let op = values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], Precision::DOUBLE);
        let mut rop = vec![BigFloat::nan(Precision::DOUBLE); 6];
        let report = transpose(&mut rop, &op, RN, 2, Feedback::PerElement).unwrap();
        // rop is 2×3: [[1, 2, 3], [4, 5, 6]].
        assert_eq!(doubles(&rop), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(report.as_slice(), &[0; 6]);
    }

    #[test]
    fn round_trip_is_identity() {
        let original: Vec<f64> = (0..12).map(|v| v as f64 * 0.5).collect();
        let op = values(&original, Precision::DOUBLE);
        let mut once = vec![BigFloat::nan(Precision::DOUBLE); 12];
        let mut twice = vec![BigFloat::nan(Precision::DOUBLE); 12];
        transpose(&mut once, &op, RN, 4, Feedback::Aggregate).unwrap();
        transpose(&mut twice, &once, RN, 3, Feedback::Aggregate).unwrap();
        assert_eq!(doubles(&twice), original);
    }

    #[test]
    fn rounds_into_destination_precision() {
        let op = values(&[1.0 + f64::EPSILON, 3.0], Precision::DOUBLE);
        let mut rop = vec![BigFloat::nan(Precision::new(4).unwrap()); 2];
        let report = transpose(&mut rop, &op, RoundingMode::TowardPositive, 1, Feedback::PerElement)
            .unwrap();
        assert_eq!(report.as_slice(), &[1, 0]);
        assert_eq!(doubles(&rop), vec![1.125, 3.0]);
        assert!(rop.iter().all(|v| v.precision() == Precision::new(4).unwrap()));
    }

    #[test]
    fn rejects_bad_shapes_without_writing() {
        let op = values(&[1.0; 6], Precision::DOUBLE);
        let mut rop = vec![BigFloat::nan(Precision::DOUBLE); 6];
        assert!(matches!(
            transpose(&mut rop, &op, RN, 4, Feedback::Aggregate),
            Err(KernelError::RowsMismatch { .. })
        ));
        assert!(matches!(
            transpose(&mut rop, &op[..5], RN, 3, Feedback::Aggregate),
            Err(KernelError::LengthMismatch { .. })
        ));
        assert!(rop.iter().all(BigFloat::is_nan));
    }
}
