//! The [`Session`] facade.

use mparena_core::{Precision, Range, RoundingMode, Verbosity};
use mparena_float::{BigFloat, BinaryOp};
use mparena_matrix::{
    self as matrix, Feedback, GemmBackend, GemmOptions, GemmShape, MatrixView, MatrixViewMut,
    StatusReport, Strategy, StrategySet,
};
use mparena_pool::{Operands, Pool, PoolError};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, warn};

use crate::config::{ConfigError, SessionConfig};
use crate::error::SessionError;
use crate::operand::{broadcast, Operand};

/// Owner of one value pool and everything needed to compute on it.
///
/// All operations take `&mut self`; parallelism exists only inside a
/// single multiply call, on the session's own worker pool.
#[derive(Debug)]
pub struct Session {
    pool: Pool,
    workers: ThreadPool,
    strategies: StrategySet,
    backend: Option<Box<dyn GemmBackend>>,
    default_rounding: RoundingMode,
    verbosity: Verbosity,
}

impl Session {
    /// Validate `config` and start the worker pool.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let threads = config.resolved_worker_threads();
        let workers = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("mparena-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::ThreadPool {
                reason: e.to_string(),
            })?;
        let pool = Pool::new(config.pool)?;
        if config.verbosity.traces() {
            debug!(threads, "session: started");
        }
        Ok(Self {
            pool,
            workers,
            strategies: config.strategies,
            backend: None,
            default_rounding: config.default_rounding,
            verbosity: config.verbosity,
        })
    }

    fn report<T>(&self, op: &'static str, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(e) = &result {
            if self.verbosity.reports_errors() {
                error!(op, error = %e, "session: operation failed");
            }
        }
        result
    }

    // ── Pool ───────────────────────────────────────────────────────

    /// Hand out `count` consecutive slots, initialized to NaN at the
    /// default precision.
    pub fn allocate(&mut self, count: usize) -> Result<Range, SessionError> {
        let result = self.pool.allocate(count).map_err(SessionError::from);
        if let Ok(range) = &result {
            if self.verbosity.traces() {
                debug!(%range, size = self.pool.size(), "allocate");
            }
        }
        self.report("allocate", result)
    }

    /// Return `range` to the pool.
    ///
    /// Invalid ranges and ranges that are already free are ignored;
    /// use [`try_mark_free`](Self::try_mark_free) to observe them.
    pub fn mark_free(&mut self, range: Range) {
        match self.try_mark_free(range) {
            Ok(()) => {
                if self.verbosity.traces() {
                    debug!(%range, size = self.pool.size(), "mark_free");
                }
            }
            Err(
                e @ SessionError::Pool(PoolError::InvalidRange { .. } | PoolError::DoubleFree { .. }),
            ) => {
                if self.verbosity.traces() {
                    debug!(%range, error = %e, "mark_free: ignored");
                }
            }
            Err(e) => {
                if self.verbosity.reports_errors() {
                    error!(%range, error = %e, "mark_free failed");
                }
            }
        }
    }

    /// Return `range` to the pool, reporting why it was refused.
    pub fn try_mark_free(&mut self, range: Range) -> Result<(), SessionError> {
        Ok(self.pool.mark_free(range)?)
    }

    /// Slots with initialized storage.
    pub fn pool_capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Slots handed out.
    pub fn pool_size(&self) -> usize {
        self.pool.size()
    }

    /// Ranges currently on the free list.
    pub fn free_ranges(&self) -> &[Range] {
        self.pool.free_list().entries()
    }

    /// Drop every value and free range. Settings are kept.
    pub fn reset(&mut self) {
        self.pool.clear();
        if self.verbosity.traces() {
            debug!("session: reset");
        }
    }

    // ── Kernels ────────────────────────────────────────────────────

    /// Write the transpose of `op` into `rop`, which has `output_rows`
    /// rows.
    pub fn transpose(
        &mut self,
        rop: Range,
        op: Range,
        rounding: impl Into<Option<RoundingMode>>,
        output_rows: usize,
        feedback: Feedback,
    ) -> Result<StatusReport, SessionError> {
        let rounding = self.rounding_or_default(rounding);
        let result = self.transpose_checked(rop, op, rounding, output_rows, feedback);
        self.report("transpose", result)
    }

    fn transpose_checked(
        &mut self,
        rop: Range,
        op: Range,
        rounding: RoundingMode,
        output_rows: usize,
        feedback: Feedback,
    ) -> Result<StatusReport, SessionError> {
        if self.verbosity.traces() {
            debug!(%rop, %op, %rounding, output_rows, "transpose");
        }
        let Operands {
            output,
            inputs: [src],
        } = self.pool.operands(("rop", rop), [("op", op)])?;
        if self.verbosity.reports_warnings() {
            warn_narrowing("transpose", narrowest(output), widest(&src));
        }
        Ok(matrix::transpose(output, &src, rounding, output_rows, feedback)?)
    }

    /// `C ← C + A·B` where `C` has `rows_m` rows.
    ///
    /// `precision` is the working precision of the row-copy and
    /// accelerated strategies; the others round every step into `C`.
    #[allow(clippy::too_many_arguments)]
    pub fn multiply(
        &mut self,
        c: Range,
        a: Range,
        b: Range,
        precision: Precision,
        rounding: impl Into<Option<RoundingMode>>,
        rows_m: usize,
        strategy_id: i64,
        feedback: Feedback,
    ) -> Result<StatusReport, SessionError> {
        let rounding = self.rounding_or_default(rounding);
        let result = self.multiply_checked(c, a, b, precision, rounding, rows_m, strategy_id, feedback);
        self.report("multiply", result)
    }

    #[allow(clippy::too_many_arguments)]
    fn multiply_checked(
        &mut self,
        c: Range,
        a: Range,
        b: Range,
        precision: Precision,
        rounding: RoundingMode,
        rows_m: usize,
        strategy_id: i64,
        feedback: Feedback,
    ) -> Result<StatusReport, SessionError> {
        if self.verbosity.traces() {
            debug!(%c, %a, %b, %precision, %rounding, rows_m, strategy_id, "multiply");
        }
        let Operands {
            output,
            inputs: [a_vals, b_vals],
        } = self.pool.operands(("C", c), [("A", a), ("B", b)])?;
        let shape = GemmShape::infer(output.len(), a_vals.len(), b_vals.len(), rows_m)?;
        let strategy = self.strategies.resolve(strategy_id)?;
        if self.verbosity.reports_warnings()
            && matches!(strategy, Strategy::RowCopy | Strategy::Accelerated)
        {
            warn_narrowing("multiply", Some(precision), widest(output));
        }

        let cv = MatrixViewMut::new("C", output, shape.m, shape.n)?;
        let av = MatrixView::new("A", &a_vals, shape.m, shape.k)?;
        let bv = MatrixView::new("B", &b_vals, shape.k, shape.n)?;
        let options = GemmOptions {
            strategy,
            precision,
            rounding,
            feedback,
        };
        Ok(matrix::multiply(
            &self.workers,
            self.backend.as_deref(),
            cv,
            av,
            bv,
            &options,
        )?)
    }

    /// Register the backend behind [`Strategy::Accelerated`] and enable
    /// it. Replaces any previous backend.
    pub fn register_backend(&mut self, backend: Box<dyn GemmBackend>) {
        if self.verbosity.traces() {
            debug!(backend = backend.name(), "register_backend");
        }
        self.backend = Some(backend);
        self.strategies.enable(Strategy::Accelerated);
    }

    /// Strategies this session will dispatch.
    pub fn available_strategies(&self) -> Vec<Strategy> {
        self.strategies.iter().collect()
    }

    // ── Values ─────────────────────────────────────────────────────

    /// Precision of each value in `range`.
    pub fn precisions(&self, range: Range) -> Result<Vec<Precision>, SessionError> {
        let result = self
            .pool
            .get("range", range)
            .map(|vals| vals.iter().map(BigFloat::precision).collect())
            .map_err(SessionError::from);
        self.report("precisions", result)
    }

    /// Set the precision of every value in `range`. The values become NaN.
    pub fn set_precision(&mut self, range: Range, prec: Precision) -> Result<(), SessionError> {
        let result = self
            .pool
            .get_mut("range", range)
            .map(|vals| vals.iter_mut().for_each(|v| v.set_precision(prec)))
            .map_err(SessionError::from);
        self.report("set_precision", result)
    }

    /// Each value in `range` converted to the nearest double in the
    /// direction of `rounding`.
    pub fn get_f64(
        &self,
        range: Range,
        rounding: impl Into<Option<RoundingMode>>,
    ) -> Result<Vec<f64>, SessionError> {
        let rounding = self.rounding_or_default(rounding);
        let result = self
            .pool
            .get("range", range)
            .map(|vals| vals.iter().map(|v| v.to_f64(rounding)).collect())
            .map_err(SessionError::from);
        self.report("get_f64", result)
    }

    /// Store `values` into `range`, rounding into each slot's precision.
    pub fn set_f64(
        &mut self,
        range: Range,
        values: &[f64],
        rounding: impl Into<Option<RoundingMode>>,
    ) -> Result<StatusReport, SessionError> {
        let rounding = self.rounding_or_default(rounding);
        let result = self.set_f64_checked(range, values, rounding);
        self.report("set_f64", result)
    }

    fn set_f64_checked(
        &mut self,
        range: Range,
        values: &[f64],
        rounding: RoundingMode,
    ) -> Result<StatusReport, SessionError> {
        let slots = self.pool.get_mut("range", range)?;
        if slots.len() != values.len() {
            return Err(SessionError::ValueCount {
                expected: slots.len(),
                got: values.len(),
            });
        }
        let statuses = slots
            .iter_mut()
            .zip(values)
            .map(|(slot, &v)| slot.set_f64(v, rounding).code())
            .collect();
        Ok(StatusReport::from_elements(Feedback::PerElement, statuses))
    }

    /// Element-wise `rop ← lhs op rhs`, broadcasting a length-1 operand.
    ///
    /// Each result is rounded into the precision of its destination.
    /// Operands may alias `rop`; they are read before anything is
    /// written.
    pub fn arith(
        &mut self,
        op: BinaryOp,
        rop: Range,
        lhs: Operand<'_>,
        rhs: Operand<'_>,
        rounding: impl Into<Option<RoundingMode>>,
    ) -> Result<StatusReport, SessionError> {
        let rounding = self.rounding_or_default(rounding);
        let result = self.arith_checked(op, rop, lhs, rhs, rounding);
        self.report("arith", result)
    }

    fn operand_len(&self, param: &'static str, operand: Operand<'_>) -> Result<usize, SessionError> {
        match operand {
            Operand::Pool(r) => Ok(self.pool.validate(param, r)?.len()),
            Operand::Doubles(v) => Ok(v.len()),
        }
    }

    fn arith_checked(
        &mut self,
        op: BinaryOp,
        rop: Range,
        lhs: Operand<'_>,
        rhs: Operand<'_>,
        rounding: RoundingMode,
    ) -> Result<StatusReport, SessionError> {
        if self.verbosity.traces() {
            debug!(?op, %rop, ?lhs, ?rhs, %rounding, "arith");
        }
        let rop = self.pool.validate("rop", rop)?;
        let lhs_len = self.operand_len("op1", lhs)?;
        let rhs_len = self.operand_len("op2", rhs)?;
        broadcast(rop.len(), lhs_len, rhs_len).ok_or(SessionError::Broadcast {
            rop: rop.len(),
            lhs: lhs_len,
            rhs: rhs_len,
        })?;

        let statuses = match (lhs, rhs) {
            (Operand::Pool(x), Operand::Pool(y)) => {
                let Operands {
                    output,
                    inputs: [x, y],
                } = self.pool.operands(("rop", rop), [("op1", x), ("op2", y)])?;
                apply(op, output, &x, &y, rounding)
            }
            (Operand::Pool(x), Operand::Doubles(v)) => {
                let y = Operand::doubles_to_values(v);
                let Operands {
                    output,
                    inputs: [x],
                } = self.pool.operands(("rop", rop), [("op1", x)])?;
                apply(op, output, &x, &y, rounding)
            }
            (Operand::Doubles(u), Operand::Pool(y)) => {
                let x = Operand::doubles_to_values(u);
                let Operands {
                    output,
                    inputs: [y],
                } = self.pool.operands(("rop", rop), [("op2", y)])?;
                apply(op, output, &x, &y, rounding)
            }
            (Operand::Doubles(u), Operand::Doubles(v)) => {
                let x = Operand::doubles_to_values(u);
                let y = Operand::doubles_to_values(v);
                apply(op, self.pool.get_mut("rop", rop)?, &x, &y, rounding)
            }
        };
        Ok(StatusReport::from_elements(Feedback::PerElement, statuses))
    }

    // ── Settings ───────────────────────────────────────────────────

    /// Precision given to new and freed slots.
    pub fn default_precision(&self) -> Precision {
        self.pool.default_precision()
    }

    /// Change the precision given to new and freed slots.
    pub fn set_default_precision(&mut self, prec: Precision) {
        self.pool.set_default_precision(prec);
    }

    /// Rounding mode used when a call passes `None`.
    pub fn default_rounding(&self) -> RoundingMode {
        self.default_rounding
    }

    fn rounding_or_default(&self, rounding: impl Into<Option<RoundingMode>>) -> RoundingMode {
        rounding.into().unwrap_or(self.default_rounding)
    }

    /// Change the default rounding mode.
    pub fn set_default_rounding(&mut self, rounding: RoundingMode) {
        self.default_rounding = rounding;
    }

    /// Diagnostic level.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Change the diagnostic level.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }
}

fn at(values: &[BigFloat], i: usize) -> &BigFloat {
    if values.len() == 1 {
        &values[0]
    } else {
        &values[i]
    }
}

fn apply(
    op: BinaryOp,
    out: &mut [BigFloat],
    x: &[BigFloat],
    y: &[BigFloat],
    rnd: RoundingMode,
) -> Vec<i32> {
    out.iter_mut()
        .enumerate()
        .map(|(i, dst)| {
            let (value, t) = BigFloat::binary(op, at(x, i), at(y, i), dst.precision(), rnd);
            *dst = value;
            t.code()
        })
        .collect()
}

fn narrowest(values: &[BigFloat]) -> Option<Precision> {
    values.iter().map(BigFloat::precision).min()
}

fn widest(values: &[BigFloat]) -> Option<Precision> {
    values.iter().map(BigFloat::precision).max()
}

fn warn_narrowing(op: &'static str, target: Option<Precision>, source: Option<Precision>) {
    if let (Some(target), Some(source)) = (target, source) {
        if target < source {
            warn!(op, %target, %source, "results rounded to a narrower precision");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mparena_test_utils::{identity, MockBackend};

    const RN: RoundingMode = RoundingMode::NearestEven;

    fn session() -> Session {
        Session::new(SessionConfig {
            worker_threads: Some(2),
            ..SessionConfig::default()
        })
        .unwrap()
    }

    fn load(s: &mut Session, values: &[f64]) -> Range {
        let r = s.allocate(values.len()).unwrap();
        s.set_f64(r, values, RN).unwrap();
        r
    }

    #[test]
    fn allocate_free_reuse() {
        let mut s = session();
        let a = s.allocate(3).unwrap();
        let b = s.allocate(2).unwrap();
        assert_eq!((a, b), (Range::new(1, 3), Range::new(4, 5)));
        assert_eq!(s.pool_capacity(), 1000);
        s.mark_free(a);
        assert_eq!(s.free_ranges(), &[a]);
        assert_eq!(s.allocate(3).unwrap(), a);
        s.mark_free(b);
        assert_eq!(s.pool_size(), 3);
    }

    #[test]
    fn mark_free_ignores_bad_ranges() {
        let mut s = session();
        let a = s.allocate(3).unwrap();
        s.allocate(1).unwrap();
        s.mark_free(Range::new(2, 9));
        s.mark_free(Range::new(0, 1));
        assert!(s.free_ranges().is_empty());
        s.mark_free(a);
        s.mark_free(a);
        assert_eq!(s.free_ranges(), &[a]);
        assert!(matches!(
            s.try_mark_free(a),
            Err(SessionError::Pool(PoolError::DoubleFree { .. }))
        ));
    }

    #[test]
    fn zero_allocation_is_an_error() {
        let mut s = session();
        assert_eq!(
            s.allocate(0),
            Err(SessionError::Pool(PoolError::ZeroCount))
        );
    }

    #[test]
    fn values_roundtrip_through_doubles() {
        let mut s = session();
        let r = load(&mut s, &[1.5, -0.25, 1e300]);
        assert_eq!(s.get_f64(r, RN).unwrap(), vec![1.5, -0.25, 1e300]);
        assert_eq!(
            s.set_f64(r, &[1.0], RN),
            Err(SessionError::ValueCount {
                expected: 3,
                got: 1,
            })
        );
    }

    #[test]
    fn precision_queries_and_resets() {
        let mut s = session();
        let r = load(&mut s, &[1.0, 2.0]);
        assert_eq!(s.precisions(r).unwrap(), vec![Precision::DOUBLE; 2]);
        let p = Precision::new(200).unwrap();
        s.set_precision(Range::single(2), p).unwrap();
        assert_eq!(s.precisions(r).unwrap(), vec![Precision::DOUBLE, p]);
        assert!(s.get_f64(Range::single(2), RN).unwrap()[0].is_nan());
        assert_eq!(s.get_f64(Range::single(1), RN).unwrap(), vec![1.0]);
    }

    #[test]
    fn default_precision_applies_to_new_slots() {
        let mut s = session();
        let p = Precision::new(113).unwrap();
        s.set_default_precision(p);
        let r = s.allocate(2).unwrap();
        assert_eq!(s.precisions(r).unwrap(), vec![p, p]);
        assert_eq!(s.default_precision(), p);
    }

    #[test]
    fn settings_round_trip() {
        let mut s = session();
        assert_eq!(s.default_rounding(), RoundingMode::NearestEven);
        s.set_default_rounding(RoundingMode::TowardZero);
        assert_eq!(s.default_rounding(), RoundingMode::TowardZero);
        assert_eq!(s.verbosity(), Verbosity::Warnings);
        s.set_verbosity(Verbosity::Debug);
        assert_eq!(s.verbosity(), Verbosity::Debug);
    }

    #[test]
    fn transpose_in_pool() {
        let mut s = session();
        let op = load(&mut s, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let rop = s.allocate(6).unwrap();
        let report = s.transpose(rop, op, RN, 2, Feedback::Aggregate).unwrap();
        assert!(report.is_exact());
        assert_eq!(s.get_f64(rop, RN).unwrap(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn transpose_in_place_uses_a_snapshot() {
        let mut s = session();
        let r = load(&mut s, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        s.transpose(r, r, RN, 3, Feedback::Aggregate).unwrap();
        assert_eq!(s.get_f64(r, RN).unwrap(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn transpose_validates_ranges() {
        let mut s = session();
        let r = s.allocate(4).unwrap();
        let err = s
            .transpose(r, Range::new(3, 6), RN, 2, Feedback::Aggregate)
            .unwrap_err();
        assert!(matches!(err, SessionError::Pool(PoolError::InvalidRange { param: "op", .. })));
    }

    #[test]
    fn identity_multiply_every_builtin_strategy() {
        let mut s = session();
        let data: Vec<f64> = (1..=9).map(f64::from).collect();
        let a = load(&mut s, &data);
        let b = load(&mut s, &identity(3));
        for id in 1..=7 {
            let c = load(&mut s, &[0.0; 9]);
            let report = s
                .multiply(c, a, b, Precision::DOUBLE, RN, 3, id, Feedback::PerElement)
                .unwrap();
            assert_eq!(report.as_slice(), &[0; 9]);
            assert_eq!(s.get_f64(c, RN).unwrap(), data, "strategy {id}");
            s.mark_free(c);
        }
    }

    #[test]
    fn multiply_shape_error_leaves_c_untouched() {
        let mut s = session();
        let a = load(&mut s, &[1.0; 6]);
        let b = load(&mut s, &[1.0; 5]);
        let c = load(&mut s, &[7.0; 4]);
        let err = s
            .multiply(c, a, b, Precision::DOUBLE, RN, 2, 1, Feedback::Aggregate)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::Kernel(matrix::KernelError::ShapeMismatch {
                operand: "B",
                rows: 3,
                cols: 2,
                len: 5,
            })
        );
        assert_eq!(s.get_f64(c, RN).unwrap(), vec![7.0; 4]);
    }

    #[test]
    fn invalid_and_unavailable_strategies() {
        let mut s = session();
        let a = load(&mut s, &[2.0]);
        let b = load(&mut s, &[3.0]);
        let c = load(&mut s, &[0.0]);
        for id in [0, 9] {
            assert_eq!(
                s.multiply(c, a, b, Precision::DOUBLE, RN, 1, id, Feedback::Aggregate),
                Err(SessionError::Kernel(matrix::KernelError::InvalidStrategy { id }))
            );
        }
        assert!(matches!(
            s.multiply(c, a, b, Precision::DOUBLE, RN, 1, 8, Feedback::Aggregate),
            Err(SessionError::Kernel(matrix::KernelError::StrategyUnavailable { .. }))
        ));
        assert!(!s.available_strategies().contains(&Strategy::Accelerated));
    }

    #[test]
    fn accelerated_strategy_delegates_to_backend() {
        let mut s = session();
        let backend = MockBackend::new();
        let calls = backend.call_counter();
        s.register_backend(Box::new(backend));
        assert!(s.available_strategies().contains(&Strategy::Accelerated));

        let a = load(&mut s, &[1.0, 2.0]);
        let b = load(&mut s, &[3.0, 4.0]);
        let c = load(&mut s, &[10.0]);
        let report = s
            .multiply(c, a, b, Precision::DOUBLE, RN, 1, 8, Feedback::Aggregate)
            .unwrap();
        assert!(report.is_exact());
        assert_eq!(s.get_f64(c, RN).unwrap(), vec![21.0]);
        assert_eq!(calls.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[test]
    fn arith_with_broadcasting() {
        let mut s = session();
        let x = load(&mut s, &[1.0, 2.0, 3.0]);
        let two = load(&mut s, &[2.0]);
        let rop = s.allocate(3).unwrap();

        s.arith(BinaryOp::Mul, rop, x.into(), two.into(), RN).unwrap();
        assert_eq!(s.get_f64(rop, RN).unwrap(), vec![2.0, 4.0, 6.0]);

        s.arith(BinaryOp::Sub, rop, two.into(), x.into(), RN).unwrap();
        assert_eq!(s.get_f64(rop, RN).unwrap(), vec![1.0, 0.0, -1.0]);

        let d = [10.0, 20.0, 30.0];
        s.arith(BinaryOp::Add, rop, x.into(), Operand::Doubles(&d), RN).unwrap();
        assert_eq!(s.get_f64(rop, RN).unwrap(), vec![11.0, 22.0, 33.0]);

        let report = s
            .arith(BinaryOp::Div, rop, Operand::Doubles(&[1.0]), x.into(), RN)
            .unwrap();
        assert_eq!(report.as_slice(), &[0, 0, -1]);
    }

    #[test]
    fn arith_rejects_incompatible_lengths() {
        let mut s = session();
        let x = load(&mut s, &[1.0, 2.0]);
        let y = load(&mut s, &[1.0, 2.0, 3.0]);
        let rop = s.allocate(3).unwrap();
        assert_eq!(
            s.arith(BinaryOp::Add, rop, x.into(), y.into(), RN),
            Err(SessionError::Broadcast {
                rop: 3,
                lhs: 2,
                rhs: 3,
            })
        );
    }

    #[test]
    fn arith_allows_shifted_aliasing() {
        let mut s = session();
        let r = load(&mut s, &[1.0, 2.0, 3.0, 4.0]);
        // [2:4] ← [1:3] + [2:4], all reads before writes.
        s.arith(BinaryOp::Add, Range::new(2, 4), Range::new(1, 3).into(), Range::new(2, 4).into(), RN)
            .unwrap();
        assert_eq!(s.get_f64(r, RN).unwrap(), vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn omitted_rounding_uses_the_session_default() {
        let mut s = session();
        s.set_default_precision(Precision::new(8).unwrap());
        let r = s.allocate(1).unwrap();
        let x = 1.0 + 2f64.powi(-10);

        assert_eq!(s.set_f64(r, &[x], None).unwrap().as_slice(), &[-1]);
        assert_eq!(s.get_f64(r, None).unwrap(), vec![1.0]);

        s.set_default_rounding(RoundingMode::TowardPositive);
        assert_eq!(s.set_f64(r, &[x], None).unwrap().as_slice(), &[1]);
        assert_eq!(s.get_f64(r, None).unwrap(), vec![1.0 + 2f64.powi(-7)]);

        // An explicit mode still wins.
        assert_eq!(s.set_f64(r, &[x], RoundingMode::TowardZero).unwrap().as_slice(), &[-1]);
        let report = s
            .arith(BinaryOp::Add, r, r.into(), Operand::Doubles(&[2f64.powi(-10)]), None)
            .unwrap();
        assert_eq!(report.as_slice(), &[1]);
    }

    #[test]
    fn repeated_squaring_saturates_without_panicking() {
        let mut s = session();
        let x = load(&mut s, &[2.0]);
        let mut statuses = Vec::new();
        for _ in 0..70 {
            let report = s.arith(BinaryOp::Mul, x, x.into(), x.into(), RN).unwrap();
            statuses.push(report.as_slice()[0]);
        }
        assert!(statuses[..29].iter().all(|&t| t == 0));
        assert_eq!(statuses[29], 1);
        assert_eq!(s.get_f64(x, RN).unwrap(), vec![f64::INFINITY]);
    }

    #[test]
    fn reset_clears_pool_but_keeps_settings() {
        let mut s = session();
        s.set_default_precision(Precision::new(64).unwrap());
        load(&mut s, &[1.0, 2.0]);
        s.reset();
        assert_eq!(s.pool_size(), 0);
        assert_eq!(s.pool_capacity(), 0);
        assert_eq!(s.default_precision(), Precision::new(64).unwrap());
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = SessionConfig {
            strategies: StrategySet::empty(),
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::new(cfg),
            Err(SessionError::Config(ConfigError::NoStrategies))
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn churn_keeps_free_ranges_apart_from_live_ones(
                ops in prop::collection::vec((1usize..6, any::<bool>()), 1..40)
            ) {
                let mut s = session();
                let mut live: Vec<Range> = Vec::new();
                for (n, free) in ops {
                    if free && !live.is_empty() {
                        let r = live.remove(n % live.len());
                        s.mark_free(r);
                    } else {
                        live.push(s.allocate(n).unwrap());
                    }
                    let size = s.pool_size();
                    let free_ranges = s.free_ranges();
                    for (i, a) in free_ranges.iter().enumerate() {
                        prop_assert!(a.is_valid(size));
                        prop_assert!(free_ranges[i + 1..].iter().all(|b| !a.overlaps(b)));
                        prop_assert!(live.iter().all(|l| !a.overlaps(l)));
                    }
                    prop_assert!(live.iter().all(|l| l.is_valid(size)));
                }
            }
        }
    }
}
