//! The value pool.

use std::borrow::Cow;

use mparena_core::{Precision, Range};
use mparena_float::BigFloat;
use tracing::{debug, trace};

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::free_list::FreeList;

/// A growable arena of [`BigFloat`] values addressed by [`Range`].
///
/// `capacity` counts slots with initialized storage; `size` counts slots
/// logically handed out. Slots in `(size, capacity]` and slots covered by
/// the free list hold NaN at the default precision.
#[derive(Debug)]
pub struct Pool {
    values: Vec<BigFloat>,
    size: usize,
    free: FreeList,
    config: PoolConfig,
}

/// Disjoint views of one output range and `N` input ranges.
///
/// Inputs that overlap the output are snapshotted into owned copies, so
/// reading them while writing the output sees the values as they were
/// when the view was taken.
#[derive(Debug)]
pub struct Operands<'a, const N: usize> {
    /// The output values.
    pub output: &'a mut [BigFloat],
    /// The input values, in the order requested.
    pub inputs: [Cow<'a, [BigFloat]>; N],
}

impl Pool {
    /// Create an empty pool.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self {
            values: Vec::new(),
            size: 0,
            free: FreeList::new(config.chunk_size),
            config,
        })
    }

    /// Slots with initialized storage.
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Slots logically handed out, including freed slots below the top.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The free list.
    pub fn free_list(&self) -> &FreeList {
        &self.free
    }

    /// The active configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Precision given to fresh and freed slots.
    pub fn default_precision(&self) -> Precision {
        self.config.default_precision
    }

    /// Change the precision given to slots from now on. Existing values
    /// keep their own precision.
    pub fn set_default_precision(&mut self, prec: Precision) {
        self.config.default_precision = prec;
    }

    /// Check `range` against the current size.
    ///
    /// `param` names the argument in the error.
    pub fn validate(&self, param: &'static str, range: Range) -> Result<Range, PoolError> {
        if range.is_valid(self.size) {
            Ok(range)
        } else {
            Err(PoolError::InvalidRange {
                param,
                range,
                size: self.size,
            })
        }
    }

    /// Hand out `count` consecutive slots.
    ///
    /// Reuses the first free entry large enough, otherwise appends at
    /// `size + 1` and grows storage in whole chunks. On failure nothing
    /// changes.
    pub fn allocate(&mut self, count: usize) -> Result<Range, PoolError> {
        if count == 0 {
            return Err(PoolError::ZeroCount);
        }
        if let Some(range) = self.free.try_reuse(count) {
            trace!(%range, "pool: reused free range");
            return Ok(range);
        }

        let needed = self
            .size
            .checked_add(count)
            .ok_or(PoolError::CapacityExceeded {
                requested: usize::MAX,
                max_slots: self.config.max_slots,
            })?;
        if needed > self.capacity() {
            self.grow_to(needed)?;
        }
        let range = Range::new(self.size + 1, needed);
        self.size = needed;
        trace!(%range, size = self.size, "pool: appended range");
        Ok(range)
    }

    /// Grow storage until it holds at least `needed` slots.
    fn grow_to(&mut self, needed: usize) -> Result<(), PoolError> {
        let chunk = self.config.chunk_size;
        let mut target = self.capacity();
        while target < needed {
            target = target.saturating_add(chunk);
        }
        if target > self.config.max_slots {
            return Err(PoolError::CapacityExceeded {
                requested: target,
                max_slots: self.config.max_slots,
            });
        }
        let extra = target - self.capacity();
        self.values
            .try_reserve_exact(extra)
            .map_err(|_| PoolError::AllocationFailed {
                what: "pool slots",
                requested: extra,
            })?;
        let prec = self.config.default_precision;
        self.values.resize_with(target, || BigFloat::nan(prec));
        debug!(capacity = target, "pool: grew storage");
        Ok(())
    }

    /// Return `range` to the free list.
    ///
    /// The values are reset to NaN at the default precision and the free
    /// list is compacted, which may lower `size`. Ranges overlapping an
    /// existing free entry are rejected.
    pub fn mark_free(&mut self, range: Range) -> Result<(), PoolError> {
        let range = self.validate("range", range)?;
        if let Some(existing) = self.free.overlapping(range) {
            return Err(PoolError::DoubleFree { range, existing });
        }
        self.free
            .reserve_one()
            .map_err(|_| PoolError::AllocationFailed {
                what: "free list entries",
                requested: self.config.chunk_size,
            })?;

        let prec = self.config.default_precision;
        for value in &mut self.values[range.to_slice_bounds()] {
            value.reset(prec);
        }
        self.free.push(range);
        self.free.compact(&mut self.size);
        trace!(%range, size = self.size, entries = self.free.len(), "pool: freed range");
        Ok(())
    }

    /// Values in `range`.
    pub fn get(&self, param: &'static str, range: Range) -> Result<&[BigFloat], PoolError> {
        let range = self.validate(param, range)?;
        Ok(&self.values[range.to_slice_bounds()])
    }

    /// Mutable values in `range`.
    pub fn get_mut(
        &mut self,
        param: &'static str,
        range: Range,
    ) -> Result<&mut [BigFloat], PoolError> {
        let range = self.validate(param, range)?;
        Ok(&mut self.values[range.to_slice_bounds()])
    }

    /// Borrow `output` mutably alongside `inputs`.
    ///
    /// Each `(name, range)` pair is validated; inputs that overlap the
    /// output are cloned.
    pub fn operands<const N: usize>(
        &mut self,
        output: (&'static str, Range),
        inputs: [(&'static str, Range); N],
    ) -> Result<Operands<'_, N>, PoolError> {
        let out = self.validate(output.0, output.1)?;
        for (param, range) in inputs {
            self.validate(param, range)?;
        }

        let bounds = out.to_slice_bounds();
        let (before, rest) = self.values.split_at_mut(bounds.start);
        let (output, after) = rest.split_at_mut(bounds.len());
        let before: &[BigFloat] = before;
        let after: &[BigFloat] = after;
        let current: &[BigFloat] = &*output;
        let lo = bounds.start;
        let hi = bounds.end;

        let inputs = inputs.map(move |(_, range)| {
            let r = range.to_slice_bounds();
            if range.overlaps(&out) {
                let snapshot: Vec<BigFloat> = r
                    .map(|i| {
                        if i < lo {
                            before[i].clone()
                        } else if i < hi {
                            current[i - lo].clone()
                        } else {
                            after[i - hi].clone()
                        }
                    })
                    .collect();
                Cow::Owned(snapshot)
            } else if r.end <= lo {
                Cow::Borrowed(&before[r])
            } else {
                Cow::Borrowed(&after[(r.start - hi)..(r.end - hi)])
            }
        });
        Ok(Operands { output, inputs })
    }

    /// Drop every slot and free entry, back to an empty pool.
    pub fn clear(&mut self) {
        self.values = Vec::new();
        self.free.clear();
        self.size = 0;
        debug!("pool: cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mparena_core::RoundingMode;

    fn small_pool(chunk: usize) -> Pool {
        Pool::new(PoolConfig {
            chunk_size: chunk,
            ..PoolConfig::default()
        })
        .unwrap()
    }

    fn fill(pool: &mut Pool, range: Range, start: f64) {
        for (i, v) in pool.get_mut("range", range).unwrap().iter_mut().enumerate() {
            v.set_f64(start + i as f64, RoundingMode::NearestEven);
        }
    }

    fn read(pool: &Pool, range: Range) -> Vec<f64> {
        pool.get("range", range)
            .unwrap()
            .iter()
            .map(|v| v.to_f64(RoundingMode::NearestEven))
            .collect()
    }

    #[test]
    fn first_allocation_grows_one_chunk() {
        let mut pool = Pool::new(PoolConfig::default()).unwrap();
        let r = pool.allocate(3).unwrap();
        assert_eq!(r, Range::new(1, 3));
        assert_eq!(pool.size(), 3);
        assert_eq!(pool.capacity(), 1000);
        assert!(pool.get("r", r).unwrap().iter().all(BigFloat::is_nan));
    }

    #[test]
    fn large_allocation_grows_several_chunks() {
        let mut pool = small_pool(10);
        pool.allocate(4).unwrap();
        let r = pool.allocate(25).unwrap();
        assert_eq!(r, Range::new(5, 29));
        assert_eq!(pool.capacity(), 30);
    }

    #[test]
    fn zero_count_rejected() {
        let mut pool = small_pool(10);
        assert_eq!(pool.allocate(0), Err(PoolError::ZeroCount));
        assert_eq!(pool.size(), 0);
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn ceiling_is_enforced_without_side_effects() {
        let mut pool = Pool::new(PoolConfig {
            chunk_size: 10,
            max_slots: 20,
            ..PoolConfig::default()
        })
        .unwrap();
        pool.allocate(15).unwrap();
        let err = pool.allocate(6).unwrap_err();
        assert!(matches!(err, PoolError::CapacityExceeded { requested: 30, max_slots: 20 }));
        assert_eq!(pool.size(), 15);
        assert_eq!(pool.capacity(), 20);
        assert_eq!(pool.allocate(5).unwrap(), Range::new(16, 20));
    }

    #[test]
    fn freed_interior_range_is_reused() {
        let mut pool = small_pool(10);
        let a = pool.allocate(3).unwrap();
        let _b = pool.allocate(3).unwrap();
        fill(&mut pool, a, 1.0);
        pool.mark_free(a).unwrap();
        assert_eq!(pool.size(), 6);
        assert_eq!(pool.free_list().entries(), &[a]);
        assert!(pool.get("a", a).unwrap().iter().all(BigFloat::is_nan));

        assert_eq!(pool.allocate(2).unwrap(), Range::new(1, 2));
        assert_eq!(pool.free_list().entries(), &[Range::single(3)]);
    }

    #[test]
    fn freeing_the_tail_shrinks_size() {
        let mut pool = small_pool(10);
        let a = pool.allocate(3).unwrap();
        let b = pool.allocate(3).unwrap();
        pool.mark_free(a).unwrap();
        pool.mark_free(b).unwrap();
        assert_eq!(pool.size(), 0);
        assert!(pool.free_list().is_empty());
        assert_eq!(pool.capacity(), 10);
    }

    #[test]
    fn adjacent_frees_merge() {
        let mut pool = small_pool(10);
        let a = pool.allocate(2).unwrap();
        let b = pool.allocate(2).unwrap();
        let _c = pool.allocate(2).unwrap();
        pool.mark_free(b).unwrap();
        pool.mark_free(a).unwrap();
        assert_eq!(pool.free_list().entries(), &[Range::new(1, 4)]);
    }

    #[test]
    fn invalid_and_double_frees_are_rejected() {
        let mut pool = small_pool(10);
        let a = pool.allocate(4).unwrap();
        pool.allocate(1).unwrap();
        assert!(matches!(
            pool.mark_free(Range::new(0, 2)),
            Err(PoolError::InvalidRange { param: "range", .. })
        ));
        assert!(matches!(
            pool.mark_free(Range::new(3, 2)),
            Err(PoolError::InvalidRange { .. })
        ));
        pool.mark_free(a).unwrap();
        assert_eq!(
            pool.mark_free(Range::new(2, 3)),
            Err(PoolError::DoubleFree {
                range: Range::new(2, 3),
                existing: a,
            })
        );
        assert_eq!(pool.free_list().entries(), &[a]);
    }

    #[test]
    fn growth_preserves_content() {
        let mut pool = small_pool(4);
        let a = pool.allocate(4).unwrap();
        fill(&mut pool, a, 10.0);
        pool.allocate(9).unwrap();
        assert_eq!(pool.capacity(), 16);
        assert_eq!(read(&pool, a), vec![10.0, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn freed_slots_take_default_precision() {
        let mut pool = small_pool(4);
        let a = pool.allocate(2).unwrap();
        pool.allocate(1).unwrap();
        pool.get_mut("a", a).unwrap()[0].set_precision(Precision::new(300).unwrap());
        pool.set_default_precision(Precision::new(80).unwrap());
        pool.mark_free(a).unwrap();
        let p = Precision::new(80).unwrap();
        assert!(pool.get("a", a).unwrap().iter().all(|v| v.precision() == p));
    }

    #[test]
    fn operands_borrow_disjoint_and_snapshot_overlap() {
        let mut pool = small_pool(10);
        let r = pool.allocate(6).unwrap();
        fill(&mut pool, r, 1.0);
        let ops = pool
            .operands(
                ("rop", Range::new(3, 4)),
                [("a", Range::new(1, 2)), ("b", Range::new(4, 6))],
            )
            .unwrap();
        assert!(matches!(ops.inputs[0], Cow::Borrowed(_)));
        assert!(matches!(ops.inputs[1], Cow::Owned(_)));
        for v in ops.output.iter_mut() {
            v.set_f64(0.0, RoundingMode::NearestEven);
        }
        let b: Vec<f64> = ops.inputs[1]
            .iter()
            .map(|v| v.to_f64(RoundingMode::NearestEven))
            .collect();
        assert_eq!(b, vec![4.0, 5.0, 6.0]);
        assert_eq!(read(&pool, r), vec![1.0, 2.0, 0.0, 0.0, 5.0, 6.0]);
    }

    #[test]
    fn operands_validate_every_range() {
        let mut pool = small_pool(10);
        pool.allocate(3).unwrap();
        let err = pool
            .operands(("rop", Range::new(1, 1)), [("op", Range::new(2, 9))])
            .unwrap_err();
        assert!(matches!(err, PoolError::InvalidRange { param: "op", .. }));
    }

    #[test]
    fn clear_resets_everything() {
        let mut pool = small_pool(10);
        let a = pool.allocate(3).unwrap();
        pool.allocate(3).unwrap();
        pool.mark_free(a).unwrap();
        pool.clear();
        assert_eq!(pool.size(), 0);
        assert_eq!(pool.capacity(), 0);
        assert!(pool.free_list().is_empty());
        assert_eq!(pool.allocate(1).unwrap(), Range::new(1, 1));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Alloc(usize),
            Free(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1usize..12).prop_map(Op::Alloc),
                any::<usize>().prop_map(Op::Free),
            ]
        }

        proptest! {
            #[test]
            fn churn_keeps_ranges_disjoint(ops in prop::collection::vec(op(), 1..80)) {
                let mut pool = small_pool(8);
                let mut live: Vec<Range> = Vec::new();
                for op in ops {
                    match op {
                        Op::Alloc(n) => {
                            let r = pool.allocate(n).unwrap();
                            prop_assert_eq!(r.len(), n);
                            prop_assert!(r.is_valid(pool.size()));
                            for other in &live {
                                prop_assert!(!r.overlaps(other));
                            }
                            live.push(r);
                        }
                        Op::Free(pick) if !live.is_empty() => {
                            let r = live.swap_remove(pick % live.len());
                            pool.mark_free(r).unwrap();
                        }
                        Op::Free(_) => {}
                    }

                    let entries = pool.free_list().entries();
                    for (i, a) in entries.iter().enumerate() {
                        prop_assert!(a.is_valid(pool.size()));
                        prop_assert!(a.end != pool.size());
                        for b in &entries[i + 1..] {
                            prop_assert!(!a.overlaps(b));
                            prop_assert!(!a.is_adjacent(b));
                        }
                        for l in &live {
                            prop_assert!(!a.overlaps(l));
                        }
                    }
                    for l in &live {
                        prop_assert!(l.is_valid(pool.size()));
                    }
                    prop_assert!(pool.size() <= pool.capacity());
                }
            }

            #[test]
            fn compaction_reaches_fixed_point(sizes in prop::collection::vec(1usize..20, 1..30)) {
                let mut pool = small_pool(16);
                let ranges: Vec<Range> = sizes.iter().map(|&n| pool.allocate(n).unwrap()).collect();
                let cap = pool.capacity();
                for r in ranges.into_iter().rev().step_by(2) {
                    pool.mark_free(r).unwrap();
                }
                prop_assert_eq!(pool.capacity(), cap);
                let mut size = pool.size();
                let before = pool.free_list().entries().to_vec();
                let mut list = pool.free_list().clone();
                list.compact(&mut size);
                prop_assert_eq!(list.entries(), before.as_slice());
                prop_assert_eq!(size, pool.size());
            }
        }
    }
}
