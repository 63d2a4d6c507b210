//! The pool's list of reusable slot ranges.
//!
//! [`FreeList`] is a flat, unordered vector of non-overlapping ranges.
//! Reuse is first fit. After every insertion [`FreeList::compact`] runs
//! two rules until neither fires, restarting the scan after each firing:
//!
//! 1. An entry ending at the pool size is dropped and the size shrinks
//!    to just before it.
//! 2. Two adjacent entries merge into the one at the lower position.
//!
//! At the fixed point no entry touches the end of the pool and no two
//! entries are adjacent.

use std::collections::TryReserveError;

use mparena_core::Range;
use tracing::trace;

/// Reusable ranges inside `[1, size]` of a pool.
#[derive(Clone, Debug)]
pub struct FreeList {
    entries: Vec<Range>,
    /// Storage is reserved this many entries at a time.
    chunk: usize,
}

impl FreeList {
    /// Create an empty list whose storage grows `chunk` entries at a time.
    pub fn new(chunk: usize) -> Self {
        Self {
            entries: Vec::new(),
            chunk: chunk.max(1),
        }
    }

    /// Current entries in list order.
    pub fn entries(&self) -> &[Range] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of free slots across all entries.
    pub fn free_slots(&self) -> usize {
        self.entries.iter().map(Range::len).sum()
    }

    /// The first entry sharing a slot with `range`, if any.
    pub fn overlapping(&self, range: Range) -> Option<Range> {
        self.entries.iter().copied().find(|e| e.overlaps(&range))
    }

    /// Make room for one more entry, growing storage by a whole chunk.
    ///
    /// Called before the pool touches any value so that a refusal leaves
    /// everything unchanged.
    pub fn reserve_one(&mut self) -> Result<(), TryReserveError> {
        if self.entries.len() == self.entries.capacity() {
            self.entries.try_reserve_exact(self.chunk)?;
        }
        Ok(())
    }

    /// Append an entry. Pair with [`reserve_one`](Self::reserve_one).
    pub fn push(&mut self, range: Range) {
        self.entries.push(range);
    }

    /// Take `count` slots from the first entry large enough.
    ///
    /// An exact fit removes the entry; otherwise the low `count` slots
    /// are carved off and the entry's start advances.
    pub fn try_reuse(&mut self, count: usize) -> Option<Range> {
        let pos = self.entries.iter().position(|e| e.len() >= count)?;
        let entry = self.entries[pos];
        if entry.len() == count {
            self.entries.remove(pos);
            return Some(entry);
        }
        let taken = Range::new(entry.start, entry.start + count - 1);
        self.entries[pos].start += count;
        Some(taken)
    }

    /// Run shrink-tail and merge-adjacent to a fixed point.
    ///
    /// `size` is the pool's logical size and is lowered by shrink-tail.
    pub fn compact(&mut self, size: &mut usize) {
        'restart: loop {
            for i in 0..self.entries.len() {
                let entry = self.entries[i];
                if entry.end == *size {
                    *size = entry.start - 1;
                    self.entries.remove(i);
                    trace!(%entry, size = *size, "free list: shrink tail");
                    continue 'restart;
                }
                for j in (i + 1)..self.entries.len() {
                    let other = self.entries[j];
                    if entry.is_adjacent(&other) {
                        self.entries[i] = entry.union(&other);
                        self.entries.remove(j);
                        trace!(%entry, %other, "free list: merge");
                        continue 'restart;
                    }
                }
            }
            break;
        }
    }

    /// Drop every entry, keeping the storage.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
