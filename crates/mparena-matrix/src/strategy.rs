//! Multiply execution plans and the per-session set of enabled ones.

use std::fmt;

use indexmap::IndexMap;

use crate::error::KernelError;

/// How [`multiply`](crate::multiply) walks the output.
///
/// The discriminant is the external strategy id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Strategy {
    /// Sequential, rows outermost.
    SequentialIjk = 1,
    /// Sequential, columns outermost.
    SequentialJik = 2,
    /// One task per output row.
    ParallelRows = 3,
    /// One task per output column.
    ParallelColumns = 4,
    /// Tasks per row, each fanning out per column.
    NestedRowsColumns = 5,
    /// Tasks per column, each fanning out per row.
    NestedColumnsRows = 6,
    /// Copy each row of `A` into a scratch row, then one dot product per
    /// output element.
    RowCopy = 7,
    /// Delegate to a registered [`GemmBackend`](crate::GemmBackend).
    Accelerated = 8,
}

impl Strategy {
    /// Every strategy in id order.
    pub const ALL: [Strategy; 8] = [
        Self::SequentialIjk,
        Self::SequentialJik,
        Self::ParallelRows,
        Self::ParallelColumns,
        Self::NestedRowsColumns,
        Self::NestedColumnsRows,
        Self::RowCopy,
        Self::Accelerated,
    ];

    /// Decode an external id.
    pub fn from_id(id: i64) -> Result<Self, KernelError> {
        Self::ALL
            .into_iter()
            .find(|s| i64::from(s.id()) == id)
            .ok_or(KernelError::InvalidStrategy { id })
    }

    /// External id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::SequentialIjk => "sequential-ijk",
            Self::SequentialJik => "sequential-jik",
            Self::ParallelRows => "parallel-rows",
            Self::ParallelColumns => "parallel-columns",
            Self::NestedRowsColumns => "nested-rows-columns",
            Self::NestedColumnsRows => "nested-columns-rows",
            Self::RowCopy => "row-copy",
            Self::Accelerated => "accelerated",
        }
    }

    /// Whether the strategy runs on the worker pool.
    pub fn is_parallel(self) -> bool {
        !matches!(self, Self::SequentialIjk | Self::SequentialJik)
    }
}

impl TryFrom<i64> for Strategy {
    type Error = KernelError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id(), self.name())
    }
}

/// The strategies a session may dispatch, in the order they were enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategySet {
    enabled: IndexMap<u8, Strategy>,
}

impl StrategySet {
    /// An empty set.
    pub fn empty() -> Self {
        Self {
            enabled: IndexMap::new(),
        }
    }

    /// Strategies 1 through 7, which need nothing beyond the worker pool.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        for s in Strategy::ALL {
            if s != Strategy::Accelerated {
                set.enable(s);
            }
        }
        set
    }

    /// Enable `strategy`. Returns `false` if it was already enabled.
    pub fn enable(&mut self, strategy: Strategy) -> bool {
        self.enabled.insert(strategy.id(), strategy).is_none()
    }

    /// Disable `strategy`. Returns `false` if it was not enabled.
    pub fn disable(&mut self, strategy: Strategy) -> bool {
        self.enabled.shift_remove(&strategy.id()).is_some()
    }

    /// Whether `strategy` is enabled.
    pub fn contains(&self, strategy: Strategy) -> bool {
        self.enabled.contains_key(&strategy.id())
    }

    /// Decode `id` and check that it is enabled.
    pub fn resolve(&self, id: i64) -> Result<Strategy, KernelError> {
        let strategy = Strategy::from_id(id)?;
        if self.contains(strategy) {
            Ok(strategy)
        } else {
            Err(KernelError::StrategyUnavailable { strategy })
        }
    }

    /// Enabled strategies in enabling order.
    pub fn iter(&self) -> impl Iterator<Item = Strategy> + '_ {
        self.enabled.values().copied()
    }

    /// Number of enabled strategies.
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    /// Whether nothing is enabled.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl Default for StrategySet {
    fn default() -> Self {
        Self::builtin()
    }
}
