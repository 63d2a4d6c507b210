//! Rounding status reports returned by the kernels.

use smallvec::SmallVec;

/// How much rounding detail a caller wants back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// One status: the bitwise OR of every element's status.
    #[default]
    Aggregate,
    /// One status per output element, indexed like the output.
    PerElement,
}

/// Ternary statuses of an operation.
///
/// Each status is `-1`, `0`, `1`, or the bitwise OR of several of those
/// when an element went through more than one rounding step. Zero means
/// exact; any other value means some step rounded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusReport(SmallVec<[i32; 1]>);

impl StatusReport {
    /// Build a report from per-element statuses.
    pub fn from_elements(feedback: Feedback, statuses: Vec<i32>) -> Self {
        match feedback {
            Feedback::Aggregate => Self::aggregate_of(statuses.iter().copied()),
            Feedback::PerElement => Self(SmallVec::from_vec(statuses)),
        }
    }

    /// A single aggregate status.
    pub fn aggregate_of(statuses: impl IntoIterator<Item = i32>) -> Self {
        let mut out = SmallVec::new();
        out.push(statuses.into_iter().fold(0, |acc, s| acc | s));
        Self(out)
    }

    /// `len` exact statuses in the requested form.
    pub fn exact(feedback: Feedback, len: usize) -> Self {
        Self::from_elements(feedback, vec![0; len])
    }

    /// The bitwise OR of every status.
    pub fn aggregate(&self) -> i32 {
        self.0.iter().fold(0, |acc, s| acc | s)
    }

    /// Whether every rounding step was exact.
    pub fn is_exact(&self) -> bool {
        self.aggregate() == 0
    }

    /// The statuses as stored.
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Number of statuses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no statuses.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
