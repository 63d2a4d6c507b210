//! Direction of a rounding error.

/// Sign of `rounded - exact` for a single rounded operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ternary {
    /// The stored result is below the exact result.
    Below,
    /// The stored result is exact.
    Exact,
    /// The stored result is above the exact result.
    Above,
}

impl Ternary {
    /// Integer status code: `-1`, `0` or `1`.
    pub fn code(self) -> i32 {
        match self {
            Self::Below => -1,
            Self::Exact => 0,
            Self::Above => 1,
        }
    }

    /// Whether no rounding error occurred.
    pub fn is_exact(self) -> bool {
        self == Self::Exact
    }
}

impl From<Ternary> for i32 {
    fn from(t: Ternary) -> Self {
        t.code()
    }
}
