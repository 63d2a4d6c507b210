//! Column-major views over value slices.

use mparena_float::BigFloat;

use crate::error::KernelError;

/// Read-only `rows × cols` column-major matrix.
#[derive(Clone, Copy, Debug)]
pub struct MatrixView<'a> {
    data: &'a [BigFloat],
    rows: usize,
    cols: usize,
}

impl<'a> MatrixView<'a> {
    /// Wrap `data` as a `rows × cols` matrix named `operand` in errors.
    pub fn new(
        operand: &'static str,
        data: &'a [BigFloat],
        rows: usize,
        cols: usize,
    ) -> Result<Self, KernelError> {
        check_len(operand, data.len(), rows, cols)?;
        Ok(Self { data, rows, cols })
    }

    /// Row count (leading dimension).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows` or `j >= cols`.
    pub fn get(&self, i: usize, j: usize) -> &'a BigFloat {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        &self.data[j * self.rows + i]
    }

    /// Column `j` as a contiguous slice.
    pub fn column(&self, j: usize) -> &'a [BigFloat] {
        &self.data[j * self.rows..(j + 1) * self.rows]
    }

    /// Row `i`, strided through the columns.
    pub fn row(&self, i: usize) -> impl Iterator<Item = &'a BigFloat> + 'a {
        assert!(i < self.rows, "row {i} out of bounds");
        self.data.iter().skip(i).step_by(self.rows)
    }

    /// All elements in storage order.
    pub fn as_slice(&self) -> &'a [BigFloat] {
        self.data
    }
}

/// Mutable `rows × cols` column-major matrix.
#[derive(Debug)]
pub struct MatrixViewMut<'a> {
    pub(crate) data: &'a mut [BigFloat],
    rows: usize,
    cols: usize,
}

impl<'a> MatrixViewMut<'a> {
    /// Wrap `data` as a `rows × cols` matrix named `operand` in errors.
    pub fn new(
        operand: &'static str,
        data: &'a mut [BigFloat],
        rows: usize,
        cols: usize,
    ) -> Result<Self, KernelError> {
        check_len(operand, data.len(), rows, cols)?;
        Ok(Self { data, rows, cols })
    }

    /// Row count (leading dimension).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element `(i, j)`.
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut BigFloat {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        &mut self.data[j * self.rows + i]
    }

    /// A read-only view of the current contents.
    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView {
            data: &*self.data,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// All elements in storage order.
    pub fn as_mut_slice(&mut self) -> &mut [BigFloat] {
        &mut *self.data
    }
}

fn check_len(operand: &'static str, len: usize, rows: usize, cols: usize) -> Result<(), KernelError> {
    if rows.checked_mul(cols) == Some(len) {
        Ok(())
    } else {
        Err(KernelError::ShapeMismatch {
            operand,
            rows,
            cols,
            len,
        })
    }
}
