//! Non-owning windows over a [`BitMatrix`].
//!
//! A view is constructed without any bounds check: the window may extend
//! past the matrix. Every access is checked twice, first against the window
//! extent and then by the matrix itself, so an access that lands outside the
//! underlying matrix fails with [`SgfError::OutOfBounds`] instead of reading
//! garbage.

use crate::error::{Result, SgfError};
use crate::models::matrix::{self, BitMatrix, packed_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    start_row: usize,
    start_col: usize,
    sub_rows: usize,
    sub_cols: usize,
}

impl Window {
    /// Translate window-relative `(row, col)` into matrix coordinates.
    fn translate(&self, row: usize, col: usize) -> Result<(usize, usize)> {
        let out_of_window = || SgfError::OutOfBounds {
            row,
            col,
            rows: self.sub_rows,
            cols: self.sub_cols,
        };
        if row >= self.sub_rows || col >= self.sub_cols {
            return Err(out_of_window());
        }
        let abs_row = self.start_row.checked_add(row).ok_or_else(out_of_window)?;
        let abs_col = self.start_col.checked_add(col).ok_or_else(out_of_window)?;
        Ok((abs_row, abs_col))
    }

    fn bit_count(&self) -> Result<usize> {
        matrix::bit_count(self.sub_rows, self.sub_cols)
    }

    fn saturating_packed_len(&self) -> usize {
        packed_len(self.sub_rows.saturating_mul(self.sub_cols))
    }

    /// Row-major scan of the window, packing LSB-first into `dest`.
    ///
    /// Only the visited bit positions are written; padding bits in the last
    /// byte keep whatever `dest` held.
    fn pack(&self, matrix: &BitMatrix, dest: &mut [u8]) -> Result<usize> {
        let required = packed_len(self.bit_count()?);
        if dest.len() < required {
            return Err(SgfError::BufferOverrun {
                required,
                available: dest.len(),
            });
        }

        let mut dest_bit_pos = 0usize;
        for row in 0..self.sub_rows {
            for col in 0..self.sub_cols {
                let (abs_row, abs_col) = self.translate(row, col)?;
                let value = matrix.get_bit(abs_row, abs_col)?;

                let mask = 1u8 << (dest_bit_pos % 8);
                if value {
                    dest[dest_bit_pos / 8] |= mask;
                } else {
                    dest[dest_bit_pos / 8] &= !mask;
                }
                dest_bit_pos += 1;
            }
        }

        Ok(required)
    }

    fn to_matrix(&self, matrix: &BitMatrix) -> Result<BitMatrix> {
        let mut out = BitMatrix::try_new(self.sub_rows, self.sub_cols)?;
        for row in 0..self.sub_rows {
            for col in 0..self.sub_cols {
                let (abs_row, abs_col) = self.translate(row, col)?;
                if matrix.get_bit(abs_row, abs_col)? {
                    out.set_bit(row, col, true)?;
                }
            }
        }
        Ok(out)
    }
}

/// Read-only sub-rectangle of a [`BitMatrix`].
#[derive(Debug, Clone, Copy)]
pub struct SubMatrixView<'a> {
    matrix: &'a BitMatrix,
    window: Window,
}

impl<'a> SubMatrixView<'a> {
    /// Window of `sub_rows x sub_cols` starting at `(start_row, start_col)`.
    pub fn new(
        matrix: &'a BitMatrix,
        start_row: usize,
        start_col: usize,
        sub_rows: usize,
        sub_cols: usize,
    ) -> Self {
        Self {
            matrix,
            window: Window {
                start_row,
                start_col,
                sub_rows,
                sub_cols,
            },
        }
    }

    /// Rows in the window
    pub fn sub_rows(&self) -> usize {
        self.window.sub_rows
    }

    /// Columns in the window
    pub fn sub_cols(&self) -> usize {
        self.window.sub_cols
    }

    /// Top-left corner in matrix coordinates, `(row, col)`
    pub fn origin(&self) -> (usize, usize) {
        (self.window.start_row, self.window.start_col)
    }

    /// Bytes needed by [`copy_data_to`](Self::copy_data_to)
    pub fn packed_len(&self) -> usize {
        self.window.saturating_packed_len()
    }

    /// Get bit at window-relative `(row, col)`.
    pub fn get_bit(&self, row: usize, col: usize) -> Result<bool> {
        let (abs_row, abs_col) = self.window.translate(row, col)?;
        self.matrix.get_bit(abs_row, abs_col)
    }

    /// Pack the window row-major, LSB-first into `dest`.
    ///
    /// `dest` must hold at least `ceil(sub_rows * sub_cols / 8)` bytes.
    /// Returns the number of bytes written.
    pub fn copy_data_to(&self, dest: &mut [u8]) -> Result<usize> {
        self.window.pack(self.matrix, dest)
    }

    /// Copy the window into an owned matrix.
    pub fn to_matrix(&self) -> Result<BitMatrix> {
        self.window.to_matrix(self.matrix)
    }
}

/// Writable sub-rectangle of a [`BitMatrix`].
#[derive(Debug)]
pub struct SubMatrixViewMut<'a> {
    matrix: &'a mut BitMatrix,
    window: Window,
}

impl<'a> SubMatrixViewMut<'a> {
    /// Window of `sub_rows x sub_cols` starting at `(start_row, start_col)`.
    pub fn new(
        matrix: &'a mut BitMatrix,
        start_row: usize,
        start_col: usize,
        sub_rows: usize,
        sub_cols: usize,
    ) -> Self {
        Self {
            matrix,
            window: Window {
                start_row,
                start_col,
                sub_rows,
                sub_cols,
            },
        }
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> SubMatrixView<'_> {
        SubMatrixView {
            matrix: &*self.matrix,
            window: self.window,
        }
    }

    /// Rows in the window
    pub fn sub_rows(&self) -> usize {
        self.window.sub_rows
    }

    /// Columns in the window
    pub fn sub_cols(&self) -> usize {
        self.window.sub_cols
    }

    /// Bytes needed by [`copy_data_to`](Self::copy_data_to)
    pub fn packed_len(&self) -> usize {
        self.window.saturating_packed_len()
    }

    /// Get bit at window-relative `(row, col)`.
    pub fn get_bit(&self, row: usize, col: usize) -> Result<bool> {
        self.as_view().get_bit(row, col)
    }

    /// Set bit at window-relative `(row, col)`.
    pub fn set_bit(&mut self, row: usize, col: usize, value: bool) -> Result<()> {
        let (abs_row, abs_col) = self.window.translate(row, col)?;
        self.matrix.set_bit(abs_row, abs_col, value)
    }

    /// See [`SubMatrixView::copy_data_to`].
    pub fn copy_data_to(&self, dest: &mut [u8]) -> Result<usize> {
        self.window.pack(&*self.matrix, dest)
    }
}
