use std::fmt;

use rayon::prelude::*;

use crate::config;
use crate::error::{Result, SgfError};
use crate::models::view::{SubMatrixView, SubMatrixViewMut};

/// Bytes handed to each rayon task by the parallel XOR variants.
const PAR_CHUNK_BYTES: usize = 4096;

/// `rows * cols`, or [`SgfError::DimensionOverflow`] if it does not fit.
pub(crate) fn bit_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(SgfError::DimensionOverflow { rows, cols })
}

/// Number of bytes needed to hold `bit_count` bits packed LSB-first.
pub fn packed_len(bit_count: usize) -> usize {
    bit_count.div_ceil(8)
}

/// Compact 1-bit frame.
///
/// Addressing is row-major: bit `(row, col)` lives at logical index
/// `row * cols + col`. Storage is packed LSB-first, and padding bits past
/// `rows * cols` are always zero so that two matrices compare equal exactly
/// when their dimensions and bits match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create an all-zero matrix of `rows x cols` bits. Either may be 0.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`. Use
    /// [`try_new`](Self::try_new) for untrusted dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        match Self::try_new(rows, cols) {
            Ok(matrix) => matrix,
            Err(e) => panic!("{e}"),
        }
    }

    /// Like [`new`](Self::new), but fails with
    /// [`SgfError::DimensionOverflow`] instead of panicking.
    pub fn try_new(rows: usize, cols: usize) -> Result<Self> {
        let bit_count = bit_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![0; packed_len(bit_count)],
        })
    }

    /// Build a matrix from exactly `rows * cols` bits in row-major order.
    pub fn from_bits<I>(rows: usize, cols: usize, bits: I) -> Result<Self>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut matrix = Self::try_new(rows, cols)?;
        let expected = matrix.len();
        let mut count = 0usize;
        for bit in bits {
            if count < expected && bit {
                matrix.put(count, true);
            }
            count += 1;
        }
        if count != expected {
            return Err(SgfError::LengthMismatch {
                expected,
                actual: count,
            });
        }
        Ok(matrix)
    }

    /// Build a matrix from a packed buffer as produced by
    /// [`copy_data_to`](Self::copy_data_to). Extra trailing bytes are ignored.
    pub fn from_packed(rows: usize, cols: usize, bytes: &[u8]) -> Result<Self> {
        let required = packed_len(bit_count(rows, cols)?);
        if bytes.len() < required {
            return Err(SgfError::BufferOverrun {
                required,
                available: bytes.len(),
            });
        }
        let mut matrix = Self {
            rows,
            cols,
            data: bytes[..required].to_vec(),
        };
        matrix.mask_tail();
        Ok(matrix)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of bits (`rows * cols`)
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// True when the matrix holds no bits
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get bit at `(row, col)`.
    pub fn get_bit(&self, row: usize, col: usize) -> Result<bool> {
        let index = self.index(row, col)?;
        Ok(self.bit_at(index))
    }

    /// Set bit at `(row, col)`.
    pub fn set_bit(&mut self, row: usize, col: usize, value: bool) -> Result<()> {
        let index = self.index(row, col)?;
        self.put(index, value);
        Ok(())
    }

    /// Flip bit at `(row, col)`.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<()> {
        let index = self.index(row, col)?;
        self.data[index / 8] ^= 1 << (index % 8);
        Ok(())
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Set every bit to `value`
    pub fn fill(&mut self, value: bool) {
        self.data.fill(if value { 0xFF } else { 0 });
        self.mask_tail();
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Iterate all bits in row-major order.
    pub fn bits(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit_at(i))
    }

    /// Bitwise XOR into a new matrix. Both operands must have the same shape.
    pub fn xor(&self, other: &BitMatrix) -> Result<BitMatrix> {
        let mut result = self.clone();
        result.xor_assign(other)?;
        Ok(result)
    }

    /// In-place bitwise XOR. Both operands must have the same shape.
    pub fn xor_assign(&mut self, other: &BitMatrix) -> Result<()> {
        self.check_same_shape(other)?;
        xor_bytes(&mut self.data, &other.data);
        Ok(())
    }

    /// Same as [`xor`](Self::xor), splitting large buffers across rayon.
    pub fn xor_parallel(&self, other: &BitMatrix) -> Result<BitMatrix> {
        let mut result = self.clone();
        result.xor_assign_parallel(other)?;
        Ok(result)
    }

    /// Same as [`xor_assign`](Self::xor_assign), splitting large buffers
    /// across rayon. Buffers below `SGF_PARALLEL_MIN_BYTES` run inline.
    pub fn xor_assign_parallel(&mut self, other: &BitMatrix) -> Result<()> {
        self.check_same_shape(other)?;
        if self.data.len() < config::parallel_min_bytes() {
            xor_bytes(&mut self.data, &other.data);
            return Ok(());
        }
        self.data
            .par_chunks_mut(PAR_CHUNK_BYTES)
            .zip(other.data.par_chunks(PAR_CHUNK_BYTES))
            .for_each(|(dst, src)| xor_bytes(dst, src));
        Ok(())
    }

    /// Shrink the matrix in place by nearest-sample selection.
    ///
    /// New shape is `(rows / v_scale, cols / h_scale)`; trailing rows and
    /// columns that do not fill a whole block are dropped. Bit `(r, c)` of
    /// the result is the source bit `(r * v_scale, c * h_scale)`.
    pub fn downsample(&mut self, h_scale: usize, v_scale: usize) -> Result<()> {
        if h_scale == 0 || v_scale == 0 {
            return Err(SgfError::InvalidScale { h_scale, v_scale });
        }

        let new_rows = self.rows / v_scale;
        let new_cols = self.cols / h_scale;
        let mut result = BitMatrix::new(new_rows, new_cols);

        for row in 0..new_rows {
            let src_row = row * v_scale;
            for col in 0..new_cols {
                if self.bit_at(src_row * self.cols + col * h_scale) {
                    result.put(row * new_cols + col, true);
                }
            }
        }

        *self = result;
        Ok(())
    }

    /// Read-only window at `(start_row, start_col)` of `sub_rows x sub_cols`.
    pub fn view(
        &self,
        start_row: usize,
        start_col: usize,
        sub_rows: usize,
        sub_cols: usize,
    ) -> SubMatrixView<'_> {
        SubMatrixView::new(self, start_row, start_col, sub_rows, sub_cols)
    }

    /// Writable window at `(start_row, start_col)` of `sub_rows x sub_cols`.
    pub fn view_mut(
        &mut self,
        start_row: usize,
        start_col: usize,
        sub_rows: usize,
        sub_cols: usize,
    ) -> SubMatrixViewMut<'_> {
        SubMatrixViewMut::new(self, start_row, start_col, sub_rows, sub_cols)
    }

    /// Bytes needed to export the whole frame.
    pub fn packed_len(&self) -> usize {
        packed_len(self.len())
    }

    /// Pack the whole frame into `dest`, row-major, LSB-first.
    ///
    /// Returns the number of bytes written.
    pub fn copy_data_to(&self, dest: &mut [u8]) -> Result<usize> {
        self.view(0, 0, self.rows, self.cols).copy_data_to(dest)
    }

    /// Pack the whole frame into a fresh buffer.
    pub fn to_packed_bytes(&self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.packed_len()];
        self.copy_data_to(&mut out)?;
        Ok(out)
    }

    // ── Internal ─────────────────────────────────────────────────

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(SgfError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub(crate) fn bit_at(&self, index: usize) -> bool {
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    fn put(&mut self, index: usize, value: bool) {
        let mask = 1u8 << (index % 8);
        if value {
            self.data[index / 8] |= mask;
        } else {
            self.data[index / 8] &= !mask;
        }
    }

    fn check_same_shape(&self, other: &BitMatrix) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(SgfError::DimensionMismatch {
                expected: (self.rows, self.cols),
                actual: (other.rows, other.cols),
            });
        }
        Ok(())
    }

    /// Zero the padding bits of the last byte.
    fn mask_tail(&mut self) {
        let used = self.len() % 8;
        if used != 0 {
            if let Some(last) = self.data.last_mut() {
                *last &= (1u8 << used) - 1;
            }
        }
    }
}

fn xor_bytes(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Renders one line per row, bits as `0`/`1` separated by spaces.
impl fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    f.write_str(" ")?;
                }
                let bit = self.bit_at(row * self.cols + col);
                f.write_str(if bit { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
