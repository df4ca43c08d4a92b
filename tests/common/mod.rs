#![allow(dead_code)]

use sparse_gray::BitMatrix;

/// Small xorshift generator so sequences are reproducible.
pub struct XorShift(pub u64);

impl XorShift {
    pub fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// `len` bits with roughly `per_mille / 1000` of them set.
    pub fn bits(&mut self, len: usize, per_mille: u64) -> Vec<bool> {
        (0..len).map(|_| self.next() % 1000 < per_mille).collect()
    }

    /// Frame with roughly `per_mille / 1000` of its bits set.
    pub fn sparse_frame(&mut self, rows: usize, cols: usize, per_mille: u64) -> BitMatrix {
        BitMatrix::from_bits(rows, cols, self.bits(rows * cols, per_mille)).unwrap()
    }

    /// Copy of `frame` with `flips` random bits toggled.
    pub fn mutate(&mut self, frame: &BitMatrix, flips: usize) -> BitMatrix {
        let mut out = frame.clone();
        for _ in 0..flips {
            let row = (self.next() as usize) % frame.rows();
            let col = (self.next() as usize) % frame.cols();
            out.toggle(row, col).unwrap();
        }
        out
    }
}
