use sparse_gray::BitMatrix;

/// Deterministic frame with roughly `per_mille / 1000` of its bits set.
pub fn sparse_frame(rows: usize, cols: usize, per_mille: u64, seed: u64) -> BitMatrix {
    let mut state = seed.max(1);
    let bits = (0..rows * cols).map(move |_| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state % 1000 < per_mille
    });
    BitMatrix::from_bits(rows, cols, bits).expect("bit count matches dimensions")
}
