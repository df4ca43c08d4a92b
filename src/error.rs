//! Error types shared by the matrix, view and codec layers.
//!
//! Every fallible operation returns `Result<T, SgfError>`. Bounds, dimension
//! and state checks are always enforced, in release builds too.

use thiserror::Error;

/// The canonical error type for this crate.
#[derive(Debug, Error)]
pub enum SgfError {
    // ── Precondition violations ──────────────────────────────────
    /// A `(row, col)` coordinate fell outside the addressed matrix or view.
    #[error("bit ({row}, {col}) out of bounds for {rows}x{cols}")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A downsampling factor was zero.
    #[error("invalid downsample scale h={h_scale} v={v_scale} (both must be > 0)")]
    InvalidScale { h_scale: usize, v_scale: usize },

    /// Run-length widths outside the supported range.
    #[error("invalid rle config: {0}")]
    InvalidConfig(&'static str),

    /// `rows * cols` does not fit in `usize`.
    #[error("dimensions {rows}x{cols} overflow the addressable bit count")]
    DimensionOverflow { rows: usize, cols: usize },

    /// The bit sequence is too long for the configured size field.
    #[error("bit count {len} does not fit the size field (max {max})")]
    LengthOverflow { len: usize, max: u64 },

    // ── Shape errors ─────────────────────────────────────────────
    /// Two operands (or a frame and a codec) disagree on dimensions.
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A flat bit sequence does not hold exactly `rows * cols` bits.
    #[error("length mismatch: expected {expected} bits, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A destination or source buffer is smaller than the packed data.
    #[error("buffer overrun: need {required} bytes, have {available}")]
    BufferOverrun { required: usize, available: usize },

    // ── Codec state ──────────────────────────────────────────────
    /// `encode`/`decode` called before `set_initial_frame`.
    #[error("codec has no baseline frame (call set_initial_frame first)")]
    Uninitialized,

    /// Decoded bit count differs from the expected frame size.
    #[error("desync: expected {expected} bits, stream carries {actual}")]
    Desync { expected: usize, actual: usize },

    /// The byte stream is not a well-formed run-length stream.
    #[error("malformed stream: {0}")]
    Malformed(&'static str),

    // ── File helpers ─────────────────────────────────────────────
    /// Loading or saving a frame image failed.
    #[cfg(feature = "image")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Coarse classification of [`SgfError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad argument: bounds, scale factors, widths, lengths.
    PreconditionViolation,
    /// Operands of different shapes.
    DimensionMismatch,
    /// Buffer too small for packed data.
    BufferOverrun,
    /// Operation not valid in the codec's current state.
    State,
    /// Encoder and decoder baselines have likely diverged.
    Desync,
    /// Bytes that could not have come from the encoder.
    MalformedStream,
    /// File or image I/O.
    Io,
}

impl SgfError {
    /// Which taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SgfError::OutOfBounds { .. }
            | SgfError::InvalidScale { .. }
            | SgfError::InvalidConfig(_)
            | SgfError::DimensionOverflow { .. }
            | SgfError::LengthOverflow { .. } => ErrorKind::PreconditionViolation,
            SgfError::DimensionMismatch { .. } | SgfError::LengthMismatch { .. } => {
                ErrorKind::DimensionMismatch
            }
            SgfError::BufferOverrun { .. } => ErrorKind::BufferOverrun,
            SgfError::Uninitialized => ErrorKind::State,
            SgfError::Desync { .. } => ErrorKind::Desync,
            SgfError::Malformed(_) => ErrorKind::MalformedStream,
            #[cfg(feature = "image")]
            SgfError::Image(_) => ErrorKind::Io,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SgfError>;
