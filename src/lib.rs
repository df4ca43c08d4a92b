//! sparse_gray - delta compression for sequences of 1-bit frames
//!
//! Frames (snapshots of a sparse display or sensor grid) are sent as the
//! bitwise XOR against the previous frame, compressed with a bit-level
//! run-length code. Mostly-static frames shrink to a handful of bytes.
//!
//! ```
//! use sparse_gray::{BitMatrix, DeltaDecoder, DeltaEncoder};
//!
//! let first = BitMatrix::new(4, 4);
//! let mut next = first.clone();
//! next.set_bit(1, 2, true).unwrap();
//!
//! let mut encoder = DeltaEncoder::new(4, 4).unwrap();
//! let mut decoder = DeltaDecoder::new(4, 4).unwrap();
//! encoder.set_initial_frame(&first).unwrap();
//! decoder.set_initial_frame(&first).unwrap();
//!
//! let message = encoder.encode(&next).unwrap();
//! assert_eq!(decoder.decode(&message).unwrap(), next);
//! ```
//!
//! All coordinates are `(row, col)`, row-major. Nothing here is
//! synchronized internally: share an instance across threads only behind
//! your own lock.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Wire codecs (bitstream, run-length, delta frames)
pub mod codec;
/// Environment-driven defaults
pub mod config;
/// Error types
pub mod error;
/// Core data structures (BitMatrix, sub-matrix views)
pub mod models;
/// Image file helpers
#[cfg(feature = "image")]
pub mod tools;
/// Frame acquisition helpers (binarization)
pub mod utils;

pub use codec::{DeltaDecoder, DeltaEncoder, RleConfig, Run, RunLengthCodec};
pub use error::{ErrorKind, Result, SgfError};
pub use models::{BitMatrix, SubMatrixView, SubMatrixViewMut, packed_len};
