//! Wire codecs
//!
//! - `bitstream`: LSB-first bit reader/writer
//! - `rle`: bit-level run-length codec with a size header
//! - `delta`: stateful XOR-delta frame encoder/decoder on top of `rle`

pub mod bitstream;
pub mod delta;
pub mod rle;

pub use delta::{DeltaDecoder, DeltaEncoder};
pub use rle::{Records, RleConfig, Run, RunLengthCodec};
