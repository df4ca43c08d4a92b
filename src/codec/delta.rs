//! Stateful delta frame encoder and decoder.
//!
//! Each side keeps a private baseline frame. The encoder emits the
//! run-length coded XOR between the new frame and its baseline; the decoder
//! XORs the decoded delta back onto its own baseline.
//!
//! # Synchronization protocol
//!
//! An encoder/decoder pair stays in sync only if:
//!
//! 1. both were built for the same `(rows, cols)` and [`RleConfig`],
//! 2. both were given the same frame through `set_initial_frame`,
//! 3. every encoded message reaches the decoder exactly once, in order.
//!
//! Nothing here sequences, acknowledges or retransmits messages. A dropped,
//! duplicated or reordered message silently corrupts every later frame; the
//! only built-in detection is the bit-count check on decode. Recover by
//! calling `set_initial_frame` with a known-good frame on both sides.

use tracing::{debug, warn};

use crate::codec::rle::{RleConfig, RunLengthCodec};
use crate::error::{Result, SgfError};
use crate::models::BitMatrix;
use crate::models::matrix::bit_count;

/// Shape, codec and baseline shared by both roles.
#[derive(Debug, Clone)]
struct Baseline {
    rows: usize,
    cols: usize,
    codec: RunLengthCodec,
    latest: Option<BitMatrix>,
}

impl Baseline {
    fn new(rows: usize, cols: usize, config: RleConfig) -> Result<Self> {
        let codec = RunLengthCodec::new(config);
        codec.check_len(bit_count(rows, cols)?)?;
        Ok(Self {
            rows,
            cols,
            codec,
            latest: None,
        })
    }

    fn check_shape(&self, frame: &BitMatrix) -> Result<()> {
        if frame.rows() != self.rows || frame.cols() != self.cols {
            return Err(SgfError::DimensionMismatch {
                expected: (self.rows, self.cols),
                actual: (frame.rows(), frame.cols()),
            });
        }
        Ok(())
    }

    fn set(&mut self, frame: &BitMatrix) -> Result<()> {
        self.check_shape(frame)?;
        match &mut self.latest {
            Some(latest) => latest.clone_from(frame),
            None => self.latest = Some(frame.clone()),
        }
        Ok(())
    }
}

// ── DeltaEncoder ─────────────────────────────────────────────────

/// Sender side: turns frames into delta messages.
#[derive(Debug, Clone)]
pub struct DeltaEncoder {
    state: Baseline,
    parallel: bool,
    frames_encoded: u64,
}

impl DeltaEncoder {
    /// Encoder for `rows x cols` frames with the default widths.
    ///
    /// The default 16-bit size header caps a frame at 65535 bits; larger
    /// shapes fail with [`SgfError::LengthOverflow`].
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_config(rows, cols, RleConfig::default())
    }

    /// Encoder for `rows x cols` frames with explicit widths.
    ///
    /// Fails if `rows * cols` does not fit the size header of `config`.
    pub fn with_config(rows: usize, cols: usize, config: RleConfig) -> Result<Self> {
        Ok(Self {
            state: Baseline::new(rows, cols, config)?,
            parallel: false,
            frames_encoded: 0,
        })
    }

    /// Compute deltas with rayon for large frames.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Store `frame` as the baseline. Valid in any state.
    pub fn set_initial_frame(&mut self, frame: &BitMatrix) -> Result<()> {
        self.state.set(frame)?;
        debug!(rows = self.state.rows, cols = self.state.cols, "encoder baseline set");
        Ok(())
    }

    /// Encode `frame` against the baseline, then make it the new baseline.
    ///
    /// On error the baseline is left untouched.
    pub fn encode(&mut self, frame: &BitMatrix) -> Result<Vec<u8>> {
        let latest = self.state.latest.as_ref().ok_or(SgfError::Uninitialized)?;
        self.state.check_shape(frame)?;

        let delta = if self.parallel {
            latest.xor_parallel(frame)?
        } else {
            latest.xor(frame)?
        };
        let bytes = self.state.codec.encode(delta.bits())?;

        self.state.set(frame)?;
        self.frames_encoded += 1;
        debug!(
            frame = self.frames_encoded,
            changed_bits = delta.count_ones(),
            bytes = bytes.len(),
            "encoded delta frame"
        );
        Ok(bytes)
    }

    /// Drop the baseline, returning to the uninitialized state.
    pub fn reset(&mut self) {
        self.state.latest = None;
    }

    /// True once a baseline has been set
    pub fn is_synced(&self) -> bool {
        self.state.latest.is_some()
    }

    /// Current baseline, if any
    pub fn latest_frame(&self) -> Option<&BitMatrix> {
        self.state.latest.as_ref()
    }

    /// Configured frame rows
    pub fn rows(&self) -> usize {
        self.state.rows
    }

    /// Configured frame columns
    pub fn cols(&self) -> usize {
        self.state.cols
    }

    /// Wire widths in use
    pub fn config(&self) -> RleConfig {
        self.state.codec.config()
    }

    /// Frames successfully encoded so far
    pub fn frames_encoded(&self) -> u64 {
        self.frames_encoded
    }
}

// ── DeltaDecoder ─────────────────────────────────────────────────

/// Receiver side: rebuilds frames from delta messages.
#[derive(Debug, Clone)]
pub struct DeltaDecoder {
    state: Baseline,
    frames_decoded: u64,
}

impl DeltaDecoder {
    /// Decoder for `rows x cols` frames with the default widths.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_config(rows, cols, RleConfig::default())
    }

    /// Decoder for `rows x cols` frames with explicit widths.
    ///
    /// Same size limit as [`DeltaEncoder::with_config`].
    pub fn with_config(rows: usize, cols: usize, config: RleConfig) -> Result<Self> {
        Ok(Self {
            state: Baseline::new(rows, cols, config)?,
            frames_decoded: 0,
        })
    }

    /// Store `frame` as the baseline. Valid in any state.
    pub fn set_initial_frame(&mut self, frame: &BitMatrix) -> Result<()> {
        self.state.set(frame)?;
        debug!(rows = self.state.rows, cols = self.state.cols, "decoder baseline set");
        Ok(())
    }

    /// Apply a delta message to the baseline and return the new frame.
    ///
    /// A stream whose bit count differs from `rows * cols` fails with
    /// [`SgfError::Desync`]. On error the baseline is left untouched.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<BitMatrix> {
        let Baseline {
            rows,
            cols,
            codec,
            latest,
        } = &mut self.state;
        let latest = latest.as_mut().ok_or(SgfError::Uninitialized)?;

        let delta_bits = codec
            .decode_expecting(bytes, *rows * *cols)
            .inspect_err(|e| warn!(error = %e, bytes = bytes.len(), "rejecting delta frame"))?;
        let delta = BitMatrix::from_bits(*rows, *cols, delta_bits)?;

        latest.xor_assign(&delta)?;
        self.frames_decoded += 1;
        debug!(
            frame = self.frames_decoded,
            changed_bits = delta.count_ones(),
            bytes = bytes.len(),
            "decoded delta frame"
        );
        Ok(latest.clone())
    }

    /// Drop the baseline, returning to the uninitialized state.
    pub fn reset(&mut self) {
        self.state.latest = None;
    }

    /// True once a baseline has been set
    pub fn is_synced(&self) -> bool {
        self.state.latest.is_some()
    }

    /// Current baseline, if any
    pub fn latest_frame(&self) -> Option<&BitMatrix> {
        self.state.latest.as_ref()
    }

    /// Configured frame rows
    pub fn rows(&self) -> usize {
        self.state.rows
    }

    /// Configured frame columns
    pub fn cols(&self) -> usize {
        self.state.cols
    }

    /// Wire widths in use
    pub fn config(&self) -> RleConfig {
        self.state.codec.config()
    }

    /// Frames successfully decoded so far
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }
}

// ── Tests ────────────────────────────────────────────────────────
