//! Bit-level run-length codec.
//!
//! Wire format, LSB-first throughout:
//!
//! ```text
//! ┌──────────────────────────────┬───────────────────────────────┐
//! │ size (size_width bits, LE)   │ run record (run_width bits) * │
//! └──────────────────────────────┴───────────────────────────────┘
//!
//! run record:  MSB = bit value | low run_width-1 bits = run length
//! ```
//!
//! Run lengths range over `1..=2^(run_width-1)`. The maximum does not fit in
//! `run_width - 1` bits, so it is written as a zero length field; a real run
//! never has length zero.

use std::iter;

use tracing::trace;

use crate::codec::bitstream::{BitReader, BitWriter};
use crate::config;
use crate::error::{Result, SgfError};

/// Field widths for the run-length wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RleConfig {
    run_width: u32,
    size_width: u32,
}

impl RleConfig {
    /// Validate and build a config.
    ///
    /// Both widths must be multiples of 8 between 8 and 64.
    pub fn new(run_width: u32, size_width: u32) -> Result<Self> {
        if run_width % 8 != 0 || !(8..=64).contains(&run_width) {
            return Err(SgfError::InvalidConfig(
                "run_width must be a multiple of 8 in 8..=64",
            ));
        }
        if size_width % 8 != 0 || !(8..=64).contains(&size_width) {
            return Err(SgfError::InvalidConfig(
                "size_width must be a multiple of 8 in 8..=64",
            ));
        }
        Ok(Self {
            run_width,
            size_width,
        })
    }

    /// Build from `SGF_RUN_WIDTH` / `SGF_SIZE_WIDTH`.
    pub fn from_env() -> Result<Self> {
        Self::new(config::run_width(), config::size_width())
    }

    /// Bits per run record
    pub fn run_width(&self) -> u32 {
        self.run_width
    }

    /// Bits in the size header
    pub fn size_width(&self) -> u32 {
        self.size_width
    }

    /// Longest run a single record can carry: `2^(run_width-1)`
    pub fn max_run(&self) -> u64 {
        1u64 << (self.run_width - 1)
    }

    /// Largest bit count the size header can declare
    pub fn max_len(&self) -> u64 {
        if self.size_width == 64 {
            u64::MAX
        } else {
            (1u64 << self.size_width) - 1
        }
    }

    fn run_bytes(&self) -> usize {
        self.run_width as usize / 8
    }

    fn size_bytes(&self) -> usize {
        self.size_width as usize / 8
    }
}

impl Default for RleConfig {
    fn default() -> Self {
        Self {
            run_width: config::DEFAULT_RUN_WIDTH,
            size_width: config::DEFAULT_SIZE_WIDTH,
        }
    }
}

/// One decoded run record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Bit value repeated by this run
    pub value: bool,
    /// Number of repetitions, `1..=max_run`
    pub len: u64,
}

/// Encoder/decoder for one [`RleConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLengthCodec {
    config: RleConfig,
}

impl RunLengthCodec {
    /// Codec for the given widths
    pub fn new(config: RleConfig) -> Self {
        Self { config }
    }

    /// Widths in use
    pub fn config(&self) -> RleConfig {
        self.config
    }

    /// Encode a bit sequence.
    ///
    /// An empty sequence produces a header-only stream.
    pub fn encode<I>(&self, bits: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = bool>,
        I::IntoIter: ExactSizeIterator,
    {
        let bits = bits.into_iter();
        let len = bits.len();
        self.check_len(len)?;

        let mut writer = BitWriter::with_capacity(self.config.size_bytes() + len / 8);
        writer.write_bits(len as u64, self.config.size_width);

        let mut records = 0usize;
        scan_runs(bits, self.config.max_run(), |value, run| {
            writer.write_bits(self.pack_record(value, run), self.config.run_width);
            records += 1;
        });

        let out = writer.into_bytes();
        trace!(bits = len, records, bytes = out.len(), "rle encoded");
        Ok(out)
    }

    /// Encode a slice of bits.
    pub fn encode_bits(&self, bits: &[bool]) -> Result<Vec<u8>> {
        self.encode(bits.iter().copied())
    }

    /// Exact size in bytes that [`encode`](Self::encode) would produce.
    pub fn encoded_len<I>(&self, bits: I) -> Result<usize>
    where
        I: IntoIterator<Item = bool>,
        I::IntoIter: ExactSizeIterator,
    {
        let bits = bits.into_iter();
        self.check_len(bits.len())?;
        let mut records = 0usize;
        scan_runs(bits, self.config.max_run(), |_, _| records += 1);
        Ok(self.config.size_bytes() + records * self.config.run_bytes())
    }

    /// Decode a stream back into bits.
    ///
    /// The sum of run lengths must equal the declared size; anything else
    /// fails with [`SgfError::Desync`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<bool>> {
        let records = self.records(bytes)?;
        let declared = records.declared_len();
        self.expand(records, declared)
    }

    /// Decode a stream that must carry exactly `expected` bits.
    ///
    /// The size header is checked before any run is expanded.
    pub fn decode_expecting(&self, bytes: &[u8], expected: usize) -> Result<Vec<bool>> {
        let records = self.records(bytes)?;
        let declared = records.declared_len();
        if declared != expected as u64 {
            return Err(SgfError::Desync {
                expected,
                actual: usize::try_from(declared).unwrap_or(usize::MAX),
            });
        }
        self.expand(records, declared)
    }

    /// Parse the header and iterate the run records of `bytes`.
    pub fn records<'a>(&self, bytes: &'a [u8]) -> Result<Records<'a>> {
        let size_bytes = self.config.size_bytes();
        if bytes.len() < size_bytes {
            return Err(SgfError::Malformed("stream shorter than size header"));
        }
        if (bytes.len() - size_bytes) % self.config.run_bytes() != 0 {
            return Err(SgfError::Malformed("trailing partial run record"));
        }

        let mut reader = BitReader::new(bytes);
        let declared = reader
            .read_bits(self.config.size_width)
            .ok_or(SgfError::Malformed("stream shorter than size header"))?;

        Ok(Records {
            reader,
            run_width: self.config.run_width,
            max_run: self.config.max_run(),
            declared,
        })
    }

    // ── Internal ─────────────────────────────────────────────────

    pub(crate) fn check_len(&self, len: usize) -> Result<()> {
        let max = self.config.max_len();
        if len as u64 > max {
            return Err(SgfError::LengthOverflow { len, max });
        }
        Ok(())
    }

    fn pack_record(&self, value: bool, run: u64) -> u64 {
        let max_run = self.config.max_run();
        // A full-capacity run wraps to a zero length field.
        let field = run & (max_run - 1);
        field | (u64::from(value) << (self.config.run_width - 1))
    }

    /// Validate the run sum against `declared`, then materialize the bits.
    ///
    /// Nothing is allocated until the records are known to add up to
    /// exactly `declared`.
    fn expand(&self, records: Records<'_>, declared: u64) -> Result<Vec<bool>> {
        let declared = usize::try_from(declared)
            .ok()
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or(SgfError::Malformed("declared size exceeds address space"))?;

        let mut total = 0u64;
        for run in records.clone() {
            total = total.saturating_add(run.len);
            if total > declared as u64 {
                break;
            }
        }
        if total != declared as u64 {
            return Err(SgfError::Desync {
                expected: declared,
                actual: usize::try_from(total).unwrap_or(usize::MAX),
            });
        }

        let mut out = Vec::new();
        out.try_reserve_exact(declared)
            .map_err(|_| SgfError::Malformed("declared size too large to allocate"))?;
        let count = records.len();
        for run in records {
            // Bounded by `declared`, which fits in usize.
            out.extend(iter::repeat_n(run.value, run.len as usize));
        }

        trace!(bits = declared, records = count, "rle decoded");
        Ok(out)
    }
}

/// Iterator over the run records of a stream.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    reader: BitReader<'a>,
    run_width: u32,
    max_run: u64,
    declared: u64,
}

impl Records<'_> {
    /// Bit count declared by the size header
    pub fn declared_len(&self) -> u64 {
        self.declared
    }
}

impl Iterator for Records<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let record = self.reader.read_bits(self.run_width)?;
        let value = (record >> (self.run_width - 1)) & 1 == 1;
        let field = record & (self.max_run - 1);
        let len = if field == 0 { self.max_run } else { field };
        Some(Run { value, len })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.reader.remaining_bits() / self.run_width as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Records<'_> {}

/// Walk `bits`, calling `emit(value, len)` for each run, splitting runs at
/// `max_run`.
fn scan_runs<I, F>(bits: I, max_run: u64, mut emit: F)
where
    I: Iterator<Item = bool>,
    F: FnMut(bool, u64),
{
    let mut current = false;
    let mut run = 0u64;

    for bit in bits {
        if run > 0 && bit != current {
            emit(current, run);
            run = 0;
        }
        current = bit;
        run += 1;
        if run == max_run {
            emit(current, run);
            run = 0;
        }
    }

    if run > 0 {
        emit(current, run);
    }
}
