//! LSB-first bit writer and reader for the run-length wire format.
//!
//! Multi-bit fields are little-endian: bit `i` of a value lands at stream
//! position `start + i`, and stream position `p` is bit `p % 8` of byte
//! `p / 8`.

/// Accumulates bits into a byte buffer, LSB-first.
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bytes` bytes
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: Vec::with_capacity(bytes),
            bit_len: 0,
        }
    }

    /// Number of bits written so far
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Append one bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        let byte = self.bit_len / 8;
        if byte == self.buf.len() {
            self.buf.push(0);
        }
        if bit {
            self.buf[byte] |= 1 << (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Append the low `width` bits of `value` (`width <= 64`).
    pub fn write_bits(&mut self, value: u64, width: u32) {
        debug_assert!(width <= 64);
        if self.bit_len % 8 == 0 && width % 8 == 0 {
            // Byte-aligned fast path.
            for shift in (0..width).step_by(8) {
                self.buf.push((value >> shift) as u8);
            }
            self.bit_len += width as usize;
            return;
        }
        for i in 0..width {
            self.write_bit((value >> i) & 1 == 1);
        }
    }

    /// Finish and return the bytes; a partial last byte is zero-padded.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads bits from a byte slice, LSB-first.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Start reading at bit 0 of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bits not yet consumed
    pub fn remaining_bits(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Read one bit, or `None` at end of input
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.pos / 8)?;
        let bit = (byte >> (self.pos % 8)) & 1 == 1;
        self.pos += 1;
        Some(bit)
    }

    /// Read a `width`-bit little-endian field (`width <= 64`).
    ///
    /// Returns `None` without consuming anything when fewer than `width`
    /// bits remain.
    pub fn read_bits(&mut self, width: u32) -> Option<u64> {
        debug_assert!(width <= 64);
        if self.remaining_bits() < width as usize {
            return None;
        }
        let mut value = 0u64;
        for i in 0..width {
            if self.read_bit()? {
                value |= 1 << i;
            }
        }
        Some(value)
    }
}
