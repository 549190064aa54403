//! Bounds-checked sequential reader over a byte buffer
//!
//! All multi-byte values are little-endian. A read that would run past the end
//! of the buffer fails with [`DecodeError::Truncated`] and leaves the position
//! unchanged.

use crate::error::{DecodeError, DecodeResult};

/// Sequential little-endian reader over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Total buffer length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check that `n` more bytes are available without consuming them.
    ///
    /// Decoders call this before sizing a bulk allocation from a count read
    /// out of the file.
    pub fn ensure(&self, n: usize) -> DecodeResult<()> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                requested: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them
    pub fn read_bytes(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Advance by `n` bytes without interpreting them
    pub fn skip(&mut self, n: usize) -> DecodeResult<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Read `N` consecutive f32 values
    pub fn read_f32s<const N: usize>(&mut self) -> DecodeResult<[f32; N]> {
        let mut out = [0.0f32; N];
        for value in &mut out {
            *value = self.read_f32()?;
        }
        Ok(out)
    }

    /// Read exactly `len` bytes as UTF-8, cut at the first NUL if present.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn read_string(&mut self, len: usize) -> DecodeResult<String> {
        self.read_bytes(len).map(text_before_nul)
    }

    /// Read a u16 byte length followed by that many string bytes
    pub fn read_length_prefixed_string(&mut self) -> DecodeResult<String> {
        self.read_length_prefixed_bytes().map(text_before_nul)
    }

    /// Read a u16 byte length followed by that many raw bytes, padding included
    pub fn read_length_prefixed_bytes(&mut self) -> DecodeResult<&'a [u8]> {
        let len = self.read_u16()?;
        self.read_bytes(len as usize)
    }
}

/// UTF-8 text up to the first NUL, with invalid sequences replaced
pub(crate) fn text_before_nul(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
