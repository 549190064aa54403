//! SGA header structure and operations

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};

/// Magic number at offset 0 of every SGA file
pub const SGA_MAGIC: u32 = 0x16DA_4E5A;

/// The only SGA version this crate reads and writes
pub const SGA_VERSION: u8 = 1;

/// SGA header (5 bytes): magic u32 LE, version u8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SgaHeader {
    pub magic: u32,
    pub version: u8,
}

impl SgaHeader {
    pub const SIZE: usize = 5;

    pub fn new() -> Self {
        Self {
            magic: SGA_MAGIC,
            version: SGA_VERSION,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4] = self.version;
        bytes
    }

    /// Read and validate the header.
    ///
    /// The magic is checked before the version byte is read, so a foreign
    /// file fails with [`DecodeError::InvalidFormat`] even when it is shorter
    /// than a full header.
    pub fn read(cursor: &mut ByteCursor<'_>) -> DecodeResult<Self> {
        let magic = cursor.read_u32()?;
        if magic != SGA_MAGIC {
            return Err(DecodeError::InvalidFormat { found: magic });
        }

        let version = cursor.read_u8()?;
        if version != SGA_VERSION {
            return Err(DecodeError::UnsupportedVersion { found: version });
        }

        Ok(Self { magic, version })
    }
}

impl Default for SgaHeader {
    fn default() -> Self {
        Self::new()
    }
}
