//! Bounds-checked reader over an immutable byte buffer.
//!
//! Two access styles share the same checks: absolute reads (`*_at`) that
//! leave the position alone, and sequential reads that advance it. Every read
//! validates `offset + width <= len` first and fails with
//! [`DecodeError::TruncatedBuffer`] instead of wrapping or zero-filling.

use crate::error::DecodeError;

/// Byte order for multi-byte reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Endian {
    Little,
    Big,
}

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    fn truncated(&self, offset: usize, needed: usize) -> DecodeError {
        DecodeError::TruncatedBuffer {
            offset,
            needed,
            available: self.data.len().saturating_sub(offset),
        }
    }

    /// Borrow `len` bytes starting at `offset`.
    pub(crate) fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = offset
            .checked_add(len)
            .ok_or_else(|| self.truncated(offset, len))?;
        self.data
            .get(offset..end)
            .ok_or_else(|| self.truncated(offset, len))
    }

    fn array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let bytes = self.slice(offset, N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        Ok(buf)
    }

    pub(crate) fn u8_at(&self, offset: usize) -> Result<u8, DecodeError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset, 1))
    }

    pub(crate) fn u16_le_at(&self, offset: usize) -> Result<u16, DecodeError> {
        self.array_at(offset).map(u16::from_le_bytes)
    }

    pub(crate) fn u16_be_at(&self, offset: usize) -> Result<u16, DecodeError> {
        self.array_at(offset).map(u16::from_be_bytes)
    }

    pub(crate) fn u32_le_at(&self, offset: usize) -> Result<u32, DecodeError> {
        self.array_at(offset).map(u32::from_le_bytes)
    }

    pub(crate) fn u32_be_at(&self, offset: usize) -> Result<u32, DecodeError> {
        self.array_at(offset).map(u32::from_be_bytes)
    }

    pub(crate) fn u16_at(&self, offset: usize, endian: Endian) -> Result<u16, DecodeError> {
        match endian {
            Endian::Little => self.u16_le_at(offset),
            Endian::Big => self.u16_be_at(offset),
        }
    }

    pub(crate) fn u32_at(&self, offset: usize, endian: Endian) -> Result<u32, DecodeError> {
        match endian {
            Endian::Little => self.u32_le_at(offset),
            Endian::Big => self.u32_be_at(offset),
        }
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), DecodeError> {
        if pos > self.data.len() {
            return Err(self.truncated(pos, 0));
        }
        self.pos = pos;
        Ok(())
    }

    /// Relative seek forward.
    pub(crate) fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        let new_pos = self
            .pos
            .checked_add(n)
            .filter(|&p| p <= self.data.len())
            .ok_or_else(|| self.truncated(self.pos, n))?;
        self.pos = new_pos;
        Ok(())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let b = self.u8_at(self.pos)?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        let v = self.u16_le_at(self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self.slice(self.pos, n)?;
        self.pos += n;
        Ok(bytes)
    }
}
