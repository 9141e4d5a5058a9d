//! Bounds-checked reader over a header buffer.
//!
//! Every read checks the remaining length first and reports a
//! [`FormatError::Truncated`] naming the field, so no combination of
//! declared lengths can index past the end of the input.

use crate::error::FormatError;

pub(super) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(super) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub(super) const fn position(&self) -> usize {
        self.pos
    }

    const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(super) fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], FormatError> {
        let available = self.remaining();
        if len > available {
            return Err(FormatError::Truncated { field, needed: len, available });
        }

        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(super) fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    pub(super) fn u8(&mut self, field: &'static str) -> Result<u8, FormatError> {
        Ok(self.array::<1>(field)?[0])
    }

    pub(super) fn u16(&mut self, field: &'static str) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.array(field)?))
    }

    pub(super) fn u64(&mut self, field: &'static str) -> Result<u64, FormatError> {
        Ok(u64::from_le_bytes(self.array(field)?))
    }

    /// Reads a field preceded by a one-byte length.
    pub(super) fn prefixed_u8(&mut self, field: &'static str) -> Result<&'a [u8], FormatError> {
        let len = self.u8(field)?;
        self.take(usize::from(len), field)
    }

    /// Reads a field preceded by a two-byte little-endian length.
    pub(super) fn prefixed_u16(&mut self, field: &'static str) -> Result<&'a [u8], FormatError> {
        let len = self.u16(field)?;
        self.take(usize::from(len), field)
    }
}
