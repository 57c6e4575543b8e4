use std::ops::Range;

use crate::error::{DecodeError, Result};

/// Bounds-checked little-endian reads over a borrowed wire buffer.
pub(crate) struct WireBuf<'a> {
    buf: &'a [u8],
}

impl<'a> WireBuf<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn require_len(&self, needed: usize) -> Result<()> {
        if self.buf.len() < needed {
            return Err(DecodeError::TruncatedPayload {
                needed,
                actual: self.buf.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn read_u8(&self, offset: usize) -> Result<u8> {
        self.buf
            .get(offset)
            .copied()
            .ok_or(DecodeError::TruncatedPayload {
                needed: offset + 1,
                actual: self.buf.len(),
            })
    }

    pub(crate) fn read_u32_le(&self, range: Range<usize>) -> Result<u32> {
        let bytes: [u8; 4] = self
            .read_slice(range.clone())?
            .try_into()
            .map_err(|_| DecodeError::TruncatedPayload {
                needed: range.start + 4,
                actual: self.buf.len(),
            })?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub(crate) fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8]> {
        self.buf
            .get(range.clone())
            .ok_or(DecodeError::TruncatedPayload {
                needed: range.end,
                actual: self.buf.len(),
            })
    }
}
