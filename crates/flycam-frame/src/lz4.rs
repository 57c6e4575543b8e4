//! LZ4 block decompression for bit-packed payloads.
//!
//! Producers compress the packed sample stream as a raw LZ4 block with no
//! size prefix; the decompressed size is derived from the header geometry.

use crate::error::{DecodeError, Result};

/// Decompress `src` into `scratch`, which is resized to exactly `expected` bytes.
///
/// A block that decodes to fewer bytes than `expected` is a short frame; one
/// that would need more space fails inside the codec.
pub fn decompress_exact<'s>(src: &[u8], expected: usize, scratch: &'s mut Vec<u8>) -> Result<&'s [u8]> {
    scratch.clear();
    if expected == 0 {
        return Ok(&scratch[..]);
    }

    scratch
        .try_reserve_exact(expected)
        .map_err(|_| DecodeError::AllocationFailed { bytes: expected })?;
    scratch.resize(expected, 0);

    let written = lz4_flex::block::decompress_into(src, &mut scratch[..])
        .map_err(|err| DecodeError::DecompressionFailed(err.to_string()))?;
    if written != expected {
        return Err(DecodeError::ShortFrame {
            expected,
            actual: written,
        });
    }

    Ok(&scratch[..])
}
