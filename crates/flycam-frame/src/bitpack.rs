//! Unpacking of densely bit-packed channel samples.
//!
//! Samples are stored LSB-first: the first sample occupies the low bits of
//! byte 0, and a sample that straddles a byte boundary continues in the low
//! bits of the next byte. Each channel of a pixel is read in order (red,
//! green, blue) and widened to 8 bits by left-aligning its most significant
//! bit to bit 7.

use crate::error::{DecodeError, Result};
use crate::header::ChannelLayout;
use crate::pixel::PixelOrder;

/// Unpack `out.len()` pixels from `src` as `0x00RRGGBB` values.
///
/// Channels beyond the layout's count are zero. Fails without writing past
/// `out` if the samples run off the end of `src`.
pub fn unpack_into(src: &[u8], channels: &ChannelLayout, out: &mut [u32]) -> Result<()> {
    let depths = channels.active_depths();

    if depths.iter().all(|&depth| depth == 0) {
        out.fill(0);
        return Ok(());
    }
    if depths.iter().all(|&depth| depth == 8) {
        return copy_bytes(src, depths.len(), out);
    }

    let mut cursor = BitCursor::new(src);
    for pixel in out.iter_mut() {
        let mut rgb = [0u8; 3];
        for (slot, &depth) in rgb.iter_mut().zip(depths) {
            *slot = cursor.read_sample(depth)?;
        }
        *pixel = PixelOrder::Xrgb.pack(rgb[0], rgb[1], rgb[2]);
    }
    Ok(())
}

/// Byte-aligned fast path: every active channel is 8 bits deep.
fn copy_bytes(src: &[u8], stride: usize, out: &mut [u32]) -> Result<()> {
    let needed = out.len() * stride;
    if src.len() < needed {
        return Err(DecodeError::ChannelOverflow {
            byte_index: src.len(),
            payload_len: src.len(),
        });
    }

    for (pixel, sample) in out.iter_mut().zip(src.chunks_exact(stride)) {
        let mut rgb = [0u8; 3];
        rgb[..stride].copy_from_slice(sample);
        *pixel = PixelOrder::Xrgb.pack(rgb[0], rgb[1], rgb[2]);
    }
    Ok(())
}

struct BitCursor<'a> {
    src: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitCursor<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self { src, bit_pos: 0 }
    }

    fn byte(&self, index: usize) -> Result<u16> {
        self.src
            .get(index)
            .map(|&b| u16::from(b))
            .ok_or(DecodeError::ChannelOverflow {
                byte_index: index,
                payload_len: self.src.len(),
            })
    }

    /// Read `depth` bits (0..=8) and widen them to an 8-bit intensity.
    fn read_sample(&mut self, depth: u8) -> Result<u8> {
        if depth == 0 {
            return Ok(0);
        }

        let byte_index = self.bit_pos / 8;
        let offset = (self.bit_pos % 8) as u32;
        let depth_bits = u32::from(depth);
        let mask = (1u16 << depth_bits) - 1;

        let mut value = (self.byte(byte_index)? >> offset) & mask;
        if offset + depth_bits > 8 {
            value |= (self.byte(byte_index + 1)? << (8 - offset)) & mask;
        }

        self.bit_pos += depth as usize;
        Ok((value << (8 - depth_bits)) as u8)
    }
}
