use jpeg_decoder::{Decoder, PixelFormat};

use crate::error::{DecodeError, Result};
use crate::pixel::PixelOrder;

/// Decode a JPEG payload into `out` as `0x00BBGGRR` pixels.
///
/// The image's own dimensions are checked against `width`/`height` before
/// any pixel data is decoded. `out` must hold exactly `width * height` pixels.
pub fn decode_into(data: &[u8], width: u32, height: u32, out: &mut [u32]) -> Result<()> {
    let mut decoder = Decoder::new(data);
    decoder
        .read_info()
        .map_err(|err| DecodeError::DecompressionFailed(err.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| DecodeError::DecompressionFailed("missing image info".to_string()))?;

    let (actual_width, actual_height) = (u32::from(info.width), u32::from(info.height));
    if actual_width != width || actual_height != height {
        return Err(DecodeError::DimensionMismatch {
            expected_width: width,
            expected_height: height,
            actual_width,
            actual_height,
        });
    }

    let stride = match info.pixel_format {
        PixelFormat::RGB24 => 3,
        PixelFormat::L8 => 1,
        other => {
            return Err(DecodeError::UnsupportedColorFormat(format!("{other:?}")));
        }
    };

    let decoded = decoder
        .decode()
        .map_err(|err| DecodeError::DecompressionFailed(err.to_string()))?;

    let row_bytes = width as usize * stride;
    let expected = row_bytes * height as usize;
    if decoded.len() < expected || out.len() != width as usize * height as usize {
        return Err(DecodeError::ShortFrame {
            expected,
            actual: decoded.len(),
        });
    }
    if row_bytes == 0 {
        return Ok(());
    }

    let order = PixelOrder::Xbgr;
    for (src_row, dst_row) in decoded
        .chunks_exact(row_bytes)
        .zip(out.chunks_exact_mut(width as usize))
    {
        for (dst, sample) in dst_row.iter_mut().zip(src_row.chunks_exact(stride)) {
            *dst = match sample {
                [r, g, b] => order.pack(*r, *g, *b),
                [l] => order.pack(*l, *l, *l),
                _ => 0,
            };
        }
    }
    Ok(())
}
