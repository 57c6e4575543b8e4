/// Channel placement inside a decoded `u32` pixel.
///
/// Each wire format keeps the byte order its producers emit; display
/// consumers select the matching surface format instead of converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOrder {
    /// `0x00RRGGBB`: red in bits 16..24 (bit-packed frames).
    Xrgb,
    /// `0x00BBGGRR`: red in the low byte (JPEG frames).
    Xbgr,
}

impl PixelOrder {
    #[inline]
    pub fn pack(self, r: u8, g: u8, b: u8) -> u32 {
        let (r, g, b) = (u32::from(r), u32::from(g), u32::from(b));
        match self {
            PixelOrder::Xrgb => (r << 16) | (g << 8) | b,
            PixelOrder::Xbgr => r | (g << 8) | (b << 16),
        }
    }

    /// Split a pixel back into `[r, g, b]`.
    #[inline]
    pub fn unpack(self, pixel: u32) -> [u8; 3] {
        let [lo, mid, hi, _] = pixel.to_le_bytes();
        match self {
            PixelOrder::Xrgb => [hi, mid, lo],
            PixelOrder::Xbgr => [lo, mid, hi],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xrgb_places_red_high() {
        assert_eq!(PixelOrder::Xrgb.pack(0x12, 0x34, 0x56), 0x0012_3456);
    }

    #[test]
    fn xbgr_places_red_low() {
        assert_eq!(PixelOrder::Xbgr.pack(0x12, 0x34, 0x56), 0x0056_3412);
    }

    #[test]
    fn unpack_inverts_pack() {
        for order in [PixelOrder::Xrgb, PixelOrder::Xbgr] {
            let px = order.pack(200, 100, 3);
            assert_eq!(order.unpack(px), [200, 100, 3]);
        }
    }
}
