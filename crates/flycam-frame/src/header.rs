use std::fmt;

use crate::error::{DecodeError, Result};
use crate::layout;
use crate::pixel::PixelOrder;
use crate::wire::WireBuf;

/// Which wire layout a video channel carries.
///
/// Chosen when the receiver is built, never guessed from message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    /// Bit-packed samples (optionally LZ4) with a trailing 256-entry metadata table.
    #[default]
    Packed,
    /// A JPEG image; metadata arrives on a separate channel.
    Jpeg,
}

impl WireFormat {
    /// Validate `buf` and split it into header, payload and metadata regions.
    pub fn parse(self, buf: &[u8]) -> Result<Packet<'_>> {
        match self {
            WireFormat::Packed => parse_packed(buf),
            WireFormat::Jpeg => parse_jpeg(buf),
        }
    }

    /// Byte order of the `u32` pixels decoded from this format.
    pub fn pixel_order(self) -> PixelOrder {
        match self {
            WireFormat::Packed => PixelOrder::Xrgb,
            WireFormat::Jpeg => PixelOrder::Xbgr,
        }
    }

    /// Maximum metadata entries carried per update.
    pub fn metadata_capacity(self) -> usize {
        match self {
            WireFormat::Packed => layout::EMBEDDED_META_CAPACITY,
            WireFormat::Jpeg => layout::CHANNEL_META_CAPACITY,
        }
    }

    pub fn header_size(self) -> usize {
        match self {
            WireFormat::Packed => layout::PACKED_HEADER_SIZE,
            WireFormat::Jpeg => layout::JPEG_HEADER_SIZE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WireFormat::Packed => "packed",
            WireFormat::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compression applied to a bit-packed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Lz4,
}

impl Compression {
    fn from_wire(flag: u8) -> Result<Self> {
        match flag {
            layout::COMPRESSION_NONE => Ok(Compression::None),
            layout::COMPRESSION_LZ4 => Ok(Compression::Lz4),
            other => Err(DecodeError::MalformedHeader(format!(
                "unknown compression flag {other}"
            ))),
        }
    }
}

/// Declared channel count and per-channel bit depths of a packed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    count: u8,
    depths: [u8; layout::MAX_CHANNELS],
}

impl ChannelLayout {
    pub fn new(count: u8, depths: [u8; layout::MAX_CHANNELS]) -> Result<Self> {
        if count as usize > layout::MAX_CHANNELS {
            return Err(DecodeError::MalformedHeader(format!(
                "too many channels ({count}, max {})",
                layout::MAX_CHANNELS
            )));
        }
        if let Some((index, depth)) = depths
            .iter()
            .enumerate()
            .find(|(_, depth)| **depth > layout::MAX_BIT_DEPTH)
        {
            return Err(DecodeError::MalformedHeader(format!(
                "channel {index} bit depth {depth} exceeds {}",
                layout::MAX_BIT_DEPTH
            )));
        }
        Ok(Self { count, depths })
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// All three declared depths, including channels beyond `count`.
    pub fn depths(&self) -> [u8; layout::MAX_CHANNELS] {
        self.depths
    }

    /// Depths of the channels actually present in the payload.
    pub fn active_depths(&self) -> &[u8] {
        &self.depths[..self.count as usize]
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.active_depths().iter().map(|&d| u32::from(d)).sum()
    }

    /// Bytes needed to hold `pixels` packed samples: `ceil(pixels * bpp / 8)`.
    pub fn packed_len(&self, pixels: usize) -> Option<usize> {
        let bits = pixels.checked_mul(self.bits_per_pixel() as usize)?;
        Some(bits.div_ceil(8))
    }
}

/// How the payload of a video message is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Packed {
        channels: ChannelLayout,
        compression: Compression,
    },
    Jpeg,
}

/// Decoded fixed-size prefix of a video message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub timestamp: u32,
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
    pub payload_size: u32,
}

impl PacketHeader {
    /// `width * height`, rejected if the product does not fit in 32 bits.
    pub fn pixel_count(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(DecodeError::DimensionOverflow {
                width: self.width,
                height: self.height,
            })
    }
}

impl fmt::Display for PacketHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timestamp={} resolution={}x{}",
            self.timestamp, self.width, self.height
        )?;
        match self.encoding {
            Encoding::Packed {
                channels,
                compression,
            } => {
                let [r, g, b] = channels.depths();
                write!(
                    f,
                    " channels={} bits=R{r}/G{g}/B{b} compression={}",
                    channels.count(),
                    match compression {
                        Compression::None => "none",
                        Compression::Lz4 => "lz4",
                    }
                )?;
            }
            Encoding::Jpeg => f.write_str(" encoding=jpeg")?,
        }
        write!(f, " payload={} bytes", self.payload_size)
    }
}

/// A validated video message borrowing its regions from the wire buffer.
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    pub header: PacketHeader,
    pub payload: &'a [u8],
    /// Trailing metadata table, present only in [`WireFormat::Packed`].
    pub metadata: Option<&'a [u8]>,
}

/// Parse a bit-packed video message.
pub fn parse_packed(buf: &[u8]) -> Result<Packet<'_>> {
    let wire = WireBuf::new(buf);
    wire.require_len(layout::PACKED_HEADER_SIZE)?;

    let timestamp = wire.read_u32_le(layout::TIMESTAMP_RANGE)?;
    let width = wire.read_u32_le(layout::WIDTH_RANGE)?;
    let height = wire.read_u32_le(layout::HEIGHT_RANGE)?;
    let count = wire.read_u8(layout::PACKED_CHANNELS_OFFSET)?;
    let bits = wire.read_slice(layout::PACKED_BITS_RANGE)?;
    let compression = wire.read_u8(layout::PACKED_COMPRESSION_OFFSET)?;
    let payload_size = wire.read_u32_le(layout::PACKED_IMAGE_SIZE_RANGE)?;

    let channels = ChannelLayout::new(count, [bits[0], bits[1], bits[2]])?;
    let compression = Compression::from_wire(compression)?;

    let header = PacketHeader {
        timestamp,
        width,
        height,
        encoding: Encoding::Packed {
            channels,
            compression,
        },
        payload_size,
    };
    header.pixel_count()?;

    let payload_end = layout::PACKED_HEADER_SIZE
        .checked_add(payload_size as usize)
        .ok_or_else(|| payload_overflow(payload_size))?;
    let expected = payload_end
        .checked_add(layout::EMBEDDED_META_SIZE)
        .ok_or_else(|| payload_overflow(payload_size))?;
    wire.require_len(expected)?;

    Ok(Packet {
        header,
        payload: wire.read_slice(layout::PACKED_HEADER_SIZE..payload_end)?,
        metadata: Some(wire.read_slice(payload_end..expected)?),
    })
}

/// Parse a JPEG video message.
pub fn parse_jpeg(buf: &[u8]) -> Result<Packet<'_>> {
    let wire = WireBuf::new(buf);
    wire.require_len(layout::JPEG_HEADER_SIZE)?;

    let header = PacketHeader {
        timestamp: wire.read_u32_le(layout::TIMESTAMP_RANGE)?,
        width: wire.read_u32_le(layout::WIDTH_RANGE)?,
        height: wire.read_u32_le(layout::HEIGHT_RANGE)?,
        encoding: Encoding::Jpeg,
        payload_size: wire.read_u32_le(layout::JPEG_SIZE_RANGE)?,
    };
    header.pixel_count()?;

    let expected = layout::JPEG_HEADER_SIZE
        .checked_add(header.payload_size as usize)
        .ok_or_else(|| payload_overflow(header.payload_size))?;
    wire.require_len(expected)?;

    Ok(Packet {
        header,
        payload: wire.read_slice(layout::JPEG_HEADER_SIZE..expected)?,
        metadata: None,
    })
}

fn payload_overflow(payload_size: u32) -> DecodeError {
    DecodeError::MalformedHeader(format!("payload size {payload_size} is not addressable"))
}
