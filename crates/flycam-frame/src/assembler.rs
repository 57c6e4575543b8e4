//! Turns validated wire messages into displayable frames.
//!
//! The assembler owns the decoder state that outlives a single message: the
//! current geometry, the metadata cache, and a scratch buffer reused for LZ4
//! output. Each [`FrameAssembler::assemble`] call either yields a complete
//! frame or fails without touching the cache.

use tracing::{debug, info};

use crate::bitpack;
use crate::error::{DecodeError, Result};
use crate::header::{Compression, Encoding, PacketHeader, WireFormat};
use crate::jpeg;
use crate::lz4;
use crate::metadata::{self, MetadataCache, MetadataEntry};
use crate::pixel::PixelOrder;

/// Largest frame decoded by default: 64 Mi pixels (256 MiB of `u32`).
pub const DEFAULT_MAX_PIXELS: usize = 64 * 1024 * 1024;

/// Limits applied before any pixel buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub max_pixels: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// One fully decoded video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    timestamp: u32,
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    pixel_order: PixelOrder,
    wire_size: usize,
    metadata: Vec<MetadataEntry>,
}

impl DecodedFrame {
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels, `width * height` long, in [`Self::pixel_order`].
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    pub fn pixel_order(&self) -> PixelOrder {
        self.pixel_order
    }

    /// Size of the wire message the frame came from.
    pub fn wire_size(&self) -> usize {
        self.wire_size
    }

    /// Metadata in effect when the frame was decoded.
    pub fn metadata(&self) -> &[MetadataEntry] {
        &self.metadata
    }

    pub fn metadata_value(&self, name: &str) -> Option<f32> {
        self.metadata
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value)
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblerState {
    Idle,
    Active { width: u32, height: u32 },
}

/// Decodes video messages of one [`WireFormat`].
#[derive(Debug)]
pub struct FrameAssembler {
    format: WireFormat,
    config: DecoderConfig,
    state: AssemblerState,
    metadata: MetadataCache,
    scratch: Vec<u8>,
}

impl FrameAssembler {
    pub fn new(format: WireFormat) -> Self {
        Self::with_config(format, DecoderConfig::default())
    }

    pub fn with_config(format: WireFormat, config: DecoderConfig) -> Self {
        Self {
            format,
            config,
            state: AssemblerState::Idle,
            metadata: MetadataCache::new(),
            scratch: Vec::new(),
        }
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Dimensions of the last decoded frame, if any.
    pub fn geometry(&self) -> Option<(u32, u32)> {
        match self.state {
            AssemblerState::Idle => None,
            AssemblerState::Active { width, height } => Some((width, height)),
        }
    }

    pub fn metadata(&self) -> &MetadataCache {
        &self.metadata
    }

    /// Apply a metadata-channel message to the cache.
    ///
    /// Returns the number of entries now cached. A malformed message leaves
    /// the previous set in place.
    pub fn apply_metadata(&mut self, buf: &[u8]) -> Result<usize> {
        let kept = self.metadata.apply_message(buf)?;
        debug!(entries = kept, "metadata updated");
        Ok(kept)
    }

    /// Decode one video message into a frame.
    pub fn assemble(&mut self, buf: &[u8]) -> Result<DecodedFrame> {
        let packet = self.format.parse(buf)?;
        let header = packet.header;
        let pixel_count = header.pixel_count()?;
        if pixel_count > self.config.max_pixels {
            return Err(DecodeError::TooManyPixels {
                pixels: pixel_count,
                max: self.config.max_pixels,
            });
        }

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(pixel_count)
            .map_err(|_| DecodeError::AllocationFailed {
                bytes: pixel_count.saturating_mul(std::mem::size_of::<u32>()),
            })?;
        pixels.resize(pixel_count, 0);

        match header.encoding {
            Encoding::Packed {
                channels,
                compression,
            } => {
                let expected = channels
                    .packed_len(pixel_count)
                    .ok_or(DecodeError::DimensionOverflow {
                        width: header.width,
                        height: header.height,
                    })?;
                let samples = match compression {
                    Compression::None => packet.payload,
                    Compression::Lz4 => {
                        lz4::decompress_exact(packet.payload, expected, &mut self.scratch)?
                    }
                };
                bitpack::unpack_into(samples, &channels, &mut pixels)?;

                if let Some(table) = packet.metadata {
                    let entries = metadata::decode_table(table)?;
                    self.metadata.replace(entries, Some(header.timestamp));
                }
            }
            Encoding::Jpeg => {
                jpeg::decode_into(packet.payload, header.width, header.height, &mut pixels)?;
            }
        }

        self.observe_geometry(&header);

        Ok(DecodedFrame {
            timestamp: header.timestamp,
            width: header.width,
            height: header.height,
            pixels,
            pixel_order: self.format.pixel_order(),
            wire_size: buf.len(),
            metadata: self.metadata.snapshot(),
        })
    }

    fn observe_geometry(&mut self, header: &PacketHeader) {
        let next = AssemblerState::Active {
            width: header.width,
            height: header.height,
        };
        if self.state != next {
            info!(format = %self.format, "{header}");
            self.state = next;
        }
    }
}
