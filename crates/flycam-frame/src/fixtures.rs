//! Wire-message builders shared by unit and integration tests.
#![allow(dead_code)]

use jpeg_encoder::{ColorType, Encoder};

const PACKED_HEADER_SIZE: usize = 21;
const META_NAME_LEN: usize = 8;
const META_ENTRY_SIZE: usize = 12;
const EMBEDDED_META_CAPACITY: usize = 256;

/// Pack `pixels` LSB-first using the first `count` channels at `depths`,
/// keeping the high bits of each 8-bit sample.
pub fn pack_bits(pixels: &[[u8; 3]], count: usize, depths: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut filled: u32 = 0;

    for pixel in pixels {
        for ch in 0..count {
            let depth = u32::from(depths[ch]);
            if depth == 0 {
                continue;
            }
            let sample = u32::from(pixel[ch]) >> (8 - depth);
            acc |= sample << filled;
            filled += depth;
            while filled >= 8 {
                out.push((acc & 0xff) as u8);
                acc >>= 8;
                filled -= 8;
            }
        }
    }
    if filled > 0 {
        out.push((acc & 0xff) as u8);
    }
    out
}

fn encode_entry(out: &mut Vec<u8>, name: &str, value: f32) {
    let mut field = [0u8; META_NAME_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(META_NAME_LEN);
    field[..len].copy_from_slice(&bytes[..len]);
    out.extend_from_slice(&field);
    out.extend_from_slice(&value.to_le_bytes());
}

/// Full 256-slot table with `entries` in the leading slots.
pub fn metadata_table(entries: &[(&str, f32)]) -> Vec<u8> {
    let mut table = Vec::with_capacity(EMBEDDED_META_CAPACITY * META_ENTRY_SIZE);
    for (name, value) in entries.iter().take(EMBEDDED_META_CAPACITY) {
        encode_entry(&mut table, name, *value);
    }
    table.resize(EMBEDDED_META_CAPACITY * META_ENTRY_SIZE, 0);
    table
}

/// Metadata-channel message with a stated count that may differ from `entries.len()`.
pub fn metadata_message(timestamp: u32, declared_count: u32, entries: &[(&str, f32)]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + entries.len() * META_ENTRY_SIZE);
    out.extend_from_slice(&timestamp.to_le_bytes());
    out.extend_from_slice(&declared_count.to_le_bytes());
    for (name, value) in entries {
        encode_entry(&mut out, name, *value);
    }
    out
}

/// Builder for packed video messages.
#[derive(Debug, Clone)]
pub struct PackedMessage {
    timestamp: u32,
    width: u32,
    height: u32,
    channels: u8,
    bits: [u8; 3],
    compression: u8,
    image: Vec<u8>,
    table: Vec<u8>,
}

impl PackedMessage {
    pub fn new(width: u32, height: u32, channels: u8, bits: [u8; 3], image: Vec<u8>) -> Self {
        Self {
            timestamp: 0,
            width,
            height,
            channels,
            bits,
            compression: 0,
            image,
            table: metadata_table(&[]),
        }
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_metadata(mut self, entries: &[(&str, f32)]) -> Self {
        self.table = metadata_table(entries);
        self
    }

    /// Compress the image as a raw LZ4 block and set the compression flag.
    pub fn lz4(mut self) -> Self {
        self.image = lz4_flex::block::compress(&self.image);
        self.compression = 1;
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PACKED_HEADER_SIZE + self.image.len() + self.table.len());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.push(self.channels);
        out.extend_from_slice(&self.bits);
        out.push(self.compression);
        out.extend_from_slice(&(self.image.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.image);
        out.extend_from_slice(&self.table);
        out
    }
}

/// JPEG video message wrapping `jpeg` verbatim.
pub fn jpeg_message(timestamp: u32, width: u32, height: u32, jpeg: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + jpeg.len());
    out.extend_from_slice(&timestamp.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&(jpeg.len() as u32).to_le_bytes());
    out.extend_from_slice(jpeg);
    out
}

/// Encode interleaved RGB bytes as a baseline JPEG at maximum quality.
pub fn encode_jpeg(width: u16, height: u16, rgb: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    Encoder::new(&mut out, 100)
        .encode(rgb, width, height, ColorType::Rgb)
        .expect("encode test jpeg");
    out
}
