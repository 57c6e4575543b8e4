//! Byte offsets and sizes of the flycam wire formats.
//!
//! Packed (bit-packed video with a trailing metadata table):
//! ```text
//! ┌───────────┬───────┬────────┬──────────┬─────────┬─────────────┬────────────┬────────────┬───────────────────┐
//! │ timestamp │ width │ height │ channels │ bits[3] │ compression │ image_size │ image_data │ metadata table    │
//! │ u32 LE    │ u32   │ u32    │ u8       │ u8 × 3  │ u8 (0|1)    │ u32 LE     │ image_size │ 256 × (8B + f32)  │
//! └───────────┴───────┴────────┴──────────┴─────────┴─────────────┴────────────┴────────────┴───────────────────┘
//! ```
//!
//! Jpeg video (metadata arrives on its own channel):
//! ```text
//! ┌───────────┬───────┬────────┬───────────┬───────────┐
//! │ timestamp │ width │ height │ jpeg_size │ jpeg_data │
//! └───────────┴───────┴────────┴───────────┴───────────┘
//! ```
//!
//! Metadata channel message:
//! ```text
//! ┌───────────┬───────┬──────────────────────────────┐
//! │ timestamp │ count │ count × (name[8] + f32 LE)   │
//! └───────────┴───────┴──────────────────────────────┘
//! ```

use std::ops::Range;

pub const TIMESTAMP_RANGE: Range<usize> = 0..4;
pub const WIDTH_RANGE: Range<usize> = 4..8;
pub const HEIGHT_RANGE: Range<usize> = 8..12;

pub const PACKED_CHANNELS_OFFSET: usize = 12;
pub const PACKED_BITS_RANGE: Range<usize> = 13..16;
pub const PACKED_COMPRESSION_OFFSET: usize = 16;
pub const PACKED_IMAGE_SIZE_RANGE: Range<usize> = 17..21;
pub const PACKED_HEADER_SIZE: usize = 21;

pub const JPEG_SIZE_RANGE: Range<usize> = 12..16;
pub const JPEG_HEADER_SIZE: usize = 16;

pub const MAX_CHANNELS: usize = 3;
pub const MAX_BIT_DEPTH: u8 = 8;

pub const COMPRESSION_NONE: u8 = 0;
pub const COMPRESSION_LZ4: u8 = 1;

pub const META_NAME_LEN: usize = 8;
pub const META_ENTRY_SIZE: usize = META_NAME_LEN + 4;

/// Slots in the table trailing every packed video message.
pub const EMBEDDED_META_CAPACITY: usize = 256;
pub const EMBEDDED_META_SIZE: usize = EMBEDDED_META_CAPACITY * META_ENTRY_SIZE;

pub const META_TIMESTAMP_RANGE: Range<usize> = 0..4;
pub const META_COUNT_RANGE: Range<usize> = 4..8;
pub const META_HEADER_SIZE: usize = 8;
/// Entries decoded from one metadata-channel message, at most.
pub const CHANNEL_META_CAPACITY: usize = 32;
