//! Wire-format parsing and pixel decoding for flycam video.
//!
//! A video message is turned into a frame in three steps:
//! - the header is validated against the buffer for the configured
//!   [`WireFormat`] (bit-packed or JPEG), never sniffed from content
//! - the payload is decoded into `u32` pixels (LZ4 + bit unpacking, or JPEG)
//! - metadata, embedded or from a separate channel, is attached from the cache
//!
//! Malformed messages are rejected with a [`DecodeError`] and never take the
//! receive loop down; [`Receiver`] logs them and moves on.

pub mod assembler;
pub mod bitpack;
pub mod error;
pub mod header;
pub mod jpeg;
pub mod layout;
pub mod lz4;
pub mod metadata;
pub mod pixel;
pub mod reader;
pub mod receiver;
pub mod throughput;

mod wire;

#[cfg(test)]
mod fixtures;

pub use assembler::{DecodedFrame, DecoderConfig, FrameAssembler, DEFAULT_MAX_PIXELS};
pub use error::{DecodeError, ReceiverError, Result};
pub use header::{ChannelLayout, Compression, Encoding, Packet, PacketHeader, WireFormat};
pub use metadata::{MetadataCache, MetadataEntry, MetadataMessage};
pub use pixel::PixelOrder;
pub use reader::WireReader;
pub use receiver::{Receiver, ReceiverConfig, ReceiverStats, DEFAULT_POLL_TIMEOUT};
pub use throughput::{Throughput, ThroughputReport};
