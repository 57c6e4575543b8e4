//! Live video receiver for flycam camera streams.
//!
//! flycam subscribes to a camera's video channel (and, for JPEG deployments,
//! its metadata channel), decodes each message into a `u32` pixel frame and
//! pairs it with the newest camera metadata.
//!
//! # Crate Structure
//!
//! - [`transport`]: subscription abstraction, in-process channel, ZeroMQ
//!   backend (behind the `zmq` feature)
//! - [`frame`]: wire parsing, bit unpacking, LZ4/JPEG decoding, metadata
//!   cache and the [`Receiver`] loop

/// Re-export transport types.
pub mod transport {
    pub use flycam_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use flycam_frame::*;
}

pub use flycam_frame::{
    DecodeError, DecodedFrame, MetadataEntry, PixelOrder, Receiver, ReceiverConfig, ReceiverError,
    WireFormat,
};
