/// Errors that can occur while decoding one wire message into a frame.
///
/// Every variant is local to the message that produced it: the message is
/// dropped and the next poll cycle proceeds normally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// A header field holds a value outside its allowed range.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The buffer is shorter than the layout it declares.
    #[error("truncated message ({actual} bytes, need {needed})")]
    TruncatedPayload { needed: usize, actual: usize },

    /// Bit unpacking would read past the end of the payload.
    #[error("channel data overflows payload at byte {byte_index} (payload {payload_len} bytes)")]
    ChannelOverflow {
        byte_index: usize,
        payload_len: usize,
    },

    /// The LZ4 or JPEG codec rejected the payload.
    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    /// Decompression succeeded but produced fewer bytes than the geometry requires.
    #[error("short frame ({actual} bytes, expected {expected})")]
    ShortFrame { expected: usize, actual: usize },

    /// The compressed image disagrees with the header's dimensions.
    #[error("dimension mismatch (header {expected_width}x{expected_height}, image {actual_width}x{actual_height})")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// `width * height` (or the derived bit count) is not addressable.
    #[error("frame dimensions overflow ({width}x{height})")]
    DimensionOverflow { width: u32, height: u32 },

    /// The frame exceeds the configured pixel limit.
    #[error("frame too large ({pixels} pixels, max {max})")]
    TooManyPixels { pixels: usize, max: usize },

    /// The compressed image uses a colour format with no RGB mapping.
    #[error("unsupported color format: {0}")]
    UnsupportedColorFormat(String),

    /// The destination pixel buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes for frame buffer")]
    AllocationFailed { bytes: usize },
}

impl DecodeError {
    /// Short machine-readable name for logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedHeader(_) => "malformed_header",
            DecodeError::TruncatedPayload { .. } => "truncated_payload",
            DecodeError::ChannelOverflow { .. } => "channel_overflow",
            DecodeError::DecompressionFailed(_) => "decompression_failed",
            DecodeError::ShortFrame { .. } => "short_frame",
            DecodeError::DimensionMismatch { .. } => "dimension_mismatch",
            DecodeError::DimensionOverflow { .. } => "dimension_overflow",
            DecodeError::TooManyPixels { .. } => "too_many_pixels",
            DecodeError::UnsupportedColorFormat(_) => "unsupported_color_format",
            DecodeError::AllocationFailed { .. } => "allocation_failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that end a receive loop.
///
/// Decode failures never surface here; they are logged and counted per
/// message. Only the transport can stop a receiver.
#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    #[error("transport error: {0}")]
    Transport(#[from] flycam_transport::TransportError),
}

impl ReceiverError {
    /// True when the publisher side has gone away.
    pub fn is_shutdown(&self) -> bool {
        matches!(
            self,
            ReceiverError::Transport(flycam_transport::TransportError::Shutdown)
        )
    }
}
