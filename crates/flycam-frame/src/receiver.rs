use std::time::Duration;

use flycam_transport::{Subscriber, TransportError};
use tracing::{debug, warn};

use crate::assembler::{DecodedFrame, DecoderConfig, FrameAssembler};
use crate::error::ReceiverError;
use crate::header::WireFormat;
use crate::metadata::MetadataCache;
use crate::reader::WireReader;

/// Default wait for a video message per poll, about one display refresh.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverConfig {
    pub format: WireFormat,
    pub poll_timeout: Duration,
    pub decoder: DecoderConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            format: WireFormat::default(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            decoder: DecoderConfig::default(),
        }
    }
}

impl ReceiverConfig {
    pub fn for_format(format: WireFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }
}

/// Counters over a receiver's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Video messages received.
    pub messages: u64,
    /// Video messages decoded into frames.
    pub frames: u64,
    /// Video messages discarded by a decode error.
    pub dropped: u64,
    pub metadata_applied: u64,
    pub metadata_skipped: u64,
    /// Total size of received video messages.
    pub wire_bytes: u64,
}

/// Polls a video subscription (and, for JPEG deployments, a metadata
/// subscription) and yields decoded frames.
///
/// Metadata already queued is applied before each video poll, so a frame
/// always carries the newest metadata published at or before it.
pub struct Receiver<V, M = V> {
    video: WireReader<V>,
    meta: Option<WireReader<M>>,
    assembler: FrameAssembler,
    poll_timeout: Duration,
    stats: ReceiverStats,
}

impl<V: Subscriber> Receiver<V, V> {
    /// Receiver with no separate metadata channel.
    pub fn new(video: V, config: ReceiverConfig) -> Self {
        Self::build(video, None, config)
    }
}

impl<V: Subscriber, M: Subscriber> Receiver<V, M> {
    /// Receiver that also consumes a metadata channel.
    ///
    /// Only JPEG frames take metadata from a separate channel. Packed frames
    /// carry their own table, so for [`WireFormat::Packed`] the channel is
    /// dropped and every frame reports its embedded table.
    pub fn with_metadata(video: V, meta: M, config: ReceiverConfig) -> Self {
        let meta = match config.format {
            WireFormat::Jpeg => Some(WireReader::new(meta)),
            WireFormat::Packed => {
                warn!("packed frames embed their metadata; ignoring metadata channel");
                None
            }
        };
        Self::build(video, meta, config)
    }

    fn build(video: V, meta: Option<WireReader<M>>, config: ReceiverConfig) -> Self {
        debug!(
            format = %config.format,
            metadata_channel = meta.is_some(),
            "receiver started"
        );
        Self {
            video: WireReader::new(video),
            meta,
            assembler: FrameAssembler::with_config(config.format, config.decoder),
            poll_timeout: config.poll_timeout,
            stats: ReceiverStats::default(),
        }
    }

    /// Run one poll cycle.
    ///
    /// Returns `Ok(None)` when no video message arrived within the poll
    /// timeout or when the message failed to decode. Only transport failures
    /// are errors.
    pub fn poll_frame(&mut self) -> Result<Option<DecodedFrame>, ReceiverError> {
        self.drain_metadata();

        let Some(message) = self.video.poll(self.poll_timeout)? else {
            return Ok(None);
        };
        self.stats.messages += 1;
        self.stats.wire_bytes += message.len() as u64;

        match self.assembler.assemble(message) {
            Ok(frame) => {
                self.stats.frames += 1;
                self.video.release();
                Ok(Some(frame))
            }
            Err(err) => {
                self.stats.dropped += 1;
                warn!(kind = err.kind(), error = %err, "dropping video message");
                self.video.release();
                Ok(None)
            }
        }
    }

    /// Poll until a frame decodes or `attempts` cycles pass.
    pub fn next_frame(&mut self, attempts: usize) -> Result<Option<DecodedFrame>, ReceiverError> {
        for _ in 0..attempts {
            if let Some(frame) = self.poll_frame()? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Apply every queued metadata message.
    ///
    /// The metadata stream is best effort: its failures are logged and never
    /// end the video loop. A closed metadata channel is detached and the
    /// cache keeps its last contents.
    fn drain_metadata(&mut self) {
        let Some(meta) = self.meta.as_mut() else {
            return;
        };

        let assembler = &mut self.assembler;
        let stats = &mut self.stats;
        let drained = meta.drain(|message| match assembler.apply_metadata(message) {
            Ok(_) => stats.metadata_applied += 1,
            Err(err) => {
                stats.metadata_skipped += 1;
                warn!(kind = err.kind(), error = %err, "skipping metadata message");
            }
        });

        match drained {
            Ok(_) => {}
            Err(TransportError::Shutdown) => {
                warn!("metadata channel closed; keeping last metadata");
                self.meta = None;
            }
            Err(err) => warn!(error = %err, "metadata receive failed"),
        }
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    pub fn metadata(&self) -> &MetadataCache {
        self.assembler.metadata()
    }

    pub fn format(&self) -> WireFormat {
        self.assembler.format()
    }

    /// Last decoded frame size, if any.
    pub fn geometry(&self) -> Option<(u32, u32)> {
        self.assembler.geometry()
    }

    /// Release held messages and tear down the metadata subscription before
    /// the video subscription.
    pub fn close(mut self) {
        self.video.release();
        if let Some(mut meta) = self.meta.take() {
            meta.release();
            drop(meta);
        }
        debug!(
            frames = self.stats.frames,
            dropped = self.stats.dropped,
            "receiver closed"
        );
        drop(self.video);
    }
}

impl<V, M> std::fmt::Debug for Receiver<V, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("format", &self.assembler.format())
            .field("metadata_channel", &self.meta.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}
