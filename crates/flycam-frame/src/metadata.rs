//! Camera metadata: fixed-width `(name, f32)` entries.
//!
//! Packed video messages carry a 256-slot table after the image; JPEG
//! deployments publish up to 32 entries per message on a separate channel.
//! Either way, the newest successfully decoded set replaces the previous one
//! wholesale.

use tracing::trace;

use crate::error::Result;
use crate::layout;
use crate::wire::WireBuf;

/// One named camera reading, e.g. `("gain", 2.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub name: String,
    pub value: f32,
}

/// Decode one 12-byte entry. Returns `None` for an unused slot.
fn decode_entry(entry: &[u8]) -> Option<MetadataEntry> {
    let (name, value) = entry.split_at(layout::META_NAME_LEN);
    let name_len = name.iter().position(|&b| b == 0).unwrap_or(name.len());
    if name_len == 0 {
        return None;
    }

    let value: [u8; 4] = value.get(..4)?.try_into().ok()?;
    Some(MetadataEntry {
        name: String::from_utf8_lossy(&name[..name_len]).into_owned(),
        value: f32::from_le_bytes(value),
    })
}

/// Decode the fixed-capacity table trailing a packed video message.
///
/// Every slot is visited; slots whose name starts with a null byte are skipped.
pub fn decode_table(table: &[u8]) -> Result<Vec<MetadataEntry>> {
    let wire = WireBuf::new(table);
    wire.require_len(layout::EMBEDDED_META_SIZE)?;

    Ok(wire
        .read_slice(0..layout::EMBEDDED_META_SIZE)?
        .chunks_exact(layout::META_ENTRY_SIZE)
        .filter_map(decode_entry)
        .collect())
}

/// A decoded metadata-channel message.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataMessage {
    pub timestamp: u32,
    /// Count as stated on the wire, before clamping.
    pub declared_count: u32,
    pub entries: Vec<MetadataEntry>,
}

/// Decode a metadata-channel message.
///
/// The stated count is clamped to 32 entries, so at most `8 + 32 * 12`
/// bytes are ever read regardless of what the producer claims.
pub fn decode_message(buf: &[u8]) -> Result<MetadataMessage> {
    let wire = WireBuf::new(buf);
    wire.require_len(layout::META_HEADER_SIZE)?;

    let timestamp = wire.read_u32_le(layout::META_TIMESTAMP_RANGE)?;
    let declared_count = wire.read_u32_le(layout::META_COUNT_RANGE)?;
    let count = (declared_count as usize).min(layout::CHANNEL_META_CAPACITY);

    let end = layout::META_HEADER_SIZE + count * layout::META_ENTRY_SIZE;
    if wire.len() > end {
        trace!(
            declared_count,
            ignored = wire.len() - end,
            "metadata message has unread trailing bytes"
        );
    }
    let entries = wire
        .read_slice(layout::META_HEADER_SIZE..end)?
        .chunks_exact(layout::META_ENTRY_SIZE)
        .filter_map(decode_entry)
        .collect();

    Ok(MetadataMessage {
        timestamp,
        declared_count,
        entries,
    })
}

/// The most recently seen metadata set.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    entries: Vec<MetadataEntry>,
    timestamp: Option<u32>,
    generation: u64,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set.
    pub fn replace(&mut self, entries: Vec<MetadataEntry>, timestamp: Option<u32>) {
        self.entries = entries;
        self.timestamp = timestamp;
        self.generation += 1;
    }

    /// Decode a metadata-channel message and, if valid, replace the cache.
    ///
    /// On error the cache is left untouched. Returns the number of entries kept.
    pub fn apply_message(&mut self, buf: &[u8]) -> Result<usize> {
        let message = decode_message(buf)?;
        let kept = message.entries.len();
        self.replace(message.entries, Some(message.timestamp));
        Ok(kept)
    }

    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    /// Owned copy for attaching to a frame.
    pub fn snapshot(&self) -> Vec<MetadataEntry> {
        self.entries.clone()
    }

    /// Value of the first entry called `name`.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value)
    }

    /// Timestamp of the message the current set came from.
    pub fn timestamp(&self) -> Option<u32> {
        self.timestamp
    }

    /// Number of replacements so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
