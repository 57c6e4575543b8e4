use std::ops::Deref;
use std::time::Duration;

use bytes::Bytes;

use crate::error::Result;

/// One discrete unit of data delivered by a single receive call.
///
/// The buffer is immutable and cheap to clone (reference counted). Decoders
/// only ever borrow it for the duration of one decode call.
#[derive(Clone, PartialEq, Eq)]
pub struct WireMessage {
    data: Bytes,
}

impl WireMessage {
    /// Wrap a received buffer.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Number of bytes received on the wire.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the message and return the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl Deref for WireMessage {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for WireMessage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for WireMessage {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<Bytes> for WireMessage {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl std::fmt::Debug for WireMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireMessage")
            .field("len", &self.data.len())
            .finish()
    }
}

/// The receiving end of a subscription channel.
///
/// Implementations may conflate (deliver only the newest undelivered
/// message), so callers must not assume one message per publish interval.
pub trait Subscriber {
    /// Wait up to `timeout` for the next message.
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    fn poll(&mut self, timeout: Duration) -> Result<Option<WireMessage>>;

    /// Take the next already-queued message without blocking.
    fn try_recv(&mut self) -> Result<Option<WireMessage>> {
        self.poll(Duration::ZERO)
    }
}

impl<S: Subscriber + ?Sized> Subscriber for Box<S> {
    fn poll(&mut self, timeout: Duration) -> Result<Option<WireMessage>> {
        (**self).poll(timeout)
    }

    fn try_recv(&mut self) -> Result<Option<WireMessage>> {
        (**self).try_recv()
    }
}
