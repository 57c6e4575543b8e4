use std::time::Duration;

use flycam_transport::{Subscriber, WireMessage};
use tracing::trace;

/// Receives whole wire messages from a subscription.
///
/// At most one received message is held at a time: polling again releases
/// the previous one first, and the returned borrow cannot outlive the next
/// call.
pub struct WireReader<S> {
    inner: S,
    current: Option<WireMessage>,
    received: u64,
}

impl<S: Subscriber> WireReader<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            current: None,
            received: 0,
        }
    }

    /// Wait up to `timeout` for the next message.
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    pub fn poll(&mut self, timeout: Duration) -> flycam_transport::Result<Option<&WireMessage>> {
        self.release();
        let message = self.inner.poll(timeout)?;
        if let Some(message) = &message {
            self.received += 1;
            trace!(len = message.len(), "received wire message");
        }
        self.current = message;
        Ok(self.current.as_ref())
    }

    /// Hand every message already queued to `f`, without blocking.
    ///
    /// Returns how many messages were delivered. Each one is released before
    /// the next is fetched.
    pub fn drain<F>(&mut self, mut f: F) -> flycam_transport::Result<usize>
    where
        F: FnMut(&WireMessage),
    {
        let mut delivered = 0;
        while let Some(message) = self.poll(Duration::ZERO)? {
            f(message);
            delivered += 1;
        }
        self.release();
        Ok(delivered)
    }

    /// Drop the held message, if any.
    pub fn release(&mut self) {
        self.current = None;
    }

    /// The message returned by the last successful poll, until released.
    pub fn current(&self) -> Option<&WireMessage> {
        self.current.as_ref()
    }

    /// Messages received over the reader's lifetime.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Borrow the underlying subscriber.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the underlying subscriber.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the reader and return the subscriber.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> std::fmt::Debug for WireReader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireReader")
            .field("holding", &self.current.is_some())
            .field("received", &self.received)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use flycam_transport::{channel, channel_with_options, ChannelOptions, TransportError};

    use super::*;

    #[test]
    fn poll_returns_messages_in_order() {
        let (tx, rx) = channel();
        tx.publish(b"one".to_vec()).unwrap();
        tx.publish(b"two".to_vec()).unwrap();

        let mut reader = WireReader::new(rx);
        assert_eq!(
            reader.poll(Duration::ZERO).unwrap().unwrap().as_bytes(),
            b"one"
        );
        assert_eq!(
            reader.poll(Duration::ZERO).unwrap().unwrap().as_bytes(),
            b"two"
        );
        assert_eq!(reader.received(), 2);
    }

    #[test]
    fn poll_timeout_is_not_an_error() {
        let (_tx, rx) = channel();
        let mut reader = WireReader::new(rx);
        assert!(reader
            .poll(Duration::from_millis(5))
            .unwrap()
            .is_none());
        assert!(reader.current().is_none());
    }

    #[test]
    fn next_poll_releases_previous_message() {
        let (tx, rx) = channel();
        tx.publish(b"held".to_vec()).unwrap();

        let mut reader = WireReader::new(rx);
        reader.poll(Duration::ZERO).unwrap();
        assert_eq!(reader.current().unwrap().as_bytes(), b"held");

        assert!(reader.poll(Duration::ZERO).unwrap().is_none());
        assert!(reader.current().is_none());
    }

    #[test]
    fn release_drops_current() {
        let (tx, rx) = channel();
        tx.publish(vec![1, 2, 3]).unwrap();
        let mut reader = WireReader::new(rx);
        reader.poll(Duration::ZERO).unwrap();
        reader.release();
        assert!(reader.current().is_none());
    }

    #[test]
    fn drain_delivers_everything_queued() {
        let (tx, rx) = channel();
        for i in 0..5u8 {
            tx.publish(vec![i]).unwrap();
        }

        let mut reader = WireReader::new(rx);
        let mut seen = Vec::new();
        let delivered = reader.drain(|msg| seen.push(msg.as_bytes()[0])).unwrap();
        assert_eq!(delivered, 5);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(reader.current().is_none());
    }

    #[test]
    fn drain_with_conflation_sees_newest_only() {
        let (tx, rx) = channel_with_options(ChannelOptions { conflate: true });
        for i in 0..5u8 {
            tx.publish(vec![i]).unwrap();
        }

        let mut reader = WireReader::new(rx);
        let mut seen = Vec::new();
        reader.drain(|msg| seen.push(msg.as_bytes()[0])).unwrap();
        assert_eq!(seen, vec![4]);
    }

    #[test]
    fn drain_on_empty_queue_returns_zero() {
        let (_tx, rx) = channel();
        let mut reader = WireReader::new(rx);
        assert_eq!(reader.drain(|_| panic!("nothing queued")).unwrap(), 0);
    }

    #[test]
    fn closed_publisher_surfaces_shutdown() {
        let (tx, rx) = channel();
        drop(tx);
        let mut reader = WireReader::new(rx);
        let err = reader.poll(Duration::from_millis(5)).unwrap_err();
        assert!(matches!(err, TransportError::Shutdown));
    }

    #[test]
    fn receives_across_threads() {
        let (tx, rx) = channel();
        let producer = thread::spawn(move || {
            for i in 0..16u8 {
                tx.publish(vec![i; 64]).unwrap();
            }
        });

        let mut reader = WireReader::new(rx);
        let mut got = 0;
        while got < 16 {
            if let Some(msg) = reader.poll(Duration::from_millis(100)).unwrap() {
                assert_eq!(msg.len(), 64);
                got += 1;
            }
        }
        producer.join().unwrap();
    }

    #[test]
    fn accessors_and_into_inner() {
        let (_tx, rx) = channel();
        let mut reader = WireReader::new(rx);
        assert_eq!(reader.get_ref().pending(), 0);
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }
}
