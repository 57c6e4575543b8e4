//! In-process publish/subscribe channel.
//!
//! Used for loopback, replaying captured messages, and tests. Mirrors the
//! socket backend's delivery policy: with `conflate` set, a receive returns
//! only the newest queued message and discards the older ones.

use std::time::Duration;

use bytes::Bytes;
use crossbeam::channel::{self as cb, Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::{Subscriber, WireMessage};

/// Delivery options for an in-process channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelOptions {
    /// Keep only the newest undelivered message.
    pub conflate: bool,
}

/// Create a lossless in-process channel.
pub fn channel() -> (Publisher, ChannelSubscriber) {
    channel_with_options(ChannelOptions::default())
}

/// Create an in-process channel with explicit delivery options.
pub fn channel_with_options(options: ChannelOptions) -> (Publisher, ChannelSubscriber) {
    let (tx, rx) = cb::unbounded();
    (Publisher { tx }, ChannelSubscriber { rx, options })
}

/// Sending half of an in-process channel. Cloneable.
#[derive(Debug, Clone)]
pub struct Publisher {
    tx: Sender<Bytes>,
}

impl Publisher {
    /// Queue one wire message.
    ///
    /// Fails with [`TransportError::Shutdown`] once the subscriber is gone.
    pub fn publish(&self, data: impl Into<Bytes>) -> Result<()> {
        self.tx
            .send(data.into())
            .map_err(|_| TransportError::Shutdown)
    }
}

/// Receiving half of an in-process channel.
#[derive(Debug)]
pub struct ChannelSubscriber {
    rx: Receiver<Bytes>,
    options: ChannelOptions,
}

impl ChannelSubscriber {
    /// Number of messages currently queued.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub fn options(&self) -> &ChannelOptions {
        &self.options
    }

    fn newest(&self, first: Bytes) -> Bytes {
        if !self.options.conflate {
            return first;
        }

        let mut newest = first;
        let mut dropped = 0usize;
        while let Ok(next) = self.rx.try_recv() {
            newest = next;
            dropped += 1;
        }
        if dropped > 0 {
            trace!(dropped, "conflated queued messages");
        }
        newest
    }
}

impl Subscriber for ChannelSubscriber {
    fn poll(&mut self, timeout: Duration) -> Result<Option<WireMessage>> {
        let first = if timeout.is_zero() {
            match self.rx.try_recv() {
                Ok(data) => data,
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(TransportError::Shutdown),
            }
        } else {
            match self.rx.recv_timeout(timeout) {
                Ok(data) => data,
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(TransportError::Shutdown),
            }
        };

        Ok(Some(WireMessage::new(self.newest(first))))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn delivers_in_order() {
        let (tx, mut rx) = channel();
        tx.publish(&b"one"[..]).unwrap();
        tx.publish(&b"two"[..]).unwrap();

        let first = rx.poll(Duration::from_millis(10)).unwrap().unwrap();
        let second = rx.poll(Duration::from_millis(10)).unwrap().unwrap();
        assert_eq!(first.as_bytes(), b"one");
        assert_eq!(second.as_bytes(), b"two");
    }

    #[test]
    fn poll_times_out_when_empty() {
        let (_tx, mut rx) = channel();
        let msg = rx.poll(Duration::from_millis(5)).unwrap();
        assert!(msg.is_none());
    }

    #[test]
    fn try_recv_does_not_block() {
        let (_tx, mut rx) = channel();
        assert!(rx.try_recv().unwrap().is_none());
    }

    #[test]
    fn conflate_returns_newest() {
        let (tx, mut rx) = channel_with_options(ChannelOptions { conflate: true });
        for i in 0..5u8 {
            tx.publish(vec![i]).unwrap();
        }
        assert_eq!(rx.pending(), 5);

        let msg = rx.try_recv().unwrap().unwrap();
        assert_eq!(msg.as_bytes(), &[4]);
        assert_eq!(rx.pending(), 0);
        assert!(rx.try_recv().unwrap().is_none());
    }

    #[test]
    fn queued_messages_survive_publisher_drop() {
        let (tx, mut rx) = channel();
        tx.publish(&b"last"[..]).unwrap();
        drop(tx);

        let msg = rx.try_recv().unwrap().unwrap();
        assert_eq!(msg.as_bytes(), b"last");
        assert!(matches!(rx.try_recv(), Err(TransportError::Shutdown)));
        assert!(matches!(
            rx.poll(Duration::from_millis(5)),
            Err(TransportError::Shutdown)
        ));
    }

    #[test]
    fn publish_after_subscriber_drop_fails() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(matches!(
            tx.publish(&b"x"[..]),
            Err(TransportError::Shutdown)
        ));
    }

    #[test]
    fn cross_thread_delivery() {
        let (tx, mut rx) = channel();
        let producer = thread::spawn(move || {
            for i in 0..16u8 {
                tx.publish(vec![i; 4]).unwrap();
            }
        });

        let mut received = Vec::new();
        while received.len() < 16 {
            if let Some(msg) = rx.poll(Duration::from_millis(200)).unwrap() {
                received.push(msg.as_bytes()[0]);
            }
        }
        producer.join().unwrap();
        assert_eq!(received, (0..16u8).collect::<Vec<_>>());
    }
}
