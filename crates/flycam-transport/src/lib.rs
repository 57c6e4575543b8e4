//! Subscription transport abstraction for flycam.
//!
//! Video and metadata arrive as discrete wire messages on publish/subscribe
//! channels. This crate provides the receiving side only:
//! - [`WireMessage`], an immutable byte buffer delivered by one receive call
//! - the [`Subscriber`] trait (`poll` with timeout, non-blocking `try_recv`)
//! - an in-process [`channel`] for replay, loopback and tests
//! - a ZeroMQ SUB backend (behind the `zmq` feature)
//!
//! Everything above this layer is transport-agnostic.

pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "zmq")]
pub mod zmq;

pub use error::{Result, TransportError};
pub use memory::{channel, channel_with_options, ChannelOptions, ChannelSubscriber, Publisher};
pub use traits::{Subscriber, WireMessage};

#[cfg(feature = "zmq")]
pub use crate::zmq::{SubscribeOptions, ZmqContext, ZmqSubscriber};
