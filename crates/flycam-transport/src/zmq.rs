//! ZeroMQ SUB backend.
//!
//! One [`ZmqContext`] owns the library context; every [`ZmqSubscriber`] it
//! creates keeps a handle to it, so the context is only terminated after the
//! last socket closes.

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{Subscriber, WireMessage};

/// Socket options applied before connecting.
#[derive(Debug, Clone)]
pub struct SubscribeOptions {
    /// Keep only the newest undelivered message (`ZMQ_CONFLATE`).
    pub conflate: bool,
    /// Receive high-water mark (`ZMQ_RCVHWM`). Ignored when `conflate` is set.
    pub receive_high_water_mark: i32,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self {
            conflate: true,
            receive_high_water_mark: 1,
        }
    }
}

/// Owned ZeroMQ context.
pub struct ZmqContext {
    ctx: ::zmq::Context,
}

impl ZmqContext {
    pub fn new() -> Self {
        Self {
            ctx: ::zmq::Context::new(),
        }
    }

    /// Connect a SUB socket to `endpoint`, subscribed to every topic.
    pub fn subscribe(&self, endpoint: &str, options: &SubscribeOptions) -> Result<ZmqSubscriber> {
        if endpoint.trim().is_empty() {
            return Err(TransportError::InvalidEndpoint(endpoint.to_string()));
        }

        let socket = self
            .ctx
            .socket(::zmq::SUB)
            .map_err(|source| TransportError::Socket {
                context: "create SUB socket",
                source,
            })?;

        if options.conflate {
            socket
                .set_conflate(true)
                .map_err(|source| TransportError::Socket {
                    context: "ZMQ_CONFLATE",
                    source,
                })?;
        } else {
            socket
                .set_rcvhwm(options.receive_high_water_mark)
                .map_err(|source| TransportError::Socket {
                    context: "ZMQ_RCVHWM",
                    source,
                })?;
        }

        socket
            .set_linger(0)
            .map_err(|source| TransportError::Socket {
                context: "ZMQ_LINGER",
                source,
            })?;

        socket
            .connect(endpoint)
            .map_err(|source| TransportError::Connect {
                endpoint: endpoint.to_string(),
                source,
            })?;

        socket
            .set_subscribe(b"")
            .map_err(|source| TransportError::Socket {
                context: "ZMQ_SUBSCRIBE",
                source,
            })?;

        info!(endpoint, conflate = options.conflate, "subscribed");

        Ok(ZmqSubscriber {
            socket,
            endpoint: endpoint.to_string(),
            _ctx: self.ctx.clone(),
        })
    }
}

impl Default for ZmqContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ZmqContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZmqContext").finish_non_exhaustive()
    }
}

/// A connected SUB socket.
///
/// Field order matters: the socket is closed before the context handle drops.
pub struct ZmqSubscriber {
    socket: ::zmq::Socket,
    endpoint: String,
    _ctx: ::zmq::Context,
}

impl ZmqSubscriber {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn recv(&self, flags: i32) -> Result<Option<WireMessage>> {
        match self.socket.recv_bytes(flags) {
            Ok(data) => Ok(Some(WireMessage::new(Bytes::from(data)))),
            Err(::zmq::Error::EAGAIN) | Err(::zmq::Error::EINTR) => Ok(None),
            Err(err) => Err(TransportError::Receive(err)),
        }
    }
}

impl Subscriber for ZmqSubscriber {
    fn poll(&mut self, timeout: Duration) -> Result<Option<WireMessage>> {
        let timeout_ms = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        let ready = match self.socket.poll(::zmq::POLLIN, timeout_ms) {
            Ok(n) => n,
            Err(::zmq::Error::EINTR) => return Ok(None),
            Err(err) => return Err(TransportError::Receive(err)),
        };
        if ready == 0 {
            return Ok(None);
        }

        let msg = self.recv(::zmq::DONTWAIT)?;
        if let Some(msg) = &msg {
            debug!(endpoint = %self.endpoint, len = msg.len(), "received wire message");
        }
        Ok(msg)
    }

    fn try_recv(&mut self) -> Result<Option<WireMessage>> {
        self.recv(::zmq::DONTWAIT)
    }
}

impl std::fmt::Debug for ZmqSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZmqSubscriber")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
