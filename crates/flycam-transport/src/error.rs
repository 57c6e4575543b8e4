/// Errors that can occur in subscription transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the specified endpoint.
    #[cfg(feature = "zmq")]
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: ::zmq::Error,
    },

    /// A socket option or socket creation call failed.
    #[cfg(feature = "zmq")]
    #[error("socket setup failed ({context}): {source}")]
    Socket {
        context: &'static str,
        source: ::zmq::Error,
    },

    /// Polling or receiving on an established socket failed.
    #[cfg(feature = "zmq")]
    #[error("receive failed: {0}")]
    Receive(#[source] ::zmq::Error),

    /// The endpoint string is empty or otherwise unusable.
    #[error("invalid endpoint: {0:?}")]
    InvalidEndpoint(String),

    /// Every publisher for this channel has been dropped.
    #[error("transport shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, TransportError>;
