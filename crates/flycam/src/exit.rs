use std::fmt;
use std::io;

use flycam_frame::{DecodeError, ReceiverError};
use flycam_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn decode_error(context: &str, err: DecodeError) -> CliError {
    match err {
        DecodeError::AllocationFailed { .. } => CliError::new(INTERNAL, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg_attr(not(feature = "zmq"), allow(dead_code))]
pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::InvalidEndpoint(_) => CliError::new(USAGE, format!("{context}: {err}")),
        TransportError::Shutdown => CliError::new(FAILURE, format!("{context}: {err}")),
        #[allow(unreachable_patterns)]
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

#[cfg_attr(not(feature = "zmq"), allow(dead_code))]
pub fn receiver_error(context: &str, err: ReceiverError) -> CliError {
    match err {
        ReceiverError::Transport(err) => transport_error(context, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_are_data_invalid() {
        let err = decode_error(
            "inspect",
            DecodeError::ShortFrame {
                expected: 10,
                actual: 4,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("inspect: short frame"));
    }

    #[test]
    fn io_not_found_is_failure() {
        let err = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
    }

    #[test]
    fn invalid_endpoint_is_usage() {
        let err = transport_error("watch", TransportError::InvalidEndpoint("x".into()));
        assert_eq!(err.code, USAGE);
    }
}
