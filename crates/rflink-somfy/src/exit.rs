use std::fmt;
use std::io;

use rflink_gateway::GatewayError;
use rflink_transport::{SerialErrorKind, TransportError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
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

fn io_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe | io::ErrorKind::UnexpectedEof => {
            TRANSPORT_ERROR
        }
        _ => INTERNAL,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(io_code(err.kind()), format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = match &err {
        TransportError::Open { source, .. } => match source.kind() {
            SerialErrorKind::Io(kind) => match io_code(kind) {
                INTERNAL => TRANSPORT_ERROR,
                code => code,
            },
            SerialErrorKind::InvalidInput => USAGE,
            _ => TRANSPORT_ERROR,
        },
        TransportError::Io(source) => io_code(source.kind()),
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn gateway_error(context: &str, err: GatewayError) -> CliError {
    match err {
        GatewayError::Transport(err) => transport_error(context, err),
        GatewayError::Frame(rflink_frame::FrameError::Io(err)) => io_error(context, err),
        GatewayError::Timeout { .. } | GatewayError::Incomplete { .. } => {
            CliError::new(TIMEOUT, format!("{context}: {err}"))
        }
        GatewayError::UnknownChannel(_) | GatewayError::InactiveChannel(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        GatewayError::ConnectionLost | GatewayError::Closed => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn timeouts_map_to_timeout_code() {
        let err = gateway_error(
            "command failed",
            GatewayError::Timeout {
                operation: "command",
                after: Duration::from_secs(5),
            },
        );
        assert_eq!(err.code, TIMEOUT);
        assert_eq!(err.to_string(), "command failed: command timed out after 5s");
    }

    #[test]
    fn channel_selection_errors_are_usage_errors() {
        assert_eq!(gateway_error("x", GatewayError::UnknownChannel(20)).code, USAGE);
        assert_eq!(gateway_error("x", GatewayError::InactiveChannel(7)).code, USAGE);
    }

    #[test]
    fn lost_connection_is_plain_failure() {
        assert_eq!(gateway_error("x", GatewayError::ConnectionLost).code, FAILURE);
        assert_eq!(gateway_error("x", GatewayError::Closed).code, FAILURE);
    }

    #[test]
    fn permission_denied_keeps_its_code() {
        let err = io_error("open", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
