use std::time::Duration;

/// Errors that can occur in gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] rflink_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] rflink_frame::FrameError),

    /// The awaited reply did not arrive in time.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Channel enumeration finished without all sixteen records.
    #[error("channel listing incomplete ({found} of 16 records)")]
    Incomplete { found: usize },

    /// The transport closed while the request was outstanding.
    #[error("connection to gateway lost")]
    ConnectionLost,

    /// The gateway connection is closed; nothing more can be sent.
    #[error("gateway connection closed")]
    Closed,

    /// No channel with this id is known.
    #[error("invalid channel number {0}")]
    UnknownChannel(u8),

    /// The channel has no paired blind and only PAIR is allowed.
    #[error("channel {0} is not active, pair a blind first")]
    InactiveChannel(u8),
}

/// Errors produced while parsing gateway text or operator input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The listing line has fewer whitespace-separated tokens than required.
    #[error("expected at least {expected} fields, found {found}: {line:?}")]
    TooFewFields {
        expected: usize,
        found: usize,
        line: String,
    },

    /// The channel id is not a decimal number.
    #[error("invalid channel id {0:?}")]
    InvalidChannelId(String),

    /// The channel id is outside 1..=16.
    #[error("channel id {0} out of range 1..=16")]
    ChannelOutOfRange(u8),

    /// The address is not six hex digits.
    #[error("invalid address {0:?} (expected 6 hex digits)")]
    InvalidAddress(String),

    /// The rolling code is not a 16-bit hex number.
    #[error("invalid rolling code {0:?}")]
    InvalidRollingCode(String),

    /// The identification string is not `<product> - <name> - R<revision>`.
    #[error("invalid device identification {0:?}")]
    InvalidDeviceInfo(String),

    /// Unknown blind command.
    #[error("unknown command {0:?} (expected UP, DOWN, STOP, MY or PAIR)")]
    UnknownIntent(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
