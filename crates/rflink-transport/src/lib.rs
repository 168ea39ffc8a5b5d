//! Byte-stream transport for RFLink gateways.
//!
//! The gateway hangs off a USB serial port. This is the lowest layer of
//! rflink-somfy: it opens the port and hands back an async duplex stream.
//! Everything above only needs a [`GatewayIo`], so tests can substitute an
//! in-memory pipe for real hardware.

pub mod error;
pub mod serial;
pub mod traits;

pub use error::{Result, SerialErrorKind, TransportError};
pub use serial::{list_ports, open, SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_PORT};
pub use traits::GatewayIo;
