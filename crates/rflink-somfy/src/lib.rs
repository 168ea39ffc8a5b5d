//! Drive Somfy RTS blinds through an RFLink serial gateway.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial port transport
//! - [`frame`] — CRLF line framing
//! - [`gateway`] — RTS channel registry, command encoding and the protocol engine

/// Re-export transport types.
pub mod transport {
    pub use rflink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use rflink_frame::*;
}

/// Re-export gateway types.
pub mod gateway {
    pub use rflink_gateway::*;
}
