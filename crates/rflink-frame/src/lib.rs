//! Line framing for the RFLink gateway protocol.
//!
//! The gateway speaks ASCII text, one message per line, every line ended by
//! `\r\n`. Serial reads hand us arbitrary slices of that stream; this crate
//! turns them back into whole lines and frames outbound commands.
//!
//! No partial lines, no buffer management in user code.

pub mod codec;
pub mod error;

pub use codec::{LineCodec, DEFAULT_MAX_LINE_LENGTH, LINE_TERMINATOR};
pub use error::{FrameError, Result};
