//! Outbound command vocabulary.
//!
//! Everything the host sends starts with `10;` and ends with `;`; the line
//! terminator is added by the frame codec.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseError;
use crate::record::Address;

/// Asks the gateway to print all sixteen RTS channel records.
pub const LISTING_REQUEST: &str = "10;RTSSHOW;";

/// What a blind should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Up,
    Down,
    Stop,
    /// Bind the channel to a motor that is in programming mode.
    Pair,
}

impl Intent {
    /// Wire name of the intent.
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Up => "UP",
            Intent::Down => "DOWN",
            Intent::Stop => "STOP",
            Intent::Pair => "PAIR",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = ParseError;

    /// Case-insensitive; `MY` is the remote's name for STOP.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UP" => Ok(Intent::Up),
            "DOWN" => Ok(Intent::Down),
            "STOP" | "MY" => Ok(Intent::Stop),
            "PAIR" => Ok(Intent::Pair),
            _ => Err(ParseError::UnknownIntent(s.trim().to_string())),
        }
    }
}

/// Build an RTS command frame.
///
/// ```text
/// 10;RTS;<address>;[<rolling>;]<channel>;<INTENT>;
/// ```
///
/// The rolling-code field is only present when pairing.
pub(crate) fn format_frame(
    address: Address,
    rolling_code: Option<u16>,
    channel: u8,
    intent: Intent,
) -> String {
    match rolling_code {
        Some(rolling) => format!("10;RTS;{address};{rolling:04X};{channel:X};{intent};"),
        None => format!("10;RTS;{address};{channel:X};{intent};"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_parses_case_insensitively() {
        assert_eq!("up".parse::<Intent>().unwrap(), Intent::Up);
        assert_eq!(" Down ".parse::<Intent>().unwrap(), Intent::Down);
        assert_eq!("STOP".parse::<Intent>().unwrap(), Intent::Stop);
        assert_eq!("pair".parse::<Intent>().unwrap(), Intent::Pair);
    }

    #[test]
    fn my_is_an_alias_for_stop() {
        assert_eq!("my".parse::<Intent>().unwrap(), Intent::Stop);
    }

    #[test]
    fn unknown_intent_is_rejected() {
        let err = "open".parse::<Intent>().unwrap_err();
        assert_eq!(err, ParseError::UnknownIntent("open".to_string()));
    }

    #[test]
    fn frame_without_rolling_code() {
        let frame = format_frame(Address::new(0x1A2B3C), None, 12, Intent::Down);
        assert_eq!(frame, "10;RTS;1A2B3C;C;DOWN;");
    }

    #[test]
    fn frame_with_rolling_code() {
        let frame = format_frame(Address::new(0x00BEEF), Some(0x2A), 16, Intent::Pair);
        assert_eq!(frame, "10;RTS;00BEEF;002A;10;PAIR;");
    }
}
