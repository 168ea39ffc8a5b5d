//! Classification of inbound gateway lines.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseError;
use crate::record::ChannelRecord;

const RECORD_PREFIX: &str = "RTS Record";
const REPLY_PREFIX: &str = "20;";
const WELCOME_CODE: &str = "00";
const ACK_FIELDS: usize = 4;
const IDENT_SEPARATOR: &str = " - ";

/// Identity the gateway announces after reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub product: String,
    pub name: String,
    pub revision: String,
}

impl FromStr for DeviceInfo {
    type Err = ParseError;

    /// Parse `<product> - <name> - R<revision>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(IDENT_SEPARATOR).map(str::trim).collect();
        let [product, name, revision] = parts.as_slice() else {
            return Err(ParseError::InvalidDeviceInfo(s.to_string()));
        };
        if product.is_empty() || name.is_empty() {
            return Err(ParseError::InvalidDeviceInfo(s.to_string()));
        }
        let revision: &str = revision;
        let revision = revision.strip_prefix('R').unwrap_or(revision);
        Ok(Self {
            product: product.to_string(),
            name: name.to_string(),
            revision: revision.to_string(),
        })
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} rev. {}", self.product, self.name, self.revision)
    }
}

/// One decoded gateway line, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A channel listing record.
    Record(ChannelRecord),
    /// A listing record that could not be parsed.
    MalformedRecord { line: String, error: ParseError },
    /// The welcome banner carrying the device identity.
    Welcome(DeviceInfo),
    /// A banner-shaped `20;00;` line whose identity could not be parsed.
    MalformedWelcome { line: String, error: ParseError },
    /// Reply to the oldest outstanding command.
    Ack { code: String, payload: String },
    /// Anything else: debug output, radio traffic, unknown `20;` shapes.
    Unrecognized(String),
}

impl Message {
    /// Classify one line of gateway output.
    ///
    /// `20;00;` lines whose third field reads like `<product> - <name> ...`
    /// are banners, well-formed or not. Any other four-field `20;` line is an
    /// acknowledgment, even when its sequence counter has wrapped to `00`.
    pub fn classify(line: &str) -> Self {
        if line.starts_with(RECORD_PREFIX) {
            return match line.parse::<ChannelRecord>() {
                Ok(record) => Message::Record(record),
                Err(error) => Message::MalformedRecord {
                    line: line.to_string(),
                    error,
                },
            };
        }

        if !line.starts_with(REPLY_PREFIX) {
            return Message::Unrecognized(line.to_string());
        }

        let fields: Vec<&str> = line.trim().split(';').collect();
        if fields.get(1) == Some(&WELCOME_CODE) {
            if let Some(ident) = fields.get(2).filter(|ident| ident.contains(IDENT_SEPARATOR)) {
                return match ident.parse::<DeviceInfo>() {
                    Ok(device) => Message::Welcome(device),
                    Err(error) => Message::MalformedWelcome {
                        line: line.to_string(),
                        error,
                    },
                };
            }
        }

        if fields.len() == ACK_FIELDS {
            return Message::Ack {
                code: fields[1].to_string(),
                payload: fields[2].to_string(),
            };
        }

        Message::Unrecognized(line.to_string())
    }
}
