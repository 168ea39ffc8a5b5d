use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::Rng;
use serde::{Serialize, Serializer};

use crate::command::{format_frame, Intent};
use crate::error::ParseError;

/// Channel ids the gateway reports, one per hardware slot.
pub const CHANNEL_IDS: RangeInclusive<u8> = 1..=16;

/// Rolling code of a slot that has never transmitted.
pub const UNINITIALIZED_ROLLING_CODE: u16 = 0xFFFF;

/// Listing lines carry at least this many whitespace-separated tokens.
const MIN_LISTING_FIELDS: usize = 7;

/// A 24-bit RTS remote address.
///
/// `FFFFFF` marks a slot that was never paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(u32);

impl Address {
    /// Address of an unpaired slot.
    pub const UNPAIRED: Address = Address(0xFF_FFFF);

    /// Wrap a raw address; bits above 24 are dropped.
    pub const fn new(raw: u32) -> Self {
        Self(raw & 0xFF_FFFF)
    }

    /// A fresh random address, never the unpaired sentinel.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..Self::UNPAIRED.0))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_unpaired(self) -> bool {
        self == Self::UNPAIRED
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseError::InvalidAddress(s.to_string()));
        }
        u32::from_str_radix(s, 16)
            .map(Address)
            .map_err(|_| ParseError::InvalidAddress(s.to_string()))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One of the gateway's sixteen RTS channel slots.
///
/// Fields are read-only from outside: the rolling code only moves through
/// [`ChannelRecord::encode`], which keeps it monotonic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRecord {
    id: u8,
    address: Address,
    rolling_code: u16,
}

impl ChannelRecord {
    /// Build a record directly; used by tests and fake gateways.
    pub fn new(id: u8, address: Address, rolling_code: u16) -> Result<Self, ParseError> {
        if !CHANNEL_IDS.contains(&id) {
            return Err(ParseError::ChannelOutOfRange(id));
        }
        Ok(Self {
            id,
            address,
            rolling_code,
        })
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn rolling_code(&self) -> u16 {
        self.rolling_code
    }

    /// A slot is active once a blind has been paired to it.
    pub fn is_active(&self) -> bool {
        !self.address.is_unpaired()
    }

    /// The line the gateway prints for this record in its listing.
    pub fn listing_line(&self) -> String {
        format!(
            "RTS Record: {} Address: {} RC: {:04X}",
            self.id, self.address, self.rolling_code
        )
    }

    /// Encode `intent` as a command frame, advancing the rolling code.
    pub fn encode(&mut self, intent: Intent) -> String {
        self.encode_with(intent, &mut rand::thread_rng())
    }

    /// Encode `intent` drawing any fresh pairing address from `rng`.
    ///
    /// PAIR seeds an uninitialized rolling code with 1 and gives an unpaired
    /// slot a random address before the frame is built. The rolling code then
    /// advances by exactly one for every intent.
    pub fn encode_with<R: Rng + ?Sized>(&mut self, intent: Intent, rng: &mut R) -> String {
        let mut rolling_field = None;
        if intent == Intent::Pair {
            if self.rolling_code == UNINITIALIZED_ROLLING_CODE {
                self.rolling_code = 0x0001;
            }
            if self.address.is_unpaired() {
                self.address = Address::random(rng);
            }
            rolling_field = Some(self.rolling_code);
        }

        let frame = format_frame(self.address, rolling_field, self.id, intent);
        self.rolling_code = self.rolling_code.wrapping_add(1);
        frame
    }
}

impl FromStr for ChannelRecord {
    type Err = ParseError;

    /// Parse a listing line such as `RTS Record: 3 Address: 1A2B3C RC: 0042`.
    ///
    /// Only token positions are relied on: 2 is the id, 4 the address and 6
    /// the rolling code in hex.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_LISTING_FIELDS {
            return Err(ParseError::TooFewFields {
                expected: MIN_LISTING_FIELDS,
                found: fields.len(),
                line: line.to_string(),
            });
        }

        let id: u8 = fields[2]
            .parse()
            .map_err(|_| ParseError::InvalidChannelId(fields[2].to_string()))?;
        let address: Address = fields[4].parse()?;
        let rolling_code = u16::from_str_radix(fields[6], 16)
            .map_err(|_| ParseError::InvalidRollingCode(fields[6].to_string()))?;

        Self::new(id, address, rolling_code)
    }
}

impl fmt::Display for ChannelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_active() {
            write!(
                f,
                "Record {:2}: Address: {}  Rolling Code: {:5} [{:04x}]",
                self.id, self.address, self.rolling_code, self.rolling_code
            )
        } else {
            write!(
                f,
                "Record {:2}: Address: {}  Rolling Code: n/a",
                self.id, self.address
            )
        }
    }
}
