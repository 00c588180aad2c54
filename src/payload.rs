//! Layout of the Dell PSU identification payload, and decoding of its rating fields.
//!
//! Example of what a genuine brick reports:
//!
//! ```text
//! DELL00AC 180 195 092 CN0WW4XY4866139S4SC9A03
//! |        |   |   |   |
//! header   W   Vx10 Ax10 serial (not read)
//! ```

use strum_macros::{EnumCount, EnumIter};

use crate::{error::DecodeError, types::PsuRating};

/// 1-Wire "Skip ROM" command, addresses the only device on the bus.
pub const SKIP_ROM_CMD: u8 = 0xCC;

/// "Read Data" memory function command.
pub const READ_DATA_CMD: u8 = 0xF0;

/// Read Data from address `0x0000`. Address is sent LSB first.
pub const READ_COMMAND: [u8; 3] = [READ_DATA_CMD, 0x00, 0x00];

/// Number of payload bytes we read. Enough to reach the end of the current field.
pub const PAYLOAD_LEN: usize = 17;

/// Length of the header signature at the start of the payload.
pub const HEADER_LEN: usize = 8;

/// Header reported by genuine Dell power supplies.
pub const DELL_HEADER: [u8; HEADER_LEN] = *b"DELL00AC";

/// Digits per numeric field.
pub const FIELD_DIGITS: usize = 3;

/// The numeric fields following the header, in payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount)]
pub enum PayloadField {
    /// Rated output power, in watts.
    Watts,
    /// Output voltage. Reported in tenths of a volt.
    Millivolts,
    /// Output current. Reported in tenths of an amp.
    Milliamps,
}

impl PayloadField {
    /// Index of the first digit of this field within the payload.
    pub const fn offset(&self) -> usize {
        match self {
            PayloadField::Watts => 8,
            PayloadField::Millivolts => 11,
            PayloadField::Milliamps => 14,
        }
    }

    /// Multiplier from the reported 3-digit number to our units.
    ///
    /// Tenths of a volt/amp times 100 gives milli-volts/amps.
    pub const fn scale(&self) -> u32 {
        match self {
            PayloadField::Watts => 1,
            PayloadField::Millivolts | PayloadField::Milliamps => 100,
        }
    }

    /// Parse this field out of a payload.
    pub fn decode(&self, payload: &[u8; PAYLOAD_LEN]) -> Result<u16, DecodeError> {
        let start = self.offset();
        let mut reported = 0u32;
        for (i, &byte) in payload[start..start + FIELD_DIGITS].iter().enumerate() {
            if !byte.is_ascii_digit() {
                return Err(DecodeError::NonDigit {
                    offset: start + i,
                    byte,
                });
            }
            reported = reported * 10 + (byte - b'0') as u32;
        }

        let value = reported * self.scale();
        u16::try_from(value).map_err(|_| DecodeError::OutOfRange {
            field: *self,
            value,
        })
    }
}

/// Decode the watts, voltage and current fields of a payload.
///
/// The header is not looked at, see [`header_matches`] for that.
pub fn decode_payload(payload: &[u8; PAYLOAD_LEN]) -> Result<PsuRating, DecodeError> {
    Ok(PsuRating {
        watts: PayloadField::Watts.decode(payload)?,
        millivolts: PayloadField::Millivolts.decode(payload)?,
        milliamps: PayloadField::Milliamps.decode(payload)?,
    })
}

/// Whether the payload starts with the genuine Dell header.
pub fn header_matches(payload: &[u8; PAYLOAD_LEN]) -> bool {
    payload[..HEADER_LEN] == DELL_HEADER
}
