//! Our error types for reading the PSU.

use thiserror::Error;

use crate::payload::PayloadField;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for Dell PSU identification reads.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Single-wire transport error")]
    Transport(I),
    #[error("No device answered the presence pulse")]
    NotPresent,
    #[error("Command checksum mismatch: expected {expected:#04x}, device sent {received:#04x}")]
    ChecksumMismatch { expected: u8, received: u8 },
    #[error("Payload header is not a genuine Dell signature")]
    HeaderMismatch,
    #[error("Payload decode error: {0}")]
    Decode(DecodeError),
}

impl<I: embedded_io::Error> From<DecodeError> for Error<I> {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

/// Reasons the ASCII rating fields of a payload could not be turned into numbers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A byte inside a numeric field was not an ASCII digit.
    #[error("Byte {byte:#04x} at offset {offset} is not an ASCII digit")]
    NonDigit { offset: usize, byte: u8 },
    /// The scaled value does not fit in a `u16`.
    #[error("{field:?} value {value} does not fit in 16 bits")]
    OutOfRange { field: PayloadField, value: u32 },
}
