//! This crate reads the identification data reported by Dell laptop power supplies over their single-wire ID pin.
//!
//! It supports `no-std` environments by use of the `no_std` feature flag.
//!
//! The centre pin of a Dell barrel plug is a 1-Wire bus. The brick answers a "Read Data" command with an ASCII
//! string such as `DELL00AC180195092CN0WW4XY4866139S4SC9A03`, from which we decode:
//!
//! | Bytes   | Content          | Example    |
//! | ------- | ---------------- | ---------- |
//! | 0 - 7   | Header           | `DELL00AC` |
//! | 8 - 10  | Watts            | `180`      |
//! | 11 - 13 | Volts x 10       | `195`      |
//! | 14 - 16 | Amps x 10        | `092`      |
//!
//! Third party "Dell compatible" bricks usually report a different header, so header checking is opt-in via
//! [`HeaderMode::Strict`].
//!
//! The electrical side of the bus (reset pulses, bit timing) is not part of this crate. Implement
//! [`SingleWireTransport`] for whatever 1-Wire master you have and hand it to [`PsuReader::new`].

#![cfg_attr(feature = "no_std", no_std)]

pub mod crc;
pub mod error;
pub mod payload;
pub mod psu;
pub mod transport;
pub mod types;

pub use error::{DecodeError, Error};
pub use psu::PsuReader;
pub use transport::SingleWireTransport;
pub use types::{HeaderMode, PsuRating, ReaderState};

#[cfg(test)]
mod mock_bus;
