//! The single-wire bus master we talk to the PSU through.

use crate::{crc::crc8, payload::SKIP_ROM_CMD};

/// A 1-Wire bus master bound to the pin the PSU ID line is connected to.
///
/// Bit timing, presence detection and byte framing are the implementor's concern. Bytes go out LSB first as
/// per the 1-Wire convention. Errors use [`embedded_io::Error`] so existing serial/UART based masters can reuse
/// their error types.
pub trait SingleWireTransport: embedded_io::ErrorType {
    /// Issue a reset pulse. Returns `true` if a device answered with a presence pulse.
    fn reset(&mut self) -> Result<bool, Self::Error>;

    /// Address whichever single device is on the bus, without a ROM code.
    fn skip_selection(&mut self) -> Result<(), Self::Error> {
        self.write_bytes(&[SKIP_ROM_CMD])
    }

    /// Transmit `bytes` in order.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Receive one byte.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// The checksum a device computes over `bytes`. Defaults to the standard 1-Wire CRC-8.
    fn checksum8(&self, bytes: &[u8]) -> u8 {
        crc8(bytes)
    }
}

impl<T: SingleWireTransport + ?Sized> SingleWireTransport for &mut T {
    fn reset(&mut self) -> Result<bool, Self::Error> {
        T::reset(self)
    }

    fn skip_selection(&mut self) -> Result<(), Self::Error> {
        T::skip_selection(self)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        T::write_bytes(self, bytes)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        T::read_byte(self)
    }

    fn checksum8(&self, bytes: &[u8]) -> u8 {
        T::checksum8(self, bytes)
    }
}
