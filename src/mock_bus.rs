//! We use this mocking module in unit tests to emulate a single PSU on a 1-Wire bus.

use thiserror::Error;

use crate::{
    crc::crc8,
    payload::{PAYLOAD_LEN, READ_COMMAND},
    transport::SingleWireTransport,
};

/// Our mock type used to emulate a PSU on a single-wire bus.
pub struct MockBus {
    /// Whether a device answers the presence pulse.
    present: bool,
    /// Payload the simulated PSU sends after the command checksum.
    payload: [u8; PAYLOAD_LEN],
    /// XOR'd into the command checksum the device sends back.
    checksum_corruption: u8,
    /// Everything written to the bus, across transactions.
    write_buffer: heapless::Vec<u8, 256>,
    /// Bytes queued up for the current transaction.
    read_buffer: heapless::Vec<u8, 32>,
    /// Current position in the read buffer
    read_position: usize,
    /// Fail on reads after this many bytes of the current transaction.
    fail_read_after: Option<usize>,
    /// Number of reset pulses issued.
    resets: usize,
}

#[derive(Error, Debug)]
pub enum MockBusError {
    /// Buffer capacity exceeded.
    #[error("Mock bus buffer overflow")]
    BufferOverflow,
    /// The master tried to read with nothing queued.
    #[error("No data queued on the mock bus")]
    NoData,
    /// Generic simulated error for testing
    #[error("Simulated bus error")]
    SimulatedError,
}

impl embedded_io::Error for MockBusError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockBusError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockBusError::NoData => embedded_io::ErrorKind::TimedOut,
            MockBusError::SimulatedError => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockBus {
    type Error = MockBusError;
}

impl SingleWireTransport for MockBus {
    fn reset(&mut self) -> Result<bool, Self::Error> {
        self.resets += 1;
        self.read_buffer.clear();
        self.read_position = 0;
        Ok(self.present)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write_buffer
            .extend_from_slice(bytes)
            .map_err(|_| MockBusError::BufferOverflow)?;

        // Like the real PSU: answer a read command with its CRC, then the memory contents.
        if *bytes == READ_COMMAND {
            let checksum = crc8(bytes) ^ self.checksum_corruption;
            self.read_buffer
                .push(checksum)
                .map_err(|_| MockBusError::BufferOverflow)?;
            self.read_buffer
                .extend_from_slice(&self.payload)
                .map_err(|_| MockBusError::BufferOverflow)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        if self
            .fail_read_after
            .is_some_and(|limit| self.read_position >= limit)
        {
            return Err(MockBusError::SimulatedError);
        }
        let byte = *self
            .read_buffer
            .get(self.read_position)
            .ok_or(MockBusError::NoData)?;
        self.read_position += 1;
        Ok(byte)
    }
}

impl MockBus {
    /// Create a bus with a PSU present, reporting `payload`.
    pub fn new(payload: &[u8; PAYLOAD_LEN]) -> Self {
        Self {
            present: true,
            payload: *payload,
            checksum_corruption: 0,
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            fail_read_after: None,
            resets: 0,
        }
    }

    /// Create a bus with nothing plugged in.
    pub fn empty() -> Self {
        let mut bus = Self::new(&[0; PAYLOAD_LEN]);
        bus.present = false;
        bus
    }

    /// Plug in or unplug the simulated PSU.
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    /// Change what the simulated PSU reports from the next transaction on.
    pub fn set_payload(&mut self, payload: &[u8; PAYLOAD_LEN]) {
        self.payload = *payload;
    }

    /// Make the device send back a wrong command checksum.
    pub fn set_checksum_corruption(&mut self, mask: u8) {
        self.checksum_corruption = mask;
    }

    /// Fail reads once `count` bytes of a transaction have been read. `None` disables.
    pub fn set_read_error_after(&mut self, count: Option<usize>) {
        self.fail_read_after = count;
    }

    /// Get a reference to the data that was written to the bus
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Clear the write buffer
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
    }

    /// Number of reset pulses seen so far.
    pub fn resets(&self) -> usize {
        self.resets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::Error;

    const PAYLOAD: &[u8; PAYLOAD_LEN] = b"DELL00AC180195092";

    #[test]
    fn test_presence() {
        let mut bus = MockBus::new(PAYLOAD);
        assert!(bus.reset().unwrap());
        bus.set_present(false);
        assert!(!bus.reset().unwrap());
        assert!(!MockBus::empty().reset().unwrap());
        assert_eq!(bus.resets(), 2);
    }

    #[test]
    fn test_responds_to_read_command() {
        let mut bus = MockBus::new(PAYLOAD);
        bus.reset().unwrap();
        bus.skip_selection().unwrap();
        bus.write_bytes(&READ_COMMAND).unwrap();

        assert_eq!(bus.read_byte().unwrap(), 0x8D);
        for &expected in PAYLOAD {
            assert_eq!(bus.read_byte().unwrap(), expected);
        }
        assert!(matches!(bus.read_byte(), Err(MockBusError::NoData)));
        assert_eq!(bus.written_data(), &[0xCC, 0xF0, 0x00, 0x00]);
    }

    #[test]
    fn test_other_commands_get_no_response() {
        let mut bus = MockBus::new(PAYLOAD);
        bus.reset().unwrap();
        bus.write_bytes(&[0x33]).unwrap();
        assert!(matches!(bus.read_byte(), Err(MockBusError::NoData)));
    }

    #[test]
    fn test_reset_discards_pending_response() {
        let mut bus = MockBus::new(PAYLOAD);
        bus.reset().unwrap();
        bus.write_bytes(&READ_COMMAND).unwrap();
        bus.reset().unwrap();
        assert!(matches!(bus.read_byte(), Err(MockBusError::NoData)));
    }

    #[test]
    fn test_checksum_corruption() {
        let mut bus = MockBus::new(PAYLOAD);
        bus.set_checksum_corruption(0xFF);
        bus.reset().unwrap();
        bus.write_bytes(&READ_COMMAND).unwrap();
        assert_eq!(bus.read_byte().unwrap(), 0x8D ^ 0xFF);
    }

    #[test]
    fn test_read_error_simulation() {
        let mut bus = MockBus::new(PAYLOAD);
        bus.set_read_error_after(Some(2));
        bus.reset().unwrap();
        bus.write_bytes(&READ_COMMAND).unwrap();
        assert!(bus.read_byte().is_ok());
        assert!(bus.read_byte().is_ok());
        assert!(matches!(bus.read_byte(), Err(MockBusError::SimulatedError)));
    }

    #[test]
    fn test_clear_written_data() {
        let mut bus = MockBus::new(PAYLOAD);
        bus.write_bytes(b"test").unwrap();
        assert!(!bus.written_data().is_empty());

        bus.clear_written_data();
        assert!(bus.written_data().is_empty());
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut bus = MockBus::new(PAYLOAD);
        let large_data = [0u8; 300];
        assert!(matches!(
            bus.write_bytes(&large_data),
            Err(MockBusError::BufferOverflow)
        ));
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            MockBusError::BufferOverflow.kind(),
            embedded_io::ErrorKind::OutOfMemory
        ));
        assert!(matches!(
            MockBusError::NoData.kind(),
            embedded_io::ErrorKind::TimedOut
        ));
        assert!(matches!(
            MockBusError::SimulatedError.kind(),
            embedded_io::ErrorKind::Other
        ));
    }
}
